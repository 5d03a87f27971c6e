use tracing_error::ErrorLayer;
use tracing_subscriber::{
    EnvFilter, fmt,
    filter::Directive,
    layer::{Layer, SubscriberExt},
    util::SubscriberInitExt,
};

use crate::config::{LogFormat, LoggingSettings};

use super::error::InfraError;

/// HTTP stack crates that are chatty at debug level; kept at warn unless
/// `RUST_LOG` names them explicitly.
const QUIET_DEPENDENCIES: [&str; 3] = ["hyper_util=warn", "reqwest=warn", "rustls=warn"];

/// Install a global tracing subscriber using the provided logging settings.
///
/// Logs go to stderr so command output on stdout stays machine-readable.
pub fn init(logging: &LoggingSettings) -> Result<(), InfraError> {
    let fmt_layer = match logging.format {
        LogFormat::Json => fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_current_span(true)
            .with_target(true)
            .boxed(),
        LogFormat::Compact => fmt::layer()
            .compact()
            .with_writer(std::io::stderr)
            .without_time()
            .with_target(false)
            .boxed(),
    };

    tracing_subscriber::registry()
        .with(build_filter(logging, std::env::var("RUST_LOG").ok().as_deref())?)
        .with(ErrorLayer::default())
        .with(fmt_layer)
        .try_init()
        .map_err(|err| InfraError::telemetry(format!("failed to install tracing subscriber: {err}")))
}

fn build_filter(logging: &LoggingSettings, rust_log: Option<&str>) -> Result<EnvFilter, InfraError> {
    let mut filter = EnvFilter::builder()
        .with_default_directive(logging.level.into())
        .parse_lossy(rust_log.unwrap_or_default());

    let explicit = rust_log.unwrap_or_default();
    for quiet in QUIET_DEPENDENCIES {
        let crate_name = quiet.split('=').next().unwrap_or_default();
        if explicit.contains(crate_name) {
            continue;
        }
        let directive: Directive = quiet
            .parse()
            .map_err(|err| InfraError::telemetry(format!("bad directive `{quiet}`: {err}")))?;
        filter = filter.add_directive(directive);
    }
    Ok(filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    fn settings(level: LevelFilter) -> LoggingSettings {
        LoggingSettings {
            level,
            format: LogFormat::Compact,
        }
    }

    #[test]
    fn configured_level_is_the_default_directive() {
        let filter = build_filter(&settings(LevelFilter::DEBUG), None).expect("filter");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
        assert!(filter.to_string().contains("reqwest=warn"));
    }

    #[test]
    fn rust_log_mentioning_a_dependency_keeps_its_level() {
        let filter = build_filter(&settings(LevelFilter::WARN), Some("reqwest=trace"))
            .expect("filter");
        let rendered = filter.to_string();
        assert!(rendered.contains("reqwest=trace"));
        assert!(!rendered.contains("reqwest=warn"));
        assert!(rendered.contains("hyper_util=warn"));
    }
}
