//! Configuration layer: typed settings with layered precedence (file → env → CLI).

use std::{num::NonZeroU32, path::PathBuf, str::FromStr, time::Duration};

use clap::{Args, ValueEnum, ValueHint, builder::BoolishValueParser};
use config::{Config, Environment, File, Map};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

use crate::application::listing::DEFAULT_SEARCH_DEBOUNCE;
use crate::application::pagination::DEFAULT_PAGE_SIZE;
use crate::infra::cms::normalize_base_url;

const DEFAULT_CONFIG_BASENAME: &str = "config/default";
const LOCAL_CONFIG_BASENAME: &str = "postdesk";
const ENV_PREFIX: &str = "POSTDESK";
const DEFAULT_SESSION_FILE: &str = ".postdesk/session.json";
const MAX_PAGE_SIZE: u32 = 100;

/// Flags shared by every command that override file and environment values.
#[derive(Debug, Args, Default, Clone)]
pub struct ConfigOverrides {
    /// Optional path to a configuration file.
    #[arg(
        long = "config-file",
        env = "POSTDESK_CONFIG_FILE",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub config_file: Option<PathBuf>,

    /// Override the CMS base URL (scheme defaults to https).
    #[arg(long = "cms-url", value_name = "URL", global = true)]
    pub cms_url: Option<String>,

    /// Override the authentication mode.
    #[arg(long = "auth-mode", value_enum, value_name = "MODE", global = true)]
    pub auth_mode: Option<AuthMode>,

    /// Override where a remembered session is stored; an empty value keeps
    /// sessions in memory only.
    #[arg(
        long = "session-file",
        value_name = "PATH",
        value_hint = ValueHint::FilePath,
        global = true
    )]
    pub session_file: Option<PathBuf>,

    /// Override the number of posts per page.
    #[arg(long = "page-size", value_name = "N", global = true)]
    pub page_size: Option<u32>,

    /// Override the base log level (trace|debug|info|warn|error).
    #[arg(long = "log-level", value_name = "LEVEL", global = true)]
    pub log_level: Option<String>,

    /// Toggle JSON logging.
    #[arg(
        long = "log-json",
        value_name = "BOOL",
        value_parser = BoolishValueParser::new(),
        global = true
    )]
    pub log_json: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub cms: CmsSettings,
    pub auth: AuthSettings,
    pub session: SessionSettings,
    pub listing: ListingSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone)]
pub struct CmsSettings {
    pub base_url: String,
    pub api_token: Option<String>,
    pub request_timeout: Option<Duration>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum AuthMode {
    /// Sign in through the CMS admin login route.
    #[default]
    Admin,
    /// Compare against configured credentials and use the configured API token.
    StaticToken,
}

#[derive(Debug, Clone)]
pub struct AuthSettings {
    pub mode: AuthMode,
    pub admin_email: Option<String>,
    pub admin_password: Option<String>,
}

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// `None` keeps the session in memory only.
    pub storage_path: Option<PathBuf>,
}

#[derive(Debug, Clone)]
pub struct ListingSettings {
    pub page_size: NonZeroU32,
    pub search_debounce: Duration,
}

#[derive(Debug, Clone)]
pub struct LoggingSettings {
    pub level: LevelFilter,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy)]
pub enum LogFormat {
    Json,
    Compact,
}

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Load settings using the configured precedence (file → environment → CLI).
pub fn load(overrides: &ConfigOverrides) -> Result<Settings, LoadError> {
    load_with_env(overrides, None)
}

/// Same as [`load`], with the environment layer read from `env` instead of
/// the process environment when given.
pub fn load_with_env(
    overrides: &ConfigOverrides,
    env: Option<Map<String, String>>,
) -> Result<Settings, LoadError> {
    let mut builder = Config::builder()
        .add_source(File::with_name(DEFAULT_CONFIG_BASENAME).required(false))
        .add_source(File::with_name(LOCAL_CONFIG_BASENAME).required(false));

    if let Some(path) = overrides.config_file.as_ref() {
        builder = builder.add_source(File::from(path.as_path()).required(true));
    }

    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .source(env),
    );

    let mut raw: RawSettings = builder.build()?.try_deserialize()?;
    raw.apply_overrides(overrides);
    Settings::from_raw(raw)
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSettings {
    cms: RawCmsSettings,
    auth: RawAuthSettings,
    session: RawSessionSettings,
    listing: RawListingSettings,
    logging: RawLoggingSettings,
}

impl RawSettings {
    fn apply_overrides(&mut self, overrides: &ConfigOverrides) {
        if let Some(url) = overrides.cms_url.as_ref() {
            self.cms.base_url = Some(url.clone());
        }
        if let Some(mode) = overrides.auth_mode {
            self.auth.mode = Some(mode);
        }
        if let Some(path) = overrides.session_file.as_ref() {
            self.session.storage_path = Some(path.clone());
        }
        if let Some(size) = overrides.page_size {
            self.listing.page_size = Some(size);
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.logging.level = Some(level.clone());
        }
        if let Some(json) = overrides.log_json {
            self.logging.json = Some(json);
        }
    }
}

impl Settings {
    fn from_raw(raw: RawSettings) -> Result<Self, LoadError> {
        let cms = build_cms_settings(raw.cms)?;
        let auth = build_auth_settings(raw.auth, &cms)?;
        Ok(Self {
            cms,
            auth,
            session: build_session_settings(raw.session),
            listing: build_listing_settings(raw.listing)?,
            logging: build_logging_settings(raw.logging)?,
        })
    }
}

fn build_cms_settings(cms: RawCmsSettings) -> Result<CmsSettings, LoadError> {
    let base_url = normalize_base_url(cms.base_url.as_deref().unwrap_or_default());
    url::Url::parse(&base_url)
        .map_err(|err| LoadError::invalid("cms.base_url", format!("`{base_url}`: {err}")))?;

    let request_timeout = match cms.request_timeout_seconds {
        Some(0) => {
            return Err(LoadError::invalid(
                "cms.request_timeout_seconds",
                "must be greater than zero",
            ));
        }
        Some(seconds) => Some(Duration::from_secs(seconds)),
        None => None,
    };

    Ok(CmsSettings {
        base_url,
        api_token: non_blank(cms.api_token),
        request_timeout,
    })
}

fn build_auth_settings(auth: RawAuthSettings, cms: &CmsSettings) -> Result<AuthSettings, LoadError> {
    let mode = auth.mode.unwrap_or_default();
    let admin_email = non_blank(auth.admin_email);
    let admin_password = auth.admin_password.filter(|value| !value.is_empty());

    if mode == AuthMode::StaticToken {
        if cms.api_token.is_none() {
            return Err(LoadError::invalid(
                "cms.api_token",
                "required when auth.mode is static_token",
            ));
        }
        if admin_email.is_none() || admin_password.is_none() {
            return Err(LoadError::invalid(
                "auth.admin_email",
                "static_token mode needs both auth.admin_email and auth.admin_password",
            ));
        }
    }

    Ok(AuthSettings {
        mode,
        admin_email,
        admin_password,
    })
}

fn build_session_settings(session: RawSessionSettings) -> SessionSettings {
    let storage_path = match session.storage_path {
        Some(path) if path.as_os_str().is_empty() => None,
        Some(path) => Some(path),
        None => Some(PathBuf::from(DEFAULT_SESSION_FILE)),
    };
    SessionSettings { storage_path }
}

fn build_listing_settings(listing: RawListingSettings) -> Result<ListingSettings, LoadError> {
    let size = listing.page_size.unwrap_or(DEFAULT_PAGE_SIZE);
    if size > MAX_PAGE_SIZE {
        return Err(LoadError::invalid(
            "listing.page_size",
            format!("must not exceed {MAX_PAGE_SIZE}"),
        ));
    }
    let page_size = NonZeroU32::new(size)
        .ok_or_else(|| LoadError::invalid("listing.page_size", "must be greater than zero"))?;

    let search_debounce = listing
        .search_debounce_ms
        .map(Duration::from_millis)
        .unwrap_or(DEFAULT_SEARCH_DEBOUNCE);

    Ok(ListingSettings {
        page_size,
        search_debounce,
    })
}

fn build_logging_settings(logging: RawLoggingSettings) -> Result<LoggingSettings, LoadError> {
    let level = match logging.level {
        Some(level) => LevelFilter::from_str(level.as_str()).map_err(|err| {
            LoadError::invalid("logging.level", format!("failed to parse: {err}"))
        })?,
        None => LevelFilter::WARN,
    };

    let format = if logging.json.unwrap_or(false) {
        LogFormat::Json
    } else {
        LogFormat::Compact
    };

    Ok(LoggingSettings { level, format })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|value| {
        let trimmed = value.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_string())
    })
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawCmsSettings {
    base_url: Option<String>,
    api_token: Option<String>,
    request_timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawAuthSettings {
    mode: Option<AuthMode>,
    admin_email: Option<String>,
    admin_password: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawSessionSettings {
    storage_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawListingSettings {
    page_size: Option<u32>,
    search_debounce_ms: Option<u64>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
struct RawLoggingSettings {
    level: Option<String>,
    json: Option<bool>,
}
