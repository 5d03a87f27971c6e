#![deny(clippy::all, clippy::pedantic)]

use postdesk::application::error::CmsError;
use postdesk::application::listing::ListError;
use postdesk::application::repos::PostsRepo;
use postdesk::config::{self, ConfigOverrides, LoadError, Settings};
use postdesk::domain::entities::Post;
use postdesk::infra::error::InfraError;
use postdesk::infra::runtime::Runtime;
use postdesk::infra::telemetry;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Config(#[from] LoadError),
    #[error(transparent)]
    Infra(#[from] InfraError),
    #[error(transparent)]
    Cms(#[from] CmsError),
    #[error(transparent)]
    List(#[from] ListError),
    #[error("not signed in (run `postdesk login`)")]
    NotSignedIn,
    #[error("password is required (use --password-file or POSTDESK_PASSWORD)")]
    MissingPassword,
    #[error("no post with slug `{0}`")]
    PostNotFound(String),
    #[error("no category with id `{0}`")]
    CategoryNotFound(String),
    #[error("failed to read input file {path}: {source}")]
    InputFile {
        path: String,
        source: std::io::Error,
    },
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to {0}")]
    Mutation(&'static str),
    #[error("failed to render output: {0}")]
    Output(String),
}

/// Per-invocation context: the assembled runtime plus a settled session.
pub struct Ctx {
    pub runtime: Runtime,
}

impl Ctx {
    pub fn new(settings: Settings) -> Result<Self, CliError> {
        let runtime = Runtime::build(settings)?;
        Ok(Self { runtime })
    }

    /// Restore the remembered session. Commands that talk to the admin API
    /// call this before anything else.
    pub async fn restore_session(&self) -> Result<String, CliError> {
        self.runtime.session.initialize().await;
        self.runtime
            .session
            .require_token()
            .map_err(|_| CliError::NotSignedIn)
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<Post, CliError> {
        let token = self.restore_session().await?;
        self.runtime
            .cms
            .find_post_by_slug(&token, slug)
            .await?
            .ok_or_else(|| CliError::PostNotFound(slug.to_string()))
    }

    /// Print and clear collected notices on stderr.
    pub fn flush_toasts(&self) {
        for toast in self.runtime.toasts.drain() {
            eprintln!("{}: {}", toast.kind.as_str(), toast.text);
        }
    }
}

pub fn build_ctx_from_cli(overrides: &ConfigOverrides) -> Result<Ctx, CliError> {
    let settings = config::load(overrides)?;
    telemetry::init(&settings.logging)?;
    Ctx::new(settings)
}
