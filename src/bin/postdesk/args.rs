//! Command-line surface for `postdesk`.

#![deny(clippy::all, clippy::pedantic)]

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use postdesk::config::ConfigOverrides;

#[derive(Parser, Debug)]
#[command(name = "postdesk", version, about = "Manage posts and categories on a headless CMS", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigOverrides,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Forget the remembered session
    Logout,
    /// Show the current session
    Whoami,
    /// Post management (list/get/create/update/delete/toggle)
    Posts(PostsArgs),
    /// Category management
    Categories(CategoriesArgs),
    /// List published posts from the public API
    Published(PageArgs),
}

#[derive(Args, Debug)]
pub struct LoginArgs {
    #[arg(long, env = "POSTDESK_EMAIL")]
    pub email: String,

    /// Path to a file containing the password (takes precedence over env)
    #[arg(long)]
    pub password_file: Option<PathBuf>,

    /// Password from env (CLI flag intentionally disabled to avoid shell history leaks)
    #[arg(hide = true, long = "password-env", env = "POSTDESK_PASSWORD")]
    pub password_env: Option<String>,

    /// Keep the session for this process only
    #[arg(long, default_value_t = false)]
    pub no_remember: bool,
}

#[derive(Args, Debug, Clone)]
pub struct PageArgs {
    #[arg(long, default_value_t = 1)]
    pub page: u32,
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Parser, Debug)]
pub struct PostsArgs {
    #[command(subcommand)]
    pub action: PostsCmd,
}

#[derive(Args, Debug, Clone, Default)]
pub struct PostFields {
    #[arg(long)]
    pub title: Option<String>,
    #[arg(long)]
    pub description: Option<String>,
    #[arg(long)]
    pub content: Option<String>,
    /// Read content from a file instead of --content
    #[arg(long)]
    pub content_file: Option<PathBuf>,
    /// Explicit slug; derived from the title when omitted on create
    #[arg(long = "new-slug")]
    pub slug: Option<String>,
    /// Category id to connect
    #[arg(long)]
    pub category: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum PostsCmd {
    /// List posts (drafts and published) newest first
    List(PageArgs),
    /// Get a post by slug
    Get { slug: String },
    /// Create a post and publish it
    Create(PostFields),
    /// Update a post found by slug; omitted fields keep their value
    Update {
        #[arg(long)]
        slug: String,
        #[command(flatten)]
        fields: PostFields,
    },
    /// Delete a post found by slug
    Delete {
        #[arg(long)]
        slug: String,
        /// Skip the confirmation prompt
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
    /// Publish a draft or unpublish a published post
    Toggle {
        #[arg(long)]
        slug: String,
    },
}

#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    #[command(subcommand)]
    pub action: CategoriesCmd,
}

#[derive(Subcommand, Debug)]
pub enum CategoriesCmd {
    /// List categories
    List,
    /// Create a category
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Rename a category
    Update {
        #[arg(long)]
        id: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        slug: Option<String>,
    },
    /// Delete a category
    Delete {
        #[arg(long)]
        id: String,
        #[arg(long, default_value_t = false)]
        yes: bool,
    },
}
