//! postdesk: manage posts and categories on a headless CMS from the shell.
#![deny(clippy::all, clippy::pedantic)]

mod args;
mod client;
mod handlers;
mod io;
mod print;


use clap::Parser;

use args::{Cli, Commands};
use client::{CliError, Ctx, build_ctx_from_cli};
use handlers::{categories, posts, session};

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();
    let ctx = build_ctx_from_cli(&cli.config)?;

    let result = dispatch(&ctx, cli.command).await;
    ctx.flush_toasts();
    result
}

async fn dispatch(ctx: &Ctx, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login(args) => session::login(ctx, args).await,
        Commands::Logout => {
            session::logout(ctx);
            Ok(())
        }
        Commands::Whoami => session::whoami(ctx).await,
        Commands::Posts(cmd) => posts::handle(ctx, cmd.action).await,
        Commands::Categories(cmd) => categories::handle(ctx, cmd.action).await,
        Commands::Published(args) => posts::published(ctx, args).await,
    }
}
