#![deny(clippy::all, clippy::pedantic)]

use crate::args::LoginArgs;
use crate::client::{CliError, Ctx};
use crate::io::read_password;
use crate::print::print_json;

pub async fn login(ctx: &Ctx, args: LoginArgs) -> Result<(), CliError> {
    let password = read_password(args.password_file, args.password_env)?;
    ctx.runtime
        .session
        .login(&args.email, &password, !args.no_remember)
        .await?;
    print_json(&ctx.runtime.session.snapshot())
}

pub fn logout(ctx: &Ctx) {
    ctx.runtime.session.logout();
}

pub async fn whoami(ctx: &Ctx) -> Result<(), CliError> {
    let session = ctx.runtime.session.initialize().await;
    print_json(&session)
}
