//! Login command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use shelfguard_core::AuthenticationRequest;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LoginArgs {
    /// Account email
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "SHELFGUARD_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: LoginArgs, ctx: &Context) -> Result<()> {
    let request = AuthenticationRequest::new(&args.email, &args.password);

    eprintln!("{}", "Logging in...".dimmed());

    ctx.authenticator()?
        .login(&request)
        .await
        .context("Failed to login")?;

    output::success("Logged in successfully");
    println!();
    output::field("Email", &args.email);
    output::field("API", ctx.api().as_str());
    if let Some(expires_at) = ctx.store().get().and_then(|c| c.expires_at()) {
        output::field("Expires", &expires_at.to_rfc3339());
    }

    Ok(())
}
