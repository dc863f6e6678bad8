//! Register command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use colored::Colorize;

use shelfguard_core::RegistrationRequest;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct RegisterArgs {
    /// First name
    #[arg(long)]
    pub firstname: String,

    /// Last name
    #[arg(long)]
    pub lastname: String,

    /// Account email; the activation code is sent here
    #[arg(long)]
    pub email: String,

    /// Account password
    #[arg(long, env = "SHELFGUARD_PASSWORD", hide_env_values = true)]
    pub password: String,
}

pub async fn run(args: RegisterArgs, ctx: &Context) -> Result<()> {
    let request =
        RegistrationRequest::new(&args.firstname, &args.lastname, &args.email, &args.password);

    eprintln!("{}", "Registering...".dimmed());

    ctx.authenticator()?
        .register(&request)
        .await
        .context("Failed to register")?;

    output::success("Registration accepted");
    println!();
    println!(
        "An activation code was sent to {}. Run '{}' to activate.",
        args.email,
        "shelfguard activate <code>".bold()
    );
    Ok(())
}
