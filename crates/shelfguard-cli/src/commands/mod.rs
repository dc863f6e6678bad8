//! Subcommand implementations.

mod activate;
mod get;
mod login;
mod logout;
mod open;
mod register;
mod status;

use anyhow::Result;
use clap::Subcommand;

use crate::context::Context;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Log in and store the session
    Login(login::LoginArgs),

    /// Forget the stored session
    Logout(logout::LogoutArgs),

    /// Register a new account
    Register(register::RegisterArgs),

    /// Activate an account with the emailed code
    Activate(activate::ActivateArgs),

    /// Display the stored session
    Status(status::StatusArgs),

    /// Check whether a view may be opened
    Open(open::OpenArgs),

    /// Make an authorized GET request
    Get(get::GetArgs),
}

pub async fn handle(cmd: Command, ctx: &Context) -> Result<()> {
    match cmd {
        Command::Login(args) => login::run(args, ctx).await,
        Command::Logout(args) => logout::run(args, ctx),
        Command::Register(args) => register::run(args, ctx).await,
        Command::Activate(args) => activate::run(args, ctx).await,
        Command::Status(args) => status::run(args, ctx),
        Command::Open(args) => open::run(args, ctx),
        Command::Get(args) => get::run(args, ctx).await,
    }
}
