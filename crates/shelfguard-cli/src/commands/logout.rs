//! Logout command implementation.

use anyhow::{Context as _, Result};
use clap::Args;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct LogoutArgs {}

pub fn run(_args: LogoutArgs, ctx: &Context) -> Result<()> {
    let had_session = ctx.store().get().is_some();
    ctx.authenticator()?
        .logout()
        .context("Failed to clear session")?;

    if had_session {
        output::success("Logged out");
    } else {
        output::success("No active session");
    }
    Ok(())
}
