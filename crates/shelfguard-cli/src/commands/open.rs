//! Open command implementation.

use anyhow::{Context as _, Result, bail};
use clap::Args;

use shelfguard_core::{GuardDecision, Route, RouteGuard};

use crate::context::Context;
use crate::output::{self, TerminalNavigator};

#[derive(Args, Debug)]
pub struct OpenArgs {
    /// View path, e.g. /my-books or /manage/42
    pub route: String,
}

pub fn run(args: OpenArgs, ctx: &Context) -> Result<()> {
    let route = Route::new(&args.route).context("Invalid route")?;
    let guard = RouteGuard::new(ctx.store().clone());

    match guard.check(&route, &TerminalNavigator) {
        GuardDecision::Open => {
            output::success(&format!("{} is open", route));
            Ok(())
        }
        GuardDecision::Blocked => {
            bail!("{} requires a session. Run 'shelfguard login' first.", route)
        }
    }
}
