//! Status command implementation.

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::Args;
use serde::Serialize;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Serialize)]
struct StatusReport {
    api: String,
    session_dir: String,
    stored: bool,
    authenticated: bool,
    expires_at: Option<DateTime<Utc>>,
}

pub fn run(args: StatusArgs, ctx: &Context) -> Result<()> {
    let now = Utc::now();
    let state = ctx.store().snapshot();
    let credential = state.credential();

    let report = StatusReport {
        api: ctx.api().to_string(),
        session_dir: ctx.session_dir().display().to_string(),
        stored: credential.is_some(),
        authenticated: state.is_authenticated_at(now),
        expires_at: credential.and_then(|c| c.expires_at()),
    };

    if args.json {
        return output::json(&report);
    }

    output::field("API", &report.api);
    output::field("Session", &report.session_dir);
    let summary = match (report.stored, report.authenticated) {
        (true, true) => "authenticated",
        (true, false) => "expired",
        (false, _) => "not logged in",
    };
    output::field("Status", summary);
    if let Some(expires_at) = report.expires_at {
        output::field("Expires", &expires_at.to_rfc3339());
    }
    Ok(())
}
