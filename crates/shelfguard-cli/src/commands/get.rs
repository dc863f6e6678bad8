//! Get command implementation.

use anyhow::{Context as _, Result};
use clap::Args;
use serde_json::Value;

use crate::context::Context;
use crate::output;

#[derive(Args, Debug)]
pub struct GetArgs {
    /// Endpoint path below the API base, e.g. books/owner
    pub path: String,

    /// Query parameter as key=value (repeatable)
    #[arg(long = "param", short = 'p', value_parser = parse_param)]
    pub params: Vec<(String, String)>,
}

pub async fn run(args: GetArgs, ctx: &Context) -> Result<()> {
    let client = ctx.client()?;

    let result = client.get_authed::<_, Value>(&args.path, &args.params).await;
    let body = match result {
        Ok(body) => body,
        Err(err) if err.is_unauthorized() => {
            output::error(err.user_message());
            return Err(anyhow::Error::new(err).context("Request rejected"));
        }
        Err(err) => return Err(err).context("Request failed"),
    };

    output::json_pretty(&body)
}

fn parse_param(s: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    if key.is_empty() {
        return Err(format!("missing key in '{}'", s));
    }
    Ok((key.to_string(), value.to_string()))
}
