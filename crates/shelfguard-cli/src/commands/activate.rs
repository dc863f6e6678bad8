//! Activate command implementation.

use anyhow::{Result, bail};
use clap::Args;
use colored::Colorize;

use shelfguard_core::error::{AuthError, Error};
use shelfguard_core::{ActivationFlow, Completion, Route, RouteGuard};

use crate::context::Context;
use crate::output::{self, TerminalNavigator};

#[derive(Args, Debug)]
pub struct ActivateArgs {
    /// The six-character code from the activation email
    pub code: String,
}

pub async fn run(args: ActivateArgs, ctx: &Context) -> Result<()> {
    let flow = ActivationFlow::new(ctx.auth_service()?);

    eprintln!("{}", "Confirming activation code...".dimmed());

    match flow.on_code_completed(&args.code).await {
        Ok(Completion::Confirmed) => {
            let view = flow.view();
            if let Some(message) = view.message {
                output::success(message);
            }
            let login = Route::new(RouteGuard::LOGIN_ROUTE)?;
            flow.proceed_to_login(&TerminalNavigator, &login);
            Ok(())
        }
        Ok(Completion::Ignored) => {
            output::success("Nothing to do");
            Ok(())
        }
        Err(err @ Error::Auth(AuthError::ActivationFailed { .. })) => {
            tracing::debug!(error = %err, "Activation failed");
            output::error(err.user_message());
            bail!("Account activation failed")
        }
        Err(err) => Err(anyhow::Error::new(err).context("Invalid activation code")),
    }
}
