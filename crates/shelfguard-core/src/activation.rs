//! One-time code account activation.
//!
//! ```text
//! AwaitingCode --code completed--> Confirming --ok--> Confirmed
//!                                       \--rejected--> Failed --fresh code--> Confirming
//! ```
//!
//! The flow guards against re-entrant completion signals with an explicit
//! in-flight flag: a signal that arrives while a confirmation is pending is
//! ignored, not queued.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::auth::ActivationRequest;
use crate::error::{ActivationFailure, AuthError, Error};
use crate::traits::{AuthenticationService, Navigator};
use crate::types::{ActivationCode, Route};

/// Shown once the service accepts the code.
pub const ACTIVATED_MESSAGE: &str =
    "Your account has been successfully activated.\nNow you can proceed to login";

/// State of an activation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationState {
    AwaitingCode,
    Confirming,
    Confirmed,
    Failed,
}

/// What a caller renders for the flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivationView {
    pub state: ActivationState,
    pub message: Option<&'static str>,
    pub submitted: bool,
    pub is_okay: bool,
}

/// Result of a code-completion signal that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    /// The service accepted the code.
    Confirmed,
    /// The signal was dropped: a confirmation is in flight, the account is
    /// already confirmed, or the code is the one that just failed.
    Ignored,
}

#[derive(Debug)]
struct Status {
    state: ActivationState,
    message: Option<&'static str>,
    submitted: bool,
    is_okay: bool,
    last_code: Option<ActivationCode>,
}

impl Status {
    fn awaiting() -> Self {
        Self {
            state: ActivationState::AwaitingCode,
            message: None,
            submitted: false,
            is_okay: true,
            last_code: None,
        }
    }
}

/// Drives the activation handshake against an [`AuthenticationService`].
pub struct ActivationFlow<S> {
    service: S,
    in_flight: AtomicBool,
    status: Mutex<Status>,
}

/// Holds the in-flight flag; releases it even if the confirm future is
/// dropped before it resolves.
struct InFlight<'a> {
    flag: &'a AtomicBool,
    status: &'a Mutex<Status>,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        let mut status = self.status.lock().unwrap_or_else(PoisonError::into_inner);
        if status.state == ActivationState::Confirming {
            // Abandoned mid-flight; the next completion starts over.
            *status = Status::awaiting();
        }
        self.flag.store(false, Ordering::Release);
    }
}

impl<S: AuthenticationService> ActivationFlow<S> {
    pub fn new(service: S) -> Self {
        Self {
            service,
            in_flight: AtomicBool::new(false),
            status: Mutex::new(Status::awaiting()),
        }
    }

    /// Current state, message and flags.
    pub fn view(&self) -> ActivationView {
        let status = self.lock();
        ActivationView {
            state: status.state,
            message: status.message,
            submitted: status.submitted,
            is_okay: status.is_okay,
        }
    }

    pub fn state(&self) -> ActivationState {
        self.lock().state
    }

    /// Handle the code-entry completion signal.
    ///
    /// Calls the service's confirm operation at most once per signal and
    /// never while another confirmation is pending.
    ///
    /// # Errors
    ///
    /// Returns an input error for a malformed code (state unchanged) and
    /// [`AuthError::ActivationFailed`] when the confirmation fails.
    #[instrument(skip(self, code))]
    pub async fn on_code_completed(&self, code: &str) -> Result<Completion> {
        let code = ActivationCode::new(code)?;

        if self
            .in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("Confirmation already in flight, ignoring completion");
            return Ok(Completion::Ignored);
        }
        let _guard = InFlight {
            flag: &self.in_flight,
            status: &self.status,
        };

        {
            let mut status = self.lock();
            match status.state {
                ActivationState::Confirmed => {
                    debug!("Account already confirmed, ignoring completion");
                    return Ok(Completion::Ignored);
                }
                ActivationState::Failed if status.last_code.as_ref() == Some(&code) => {
                    debug!("Same code as the failed attempt, ignoring completion");
                    return Ok(Completion::Ignored);
                }
                _ => {}
            }
            *status = Status {
                state: ActivationState::Confirming,
                message: None,
                submitted: false,
                is_okay: true,
                last_code: Some(code.clone()),
            };
        }

        debug!("Confirming activation code");
        let result = self.service.confirm(&ActivationRequest::new(code)).await;

        let mut status = self.lock();
        status.submitted = true;
        match result {
            Ok(()) => {
                info!("Account activated");
                status.state = ActivationState::Confirmed;
                status.message = Some(ACTIVATED_MESSAGE);
                status.is_okay = true;
                Ok(Completion::Confirmed)
            }
            Err(err) => {
                let reason = classify(&err);
                warn!(error = %err, %reason, "Account activation failed");
                status.state = ActivationState::Failed;
                status.message = Some(reason.message());
                status.is_okay = false;
                Err(AuthError::ActivationFailed { reason }.into())
            }
        }
    }

    /// Return to [`ActivationState::AwaitingCode`].
    ///
    /// Returns `false` and does nothing while a confirmation is in flight.
    pub fn reset(&self) -> bool {
        let mut status = self.lock();
        if status.state == ActivationState::Confirming {
            return false;
        }
        *status = Status::awaiting();
        true
    }

    /// Navigate to the login entry point once the account is confirmed.
    ///
    /// The flow never navigates on its own; the caller offers this to the
    /// user. Returns `false` if the account is not confirmed.
    pub fn proceed_to_login(&self, navigator: &dyn Navigator, login: &Route) -> bool {
        if self.state() != ActivationState::Confirmed {
            return false;
        }
        navigator.navigate(login);
        true
    }

    fn lock(&self) -> MutexGuard<'_, Status> {
        self.status.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Tell a rejected code apart from every other failure.
fn classify(err: &Error) -> ActivationFailure {
    match err {
        Error::Protocol(_) => ActivationFailure::ExpiredOrInvalid,
        Error::Auth(AuthError::ActivationFailed { reason }) => *reason,
        _ => ActivationFailure::Other,
    }
}
