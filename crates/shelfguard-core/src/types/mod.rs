//! Validated value types.
//!
//! These types enforce their invariants at construction time,
//! so invalid URLs, routes and activation codes are unrepresentable.

mod activation_code;
mod api_url;
mod route;

pub use activation_code::{ACTIVATION_CODE_LENGTH, ActivationCode};
pub use api_url::ApiUrl;
pub use route::Route;
