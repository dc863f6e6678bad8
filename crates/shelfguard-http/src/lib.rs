//! shelfguard-http - reqwest-backed transport for shelfguard.
//!
//! [`ApiClient`] is the transport boundary: every protected request passes
//! through the session's [`RequestAuthorizer`](shelfguard_core::RequestAuthorizer),
//! which attaches the bearer credential and invalidates the session when the
//! service rejects it. [`HttpAuthService`] talks to the public `/auth`
//! endpoints.

mod auth_service;
mod client;
mod error;

pub use auth_service::HttpAuthService;
pub use client::ApiClient;
