//! Collaborator traits consumed by the core components.

mod auth_service;
mod navigator;
mod storage;

pub use auth_service::AuthenticationService;
pub use navigator::Navigator;
pub use storage::SessionStorage;
