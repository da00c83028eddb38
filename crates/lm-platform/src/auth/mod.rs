//! Authentication
//!
//! Plaintext credential check and the `demo-token-<username>` token scheme.

pub mod token;
pub mod auth_service;
pub mod auth_api;

pub use auth_service::{AuthService, extract_bearer_token};
pub use auth_api::{AuthState, auth_router};
