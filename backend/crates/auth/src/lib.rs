//! Auth (Authentication) Client Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, gateway/repository traits
//! - `application/` - Use cases and the stateful `AuthContext`
//! - `infra/` - HTTP gateway and local session store
//!
//! ## Features
//! - Sign in with email + password, registration with automatic sign in
//! - Session persisted locally and restored at startup
//! - Token refresh; a failed refresh forces a sign out
//! - Client-side rate limiting of sign-in and registration attempts

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::config::AuthConfig;
pub use application::context::AuthContext;
pub use error::{AuthError, AuthResult};
pub use infra::{http::HttpAuthGateway, session_store::KeyValueSessionRepository};

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod models {
    pub use crate::domain::entity::*;
    pub use crate::domain::value_object::*;
}
