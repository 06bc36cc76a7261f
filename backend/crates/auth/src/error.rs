//! Auth Error Types
//!
//! This module provides auth-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use platform::client::ApiError;
use platform::storage::StorageError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

/// Auth-specific error variants
#[derive(Debug, Error)]
pub enum AuthError {
    /// Form input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// Confirmation field differs from the password
    #[error("Passwords do not match")]
    PasswordMismatch,

    /// Wrong email or password
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Local rate limit hit
    #[error("Too many {action} attempts. Please try again in {retry_after_minutes} minutes.")]
    RateLimited {
        action: &'static str,
        retry_after_minutes: i64,
    },

    /// Registration with an address that already has an account
    #[error("An account with this email already exists")]
    EmailTaken,

    /// Stored or refreshed token no longer accepted
    #[error("Session expired. Please log in again.")]
    SessionExpired,

    /// Operation needs a signed-in user
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Local persistence failed
    #[error("Local storage failed: {0}")]
    Storage(#[from] StorageError),
}

impl AuthError {
    /// Keep only the message of a value object validation error
    pub fn validation(err: AppError) -> Self {
        AuthError::Validation(err.message().to_string())
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::Validation(_) | AuthError::PasswordMismatch => ErrorKind::BadRequest,
            AuthError::InvalidCredentials
            | AuthError::SessionExpired
            | AuthError::NotAuthenticated => ErrorKind::Unauthorized,
            AuthError::RateLimited { .. } => ErrorKind::TooManyRequests,
            AuthError::EmailTaken => ErrorKind::Conflict,
            AuthError::Api(e) => e.kind(),
            AuthError::Storage(_) => ErrorKind::InternalServerError,
        }
    }

    /// Message shown to the user
    ///
    /// Backend errors show the backend's message when it sent one.
    pub fn user_message(&self) -> String {
        match self {
            AuthError::Api(e) => e
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| e.to_string()),
            AuthError::Storage(_) => "Local storage failed".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self) -> AppError {
        let err = AppError::new(self.kind(), self.user_message());
        match self {
            AuthError::RateLimited { .. } => err.with_action("Wait before trying again"),
            AuthError::SessionExpired => err.with_action("Please sign in again"),
            _ => err,
        }
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            AuthError::Api(e) => e.log(),
            AuthError::Storage(e) => {
                tracing::error!(error = %e, "Auth storage error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::RateLimited {
                action,
                retry_after_minutes,
            } => {
                tracing::warn!(action, retry_after_minutes, "Auth attempt rate limited");
            }
            AuthError::SessionExpired => {
                tracing::info!("Stored session expired");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let app = err.to_app_error();
        app.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_rate_limited_message() {
        let err = AuthError::RateLimited {
            action: "login",
            retry_after_minutes: 15,
        };
        assert_eq!(
            err.user_message(),
            "Too many login attempts. Please try again in 15 minutes."
        );
        assert_eq!(err.kind(), ErrorKind::TooManyRequests);
    }

    #[test]
    fn test_api_error_uses_backend_message() {
        let err = AuthError::Api(ApiError::Status {
            status: 400,
            message: "Failed to create record.".to_string(),
            field_errors: BTreeMap::from([(
                "password".to_string(),
                "Must be at least 8 character(s).".to_string(),
            )]),
        });
        assert_eq!(err.user_message(), "Must be at least 8 character(s).");
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }

    #[test]
    fn test_to_app_error() {
        let app: AppError = AuthError::SessionExpired.into();
        assert_eq!(app.kind(), ErrorKind::Unauthorized);
        assert_eq!(app.message(), "Session expired. Please log in again.");
        assert_eq!(app.action(), Some("Please sign in again"));
    }

    #[test]
    fn test_validation_keeps_message() {
        let err = AuthError::validation(AppError::bad_request("Email is required"));
        assert_eq!(err.user_message(), "Email is required");
        assert_eq!(err.kind(), ErrorKind::BadRequest);
    }
}
