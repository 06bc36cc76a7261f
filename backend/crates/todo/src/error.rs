//! Todo Error Types
//!
//! This module provides todo-specific error variants that integrate
//! with the unified `kernel::error::AppError` system.

use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::id::TodoId;
use platform::client::ApiError;
use thiserror::Error;

/// Todo-specific result type alias
pub type TodoResult<T> = Result<T, TodoError>;

/// Todo-specific error variants
#[derive(Debug, Error)]
pub enum TodoError {
    /// Form input rejected before any request was sent
    #[error("{0}")]
    Validation(String),

    /// No todo with this id in the loaded list
    #[error("Todo not found: {0}")]
    NotFound(TodoId),

    /// Creating a todo needs a signed-in owner
    #[error("Not authenticated")]
    NotAuthenticated,

    /// Backend call failed
    #[error(transparent)]
    Api(#[from] ApiError),
}

impl TodoError {
    /// Keep only the message of a value object validation error
    pub fn validation(err: AppError) -> Self {
        TodoError::Validation(err.message().to_string())
    }

    /// Get the ErrorKind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            TodoError::Validation(_) => ErrorKind::BadRequest,
            TodoError::NotFound(_) => ErrorKind::NotFound,
            TodoError::NotAuthenticated => ErrorKind::Unauthorized,
            TodoError::Api(e) => e.kind(),
        }
    }

    /// Message shown to the user
    ///
    /// Backend failures show the backend's message, or `fallback` when the
    /// backend sent none (transport errors, empty bodies).
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            TodoError::Api(e) => e
                .backend_message()
                .map(str::to_string)
                .unwrap_or_else(|| fallback.to_string()),
            TodoError::NotFound(_) => "Todo not found".to_string(),
            other => other.to_string(),
        }
    }

    /// Convert to AppError
    pub fn to_app_error(&self, fallback: &str) -> AppError {
        AppError::new(self.kind(), self.user_message(fallback))
    }

    /// Log the error with appropriate level
    pub fn log(&self) {
        match self {
            TodoError::Api(e) => e.log(),
            TodoError::NotFound(id) => {
                tracing::debug!(todo_id = %id, "Todo not in loaded list");
            }
            _ => {
                tracing::debug!(error = %self, "Todo error");
            }
        }
    }
}

impl From<TodoError> for AppError {
    fn from(err: TodoError) -> Self {
        let app = err.to_app_error("Request failed");
        app.with_source(err)
    }
}
