//! Todo Client Module
//!
//! Per-user todo list kept in sync with the backend.
//!
//! Clean Architecture structure:
//! - `domain/` - Todo entity, field value objects, gateway trait
//! - `application/` - `TodoContext` state machine
//! - `infra/` - HTTP gateway over the records API

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;

// Re-exports for convenience
pub use application::{TodoConfig, TodoContext};
pub use error::{TodoError, TodoResult};
pub use infra::http::HttpTodoGateway;

pub mod models {
    pub use crate::domain::entities::*;
    pub use crate::domain::value_objects::*;
}
