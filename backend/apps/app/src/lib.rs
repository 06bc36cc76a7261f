//! Todo client application
//!
//! Wires `auth` and `todo` together, guards routes and builds the view
//! models the presentation layer renders.

pub mod app;
pub mod routes;
pub mod view;

pub use app::{HttpTodoApp, TodoApp};
pub use routes::{Navigation, Route, guard};

// Re-export unified error types for callers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};
