//! Application Layer
//!
//! The stateful todo context and its configuration.

pub mod config;
pub mod context;

pub use config::TodoConfig;
pub use context::TodoContext;
