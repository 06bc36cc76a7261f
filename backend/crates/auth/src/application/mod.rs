//! Application Layer
//!
//! Use cases and the stateful auth context.

pub mod check_session;
pub mod config;
pub mod context;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;

// Re-exports
pub use check_session::{CheckSessionUseCase, RefreshSessionUseCase, RestoredSession};
pub use config::AuthConfig;
pub use context::AuthContext;
pub use sign_in::{SignInInput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
