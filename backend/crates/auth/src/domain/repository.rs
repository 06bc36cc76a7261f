//! Repository Traits
//!
//! Interfaces to the backend and to local persistence. Implementations are
//! in the infrastructure layer.

use platform::token::BearerToken;

use crate::domain::entity::{
    auth_session::AuthSession,
    credentials::{Credentials, Registration},
    user::User,
};
use crate::error::AuthResult;

/// Backend auth operations
#[trait_variant::make(AuthGateway: Send)]
pub trait LocalAuthGateway {
    /// Exchange credentials for a token and user record
    async fn sign_in(&self, credentials: &Credentials) -> AuthResult<AuthSession>;

    /// Create an account; does not sign in
    async fn sign_up(&self, registration: &Registration) -> AuthResult<User>;

    /// Exchange a still-valid token for a fresh one
    async fn refresh(&self, token: &BearerToken) -> AuthResult<AuthSession>;

    /// Make subsequent backend calls carry this token
    fn install(&self, token: &BearerToken);

    /// Stop sending a token
    fn uninstall(&self);
}

/// Persisted auth session
#[trait_variant::make(SessionRepository: Send)]
pub trait LocalSessionRepository {
    /// Load the stored session, if any
    async fn load(&self) -> AuthResult<Option<AuthSession>>;

    /// Replace the stored session
    async fn save(&self, session: &AuthSession) -> AuthResult<()>;

    /// Remove the stored session
    async fn clear(&self) -> AuthResult<()>;
}
