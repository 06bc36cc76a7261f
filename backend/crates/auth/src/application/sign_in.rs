//! Sign In Use Case
//!
//! Authenticates a user against the backend and persists the session.

use std::sync::Arc;

use platform::rate_limit::RateLimiter;
use platform::storage::KeyValueStore;

use crate::application::config::LOGIN_NAMESPACE;
use crate::domain::entity::{auth_session::AuthSession, credentials::Credentials};
use crate::domain::repository::{AuthGateway, SessionRepository};
use crate::domain::value_object::{email::Email, user_password::UserPassword};
use crate::error::{AuthError, AuthResult};

/// Sign in input (raw form values)
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

/// Sign in use case
pub struct SignInUseCase<G, S, L>
where
    G: AuthGateway,
    S: SessionRepository,
    L: KeyValueStore + Sync,
{
    gateway: Arc<G>,
    session_repo: Arc<S>,
    limiter: Arc<RateLimiter<L>>,
}

impl<G, S, L> SignInUseCase<G, S, L>
where
    G: AuthGateway,
    S: SessionRepository,
    L: KeyValueStore + Sync,
{
    pub fn new(gateway: Arc<G>, session_repo: Arc<S>, limiter: Arc<RateLimiter<L>>) -> Self {
        Self {
            gateway,
            session_repo,
            limiter,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<AuthSession> {
        let decision = self.limiter.try_acquire(LOGIN_NAMESPACE).await?;
        if !decision.is_allowed() {
            return Err(AuthError::RateLimited {
                action: "login",
                retry_after_minutes: decision.retry_after_minutes(),
            });
        }

        let credentials = Credentials {
            email: Email::new(input.email).map_err(AuthError::validation)?,
            password: UserPassword::for_sign_in(input.password).map_err(AuthError::validation)?,
        };

        let session = self.authenticate(&credentials).await?;
        // The sign-in already happened; a stale counter only costs attempts
        if let Err(e) = self.limiter.record_success(LOGIN_NAMESPACE).await {
            tracing::warn!(error = %e, "Failed to reset login rate limit");
        }
        Ok(session)
    }

    /// Sign in with already validated credentials, bypassing the rate limit
    ///
    /// Used for the automatic sign-in right after registration.
    pub async fn authenticate(&self, credentials: &Credentials) -> AuthResult<AuthSession> {
        let session = self.gateway.sign_in(credentials).await?;

        self.gateway.install(&session.token);
        self.session_repo.save(&session).await?;

        match &session.user {
            Some(user) => tracing::info!(user_id = %user.id, "User signed in"),
            None => tracing::info!("Signed in without a user record"),
        }
        Ok(session)
    }
}
