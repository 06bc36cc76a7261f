//! Check Session Use Case
//!
//! Restores the persisted session at startup and refreshes tokens.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use platform::token::BearerToken;

use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::{AuthGateway, SessionRepository};
use crate::error::{AuthError, AuthResult};

/// What the stored session allows at startup
#[derive(Debug, Clone, PartialEq)]
pub enum RestoredSession {
    /// Nothing stored, or the token expired
    Anonymous,
    /// Valid token and cached user
    Resumed(AuthSession),
    /// Valid token but the user record must be fetched again
    NeedsRefresh(AuthSession),
}

/// Check session use case
pub struct CheckSessionUseCase<G, S>
where
    G: AuthGateway,
    S: SessionRepository,
{
    gateway: Arc<G>,
    session_repo: Arc<S>,
}

impl<G, S> CheckSessionUseCase<G, S>
where
    G: AuthGateway,
    S: SessionRepository,
{
    pub fn new(gateway: Arc<G>, session_repo: Arc<S>) -> Self {
        Self {
            gateway,
            session_repo,
        }
    }

    pub async fn execute(&self) -> AuthResult<RestoredSession> {
        self.execute_at(Utc::now()).await
    }

    pub async fn execute_at(&self, now: DateTime<Utc>) -> AuthResult<RestoredSession> {
        let Some(session) = self.session_repo.load().await? else {
            tracing::debug!("No stored session");
            return Ok(RestoredSession::Anonymous);
        };

        if !session.is_valid_at(now) {
            tracing::info!(expires_at = ?session.expires_at(), "Stored session expired");
            self.session_repo.clear().await?;
            return Ok(RestoredSession::Anonymous);
        }

        self.gateway.install(&session.token);

        if session.user.is_none() {
            tracing::debug!("Stored session has no user record");
            return Ok(RestoredSession::NeedsRefresh(session));
        }

        tracing::debug!(expires_at = ?session.expires_at(), "Resumed stored session");
        Ok(RestoredSession::Resumed(session))
    }
}

/// Refresh session use case
pub struct RefreshSessionUseCase<G, S>
where
    G: AuthGateway,
    S: SessionRepository,
{
    gateway: Arc<G>,
    session_repo: Arc<S>,
}

impl<G, S> RefreshSessionUseCase<G, S>
where
    G: AuthGateway,
    S: SessionRepository,
{
    pub fn new(gateway: Arc<G>, session_repo: Arc<S>) -> Self {
        Self {
            gateway,
            session_repo,
        }
    }

    /// Exchange `token` for a fresh session and persist it
    pub async fn execute(&self, token: &BearerToken) -> AuthResult<AuthSession> {
        let session = self.gateway.refresh(token).await?;
        if session.user.is_none() {
            return Err(AuthError::SessionExpired);
        }

        self.gateway.install(&session.token);
        self.session_repo.save(&session).await?;

        tracing::debug!(expires_at = ?session.expires_at(), "Session refreshed");
        Ok(session)
    }
}
