//! Sign Out Use Case
//!
//! Drops the token and the persisted session. Local only: the backend
//! keeps no session state for bearer tokens.

use std::sync::Arc;

use crate::domain::repository::{AuthGateway, SessionRepository};

/// Sign out use case
pub struct SignOutUseCase<G, S>
where
    G: AuthGateway,
    S: SessionRepository,
{
    gateway: Arc<G>,
    session_repo: Arc<S>,
}

impl<G, S> SignOutUseCase<G, S>
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

    /// Never fails; a storage error is logged and the in-memory token is
    /// still dropped
    pub async fn execute(&self) {
        self.gateway.uninstall();

        if let Err(e) = self.session_repo.clear().await {
            e.log();
            tracing::warn!("Signed out but the stored session could not be removed");
            return;
        }

        tracing::info!("User signed out");
    }
}
