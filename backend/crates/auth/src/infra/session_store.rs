//! Session Store
//!
//! Persists the auth session as JSON in a [`KeyValueStore`].

use std::sync::Arc;

use platform::storage::{KeyValueStore, StorageError, get_json, set_json};

use crate::domain::entity::auth_session::AuthSession;
use crate::domain::repository::SessionRepository;
use crate::error::AuthResult;

/// Session repository over any key-value store
#[derive(Debug)]
pub struct KeyValueSessionRepository<K> {
    store: Arc<K>,
    key: String,
}

impl<K> KeyValueSessionRepository<K>
where
    K: KeyValueStore + Send + Sync,
{
    pub fn new(store: Arc<K>, key: impl Into<String>) -> Self {
        Self {
            store,
            key: key.into(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }
}

impl<K> SessionRepository for KeyValueSessionRepository<K>
where
    K: KeyValueStore + Send + Sync,
{
    async fn load(&self) -> AuthResult<Option<AuthSession>> {
        match get_json::<K, AuthSession>(self.store.as_ref(), &self.key).await {
            Ok(session) => Ok(session),
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(key = %self.key, error = %e, "Discarding corrupt stored session");
                self.store.remove(&self.key).await?;
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn save(&self, session: &AuthSession) -> AuthResult<()> {
        set_json(self.store.as_ref(), &self.key, session).await?;
        Ok(())
    }

    async fn clear(&self) -> AuthResult<()> {
        self.store.remove(&self.key).await?;
        Ok(())
    }
}
