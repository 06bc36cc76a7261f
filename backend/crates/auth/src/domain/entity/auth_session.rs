//! Auth Session Entity
//!
//! The token issued by the backend plus the cached user record.
//! Persisted locally so a restart can resume without signing in again.

use chrono::{DateTime, Utc};
use platform::token::BearerToken;
use serde::{Deserialize, Serialize};

use crate::domain::entity::user::User;

/// Auth session entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthSession {
    pub token: BearerToken,
    /// Missing when only the token survived (older or partial writes)
    #[serde(default)]
    pub user: Option<User>,
}

impl AuthSession {
    pub fn new(token: BearerToken, user: Option<User>) -> Self {
        Self { token, user }
    }

    /// Token present and not yet expired
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        self.token.is_valid_at(now)
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }

    /// A valid token whose user record must be fetched again
    pub fn needs_refresh_at(&self, now: DateTime<Utc>) -> bool {
        self.user.is_none() && self.is_valid_at(now)
    }

    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        self.token.expires_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use platform::token::unsigned_jwt;
    use serde_json::json;

    fn token_expiring_at(at: DateTime<Utc>) -> BearerToken {
        BearerToken::new(unsigned_jwt(&json!({ "id": "u1", "exp": at.timestamp() })))
    }

    #[test]
    fn test_validity_follows_token_expiry() {
        let now = Utc::now();
        let session = AuthSession::new(token_expiring_at(now + Duration::hours(1)), None);
        assert!(session.is_valid_at(now));
        assert!(session.needs_refresh_at(now));
        assert!(!session.is_valid_at(now + Duration::hours(2)));
        assert!(!session.needs_refresh_at(now + Duration::hours(2)));
    }

    #[test]
    fn test_missing_user_field_deserializes() {
        let session: AuthSession = serde_json::from_value(json!({ "token": "abc" })).unwrap();
        assert!(session.user.is_none());
        assert!(!session.is_valid());
    }
}
