//! User Entity
//!
//! Profile record of the signed-in user as returned by the backend.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde::{Deserialize, Serialize};

/// User entity
///
/// Unknown backend fields (`collectionId`, `avatar`, ...) are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: UserId,
    #[serde(default)]
    pub email: String,
    /// Display name; may be empty for accounts created elsewhere
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub verified: bool,
    #[serde(with = "kernel::time::record_timestamp")]
    pub created: DateTime<Utc>,
    #[serde(with = "kernel::time::record_timestamp")]
    pub updated: DateTime<Utc>,
}

impl User {
    /// Name to greet the user with, falling back to the email local part
    pub fn display_name(&self) -> &str {
        if !self.name.trim().is_empty() {
            return self.name.trim();
        }
        self.email.split('@').next().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_deserialize_backend_record() {
        let user: User = serde_json::from_value(json!({
            "id": "u1a2b3c4d5e6f7g",
            "collectionId": "_pb_users_auth_",
            "collectionName": "users",
            "email": "ada@example.com",
            "emailVisibility": false,
            "name": "Ada",
            "avatar": "",
            "verified": true,
            "created": "2024-05-01 10:20:30.123Z",
            "updated": "2024-05-02T08:00:00Z"
        }))
        .unwrap();

        assert_eq!(user.id.as_str(), "u1a2b3c4d5e6f7g");
        assert_eq!(user.display_name(), "Ada");
        assert!(user.verified);
        assert_eq!(user.created.timestamp_subsec_millis(), 123);
    }

    #[test]
    fn test_display_name_fallback() {
        let user: User = serde_json::from_value(json!({
            "id": "u1",
            "email": "grace@example.com",
            "created": "2024-05-01 10:20:30.000Z",
            "updated": "2024-05-01 10:20:30.000Z"
        }))
        .unwrap();

        assert_eq!(user.name, "");
        assert_eq!(user.display_name(), "grace");
    }
}
