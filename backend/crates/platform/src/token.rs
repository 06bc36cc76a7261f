//! Bearer token inspection
//!
//! The backend issues JWTs. The client never verifies the signature (it has
//! no key); it only reads the claims to know when the token expires.

use std::fmt;

use base64::{Engine, engine::general_purpose};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Token is not a JWT")]
    Malformed,

    #[error("Token payload is not valid base64")]
    Encoding,

    #[error("Token claims are invalid: {0}")]
    Claims(String),
}

/// Registered claims the client cares about
#[derive(Debug, Clone, Deserialize)]
pub struct StandardClaims {
    /// Expiry, seconds since the epoch
    pub exp: Option<i64>,
    /// Record ID of the authenticated user
    pub id: Option<String>,
}

/// Decode the payload segment of a JWT without verifying it
pub fn decode_claims<T: DeserializeOwned>(token: &str) -> Result<T, TokenError> {
    let mut parts = token.split('.');
    let payload = match (parts.next(), parts.next(), parts.next(), parts.next()) {
        (Some(_), Some(payload), Some(_), None) if !payload.is_empty() => payload,
        _ => return Err(TokenError::Malformed),
    };

    // Tolerate padded input even though JWTs are unpadded
    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|_| TokenError::Encoding)?;

    serde_json::from_slice(&bytes).map_err(|e| TokenError::Claims(e.to_string()))
}

/// Opaque bearer token with cached expiry
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Expiry from the `exp` claim, if the token carries one
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let claims: StandardClaims = decode_claims(&self.0).ok()?;
        DateTime::from_timestamp(claims.exp?, 0)
    }

    /// A token is valid when it is non-empty, decodes, and `exp` is in the future
    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        if self.0.is_empty() {
            return false;
        }
        match self.expires_at() {
            Some(exp) => exp > now,
            None => false,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.is_valid_at(Utc::now())
    }
}

impl fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("BearerToken").field(&"[REDACTED]").finish()
    }
}

/// Build an unsigned JWT for tests and local tooling
pub fn unsigned_jwt(claims: &serde_json::Value) -> String {
    let header = general_purpose::URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = general_purpose::URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;
    use serde_json::json;

    #[test]
    fn test_decode_claims() {
        let jwt = unsigned_jwt(&json!({"id": "user1", "exp": 1_900_000_000}));
        let claims: StandardClaims = decode_claims(&jwt).unwrap();
        assert_eq!(claims.id.as_deref(), Some("user1"));
        assert_eq!(claims.exp, Some(1_900_000_000));
    }

    #[test]
    fn test_decode_malformed() {
        assert_eq!(
            decode_claims::<StandardClaims>("abc").unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(
            decode_claims::<StandardClaims>("a..c").unwrap_err(),
            TokenError::Malformed
        );
        assert_eq!(
            decode_claims::<StandardClaims>("a.!!!.c").unwrap_err(),
            TokenError::Encoding
        );
    }

    #[test]
    fn test_token_validity() {
        let now = Utc::now();
        let live = BearerToken::new(unsigned_jwt(
            &json!({"exp": (now + Duration::hours(1)).timestamp()}),
        ));
        let expired = BearerToken::new(unsigned_jwt(
            &json!({"exp": (now - Duration::seconds(1)).timestamp()}),
        ));
        let no_exp = BearerToken::new(unsigned_jwt(&json!({"id": "x"})));

        assert!(live.is_valid_at(now));
        assert!(!expired.is_valid_at(now));
        assert!(!no_exp.is_valid_at(now));
        assert!(!BearerToken::new("").is_valid_at(now));
        assert!(!BearerToken::new("garbage").is_valid_at(now));
    }

    #[test]
    fn test_token_debug_is_redacted() {
        let token = BearerToken::new("secret.token.value");
        assert!(!format!("{:?}", token).contains("secret"));
    }
}
