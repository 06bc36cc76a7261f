//! Application Configuration
//!
//! Configuration for the Auth application layer.

use platform::config::ClientConfig;
use platform::rate_limit::RateLimitConfig;

/// Rate limit namespace for sign-in attempts
pub const LOGIN_NAMESPACE: &str = "login";

/// Rate limit namespace for registration attempts
pub const REGISTER_NAMESPACE: &str = "register";

/// Auth application configuration
#[derive(Debug, Clone)]
pub struct AuthConfig {
    /// Storage key of the persisted session
    pub session_key: String,
    /// Sign-in rate limit (resets on success)
    pub login_rate_limit: RateLimitConfig,
    /// Registration rate limit (never resets early)
    pub register_rate_limit: RateLimitConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            session_key: "auth_session".to_string(),
            login_rate_limit: RateLimitConfig::login(),
            register_rate_limit: RateLimitConfig::register(),
        }
    }
}

impl AuthConfig {
    /// Take the rate limits from the client configuration
    pub fn from_client_config(config: &ClientConfig) -> Self {
        Self {
            login_rate_limit: config.login_rate_limit.clone(),
            register_rate_limit: config.register_rate_limit.clone(),
            ..Default::default()
        }
    }

    /// Set a custom session key
    pub fn with_session_key(mut self, key: impl Into<String>) -> Self {
        self.session_key = key.into();
        self
    }
}
