//! Client Configuration
//!
//! Read from the process environment. Binaries call `dotenvy::dotenv()`
//! first so a local `.env` file can supply these.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

use crate::rate_limit::RateLimitConfig;

pub const ENV_API_URL: &str = "TODO_API_URL";
pub const ENV_STORAGE_DIR: &str = "TODO_STORAGE_DIR";
pub const ENV_LOGIN_MAX_ATTEMPTS: &str = "TODO_LOGIN_MAX_ATTEMPTS";
pub const ENV_LOGIN_WINDOW_SECS: &str = "TODO_LOGIN_WINDOW_SECS";
pub const ENV_LOGIN_BLOCK_SECS: &str = "TODO_LOGIN_BLOCK_SECS";

const DEFAULT_API_URL: &str = "http://127.0.0.1:8090";
const DEFAULT_STORAGE_DIR: &str = ".todo-app";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{name} must be a positive integer (got {value:?})")]
    InvalidNumber { name: &'static str, value: String },

    #[error("{name} must not be empty")]
    Empty { name: &'static str },
}

/// Client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Backend base URL
    pub api_url: String,
    /// Directory for the persisted session and rate-limit counters
    pub storage_dir: PathBuf,
    /// Sign-in rate limit
    pub login_rate_limit: RateLimitConfig,
    /// Registration rate limit
    pub register_rate_limit: RateLimitConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: PathBuf::from(DEFAULT_STORAGE_DIR),
            login_rate_limit: RateLimitConfig::login(),
            register_rate_limit: RateLimitConfig::register(),
        }
    }
}

impl ClientConfig {
    /// Load from the real process environment
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load through an arbitrary lookup (tests pass a map)
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim();
            if url.is_empty() {
                return Err(ConfigError::Empty { name: ENV_API_URL });
            }
            config.api_url = url.to_string();
        }

        if let Some(dir) = lookup(ENV_STORAGE_DIR) {
            if dir.trim().is_empty() {
                return Err(ConfigError::Empty {
                    name: ENV_STORAGE_DIR,
                });
            }
            config.storage_dir = PathBuf::from(dir.trim());
        }

        if let Some(max) = parse_positive(&lookup, ENV_LOGIN_MAX_ATTEMPTS)? {
            config.login_rate_limit.max_attempts = max as u32;
        }
        if let Some(secs) = parse_positive(&lookup, ENV_LOGIN_WINDOW_SECS)? {
            config.login_rate_limit.window = std::time::Duration::from_secs(secs);
        }
        if let Some(secs) = parse_positive(&lookup, ENV_LOGIN_BLOCK_SECS)? {
            config.login_rate_limit.block_duration = std::time::Duration::from_secs(secs);
        }

        Ok(config)
    }
}

fn parse_positive<F>(lookup: &F, name: &'static str) -> Result<Option<u64>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<u64>() {
        Ok(n) if n > 0 && n <= u32::MAX as u64 => Ok(Some(n)),
        _ => Err(ConfigError::InvalidNumber { name, value: raw }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::time::Duration;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ClientConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.api_url, "http://127.0.0.1:8090");
        assert_eq!(config.storage_dir, PathBuf::from(".todo-app"));
        assert_eq!(config.login_rate_limit.max_attempts, 5);
        assert_eq!(config.register_rate_limit.max_attempts, 3);
    }

    #[test]
    fn test_overrides() {
        let config = ClientConfig::from_lookup(lookup(&[
            ("TODO_API_URL", " https://todos.example.com "),
            ("TODO_STORAGE_DIR", "/tmp/todo"),
            ("TODO_LOGIN_MAX_ATTEMPTS", "10"),
            ("TODO_LOGIN_WINDOW_SECS", "60"),
            ("TODO_LOGIN_BLOCK_SECS", "120"),
        ]))
        .unwrap();

        assert_eq!(config.api_url, "https://todos.example.com");
        assert_eq!(config.storage_dir, PathBuf::from("/tmp/todo"));
        assert_eq!(config.login_rate_limit.max_attempts, 10);
        assert_eq!(config.login_rate_limit.window, Duration::from_secs(60));
        assert_eq!(config.login_rate_limit.block_duration, Duration::from_secs(120));
    }

    #[test]
    fn test_invalid_numbers() {
        for bad in ["0", "-1", "ten", ""] {
            let err = ClientConfig::from_lookup(lookup(&[("TODO_LOGIN_MAX_ATTEMPTS", bad)]))
                .unwrap_err();
            assert!(matches!(
                err,
                ConfigError::InvalidNumber {
                    name: "TODO_LOGIN_MAX_ATTEMPTS",
                    ..
                }
            ));
        }
    }

    #[test]
    fn test_empty_url_rejected() {
        let err = ClientConfig::from_lookup(lookup(&[("TODO_API_URL", "  ")])).unwrap_err();
        assert_eq!(err, ConfigError::Empty { name: "TODO_API_URL" });
    }
}
