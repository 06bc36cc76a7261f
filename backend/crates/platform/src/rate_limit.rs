//! Client-side Rate Limiting
//!
//! Per-namespace attempt counter persisted through a [`KeyValueStore`].
//! Once `max_attempts` have been recorded inside one window the next attempt
//! is refused and the namespace stays blocked until `block_expires_ms`.
//!
//! This only protects the backend from honest clients hammering a form; it
//! is not a security boundary.

use std::time::Duration;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStore, StorageError, get_json, set_json};

const KEY_PREFIX: &str = "rate_limit:";

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts allowed in the window
    pub max_attempts: u32,
    /// Window duration, measured from the first attempt
    pub window: Duration,
    /// How long the namespace stays blocked once the limit is hit
    pub block_duration: Duration,
    /// Clear the counter when the guarded action succeeds
    pub reset_on_success: bool,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self::login()
    }
}

impl RateLimitConfig {
    pub fn new(max_attempts: u32, window_secs: u64, block_secs: u64) -> Self {
        Self {
            max_attempts,
            window: Duration::from_secs(window_secs),
            block_duration: Duration::from_secs(block_secs),
            reset_on_success: true,
        }
    }

    /// 5 attempts per 15 minutes, 15 minute block
    pub fn login() -> Self {
        Self::new(5, 15 * 60, 15 * 60)
    }

    /// 3 attempts per hour, 1 hour block, not cleared by a success
    pub fn register() -> Self {
        Self {
            reset_on_success: false,
            ..Self::new(3, 3600, 3600)
        }
    }

    pub fn window_ms(&self) -> i64 {
        self.window.as_millis() as i64
    }

    pub fn block_ms(&self) -> i64 {
        self.block_duration.as_millis() as i64
    }
}

/// Persisted counter for one namespace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitState {
    pub attempts: u32,
    pub window_start_ms: i64,
    pub block_expires_ms: Option<i64>,
}

/// Rate limit decision
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { remaining: u32 },
    Blocked { retry_after_ms: i64 },
}

impl RateLimitDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateLimitDecision::Allowed { .. })
    }

    /// Whole minutes until the block lifts, rounded up
    pub fn retry_after_minutes(&self) -> i64 {
        match self {
            RateLimitDecision::Allowed { .. } => 0,
            RateLimitDecision::Blocked { retry_after_ms } => (retry_after_ms + 59_999) / 60_000,
        }
    }
}

impl RateLimitState {
    /// Drop lapsed blocks and expired windows
    fn roll(&mut self, config: &RateLimitConfig, now_ms: i64) {
        if let Some(expires) = self.block_expires_ms {
            if expires <= now_ms {
                *self = RateLimitState::default();
            }
        }
        if self.attempts == 0 || now_ms - self.window_start_ms >= config.window_ms() {
            self.attempts = 0;
            self.window_start_ms = now_ms;
        }
    }

    /// Decide without recording an attempt
    pub fn evaluate(&self, config: &RateLimitConfig, now_ms: i64) -> RateLimitDecision {
        let mut probe = *self;
        if let Some(expires) = probe.block_expires_ms {
            if expires > now_ms {
                return RateLimitDecision::Blocked {
                    retry_after_ms: expires - now_ms,
                };
            }
        }
        probe.roll(config, now_ms);
        if probe.attempts >= config.max_attempts {
            return RateLimitDecision::Blocked {
                retry_after_ms: config.block_ms(),
            };
        }
        RateLimitDecision::Allowed {
            remaining: config.max_attempts - probe.attempts,
        }
    }

    /// Record an attempt if allowed; starts a block when the limit is reached
    pub fn acquire(&mut self, config: &RateLimitConfig, now_ms: i64) -> RateLimitDecision {
        if let Some(expires) = self.block_expires_ms {
            if expires > now_ms {
                return RateLimitDecision::Blocked {
                    retry_after_ms: expires - now_ms,
                };
            }
        }
        self.roll(config, now_ms);

        if self.attempts >= config.max_attempts {
            self.block_expires_ms = Some(now_ms + config.block_ms());
            return RateLimitDecision::Blocked {
                retry_after_ms: config.block_ms(),
            };
        }

        self.attempts += 1;
        RateLimitDecision::Allowed {
            remaining: config.max_attempts - self.attempts,
        }
    }
}

/// Persistent rate limiter
#[derive(Debug)]
pub struct RateLimiter<S> {
    store: S,
    config: RateLimitConfig,
}

impl<S> RateLimiter<S>
where
    S: KeyValueStore + Sync,
{
    pub fn new(store: S, config: RateLimitConfig) -> Self {
        Self { store, config }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn key(namespace: &str) -> String {
        format!("{KEY_PREFIX}{namespace}")
    }

    async fn load(&self, namespace: &str) -> Result<RateLimitState, StorageError> {
        match get_json(&self.store, &Self::key(namespace)).await {
            Ok(state) => Ok(state.unwrap_or_default()),
            Err(StorageError::Corrupt(e)) => {
                tracing::warn!(namespace, error = %e, "Discarding corrupt rate limit state");
                Ok(RateLimitState::default())
            }
            Err(e) => Err(e),
        }
    }

    /// Record an attempt now
    pub async fn try_acquire(&self, namespace: &str) -> Result<RateLimitDecision, StorageError> {
        self.try_acquire_at(namespace, Utc::now().timestamp_millis())
            .await
    }

    pub async fn try_acquire_at(
        &self,
        namespace: &str,
        now_ms: i64,
    ) -> Result<RateLimitDecision, StorageError> {
        let mut state = self.load(namespace).await?;
        let decision = state.acquire(&self.config, now_ms);
        set_json(&self.store, &Self::key(namespace), &state).await?;

        match decision {
            RateLimitDecision::Allowed { remaining } => {
                tracing::debug!(namespace, remaining, "Rate limit attempt recorded");
            }
            RateLimitDecision::Blocked { retry_after_ms } => {
                tracing::warn!(namespace, retry_after_ms, "Rate limit exceeded");
            }
        }
        Ok(decision)
    }

    /// Current decision without recording an attempt
    pub async fn status(&self, namespace: &str) -> Result<RateLimitDecision, StorageError> {
        self.status_at(namespace, Utc::now().timestamp_millis())
            .await
    }

    pub async fn status_at(
        &self,
        namespace: &str,
        now_ms: i64,
    ) -> Result<RateLimitDecision, StorageError> {
        let state = self.load(namespace).await?;
        Ok(state.evaluate(&self.config, now_ms))
    }

    /// Clear the namespace if the config resets on success
    pub async fn record_success(&self, namespace: &str) -> Result<(), StorageError> {
        if self.config.reset_on_success {
            self.reset(namespace).await?;
        }
        Ok(())
    }

    pub async fn reset(&self, namespace: &str) -> Result<(), StorageError> {
        self.store.remove(&Self::key(namespace)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    const MINUTE: i64 = 60_000;

    fn limiter(max: u32) -> RateLimiter<MemoryStore> {
        RateLimiter::new(MemoryStore::new(), RateLimitConfig::new(max, 15 * 60, 15 * 60))
    }

    #[tokio::test]
    async fn test_blocks_after_max_attempts() {
        let limiter = limiter(3);
        let t0 = 1_000_000;

        for expected in [2, 1, 0] {
            let d = limiter.try_acquire_at("login", t0).await.unwrap();
            assert_eq!(d, RateLimitDecision::Allowed { remaining: expected });
        }

        let d = limiter.try_acquire_at("login", t0 + 1).await.unwrap();
        assert_eq!(
            d,
            RateLimitDecision::Blocked {
                retry_after_ms: 15 * MINUTE
            }
        );
    }

    #[tokio::test]
    async fn test_unblocks_after_block_expires() {
        let limiter = limiter(2);
        let t0 = 5_000_000;

        limiter.try_acquire_at("login", t0).await.unwrap();
        limiter.try_acquire_at("login", t0).await.unwrap();
        assert!(!limiter.try_acquire_at("login", t0).await.unwrap().is_allowed());

        // still blocked one ms before expiry
        let d = limiter
            .try_acquire_at("login", t0 + 15 * MINUTE - 1)
            .await
            .unwrap();
        assert_eq!(d, RateLimitDecision::Blocked { retry_after_ms: 1 });

        let d = limiter
            .try_acquire_at("login", t0 + 15 * MINUTE)
            .await
            .unwrap();
        assert_eq!(d, RateLimitDecision::Allowed { remaining: 1 });
    }

    #[tokio::test]
    async fn test_window_expiry_resets_counter() {
        let limiter = limiter(2);
        let t0 = 0;

        limiter.try_acquire_at("login", t0).await.unwrap();
        limiter.try_acquire_at("login", t0 + MINUTE).await.unwrap();

        let d = limiter
            .try_acquire_at("login", t0 + 15 * MINUTE)
            .await
            .unwrap();
        assert_eq!(d, RateLimitDecision::Allowed { remaining: 1 });
    }

    #[tokio::test]
    async fn test_namespaces_are_independent() {
        let limiter = limiter(1);
        limiter.try_acquire_at("login", 0).await.unwrap();
        assert!(!limiter.try_acquire_at("login", 1).await.unwrap().is_allowed());
        assert!(limiter.try_acquire_at("register", 1).await.unwrap().is_allowed());
    }

    #[tokio::test]
    async fn test_status_does_not_record() {
        let limiter = limiter(2);
        limiter.try_acquire_at("login", 0).await.unwrap();

        for _ in 0..5 {
            let d = limiter.status_at("login", 10).await.unwrap();
            assert_eq!(d, RateLimitDecision::Allowed { remaining: 1 });
        }
    }

    #[tokio::test]
    async fn test_record_success_resets_when_configured() {
        let limiter = limiter(2);
        limiter.try_acquire_at("login", 0).await.unwrap();
        limiter.try_acquire_at("login", 0).await.unwrap();
        limiter.record_success("login").await.unwrap();

        let d = limiter.try_acquire_at("login", 1).await.unwrap();
        assert_eq!(d, RateLimitDecision::Allowed { remaining: 1 });
    }

    #[tokio::test]
    async fn test_record_success_keeps_counter_for_register() {
        let limiter = RateLimiter::new(MemoryStore::new(), RateLimitConfig::register());
        limiter.try_acquire_at("register", 0).await.unwrap();
        limiter.record_success("register").await.unwrap();

        let d = limiter.status_at("register", 1).await.unwrap();
        assert_eq!(d, RateLimitDecision::Allowed { remaining: 2 });
    }

    #[tokio::test]
    async fn test_corrupt_state_is_treated_as_fresh() {
        let store = MemoryStore::new();
        store
            .set_raw("rate_limit:login", "not json".to_string())
            .await
            .unwrap();
        let limiter = RateLimiter::new(store, RateLimitConfig::login());

        let d = limiter.try_acquire_at("login", 0).await.unwrap();
        assert_eq!(d, RateLimitDecision::Allowed { remaining: 4 });
    }

    #[test]
    fn test_state_serializes_in_camel_case() {
        let state = RateLimitState {
            attempts: 2,
            window_start_ms: 10,
            block_expires_ms: None,
        };
        let json = serde_json::to_value(state).unwrap();
        assert_eq!(json["windowStartMs"], 10);
        assert!(json["blockExpiresMs"].is_null());
    }

    #[test]
    fn test_retry_after_minutes_rounds_up() {
        let d = RateLimitDecision::Blocked {
            retry_after_ms: 60_001,
        };
        assert_eq!(d.retry_after_minutes(), 2);
        assert_eq!(
            RateLimitDecision::Allowed { remaining: 1 }.retry_after_minutes(),
            0
        );
    }
}
