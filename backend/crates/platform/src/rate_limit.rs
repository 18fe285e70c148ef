//! Rate Limiting Infrastructure
//!
//! Fixed-window counters kept in the cache store:
//! `ratelimit:<client>:<window-index>` is INCRemented per request and given
//! a TTL of one window on the first hit.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::cache::{CacheClient, CacheError};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 100,
            window: Duration::from_secs(15 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }

    fn window_secs(&self) -> u64 {
        self.window.as_secs().max(1)
    }
}

/// Rate limit check result
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitResult {
    pub allowed: bool,
    pub remaining: u32,
    /// Time until the current window closes
    pub retry_after: Duration,
}

/// Trait for rate limit storage backends
#[trait_variant::make(RateLimitStore: Send)]
pub trait LocalRateLimitStore {
    /// Count one request for `client` and report whether it is allowed
    async fn check_and_increment(
        &self,
        client: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, CacheError>;
}

impl RateLimitStore for CacheClient {
    async fn check_and_increment(
        &self,
        client: &str,
        config: &RateLimitConfig,
    ) -> Result<RateLimitResult, CacheError> {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_secs();
        fixed_window_check(self, client, config, now).await
    }
}

async fn fixed_window_check(
    cache: &CacheClient,
    client: &str,
    config: &RateLimitConfig,
    now_secs: u64,
) -> Result<RateLimitResult, CacheError> {
    let window_secs = config.window_secs();
    let index = now_secs / window_secs;
    let key = format!("ratelimit:{client}:{index}");

    let count = cache.increment(&key).await?;
    if count == 1 {
        cache.expire(&key, Duration::from_secs(window_secs)).await?;
    }

    let count = u32::try_from(count).unwrap_or(u32::MAX);
    let reset_in = (index + 1) * window_secs - now_secs;

    Ok(RateLimitResult {
        allowed: count <= config.max_requests,
        remaining: config.max_requests.saturating_sub(count),
        retry_after: Duration::from_secs(reset_in),
    })
}
