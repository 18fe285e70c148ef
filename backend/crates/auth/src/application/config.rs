//! Application Configuration
//!
//! Configuration for the Auth application layer. Built by the API binary
//! from the environment; this crate never reads the environment itself.

use std::time::Duration;

use platform::password::DEFAULT_HASH_COST;

/// `iss` claim of issued tokens
pub const TOKEN_ISSUER: &str = "ecommerce-api";

/// `aud` claim of issued tokens
pub const TOKEN_AUDIENCE: &str = "ecommerce-client";

/// Minimum accepted signing secret length in bytes
pub const MIN_JWT_SECRET_LEN: usize = 16;

/// Auth application configuration
#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC-SHA256 signing secret
    pub jwt_secret: Vec<u8>,
    /// Token lifetime (default 7 days)
    pub token_ttl: Duration,
    /// Argon2id iteration count
    pub hash_cost: u32,
    /// Whether public registration may request the `ADMIN` role
    pub allow_admin_self_registration: bool,
    /// TTL of `user:<id>` cache entries
    pub user_cache_ttl: Duration,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: Vec::new(),
            token_ttl: Duration::from_secs(7 * 24 * 3600), // 7 days
            hash_cost: DEFAULT_HASH_COST,
            allow_admin_self_registration: false,
            user_cache_ttl: Duration::from_secs(3600), // 1 hour
        }
    }
}

impl AuthConfig {
    pub fn new(jwt_secret: impl Into<Vec<u8>>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"[REDACTED]")
            .field("token_ttl", &self.token_ttl)
            .field("hash_cost", &self.hash_cost)
            .field(
                "allow_admin_self_registration",
                &self.allow_admin_self_registration,
            )
            .field("user_cache_ttl", &self.user_cache_ttl)
            .finish()
    }
}
