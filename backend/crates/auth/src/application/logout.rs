//! Logout Use Case
//!
//! Drops the cached profile. The bearer token itself stays valid until `exp`.

use platform::cache::CacheClient;

use crate::application::view::user_cache_key;
use crate::domain::value_object::user_id::UserId;

/// Logout use case
pub struct LogoutUseCase {
    cache: CacheClient,
}

impl LogoutUseCase {
    pub fn new(cache: CacheClient) -> Self {
        Self { cache }
    }

    pub async fn execute(&self, user_id: UserId) {
        self.cache.try_delete(&user_cache_key(&user_id)).await;
        tracing::info!(user_id = %user_id, "User logged out");
    }
}
