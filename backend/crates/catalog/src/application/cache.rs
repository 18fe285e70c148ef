//! Catalog cache keys
//!
//! - `product:<id>` holds a single product view.
//! - `products:v<N>:list:<sha256>` and `products:v<N>:stats` hold list pages
//!   and aggregates for generation `N`.
//! - `products:version` holds `N`. Every write bumps it, which strands the
//!   entries of the previous generation until their TTL runs out.

use platform::cache::CacheClient;

use crate::domain::query::ProductQuery;
use crate::domain::value_object::product_id::ProductId;

pub const PRODUCTS_VERSION_KEY: &str = "products:version";

pub fn product_cache_key(id: &ProductId) -> String {
    format!("product:{id}")
}

pub fn list_cache_key(generation: i64, query: &ProductQuery) -> String {
    format!("products:v{generation}:list:{}", query.fingerprint())
}

pub fn stats_cache_key(generation: i64) -> String {
    format!("products:v{generation}:stats")
}

/// Current list/stats generation; 0 when unset or unreadable.
pub async fn current_generation(cache: &CacheClient) -> i64 {
    cache
        .try_get::<i64>(PRODUCTS_VERSION_KEY)
        .await
        .unwrap_or(0)
}

/// Strand every list and stats entry, and drop the item entry if given.
pub async fn invalidate(cache: &CacheClient, id: Option<&ProductId>) {
    if let Some(id) = id {
        cache.try_delete(&product_cache_key(id)).await;
    }
    match cache.increment(PRODUCTS_VERSION_KEY).await {
        Ok(generation) => tracing::debug!(generation, "Product cache generation bumped"),
        Err(e) => tracing::warn!(error = %e, "Product cache generation bump failed"),
    }
}
