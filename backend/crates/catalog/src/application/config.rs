//! Application Configuration

use std::time::Duration;

/// Catalog application configuration
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    /// TTL of `product:<id>` entries
    pub product_ttl: Duration,
    /// TTL of list entries
    pub list_ttl: Duration,
    /// TTL of the stats entry
    pub stats_ttl: Duration,
    /// Active products below this quantity count as low stock
    pub low_stock_threshold: i32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            product_ttl: Duration::from_secs(10 * 60),
            list_ttl: Duration::from_secs(5 * 60),
            stats_ttl: Duration::from_secs(15 * 60),
            low_stock_threshold: 10,
        }
    }
}
