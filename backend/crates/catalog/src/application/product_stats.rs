//! Product Stats Use Case
//!
//! Six aggregates queried concurrently, cached for the current generation.

use std::sync::Arc;

use platform::cache::CacheClient;

use crate::application::cache::{current_generation, stats_cache_key};
use crate::application::config::CatalogConfig;
use crate::application::view::ProductStats;
use crate::domain::query::ProductFilter;
use crate::domain::repository::ProductRepository;
use crate::domain::value_object::price::to_money;
use crate::error::CatalogResult;

pub struct ProductStatsUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    config: Arc<CatalogConfig>,
}

impl<R> ProductStatsUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>, cache: CacheClient, config: Arc<CatalogConfig>) -> Self {
        Self {
            repo,
            cache,
            config,
        }
    }

    pub async fn execute(&self) -> CatalogResult<ProductStats> {
        let key = stats_cache_key(current_generation(&self.cache).await);

        if let Some(stats) = self.cache.try_get::<ProductStats>(&key).await {
            tracing::debug!("Product stats served from cache");
            return Ok(stats);
        }

        let all = ProductFilter::default();
        let active = ProductFilter::active(true);
        let inactive = ProductFilter::active(false);

        let (total, active, inactive, total_value, categories, low_stock) = tokio::try_join!(
            self.repo.count(&all),
            self.repo.count(&active),
            self.repo.count(&inactive),
            self.repo.sum_price(),
            self.repo.count_by_category(),
            self.repo.count_low_stock(self.config.low_stock_threshold),
        )?;

        let stats = ProductStats {
            total_products: total,
            active_products: active,
            inactive_products: inactive,
            total_value: to_money(total_value),
            categories_count: categories.len(),
            categories,
            low_stock_products: low_stock,
        };

        self.cache
            .try_set(&key, &stats, Some(self.config.stats_ttl))
            .await;

        tracing::debug!(total_products = total, "Product stats computed");
        Ok(stats)
    }
}
