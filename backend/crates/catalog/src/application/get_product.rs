//! Get Product Use Case

use std::sync::Arc;

use platform::cache::CacheClient;

use crate::application::cache::product_cache_key;
use crate::application::config::CatalogConfig;
use crate::application::view::ProductView;
use crate::domain::repository::ProductRepository;
use crate::domain::value_object::product_id::ProductId;
use crate::error::{CatalogError, CatalogResult};

pub struct GetProductUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    config: Arc<CatalogConfig>,
}

impl<R> GetProductUseCase<R>
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

    pub async fn execute(&self, id: ProductId) -> CatalogResult<ProductView> {
        let key = product_cache_key(&id);

        if let Some(view) = self.cache.try_get::<ProductView>(&key).await {
            tracing::debug!(product_id = %id, "Product served from cache");
            return Ok(view);
        }

        let product = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        let view = ProductView::from(&product);
        self.cache
            .try_set(&key, &view, Some(self.config.product_ttl))
            .await;

        Ok(view)
    }
}
