//! Create Product Use Case

use std::sync::Arc;

use platform::cache::CacheClient;

use crate::application::cache::{invalidate, product_cache_key};
use crate::application::config::CatalogConfig;
use crate::application::view::ProductView;
use crate::domain::entity::product::{NewProduct, Product};
use crate::domain::repository::ProductRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct CreateProductUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    config: Arc<CatalogConfig>,
}

impl<R> CreateProductUseCase<R>
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

    pub async fn execute(&self, input: NewProduct) -> CatalogResult<ProductView> {
        if self.repo.find_by_sku(&input.sku).await?.is_some() {
            tracing::debug!(sku = %input.sku, "Product creation with existing SKU");
            return Err(CatalogError::SkuTaken);
        }

        let product = Product::new(input);
        self.repo.create(&product).await?;

        invalidate(&self.cache, None).await;

        let view = ProductView::from(&product);
        self.cache
            .try_set(
                &product_cache_key(&product.id),
                &view,
                Some(self.config.product_ttl),
            )
            .await;

        tracing::info!(product_id = %product.id, sku = %product.sku, "Product created");
        Ok(view)
    }
}
