//! Update Product Use Case

use std::sync::Arc;

use platform::cache::CacheClient;

use crate::application::cache::invalidate;
use crate::application::view::ProductView;
use crate::domain::entity::product::ProductChanges;
use crate::domain::repository::ProductRepository;
use crate::domain::value_object::product_id::ProductId;
use crate::error::{CatalogError, CatalogResult};

pub struct UpdateProductUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
}

impl<R> UpdateProductUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>, cache: CacheClient) -> Self {
        Self { repo, cache }
    }

    pub async fn execute(&self, id: ProductId, changes: ProductChanges) -> CatalogResult<ProductView> {
        let mut product = self
            .repo
            .find_by_id(&id)
            .await?
            .ok_or(CatalogError::ProductNotFound)?;

        if let Some(sku) = &changes.sku
            && sku != &product.sku
            && self.repo.find_by_sku_excluding(sku, &id).await?.is_some()
        {
            tracing::debug!(product_id = %id, sku = %sku, "Product update to an SKU in use");
            return Err(CatalogError::SkuTaken);
        }

        product.apply(changes);
        self.repo.update(&product).await?;

        invalidate(&self.cache, Some(&id)).await;

        tracing::info!(product_id = %id, "Product updated");
        Ok(ProductView::from(&product))
    }
}
