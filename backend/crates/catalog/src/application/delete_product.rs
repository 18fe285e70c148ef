//! Delete Product Use Case

use std::sync::Arc;

use platform::cache::CacheClient;

use crate::application::cache::invalidate;
use crate::domain::repository::ProductRepository;
use crate::domain::value_object::product_id::ProductId;
use crate::error::{CatalogError, CatalogResult};

pub struct DeleteProductUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
}

impl<R> DeleteProductUseCase<R>
where
    R: ProductRepository,
{
    pub fn new(repo: Arc<R>, cache: CacheClient) -> Self {
        Self { repo, cache }
    }

    pub async fn execute(&self, id: ProductId) -> CatalogResult<()> {
        if !self.repo.delete(&id).await? {
            return Err(CatalogError::ProductNotFound);
        }

        invalidate(&self.cache, Some(&id)).await;

        tracing::info!(product_id = %id, "Product deleted");
        Ok(())
    }
}
