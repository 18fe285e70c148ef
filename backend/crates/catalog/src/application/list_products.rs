//! List Products Use Case
//!
//! Cache-aside over one page of a filtered, sorted listing. Count and page
//! are fetched concurrently; either failing fails the request.

use std::sync::Arc;

use platform::cache::CacheClient;

use crate::application::cache::{current_generation, list_cache_key};
use crate::application::config::CatalogConfig;
use crate::application::view::{ProductPage, ProductView};
use crate::domain::query::{Pagination, ProductQuery};
use crate::domain::repository::ProductRepository;
use crate::error::CatalogResult;

pub struct ListProductsUseCase<R>
where
    R: ProductRepository,
{
    repo: Arc<R>,
    cache: CacheClient,
    config: Arc<CatalogConfig>,
}

impl<R> ListProductsUseCase<R>
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

    pub async fn execute(&self, query: ProductQuery) -> CatalogResult<ProductPage> {
        let key = list_cache_key(current_generation(&self.cache).await, &query);

        if let Some(page) = self.cache.try_get::<ProductPage>(&key).await {
            tracing::debug!(cache_key = %key, "Product list served from cache");
            return Ok(page);
        }

        let (products, total_count) = tokio::try_join!(
            self.repo.find_many(&query),
            self.repo.count(&query.filter),
        )?;

        let page = ProductPage {
            products: products.iter().map(ProductView::from).collect(),
            pagination: Pagination::new(query.page, query.limit, total_count),
        };

        self.cache
            .try_set(&key, &page, Some(self.config.list_ttl))
            .await;

        tracing::debug!(
            count = page.products.len(),
            total_count,
            "Product list loaded"
        );
        Ok(page)
    }
}
