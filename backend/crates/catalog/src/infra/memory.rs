//! In-memory product repository
//!
//! Mirrors [`PgProductRepository`](super::postgres::PgProductRepository):
//! SKU uniqueness, case-insensitive substring filters, `id` as sort tiebreak.

use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use rust_decimal::Decimal;
use tokio::sync::RwLock;

use crate::domain::entity::product::Product;
use crate::domain::query::{ProductFilter, ProductQuery, SortField, SortOrder};
use crate::domain::repository::{CategoryCount, ProductRepository};
use crate::domain::value_object::{product_id::ProductId, sku::Sku};
use crate::error::{CatalogError, CatalogResult};

#[derive(Clone, Default)]
pub struct InMemoryProductRepository {
    products: Arc<RwLock<HashMap<ProductId, Product>>>,
}

impl InMemoryProductRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

fn contains_ci(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

fn matches(product: &Product, filter: &ProductFilter) -> bool {
    if let Some(search) = &filter.search {
        let hit = contains_ci(&product.name, search)
            || product
                .description
                .as_deref()
                .is_some_and(|d| contains_ci(d, search))
            || contains_ci(product.sku.as_str(), search);
        if !hit {
            return false;
        }
    }
    if let Some(category) = &filter.category
        && !contains_ci(&product.category, category)
    {
        return false;
    }
    filter.is_active.is_none_or(|active| product.is_active == active)
}

fn compare(a: &Product, b: &Product, field: SortField) -> Ordering {
    match field {
        SortField::Name => a.name.cmp(&b.name),
        SortField::Price => a.price.cmp(&b.price),
        SortField::Quantity => a.quantity.cmp(&b.quantity),
        SortField::Category => a.category.cmp(&b.category),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
    }
}

impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &Product) -> CatalogResult<()> {
        let mut products = self.products.write().await;
        if products.values().any(|p| p.sku == product.sku) {
            return Err(CatalogError::SkuTaken);
        }
        products.insert(product.id, product.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &ProductId) -> CatalogResult<Option<Product>> {
        Ok(self.products.read().await.get(id).cloned())
    }

    async fn find_by_sku(&self, sku: &Sku) -> CatalogResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .find(|p| &p.sku == sku)
            .cloned())
    }

    async fn find_by_sku_excluding(
        &self,
        sku: &Sku,
        excluded: &ProductId,
    ) -> CatalogResult<Option<Product>> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .find(|p| &p.sku == sku && &p.id != excluded)
            .cloned())
    }

    async fn find_many(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>> {
        let products = self.products.read().await;
        let mut hits: Vec<&Product> = products
            .values()
            .filter(|p| matches(p, &query.filter))
            .collect();

        hits.sort_by(|a, b| {
            let primary = match query.sort_order {
                SortOrder::Asc => compare(a, b, query.sort_by),
                SortOrder::Desc => compare(b, a, query.sort_by),
            };
            primary.then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });

        let offset = usize::try_from(query.offset()).unwrap_or(usize::MAX);
        Ok(hits
            .into_iter()
            .skip(offset)
            .take(query.limit as usize)
            .cloned()
            .collect())
    }

    async fn count(&self, filter: &ProductFilter) -> CatalogResult<u64> {
        let products = self.products.read().await;
        Ok(products.values().filter(|p| matches(p, filter)).count() as u64)
    }

    async fn update(&self, product: &Product) -> CatalogResult<()> {
        let mut products = self.products.write().await;
        if products
            .values()
            .any(|p| p.sku == product.sku && p.id != product.id)
        {
            return Err(CatalogError::SkuTaken);
        }
        match products.get_mut(&product.id) {
            Some(stored) => {
                *stored = product.clone();
                Ok(())
            }
            None => Err(CatalogError::ProductNotFound),
        }
    }

    async fn delete(&self, id: &ProductId) -> CatalogResult<bool> {
        Ok(self.products.write().await.remove(id).is_some())
    }

    async fn sum_price(&self) -> CatalogResult<Decimal> {
        Ok(self
            .products
            .read()
            .await
            .values()
            .map(|p| p.price.amount())
            .sum())
    }

    async fn count_by_category(&self) -> CatalogResult<Vec<CategoryCount>> {
        let products = self.products.read().await;
        let mut counts: BTreeMap<&str, u64> = BTreeMap::new();
        for product in products.values() {
            *counts.entry(product.category.as_str()).or_default() += 1;
        }
        Ok(counts
            .into_iter()
            .map(|(name, count)| CategoryCount {
                name: name.to_string(),
                count,
            })
            .collect())
    }

    async fn count_low_stock(&self, threshold: i32) -> CatalogResult<u64> {
        let products = self.products.read().await;
        Ok(products
            .values()
            .filter(|p| p.is_active && p.quantity < threshold)
            .count() as u64)
    }
}
