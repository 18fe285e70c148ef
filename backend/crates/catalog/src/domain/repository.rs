//! Repository Traits
//!
//! Interfaces for data persistence. Implementation is in infrastructure layer.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::entity::product::Product;
use crate::domain::query::{ProductFilter, ProductQuery};
use crate::domain::value_object::{product_id::ProductId, sku::Sku};
use crate::error::CatalogResult;

/// Number of products in one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryCount {
    pub name: String,
    pub count: u64,
}

/// Product repository trait
#[trait_variant::make(ProductRepository: Send)]
pub trait LocalProductRepository {
    /// Insert. Duplicate SKUs surface as `CatalogError::SkuTaken`.
    async fn create(&self, product: &Product) -> CatalogResult<()>;

    async fn find_by_id(&self, id: &ProductId) -> CatalogResult<Option<Product>>;

    async fn find_by_sku(&self, sku: &Sku) -> CatalogResult<Option<Product>>;

    /// Find a product with `sku` other than `excluded`
    async fn find_by_sku_excluding(
        &self,
        sku: &Sku,
        excluded: &ProductId,
    ) -> CatalogResult<Option<Product>>;

    /// One page of matches, in the query's order
    async fn find_many(&self, query: &ProductQuery) -> CatalogResult<Vec<Product>>;

    async fn count(&self, filter: &ProductFilter) -> CatalogResult<u64>;

    /// Persist every field plus `updated_at`
    async fn update(&self, product: &Product) -> CatalogResult<()>;

    /// `false` when nothing was deleted
    async fn delete(&self, id: &ProductId) -> CatalogResult<bool>;

    /// Sum of all prices, zero when empty
    async fn sum_price(&self) -> CatalogResult<Decimal>;

    /// Per-category counts, ordered by category name
    async fn count_by_category(&self) -> CatalogResult<Vec<CategoryCount>>;

    /// Active products with `quantity < threshold`
    async fn count_low_stock(&self, threshold: i32) -> CatalogResult<u64>;
}
