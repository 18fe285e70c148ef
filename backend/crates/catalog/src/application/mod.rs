//! Application Layer
//!
//! Use cases and application services.

pub mod cache;
pub mod config;
pub mod create_product;
pub mod delete_product;
pub mod get_product;
pub mod list_products;
pub mod product_stats;
pub mod update_product;
pub mod view;

// Re-exports
pub use config::CatalogConfig;
pub use create_product::CreateProductUseCase;
pub use delete_product::DeleteProductUseCase;
pub use get_product::GetProductUseCase;
pub use list_products::ListProductsUseCase;
pub use product_stats::ProductStatsUseCase;
pub use update_product::UpdateProductUseCase;
pub use view::{ProductPage, ProductStats, ProductView};
