//! Catalog (Product) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Product entity, value objects, listing query, repository trait
//! - `application/` - Use cases, views, cache key scheme
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, router
//!
//! ## Features
//! - Public listing (search, category and active filters, sorting, paging)
//!   and lookup by id, both cache-aside
//! - Administrator-only create, update, delete and aggregate stats
//! - List and stats caches keyed by a generation counter that every write bumps

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

// Re-exports for convenience
pub use application::config::CatalogConfig;
pub use error::{CatalogError, CatalogResult};
pub use infra::{InMemoryProductRepository, PgProductRepository};
pub use presentation::handlers::CatalogAppState;
pub use presentation::router::{catalog_router, catalog_router_generic};

pub mod models {
    pub use crate::domain::entity::product::*;
    pub use crate::domain::query::*;
    pub use crate::domain::value_object::*;
}
