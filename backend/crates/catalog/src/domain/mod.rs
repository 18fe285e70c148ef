//! Domain Layer
//!
//! Product entity, value objects, listing query and the repository trait.

pub mod entity {
    pub mod product;
}
pub mod query;
pub mod repository;
pub mod value_object;

// Re-exports
pub use entity::product::Product;
pub use repository::ProductRepository;
