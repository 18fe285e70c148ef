//! Value Object Module

pub mod price;
pub mod product_id;
pub mod sku;
