//! Product Entity

use chrono::{DateTime, Utc};

use crate::domain::value_object::{price::Price, product_id::ProductId, sku::Sku};

/// Catalog record
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub quantity: i32,
    /// Unique
    pub sku: Sku,
    pub category: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of a new product
#[derive(Debug, Clone)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Price,
    pub quantity: i32,
    pub sku: Sku,
    pub category: String,
    pub is_active: bool,
}

/// Partial update; `None` leaves a field untouched
#[derive(Debug, Clone, Default)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Price>,
    pub quantity: Option<i32>,
    pub sku: Option<Sku>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl Product {
    pub fn new(fields: NewProduct) -> Self {
        let now = Utc::now();

        Self {
            id: ProductId::new(),
            name: fields.name,
            description: fields.description,
            price: fields.price,
            quantity: fields.quantity,
            sku: fields.sku,
            category: fields.category,
            is_active: fields.is_active,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, changes: ProductChanges) {
        if let Some(name) = changes.name {
            self.name = name;
        }
        if let Some(description) = changes.description {
            self.description = Some(description);
        }
        if let Some(price) = changes.price {
            self.price = price;
        }
        if let Some(quantity) = changes.quantity {
            self.quantity = quantity;
        }
        if let Some(sku) = changes.sku {
            self.sku = sku;
        }
        if let Some(category) = changes.category {
            self.category = category;
        }
        if let Some(is_active) = changes.is_active {
            self.is_active = is_active;
        }
        self.updated_at = Utc::now();
    }
}
