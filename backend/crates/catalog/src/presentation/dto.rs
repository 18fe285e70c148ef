//! API DTOs (Data Transfer Objects)
//!
//! Every field arrives optional and is checked in [`Validate`], so all
//! violations are reported together. Unknown fields are ignored.

use axum::extract::{FromRequestParts, Path};
use axum::http::request::Parts;
use kernel::error::app_error::AppError;
use kernel::validation::{FieldError, Validate, ValidationErrors, char_len, length_between};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::application::view::{ProductStats, ProductView};
use crate::domain::entity::product::{NewProduct, ProductChanges};
use crate::domain::query::{
    DEFAULT_LIMIT, DEFAULT_PAGE, MAX_LIMIT, ProductFilter, ProductQuery, SortField, SortOrder,
};
use crate::domain::value_object::{price::Price, product_id::ProductId, sku::Sku};

const NAME_MIN: usize = 2;
const NAME_MAX: usize = 255;
const DESCRIPTION_MAX: usize = 2000;
const CATEGORY_MIN: usize = 2;
const CATEGORY_MAX: usize = 100;
const SEARCH_MAX: usize = 255;

// ============================================================================
// Field rules
// ============================================================================

fn name_rule(raw: String) -> Result<String, String> {
    let name = raw.trim();
    length_between("Product name", name, NAME_MIN, NAME_MAX)?;
    Ok(name.to_string())
}

fn description_rule(raw: String) -> Result<String, String> {
    let description = raw.trim();
    if char_len(description) > DESCRIPTION_MAX {
        return Err(format!("Description cannot exceed {DESCRIPTION_MAX} characters"));
    }
    Ok(description.to_string())
}

fn price_rule(raw: Decimal) -> Result<Price, String> {
    Price::new(raw).map_err(|e| e.to_string())
}

fn quantity_rule(raw: i64) -> Result<i32, String> {
    if raw < 0 {
        return Err("Quantity cannot be negative".to_string());
    }
    i32::try_from(raw).map_err(|_| "Quantity is too large".to_string())
}

fn sku_rule(raw: String) -> Result<Sku, String> {
    Sku::new(raw).map_err(|e| e.to_string())
}

fn category_rule(raw: String) -> Result<String, String> {
    let category = raw.trim();
    length_between("Category", category, CATEGORY_MIN, CATEGORY_MAX)?;
    Ok(category.to_string())
}

/// Run `rule` when present, or report `missing` when absent.
fn required<T, U>(
    errors: &mut ValidationErrors,
    field: &str,
    missing: &str,
    raw: Option<T>,
    rule: impl FnOnce(T) -> Result<U, String>,
) -> Option<U> {
    match raw {
        Some(value) => errors.check(field, rule(value)),
        None => {
            errors.add(field, missing);
            None
        }
    }
}

/// Run `rule` when present. Outer `None`: absent. Inner `None`: invalid.
fn optional<T, U>(
    errors: &mut ValidationErrors,
    field: &str,
    raw: Option<T>,
    rule: impl FnOnce(T) -> Result<U, String>,
) -> Option<Option<U>> {
    raw.map(|value| errors.check(field, rule(value)))
}

// ============================================================================
// Create
// ============================================================================

/// Create product request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl Validate for CreateProductRequest {
    type Output = NewProduct;

    fn validate(self) -> Result<Self::Output, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let name = required(&mut errors, "name", "Product name is required", self.name, name_rule);
        let description = optional(&mut errors, "description", self.description, description_rule);
        let price = required(&mut errors, "price", "Price is required", self.price, price_rule);
        let quantity = optional(&mut errors, "quantity", self.quantity, quantity_rule);
        let sku = required(&mut errors, "sku", "SKU is required", self.sku, sku_rule);
        let category = required(
            &mut errors,
            "category",
            "Category is required",
            self.category,
            category_rule,
        );

        if !errors.is_empty() {
            return Err(errors);
        }

        match (name, price, sku, category) {
            (Some(name), Some(price), Some(sku), Some(category)) => errors.finish(NewProduct {
                name,
                description: description.flatten(),
                price,
                quantity: quantity.flatten().unwrap_or(0),
                sku,
                category,
                is_active: self.is_active.unwrap_or(true),
            }),
            _ => Err(errors),
        }
    }
}

// ============================================================================
// Update
// ============================================================================

/// Update product request
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub quantity: Option<i64>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<bool>,
}

impl UpdateProductRequest {
    fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.price.is_none()
            && self.quantity.is_none()
            && self.sku.is_none()
            && self.category.is_none()
            && self.is_active.is_none()
    }
}

impl Validate for UpdateProductRequest {
    type Output = ProductChanges;

    fn validate(self) -> Result<Self::Output, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if self.is_empty() {
            errors.add("body", "At least one field must be provided for update");
            return Err(errors);
        }

        let changes = ProductChanges {
            name: optional(&mut errors, "name", self.name, name_rule).flatten(),
            description: optional(&mut errors, "description", self.description, description_rule)
                .flatten(),
            price: optional(&mut errors, "price", self.price, price_rule).flatten(),
            quantity: optional(&mut errors, "quantity", self.quantity, quantity_rule).flatten(),
            sku: optional(&mut errors, "sku", self.sku, sku_rule).flatten(),
            category: optional(&mut errors, "category", self.category, category_rule).flatten(),
            is_active: self.is_active,
        };

        errors.finish(changes)
    }
}

// ============================================================================
// List query
// ============================================================================

/// `GET /products` query string, raw
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListProductsQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub search: Option<String>,
    pub category: Option<String>,
    pub is_active: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<String>,
}

/// Blank query values count as absent.
fn present(raw: Option<String>) -> Option<String> {
    raw.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
}

fn page_rule(raw: String) -> Result<u32, String> {
    let page: i64 = raw
        .parse()
        .map_err(|_| "Page must be an integer".to_string())?;
    if page < 1 {
        return Err("Page must be greater than 0".to_string());
    }
    u32::try_from(page).map_err(|_| "Page is too large".to_string())
}

fn limit_rule(raw: String) -> Result<u32, String> {
    let limit: i64 = raw
        .parse()
        .map_err(|_| "Limit must be an integer".to_string())?;
    if limit < 1 {
        return Err("Limit must be greater than 0".to_string());
    }
    if limit > i64::from(MAX_LIMIT) {
        return Err(format!("Limit cannot exceed {MAX_LIMIT}"));
    }
    Ok(limit as u32)
}

fn max_len_rule(label: &'static str, max: usize) -> impl FnOnce(String) -> Result<String, String> {
    move |raw| {
        if char_len(&raw) > max {
            Err(format!("{label} cannot exceed {max} characters"))
        } else {
            Ok(raw)
        }
    }
}

fn bool_rule(raw: String) -> Result<bool, String> {
    match raw.as_str() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err("isActive must be true or false".to_string()),
    }
}

fn sort_by_rule(raw: String) -> Result<SortField, String> {
    SortField::from_api_name(&raw).ok_or_else(|| {
        "sortBy must be one of name, price, quantity, category, createdAt, updatedAt".to_string()
    })
}

fn sort_order_rule(raw: String) -> Result<SortOrder, String> {
    SortOrder::from_api_name(&raw).ok_or_else(|| "sortOrder must be asc or desc".to_string())
}

impl Validate for ListProductsQuery {
    type Output = ProductQuery;

    fn validate(self) -> Result<Self::Output, ValidationErrors> {
        let mut errors = ValidationErrors::new();

        let page = optional(&mut errors, "page", present(self.page), page_rule);
        let limit = optional(&mut errors, "limit", present(self.limit), limit_rule);
        let search = optional(
            &mut errors,
            "search",
            present(self.search),
            max_len_rule("Search", SEARCH_MAX),
        );
        let category = optional(
            &mut errors,
            "category",
            present(self.category),
            max_len_rule("Category", CATEGORY_MAX),
        );
        let is_active = optional(&mut errors, "isActive", present(self.is_active), bool_rule);
        let sort_by = optional(&mut errors, "sortBy", present(self.sort_by), sort_by_rule);
        let sort_order = optional(&mut errors, "sortOrder", present(self.sort_order), sort_order_rule);

        let query = ProductQuery {
            filter: ProductFilter {
                search: search.flatten(),
                category: category.flatten(),
                is_active: is_active.flatten(),
            },
            sort_by: sort_by.flatten().unwrap_or_default(),
            sort_order: sort_order.flatten().unwrap_or_default(),
            page: page.flatten().unwrap_or(DEFAULT_PAGE),
            limit: limit.flatten().unwrap_or(DEFAULT_LIMIT),
        };

        errors.finish(query)
    }
}

// ============================================================================
// Path
// ============================================================================

/// `{id}` path segment parsed as a product UUID
#[derive(Debug, Clone, Copy)]
pub struct ProductIdPath(pub ProductId);

impl<S> FromRequestParts<S> for ProductIdPath
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| invalid_id())?;
        raw.parse::<ProductId>().map(Self).map_err(|_| invalid_id())
    }
}

fn invalid_id() -> AppError {
    AppError::validation(vec![FieldError::new("id", "Product id must be a valid UUID")])
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Serialize)]
pub struct ProductResponse {
    pub product: ProductView,
}

#[derive(Debug, Serialize)]
pub struct ProductMessageResponse {
    pub message: &'static str,
    pub product: ProductView,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    pub stats: ProductStats,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn fields(errors: ValidationErrors) -> Vec<String> {
        errors.into_vec().into_iter().map(|e| e.field).collect()
    }

    fn valid_create() -> CreateProductRequest {
        CreateProductRequest {
            name: Some("Laptop".into()),
            description: None,
            price: Some(Decimal::from_str("999.999").unwrap()),
            quantity: None,
            sku: Some("LAP-001".into()),
            category: Some("Electronics".into()),
            is_active: None,
        }
    }

    #[test]
    fn test_create_applies_defaults_and_rounds_price() {
        let product = valid_create().validate().unwrap();
        assert_eq!(product.price.to_string(), "1000.00");
        assert_eq!(product.quantity, 0);
        assert!(product.is_active);
        assert!(product.description.is_none());
    }

    #[test]
    fn test_create_allows_empty_description() {
        let product = CreateProductRequest {
            description: Some(String::new()),
            ..valid_create()
        }
        .validate()
        .unwrap();
        assert_eq!(product.description.as_deref(), Some(""));
    }

    #[test]
    fn test_create_collects_every_error() {
        let errors = CreateProductRequest {
            quantity: Some(-1),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            fields(errors),
            vec!["name", "price", "quantity", "sku", "category"]
        );
    }

    #[test]
    fn test_create_rejects_bad_values() {
        let errors = CreateProductRequest {
            price: Some(Decimal::ZERO),
            sku: Some("lower".into()),
            ..valid_create()
        }
        .validate()
        .unwrap_err()
        .into_vec();

        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].message, "Price must be positive");
        assert_eq!(errors[1].field, "sku");
    }

    #[test]
    fn test_update_requires_a_field() {
        let errors = UpdateProductRequest::default().validate().unwrap_err();
        assert_eq!(fields(errors), vec!["body"]);

        let changes = UpdateProductRequest {
            is_active: Some(false),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(changes.is_active, Some(false));
        assert!(changes.sku.is_none());
    }

    #[test]
    fn test_list_query_defaults() {
        let query = ListProductsQuery::default().validate().unwrap();
        assert_eq!(query, ProductQuery::default());
    }

    #[test]
    fn test_list_query_parsing() {
        let query = ListProductsQuery {
            page: Some("2".into()),
            limit: Some("25".into()),
            search: Some("lap".into()),
            is_active: Some("false".into()),
            sort_by: Some("price".into()),
            sort_order: Some("asc".into()),
            ..Default::default()
        }
        .validate()
        .unwrap();

        assert_eq!(query.page, 2);
        assert_eq!(query.limit, 25);
        assert_eq!(query.filter.search.as_deref(), Some("lap"));
        assert_eq!(query.filter.is_active, Some(false));
        assert_eq!(query.sort_by, SortField::Price);
        assert_eq!(query.sort_order, SortOrder::Asc);
    }

    #[test]
    fn test_list_query_rejections() {
        let errors = ListProductsQuery {
            page: Some("0".into()),
            limit: Some("101".into()),
            is_active: Some("yes".into()),
            sort_by: Some("password".into()),
            sort_order: Some("up".into()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();

        assert_eq!(
            fields(errors),
            vec!["page", "limit", "isActive", "sortBy", "sortOrder"]
        );
    }
}
