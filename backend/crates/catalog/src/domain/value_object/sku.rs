//! SKU Value Object
//!
//! Stock keeping unit: 3 to 50 characters from `A-Z`, `0-9`, `-` and `_`.
//! Unique across products; uniqueness is enforced by the store.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

pub const SKU_MIN_LENGTH: usize = 3;
pub const SKU_MAX_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SkuError {
    #[error("SKU is required")]
    Empty,

    #[error("SKU must be at least {SKU_MIN_LENGTH} characters long")]
    TooShort,

    #[error("SKU cannot exceed {SKU_MAX_LENGTH} characters")]
    TooLong,

    #[error("SKU can only contain uppercase letters, digits, hyphens and underscores")]
    InvalidCharacter,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Sku(String);

impl Sku {
    pub fn new(raw: impl AsRef<str>) -> Result<Self, SkuError> {
        let sku = raw.as_ref().trim();

        if sku.is_empty() {
            return Err(SkuError::Empty);
        }
        if !sku.chars().all(is_sku_char) {
            return Err(SkuError::InvalidCharacter);
        }
        // ASCII only from here, so byte length is character length
        if sku.len() < SKU_MIN_LENGTH {
            return Err(SkuError::TooShort);
        }
        if sku.len() > SKU_MAX_LENGTH {
            return Err(SkuError::TooLong);
        }

        Ok(Self(sku.to_string()))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(sku: impl Into<String>) -> Self {
        Self(sku.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_sku_char(c: char) -> bool {
    c.is_ascii_uppercase() || c.is_ascii_digit() || c == '-' || c == '_'
}

impl fmt::Display for Sku {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
