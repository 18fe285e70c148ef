//! Price Value Object
//!
//! Strictly positive amount with exactly two decimal places.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Decimal places kept for prices and price sums
pub const PRICE_SCALE: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PriceError {
    #[error("Price must be positive")]
    NotPositive,

    #[error("Price is too large")]
    TooLarge,
}

/// 99999999.99, the largest `NUMERIC(10, 2)`
const PRICE_MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Round half away from zero to two places, then require `> 0`.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        let rounded = to_money(amount);
        if rounded <= Decimal::ZERO {
            return Err(PriceError::NotPositive);
        }
        if rounded > PRICE_MAX {
            return Err(PriceError::TooLarge);
        }
        Ok(Self(rounded))
    }

    /// Create from database value (assumed already validated)
    pub fn from_db(amount: Decimal) -> Self {
        Self(to_money(amount))
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }
}

/// Two-place representation, so `12.5` renders as `"12.50"`.
pub fn to_money(amount: Decimal) -> Decimal {
    let mut value = amount.round_dp_with_strategy(PRICE_SCALE, RoundingStrategy::MidpointAwayFromZero);
    value.rescale(PRICE_SCALE);
    value
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}
