//! # Domain Types
//!
//! Small value types shared by every rate-engine module.
//!
//! ## Type Overview
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    CartLine     │   │    TaxRate      │   │  Region code    │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  product_id     │   │  fraction       │   │  " nc " → "NC"  │       │
//! │  │  quantity > 0   │   │  0.0475 = 4.75% │   │  trimmed,       │       │
//! │  │  unit_price     │   │  0 ≤ rate < 1   │   │  upper-cased    │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Region Codes
// =============================================================================

/// Normalizes a region code for table lookups: trimmed and upper-cased.
///
/// ```rust
/// use verdant_core::types::normalize_region;
///
/// assert_eq!(normalize_region("  nc "), "NC");
/// ```
pub fn normalize_region(code: &str) -> String {
    code.trim().to_uppercase()
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate as an exact fraction (`0.0475` = 4.75%).
///
/// ## Why Not Basis Points?
/// Local rates such as 4.875% do not fit whole basis points, so the rate is
/// stored as a `Decimal`. `from_bps` stays available for round numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(#[ts(type = "string")] Decimal);

impl TaxRate {
    /// Creates a tax rate from basis points (825 = 8.25%).
    #[inline]
    pub fn from_bps(bps: u32) -> Self {
        TaxRate(Decimal::new(bps as i64, 4))
    }

    /// Creates a tax rate from a fraction, rejecting values outside `[0, 1)`.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use verdant_core::types::TaxRate;
    ///
    /// assert!(TaxRate::from_fraction(Decimal::new(475, 4)).is_ok());
    /// assert!(TaxRate::from_fraction(Decimal::ONE).is_err());
    /// ```
    pub fn from_fraction(fraction: Decimal) -> Result<Self, ValidationError> {
        if fraction < Decimal::ZERO {
            return Err(ValidationError::InvalidFormat {
                field: "tax_rate".to_string(),
                reason: "must not be negative".to_string(),
            });
        }

        if fraction >= Decimal::ONE {
            return Err(ValidationError::InvalidFormat {
                field: "tax_rate".to_string(),
                reason: "must be a fraction below 1".to_string(),
            });
        }

        Ok(TaxRate(fraction))
    }

    /// Returns the rate as a fraction.
    #[inline]
    pub fn fraction(&self) -> Decimal {
        self.0
    }

    /// Zero tax rate.
    #[inline]
    pub fn zero() -> Self {
        TaxRate(Decimal::ZERO)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::zero()
    }
}

// =============================================================================
// Cart Line
// =============================================================================

/// One line of a checkout request.
///
/// Created per request by the caller and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CartLine {
    /// Storefront product identifier (e.g. `NWS_001`).
    pub product_id: String,

    /// Units ordered (must be > 0).
    pub quantity: u32,

    /// Price of one unit.
    #[serde(rename = "unit_price_cents")]
    pub unit_price: Money,
}

impl CartLine {
    /// Creates a cart line.
    pub fn new(product_id: impl Into<String>, quantity: u32, unit_price: Money) -> Self {
        CartLine {
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

/// Order subtotal before shipping and tax.
///
/// ```rust
/// use verdant_core::{types::subtotal, CartLine, Money};
///
/// let cart = vec![
///     CartLine::new("NWS_001", 2, Money::from_cents(1999)),
///     CartLine::new("NWS_003", 1, Money::from_cents(1499)),
/// ];
/// assert_eq!(subtotal(&cart).cents(), 5497);
/// ```
pub fn subtotal(lines: &[CartLine]) -> Money {
    lines.iter().map(CartLine::line_total).sum()
}

// =============================================================================
// Unit Tests
// =============================================================================
