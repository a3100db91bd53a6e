//! # Error Types
//!
//! Domain-specific error types for verdant-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  verdant-core errors (this file)                                       │
//! │  ├── RateError        - A method cannot quote this cart                │
//! │  ├── TableError       - Configuration tables violate an invariant      │
//! │  ├── ValidationError  - Input validation failures                      │
//! │  └── CoreError        - Wraps all of the above                         │
//! │                                                                         │
//! │  verdant-checkout errors (separate crate)                              │
//! │  └── CheckoutError    - Config loading, no shipping available          │
//! │                                                                         │
//! │  Flow: RateError → dropped from quote list (fail open)                 │
//! │        TableError → fails engine construction at start-up              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use rust_decimal::Decimal;
use thiserror::Error;

// =============================================================================
// Rate Error
// =============================================================================

/// A shipping method cannot produce a quote for the given cart.
///
/// These are recoverable: the quote list simply omits the method.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RateError {
    /// Cart weight is above the method's maximum.
    ///
    /// ## When This Occurs
    /// ```text
    /// Cart: 12 lb, Overnight (max 10 lb)
    ///      │
    ///      ▼
    /// WeightExceeded { method_id: "overnight", max_weight: 10, weight: 12 }
    ///      │
    ///      ▼
    /// Overnight is not offered, next cheapest method wins
    /// ```
    #[error("Order too heavy for {method_name} ({weight} lb). Maximum weight: {max_weight} lb")]
    WeightExceeded {
        method_id: String,
        method_name: String,
        max_weight: Decimal,
        weight: Decimal,
    },
}

impl RateError {
    /// Returns the ID of the method that could not quote.
    pub fn method_id(&self) -> &str {
        match self {
            RateError::WeightExceeded { method_id, .. } => method_id,
        }
    }
}

// =============================================================================
// Table Error
// =============================================================================

/// Configuration table invariant violations.
///
/// Detected once when the [`RateEngine`](crate::RateEngine) is built, never
/// during a quote.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// At least one zone is required (the last one is the catch-all).
    #[error("At least one shipping zone must be configured")]
    NoZones,

    /// At least one shipping method is required.
    #[error("At least one shipping method must be configured")]
    NoMethods,

    /// Zone multiplier must be strictly positive.
    #[error("Zone {zone_id} has invalid multiplier {multiplier} (must be > 0)")]
    InvalidMultiplier { zone_id: String, multiplier: Decimal },

    /// A region code appears in two zones.
    ///
    /// First-match-wins would make the result depend on table order, so this
    /// is rejected outright.
    #[error("Region {region} is a member of both {first_zone} and {second_zone}")]
    OverlappingZones {
        region: String,
        first_zone: String,
        second_zone: String,
    },

    /// The catch-all (last) zone must be the most expensive tier.
    #[error("Catch-all zone {catch_all} is cheaper than zone {zone_id}")]
    CatchAllNotMostExpensive { catch_all: String, zone_id: String },

    /// Two methods share an ID.
    #[error("Duplicate shipping method: {method_id}")]
    DuplicateMethod { method_id: String },

    /// Delivery window is inverted.
    #[error("Method {method_id} has min_days {min_days} greater than max_days {max_days}")]
    InvalidDeliveryWindow {
        method_id: String,
        min_days: u32,
        max_days: u32,
    },

    /// A cost or threshold is negative.
    #[error("Method {method_id} has negative {field}")]
    NegativeCost { method_id: String, field: String },

    /// Maximum weight must be strictly positive when set.
    #[error("Method {method_id} has invalid max weight {max_weight}")]
    InvalidMaxWeight {
        method_id: String,
        max_weight: Decimal,
    },

    /// Product weights (and the default weight) must be strictly positive.
    #[error("Product {product_id} has invalid weight {weight} (must be > 0)")]
    InvalidWeight { product_id: String, weight: Decimal },

    /// Tax rates must be fractions in `[0, 1)`.
    #[error("Region {region} has invalid tax rate {rate} (must be >= 0 and < 1)")]
    InvalidTaxRate { region: String, rate: Decimal },
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Used for early validation of caller-supplied carts before quoting.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., bad characters in a product ID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Core Error
// =============================================================================

/// Any error produced by verdant-core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    #[error(transparent)]
    Rate(#[from] RateError),

    #[error("Invalid rate table: {0}")]
    Table(#[from] TableError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Unit Tests
// =============================================================================
