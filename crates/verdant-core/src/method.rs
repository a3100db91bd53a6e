//! # Shipping Methods
//!
//! Carrier service levels offered at checkout, plus the free-shipping
//! progress the cart page shows ("Add $12.50 more for FREE shipping").

use std::collections::HashSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::TableError;
use crate::money::{round2, Money};

/// A shipping service level.
///
/// ## Cost Model
/// ```text
/// base_cost + weight × weight_multiplier   (before zone)
///      │
///      ▼  × zone multiplier
/// total, rounded once to the cent
///
/// free_above_threshold: subtotal ≥ threshold → total 0
/// max_weight:           weight > max → method not offered
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingMethod {
    pub id: String,
    pub name: String,

    #[serde(default)]
    pub description: String,

    pub min_days: u32,
    pub max_days: u32,

    #[serde(rename = "base_cost_cents")]
    pub base_cost: Money,

    /// Cost per pound.
    #[ts(type = "string")]
    pub weight_multiplier: Decimal,

    /// Orders at or above this subtotal ship free.
    #[serde(default, rename = "free_above_cents")]
    pub free_above_threshold: Option<Money>,

    /// Heaviest cart (lb) this method accepts.
    #[serde(default)]
    #[ts(type = "string | null")]
    pub max_weight: Option<Decimal>,

    #[serde(default)]
    pub business_days_only: bool,

    #[serde(default)]
    pub has_tracking: bool,

    #[serde(default)]
    pub has_insurance: bool,
}

impl ShippingMethod {
    /// Whether this subtotal earns free shipping on this method.
    pub fn qualifies_for_free_shipping(&self, subtotal: Money) -> bool {
        self.free_above_threshold
            .is_some_and(|threshold| subtotal >= threshold)
    }

    /// Whether a cart of this weight may use this method.
    pub fn accepts_weight(&self, weight: Decimal) -> bool {
        self.max_weight.map_or(true, |max| weight <= max)
    }

    /// Progress toward this method's free-shipping threshold, if it has one.
    ///
    /// ```rust
    /// use verdant_core::{reference, Money};
    ///
    /// let standard = &reference::methods()[0];
    /// let progress = standard.free_shipping_progress(Money::from_cents(3750)).unwrap();
    /// assert_eq!(progress.remaining.cents(), 1250);
    /// assert!(!progress.eligible);
    /// ```
    pub fn free_shipping_progress(&self, subtotal: Money) -> Option<FreeShippingProgress> {
        self.free_above_threshold
            .map(|threshold| FreeShippingProgress::new(subtotal, threshold))
    }

    /// Checks a single method's fields.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.min_days > self.max_days {
            return Err(TableError::InvalidDeliveryWindow {
                method_id: self.id.clone(),
                min_days: self.min_days,
                max_days: self.max_days,
            });
        }

        if self.base_cost.is_negative() {
            return Err(self.negative("base_cost"));
        }

        if self.weight_multiplier < Decimal::ZERO {
            return Err(self.negative("weight_multiplier"));
        }

        if self.free_above_threshold.is_some_and(|t| t.is_negative()) {
            return Err(self.negative("free_above_threshold"));
        }

        if let Some(max_weight) = self.max_weight {
            if max_weight <= Decimal::ZERO {
                return Err(TableError::InvalidMaxWeight {
                    method_id: self.id.clone(),
                    max_weight,
                });
            }
        }

        Ok(())
    }

    fn negative(&self, field: &str) -> TableError {
        TableError::NegativeCost {
            method_id: self.id.clone(),
            field: field.to_string(),
        }
    }
}

/// Validates a method table: non-empty, unique IDs, each method valid.
pub fn validate_methods(methods: &[ShippingMethod]) -> Result<(), TableError> {
    if methods.is_empty() {
        return Err(TableError::NoMethods);
    }

    let mut seen = HashSet::new();
    for method in methods {
        if !seen.insert(method.id.as_str()) {
            return Err(TableError::DuplicateMethod {
                method_id: method.id.clone(),
            });
        }
        method.validate()?;
    }

    Ok(())
}

// =============================================================================
// Free Shipping Progress
// =============================================================================

/// How close a subtotal is to free shipping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FreeShippingProgress {
    #[serde(rename = "threshold_cents")]
    pub threshold: Money,

    /// `max(threshold - subtotal, 0)`.
    #[serde(rename = "remaining_cents")]
    pub remaining: Money,

    /// `min(subtotal / threshold × 100, 100)`, 2 places.
    #[ts(type = "string")]
    pub percent: Decimal,

    pub eligible: bool,
}

impl FreeShippingProgress {
    /// Computes progress of `subtotal` toward `threshold`.
    pub fn new(subtotal: Money, threshold: Money) -> Self {
        let eligible = subtotal >= threshold;
        let remaining = if eligible {
            Money::zero()
        } else {
            threshold - subtotal
        };

        // A zero threshold means everything already qualifies.
        let percent = if threshold.is_positive() {
            let raw = subtotal.to_decimal() / threshold.to_decimal() * Decimal::ONE_HUNDRED;
            round2(raw.min(Decimal::ONE_HUNDRED).max(Decimal::ZERO))
        } else {
            Decimal::ONE_HUNDRED
        };

        FreeShippingProgress {
            threshold,
            remaining,
            percent,
            eligible,
        }
    }
}
