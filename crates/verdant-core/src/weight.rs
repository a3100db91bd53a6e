//! # Product Weights
//!
//! Shipping weight per product, in pounds. Products missing from the table
//! ship at the configured default weight instead of failing checkout.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::TableError;
use crate::types::CartLine;

/// Read-only `product_id → weight (lb)` table with a default weight.
#[derive(Debug, Clone)]
pub struct ProductWeightTable {
    weights: HashMap<String, Decimal>,
    default_weight: Decimal,
}

impl ProductWeightTable {
    /// Builds the table. Every weight, including the default, must be > 0.
    pub fn new<I, K>(weights: I, default_weight: Decimal) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (K, Decimal)>,
        K: Into<String>,
    {
        if default_weight <= Decimal::ZERO {
            return Err(TableError::InvalidWeight {
                product_id: "(default)".to_string(),
                weight: default_weight,
            });
        }

        let mut table = HashMap::new();
        for (product_id, weight) in weights {
            let product_id = product_id.into();
            if weight <= Decimal::ZERO {
                return Err(TableError::InvalidWeight { product_id, weight });
            }
            table.insert(product_id, weight);
        }

        Ok(ProductWeightTable {
            weights: table,
            default_weight,
        })
    }

    /// Weight of one unit, falling back to the default for unknown IDs.
    pub fn weight_of(&self, product_id: &str) -> Decimal {
        self.weights
            .get(product_id)
            .copied()
            .unwrap_or(self.default_weight)
    }

    /// Whether the product has an explicit weight.
    pub fn is_known(&self, product_id: &str) -> bool {
        self.weights.contains_key(product_id)
    }

    /// The fallback weight for unknown products.
    pub fn default_weight(&self) -> Decimal {
        self.default_weight
    }

    /// Number of products with explicit weights.
    pub fn len(&self) -> usize {
        self.weights.len()
    }

    /// Whether no product has an explicit weight.
    pub fn is_empty(&self) -> bool {
        self.weights.is_empty()
    }

    /// Total shipment weight: Σ unit weight × quantity. Zero for an empty cart.
    ///
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use verdant_core::{CartLine, Money, ProductWeightTable};
    ///
    /// let table = ProductWeightTable::new([("NWS_002", Decimal::new(30, 1))], Decimal::new(25, 1)).unwrap();
    /// let cart = vec![
    ///     CartLine::new("NWS_002", 2, Money::from_cents(1000)),
    ///     CartLine::new("UNKNOWN", 1, Money::from_cents(1000)),
    /// ];
    /// assert_eq!(table.total_weight(&cart), Decimal::new(85, 1)); // 6.0 + 2.5
    /// ```
    pub fn total_weight(&self, lines: &[CartLine]) -> Decimal {
        lines
            .iter()
            .map(|line| self.weight_of(&line.product_id) * Decimal::from(line.quantity))
            .sum()
    }

    /// Product IDs in the cart that fall back to the default weight.
    pub fn unknown_products<'a>(&self, lines: &'a [CartLine]) -> Vec<&'a str> {
        lines
            .iter()
            .filter(|line| !self.is_known(&line.product_id))
            .map(|line| line.product_id.as_str())
            .collect()
    }
}
