//! # Rate Engine
//!
//! Binds the four configuration tables together so callers quote with
//! `engine.best_quote(&cart, region, today)` instead of threading tables
//! through every call.
//!
//! ## Lifecycle
//! ```text
//! ┌──────────────┐     ┌─────────────────────┐     ┌──────────────────────┐
//! │ RateConfig / │────►│ RateEngine::new()   │────►│ &RateEngine shared   │
//! │ reference    │     │ validates all tables│     │ by every request     │
//! └──────────────┘     └─────────────────────┘     └──────────────────────┘
//!                            │ Err(TableError)
//!                            ▼
//!                      refuse to start
//! ```
//!
//! The engine is immutable after construction and holds no interior
//! mutability, so it is `Send + Sync` and needs no locking.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::error::{RateError, TableError};
use crate::method::{validate_methods, ShippingMethod};
use crate::money::Money;
use crate::quote::{self, QuoteOutcome, ShippingQuote};
use crate::tax::{self, TaxRateTable};
use crate::types::{CartLine, TaxRate};
use crate::weight::ProductWeightTable;
use crate::zone::{ShippingZone, ZoneTable};

/// All rate tables, validated and bound together.
#[derive(Debug, Clone)]
pub struct RateEngine {
    zones: ZoneTable,
    methods: Vec<ShippingMethod>,
    weights: ProductWeightTable,
    taxes: TaxRateTable,
}

impl RateEngine {
    /// Builds an engine. Zone, weight and tax tables are validated by their
    /// own constructors; the method table is validated here.
    pub fn new(
        zones: ZoneTable,
        methods: Vec<ShippingMethod>,
        weights: ProductWeightTable,
        taxes: TaxRateTable,
    ) -> Result<Self, TableError> {
        validate_methods(&methods)?;
        Ok(RateEngine {
            zones,
            methods,
            weights,
            taxes,
        })
    }

    // =========================================================================
    // Lookups
    // =========================================================================

    pub fn total_weight(&self, lines: &[CartLine]) -> Decimal {
        self.weights.total_weight(lines)
    }

    pub fn resolve_zone(&self, region_code: &str) -> &ShippingZone {
        self.zones.resolve(region_code)
    }

    /// Method by ID, if configured.
    pub fn method(&self, method_id: &str) -> Option<&ShippingMethod> {
        self.methods.iter().find(|m| m.id == method_id)
    }

    pub fn tax_rate(&self, region_code: &str) -> TaxRate {
        self.taxes.rate_for(region_code)
    }

    // =========================================================================
    // Quoting
    // =========================================================================

    pub fn quote(
        &self,
        lines: &[CartLine],
        region_code: &str,
        method: &ShippingMethod,
        today: NaiveDate,
    ) -> Result<ShippingQuote, RateError> {
        quote::quote(lines, region_code, method, &self.zones, &self.weights, today)
    }

    /// One outcome per configured method, in table order.
    pub fn quote_outcomes(&self, lines: &[CartLine], region_code: &str, today: NaiveDate) -> Vec<QuoteOutcome> {
        quote::quote_outcomes(lines, region_code, &self.methods, &self.zones, &self.weights, today)
    }

    pub fn all_quotes(&self, lines: &[CartLine], region_code: &str, today: NaiveDate) -> Vec<ShippingQuote> {
        quote::all_quotes(lines, region_code, &self.methods, &self.zones, &self.weights, today)
    }

    pub fn best_quote(&self, lines: &[CartLine], region_code: &str, today: NaiveDate) -> Option<ShippingQuote> {
        quote::best_quote(lines, region_code, &self.methods, &self.zones, &self.weights, today)
    }

    /// Tax on `subtotal + shipping` at the region's rate.
    pub fn apply_tax(&self, subtotal: Money, shipping: Money, region_code: &str) -> Money {
        tax::apply_tax(subtotal, shipping, region_code, &self.taxes)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn zones(&self) -> &ZoneTable {
        &self.zones
    }

    pub fn methods(&self) -> &[ShippingMethod] {
        &self.methods
    }

    pub fn weights(&self) -> &ProductWeightTable {
        &self.weights
    }

    pub fn taxes(&self) -> &TaxRateTable {
        &self.taxes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;

    fn engine() -> RateEngine {
        reference::engine().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 28).unwrap()
    }

    #[test]
    fn test_engine_is_send_and_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<RateEngine>();
    }

    #[test]
    fn test_best_quote_for_reference_cart() {
        let cart = vec![CartLine::new("NWS_002", 1, Money::from_cents(3000))];
        let all = engine().all_quotes(&cart, "NC", today());

        let totals: Vec<(&str, i64)> = all.iter().map(|q| (q.method.id.as_str(), q.total.cents())).collect();
        assert_eq!(
            totals,
            vec![("ground_saver", 579), ("standard", 759), ("expedited", 1259), ("overnight", 2679)]
        );
    }

    #[test]
    fn test_method_lookup() {
        let e = engine();
        assert_eq!(e.method("overnight").unwrap().max_weight, Some(Decimal::new(10, 0)));
        assert!(e.method("teleport").is_none());
    }

    #[test]
    fn test_apply_tax_uses_bound_table() {
        let e = engine();
        assert_eq!(e.apply_tax(Money::from_cents(10000), Money::from_cents(1000), "nc").cents(), 523);
        assert!(e.tax_rate("OR").is_zero());
    }

    #[test]
    fn test_rejects_invalid_method_table() {
        let err = RateEngine::new(
            reference::zone_table().unwrap(),
            vec![],
            reference::weight_table().unwrap(),
            reference::tax_table().unwrap(),
        )
        .unwrap_err();
        assert_eq!(err, TableError::NoMethods);
    }

    #[test]
    fn test_resolve_zone_and_weight() {
        let e = engine();
        assert_eq!(e.resolve_zone("wa").id, "zone6");
        let cart = vec![CartLine::new("NWS_001", 2, Money::from_cents(100))];
        assert_eq!(e.total_weight(&cart), Decimal::new(50, 1));
    }
}
