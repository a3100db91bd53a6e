//! # Shipping Quotes
//!
//! Prices one cart against one method, or against every configured method
//! and ranks the results.
//!
//! ## Quote Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  quote(cart, region, method)                                            │
//! │                                                                         │
//! │  1. subtotal ≥ free threshold? ──yes──► free quote (weight not checked) │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  2. weight > max_weight? ──yes──► Err(WeightExceeded)                   │
//! │        │ no                                                             │
//! │        ▼                                                                │
//! │  3. zone = resolve(region)                                              │
//! │  4. base + weight×mult, zone = (base + weight) × (multiplier - 1)       │
//! │  5. total = round2(base + weight + zone), from exact intermediates      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! `all_quotes` evaluates every method into a [`QuoteOutcome`], keeps the
//! quoted ones and sorts free-first then cheapest. The sort is stable, so
//! equal quotes keep method-table order.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::delivery::DeliveryEstimate;
use crate::error::RateError;
use crate::method::ShippingMethod;
use crate::money::Money;
use crate::types::{subtotal, CartLine};
use crate::weight::ProductWeightTable;
use crate::zone::ZoneTable;

/// A priced shipping option for one cart.
///
/// ## Invariant
/// `total = is_free ? 0 : round2(base + weight + zone)` where the sum uses
/// unrounded components. The component fields are rounded for display only,
/// so they may not add up to `total` to the cent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ShippingQuote {
    pub method: ShippingMethod,

    #[serde(rename = "base_cost_cents")]
    pub base_cost: Money,

    #[serde(rename = "weight_cost_cents")]
    pub weight_cost: Money,

    /// Negative for discounted (multiplier < 1) zones.
    #[serde(rename = "zone_cost_cents")]
    pub zone_cost: Money,

    #[serde(rename = "total_cents")]
    pub total: Money,

    pub is_free: bool,

    /// Zone used for pricing; `None` on free quotes, which skip zoning.
    pub zone_id: Option<String>,

    pub delivery: DeliveryEstimate,
}

impl ShippingQuote {
    /// The delivery label, e.g. `"5-8 business days"`.
    pub fn estimated_delivery_label(&self) -> &str {
        &self.delivery.label
    }

    /// Cost as shown on the checkout page: `"FREE"` or `"$7.59"`.
    pub fn display_cost(&self) -> String {
        if self.is_free {
            "FREE".to_string()
        } else {
            self.total.to_string()
        }
    }
}

/// Result of trying one method against a cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuoteOutcome {
    Quoted(ShippingQuote),
    Excluded(RateError),
}

impl QuoteOutcome {
    /// The quote, if the method could ship the cart.
    pub fn into_quote(self) -> Option<ShippingQuote> {
        match self {
            QuoteOutcome::Quoted(quote) => Some(quote),
            QuoteOutcome::Excluded(_) => None,
        }
    }
}

/// Quotes one method for a cart shipped to `region_code` on `today`.
///
/// Free-shipping eligibility is checked before the weight limit, so a
/// qualifying order is never rejected as too heavy.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use verdant_core::{quote::quote, reference, CartLine, Money};
///
/// let zones = reference::zone_table().unwrap();
/// let weights = reference::weight_table().unwrap();
/// let standard = &reference::methods()[0];
/// let today = NaiveDate::from_ymd_opt(2024, 10, 28).unwrap();
///
/// // 3 lb to NC (×0.8), $30 subtotal: round2(4.99 + 4.50 - 1.898) = 7.59
/// let cart = vec![CartLine::new("NWS_002", 1, Money::from_cents(3000))];
/// let q = quote(&cart, "NC", standard, &zones, &weights, today).unwrap();
/// assert_eq!(q.total.cents(), 759);
/// assert!(!q.is_free);
/// ```
pub fn quote(
    lines: &[CartLine],
    region_code: &str,
    method: &ShippingMethod,
    zones: &ZoneTable,
    weights: &ProductWeightTable,
    today: NaiveDate,
) -> Result<ShippingQuote, RateError> {
    let delivery = DeliveryEstimate::for_method(method, today);

    if method.qualifies_for_free_shipping(subtotal(lines)) {
        return Ok(ShippingQuote {
            method: method.clone(),
            base_cost: Money::zero(),
            weight_cost: Money::zero(),
            zone_cost: Money::zero(),
            total: Money::zero(),
            is_free: true,
            zone_id: None,
            delivery,
        });
    }

    let weight = weights.total_weight(lines);
    if let Some(max_weight) = method.max_weight.filter(|_| !method.accepts_weight(weight)) {
        return Err(RateError::WeightExceeded {
            method_id: method.id.clone(),
            method_name: method.name.clone(),
            max_weight,
            weight,
        });
    }

    let zone = zones.resolve(region_code);

    let base_cost = method.base_cost.to_decimal();
    let weight_cost = weight * method.weight_multiplier;
    let before_zone = base_cost + weight_cost;
    let zone_cost = before_zone * (zone.multiplier - Decimal::ONE);

    Ok(ShippingQuote {
        method: method.clone(),
        base_cost: Money::from_decimal(base_cost),
        weight_cost: Money::from_decimal(weight_cost),
        zone_cost: Money::from_decimal(zone_cost),
        total: Money::from_decimal(before_zone + zone_cost),
        is_free: false,
        zone_id: Some(zone.id.clone()),
        delivery,
    })
}

/// Evaluates every method, in table order, without dropping failures.
pub fn quote_outcomes(
    lines: &[CartLine],
    region_code: &str,
    methods: &[ShippingMethod],
    zones: &ZoneTable,
    weights: &ProductWeightTable,
    today: NaiveDate,
) -> Vec<QuoteOutcome> {
    methods
        .iter()
        .map(
            |method| match quote(lines, region_code, method, zones, weights, today) {
                Ok(q) => QuoteOutcome::Quoted(q),
                Err(reason) => QuoteOutcome::Excluded(reason),
            },
        )
        .collect()
}

/// All eligible quotes, free first, then by ascending total.
///
/// Methods that cannot ship the cart are left out silently.
pub fn all_quotes(
    lines: &[CartLine],
    region_code: &str,
    methods: &[ShippingMethod],
    zones: &ZoneTable,
    weights: &ProductWeightTable,
    today: NaiveDate,
) -> Vec<ShippingQuote> {
    let quotes = quote_outcomes(lines, region_code, methods, zones, weights, today)
        .into_iter()
        .filter_map(QuoteOutcome::into_quote)
        .collect();
    rank_quotes(quotes)
}

/// The cheapest option (free options first), or `None` if nothing can ship.
pub fn best_quote(
    lines: &[CartLine],
    region_code: &str,
    methods: &[ShippingMethod],
    zones: &ZoneTable,
    weights: &ProductWeightTable,
    today: NaiveDate,
) -> Option<ShippingQuote> {
    all_quotes(lines, region_code, methods, zones, weights, today)
        .into_iter()
        .next()
}

/// Stable sort by (is_free desc, total asc).
pub fn rank_quotes(mut quotes: Vec<ShippingQuote>) -> Vec<ShippingQuote> {
    quotes.sort_by(|a, b| b.is_free.cmp(&a.is_free).then_with(|| a.total.cmp(&b.total)));
    quotes
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference;
    use crate::zone::ShippingZone;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 10, 28).unwrap()
    }

    fn zones() -> ZoneTable {
        reference::zone_table().unwrap()
    }

    fn weights() -> ProductWeightTable {
        reference::weight_table().unwrap()
    }

    fn method(id: &str) -> ShippingMethod {
        reference::methods()
            .into_iter()
            .find(|m| m.id == id)
            .unwrap()
    }

    /// NWS_002 weighs 3.0 lb.
    fn three_pound_cart(subtotal_cents: i64) -> Vec<CartLine> {
        vec![CartLine::new("NWS_002", 1, Money::from_cents(subtotal_cents))]
    }

    /// NWS_005 weighs 4.5 lb; four of them are 18 lb.
    fn heavy_cart(unit_cents: i64) -> Vec<CartLine> {
        vec![CartLine::new("NWS_005", 4, Money::from_cents(unit_cents))]
    }

    #[test]
    fn test_standard_to_nc_example() {
        let q = quote(&three_pound_cart(3000), "NC", &method("standard"), &zones(), &weights(), today()).unwrap();
        assert!(!q.is_free);
        assert_eq!(q.base_cost.cents(), 499);
        assert_eq!(q.weight_cost.cents(), 450);
        assert_eq!(q.zone_cost.cents(), -190);
        assert_eq!(q.total.cents(), 759);
        assert_eq!(q.zone_id.as_deref(), Some("zone1"));
        assert_eq!(q.display_cost(), "$7.59");
    }

    #[test]
    fn test_free_shipping_at_threshold() {
        let q = quote(&three_pound_cart(5500), "NC", &method("standard"), &zones(), &weights(), today()).unwrap();
        assert!(q.is_free);
        assert_eq!(q.total, Money::zero());
        assert_eq!(q.base_cost, Money::zero());
        assert_eq!(q.zone_id, None);
        assert_eq!(q.display_cost(), "FREE");
        assert_eq!(q.estimated_delivery_label(), "5-8 business days");
    }

    #[test]
    fn test_free_shipping_skips_weight_limit() {
        let capped = ShippingMethod {
            max_weight: Some(d("1")),
            ..method("standard")
        };
        let q = quote(&heavy_cart(2000), "CA", &capped, &zones(), &weights(), today()).unwrap();
        assert!(q.is_free);

        let err = quote(&heavy_cart(500), "CA", &capped, &zones(), &weights(), today()).unwrap_err();
        assert!(matches!(err, RateError::WeightExceeded { .. }));
    }

    #[test]
    fn test_overweight_cart_drops_overnight() {
        let methods = reference::methods();
        let quotes = all_quotes(&heavy_cart(500), "NC", &methods, &zones(), &weights(), today());

        assert_eq!(quotes.len(), methods.len() - 1);
        assert!(quotes.iter().all(|q| q.method.id != "overnight"));

        let best = best_quote(&heavy_cart(500), "NC", &methods, &zones(), &weights(), today()).unwrap();
        assert_eq!(best.method.id, quotes[0].method.id);

        let outcomes = quote_outcomes(&heavy_cart(500), "NC", &methods, &zones(), &weights(), today());
        let excluded: Vec<_> = outcomes
            .iter()
            .filter_map(|o| match o {
                QuoteOutcome::Excluded(e) => Some(e.method_id()),
                QuoteOutcome::Quoted(_) => None,
            })
            .collect();
        assert_eq!(excluded, vec!["overnight"]);
    }

    #[test]
    fn test_no_eligible_method_yields_none() {
        let methods = vec![ShippingMethod {
            max_weight: Some(d("5")),
            free_above_threshold: None,
            ..method("overnight")
        }];
        assert!(best_quote(&heavy_cart(500), "NC", &methods, &zones(), &weights(), today()).is_none());
        assert!(all_quotes(&heavy_cart(500), "NC", &methods, &zones(), &weights(), today()).is_empty());
    }

    #[test]
    fn test_huge_quantities_quote_without_overflow() {
        let lines = vec![CartLine::new("NWS_002", u32::MAX, Money::from_cents(3_000_000_000))];
        let standard = quote(&lines, "NC", &method("standard"), &zones(), &weights(), today()).unwrap();
        assert!(standard.is_free);
        assert!(standard.total.is_zero());

        let outcomes = quote_outcomes(&lines, "NC", &reference::methods(), &zones(), &weights(), today());
        assert_eq!(outcomes.len(), 4);
    }

    #[test]
    fn test_west_coast_costs_more_than_local() {
        let m = method("expedited");
        let cart = three_pound_cart(3000);
        let ca = quote(&cart, "CA", &m, &zones(), &weights(), today()).unwrap();
        let nc = quote(&cart, "NC", &m, &zones(), &weights(), today()).unwrap();
        assert!(ca.total > nc.total);
    }

    #[test]
    fn test_zone_monotonicity_across_reference_zones() {
        let m = method("ground_saver");
        let cart = three_pound_cart(3000);
        let table = zones();
        let mut sorted: Vec<&ShippingZone> = table.zones().iter().collect();
        sorted.sort_by(|a, b| a.multiplier.cmp(&b.multiplier));

        let totals: Vec<Money> = sorted
            .iter()
            .map(|z| {
                quote(&cart, &z.regions[0], &m, &table, &weights(), today())
                    .unwrap()
                    .total
            })
            .collect();
        assert!(totals.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_unknown_region_uses_catch_all() {
        let q = quote(&three_pound_cart(3000), "ZZ", &method("standard"), &zones(), &weights(), today()).unwrap();
        assert_eq!(q.zone_id.as_deref(), Some("zone7"));

        let ak = quote(&three_pound_cart(3000), "AK", &method("standard"), &zones(), &weights(), today()).unwrap();
        assert_eq!(q.total, ak.total);
    }

    #[test]
    fn test_free_shipping_is_monotonic_in_subtotal() {
        let m = method("standard");
        let mut was_free = false;
        for qty in 1..=10u32 {
            let cart = vec![CartLine::new("NWS_009", qty, Money::from_cents(1000))];
            let q = quote(&cart, "GA", &m, &zones(), &weights(), today()).unwrap();
            if was_free {
                assert!(q.is_free, "qty {qty} lost free shipping");
            }
            was_free = q.is_free;
            assert_eq!(q.is_free, qty >= 5);
            assert_eq!(q.total.is_positive(), !q.is_free);
        }
    }

    #[test]
    fn test_repeated_quotes_are_identical() {
        let cart = vec![
            CartLine::new("NWS_003", 3, Money::from_cents(1333)),
            CartLine::new("UNKNOWN", 1, Money::from_cents(1)),
        ];
        let m = method("expedited");
        let first = quote(&cart, "TX", &m, &zones(), &weights(), today()).unwrap();
        for _ in 0..10 {
            assert_eq!(quote(&cart, "TX", &m, &zones(), &weights(), today()).unwrap(), first);
        }
    }

    #[test]
    fn test_free_quotes_sort_first() {
        let methods = reference::methods();
        let quotes = all_quotes(&three_pound_cart(6000), "NC", &methods, &zones(), &weights(), today());
        assert_eq!(quotes[0].method.id, "standard");
        assert!(quotes[0].is_free);
        assert!(quotes[1..].windows(2).all(|w| w[0].total <= w[1].total));
    }

    #[test]
    fn test_ranking_is_stable_for_ties() {
        let twin = |id: &str| ShippingMethod {
            id: id.to_string(),
            ..method("expedited")
        };
        let methods = vec![twin("b_first"), twin("a_second"), method("ground_saver"), twin("c_third")];
        let quotes = all_quotes(&three_pound_cart(3000), "NC", &methods, &zones(), &weights(), today());

        let ids: Vec<&str> = quotes.iter().map(|q| q.method.id.as_str()).collect();
        assert_eq!(ids, vec!["ground_saver", "b_first", "a_second", "c_third"]);
    }

    #[test]
    fn test_quote_json_uses_cents_fields() {
        let q = quote(&three_pound_cart(3000), "NC", &method("standard"), &zones(), &weights(), today()).unwrap();
        let json = serde_json::to_value(&q).unwrap();
        assert_eq!(json["total_cents"], 759);
        assert_eq!(json["is_free"], false);
        assert_eq!(json["delivery"]["label"], "5-8 business days");
    }
}
