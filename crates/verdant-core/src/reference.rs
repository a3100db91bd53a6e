//! # Reference Configuration
//!
//! The storefront's production rate tables. These are the defaults the
//! checkout service starts from before any config file or environment
//! override is applied.
//!
//! ## Zone Map
//! ```text
//! ┌──────────┬──────────────────┬────────┬──────────────────────────────────┐
//! │ Zone     │ Name             │ Mult   │ Regions                          │
//! ├──────────┼──────────────────┼────────┼──────────────────────────────────┤
//! │ zone1    │ Local            │ ×0.8   │ NC SC VA                         │
//! │ zone2    │ Regional         │ ×1.0   │ GA FL TN KY AL MS WV             │
//! │ zone3    │ Extended East    │ ×1.2   │ NY NJ PA DE MD CT RI MA VT NH ME │
//! │ zone4    │ Central          │ ×1.4   │ OH IN IL MI WI MN IA MO ...      │
//! │ zone5    │ Mountain West    │ ×1.6   │ CO WY MT ID UT NV AZ NM          │
//! │ zone6    │ West Coast       │ ×1.8   │ CA OR WA                         │
//! │ zone7    │ Alaska & Hawaii  │ ×2.5   │ AK HI (+ every unknown region)   │
//! └──────────┴──────────────────┴────────┴──────────────────────────────────┘
//! ```

use rust_decimal::Decimal;

use crate::engine::RateEngine;
use crate::error::TableError;
use crate::method::ShippingMethod;
use crate::money::Money;
use crate::tax::TaxRateTable;
use crate::weight::ProductWeightTable;
use crate::zone::{ShippingZone, ZoneTable};

/// Reference zones, ordered cheapest to most expensive. The last is the
/// catch-all.
pub fn zones() -> Vec<ShippingZone> {
    vec![
        ShippingZone::new("zone1", "Local", ["NC", "SC", "VA"], Decimal::new(8, 1)),
        ShippingZone::new(
            "zone2",
            "Regional",
            ["GA", "FL", "TN", "KY", "AL", "MS", "WV"],
            Decimal::new(10, 1),
        ),
        ShippingZone::new(
            "zone3",
            "Extended East",
            ["NY", "NJ", "PA", "DE", "MD", "CT", "RI", "MA", "VT", "NH", "ME"],
            Decimal::new(12, 1),
        ),
        ShippingZone::new(
            "zone4",
            "Central",
            [
                "OH", "IN", "IL", "MI", "WI", "MN", "IA", "MO", "AR", "LA", "TX", "OK", "KS", "NE",
                "SD", "ND",
            ],
            Decimal::new(14, 1),
        ),
        ShippingZone::new(
            "zone5",
            "Mountain West",
            ["CO", "WY", "MT", "ID", "UT", "NV", "AZ", "NM"],
            Decimal::new(16, 1),
        ),
        ShippingZone::new("zone6", "West Coast", ["CA", "OR", "WA"], Decimal::new(18, 1)),
        ShippingZone::new("zone7", "Alaska & Hawaii", ["AK", "HI"], Decimal::new(25, 1)),
    ]
}

/// Reference methods in display order: standard, expedited, overnight,
/// ground saver.
pub fn methods() -> Vec<ShippingMethod> {
    vec![
        ShippingMethod {
            id: "standard".to_string(),
            name: "Standard Shipping".to_string(),
            description: "Reliable delivery with tracking (FREE over $50)".to_string(),
            min_days: 5,
            max_days: 8,
            base_cost: Money::from_cents(499),
            weight_multiplier: Decimal::new(150, 2),
            free_above_threshold: Some(Money::from_cents(5000)),
            max_weight: None,
            business_days_only: true,
            has_tracking: true,
            has_insurance: false,
        },
        ShippingMethod {
            id: "expedited".to_string(),
            name: "Expedited Shipping".to_string(),
            description: "Faster delivery with priority handling".to_string(),
            min_days: 2,
            max_days: 4,
            base_cost: Money::from_cents(899),
            weight_multiplier: Decimal::new(225, 2),
            free_above_threshold: None,
            max_weight: None,
            business_days_only: true,
            has_tracking: true,
            has_insurance: true,
        },
        ShippingMethod {
            id: "overnight".to_string(),
            name: "Overnight Express".to_string(),
            description: "Next business day delivery".to_string(),
            min_days: 1,
            max_days: 1,
            base_cost: Money::from_cents(1999),
            weight_multiplier: Decimal::new(450, 2),
            free_above_threshold: None,
            max_weight: Some(Decimal::new(10, 0)),
            business_days_only: true,
            has_tracking: true,
            has_insurance: true,
        },
        ShippingMethod {
            id: "ground_saver".to_string(),
            name: "Economy Ground".to_string(),
            description: "Lowest cost option, slower delivery".to_string(),
            min_days: 7,
            max_days: 12,
            base_cost: Money::from_cents(349),
            weight_multiplier: Decimal::new(125, 2),
            free_above_threshold: None,
            max_weight: None,
            business_days_only: false,
            has_tracking: true,
            has_insurance: false,
        },
    ]
}

/// Shipping weights (lb) of the catalog products.
pub fn product_weights() -> Vec<(&'static str, Decimal)> {
    vec![
        ("NWS_001", Decimal::new(25, 1)),
        ("NWS_002", Decimal::new(30, 1)),
        ("NWS_003", Decimal::new(18, 1)),
        ("NWS_004", Decimal::new(22, 1)),
        ("NWS_005", Decimal::new(45, 1)),
        ("NWS_006", Decimal::new(32, 1)),
        ("NWS_007", Decimal::new(28, 1)),
        ("NWS_008", Decimal::new(35, 1)),
        ("NWS_009", Decimal::new(20, 1)),
        ("NWS_010", Decimal::new(38, 1)),
        ("NWS_011", Decimal::new(26, 1)),
        ("NWS_012", Decimal::new(31, 1)),
    ]
}

/// Weight used for products missing from the table.
pub fn default_product_weight() -> Decimal {
    Decimal::new(25, 1)
}

/// State sales tax rates collected at checkout.
pub fn tax_rates() -> Vec<(&'static str, Decimal)> {
    vec![
        ("NC", Decimal::new(475, 4)),
        ("CA", Decimal::new(725, 4)),
        ("NY", Decimal::new(800, 4)),
        ("TX", Decimal::new(625, 4)),
        ("FL", Decimal::new(600, 4)),
    ]
}

pub fn zone_table() -> Result<ZoneTable, TableError> {
    ZoneTable::new(zones())
}

pub fn weight_table() -> Result<ProductWeightTable, TableError> {
    ProductWeightTable::new(product_weights(), default_product_weight())
}

pub fn tax_table() -> Result<TaxRateTable, TableError> {
    TaxRateTable::new(tax_rates(), Decimal::ZERO)
}

/// The complete reference engine.
pub fn engine() -> Result<RateEngine, TableError> {
    RateEngine::new(zone_table()?, methods(), weight_table()?, tax_table()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reference_tables_are_valid() {
        assert!(engine().is_ok());
    }

    #[test]
    fn test_reference_regions_do_not_overlap() {
        let total: usize = zones().iter().map(|z| z.regions.len()).sum();
        assert_eq!(total, 50);
        assert_eq!(zone_table().unwrap().catch_all().id, "zone7");
    }

    #[test]
    fn test_every_catalog_product_has_a_weight() {
        let table = weight_table().unwrap();
        assert_eq!(table.len(), 12);
        for n in 1..=12 {
            assert!(table.is_known(&format!("NWS_{n:03}")));
        }
    }
}
