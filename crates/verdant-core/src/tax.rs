//! # Sales Tax
//!
//! Region → rate lookup and tax on the pre-tax order total.
//!
//! ## Taxable Base
//! ```text
//! taxable = subtotal + shipping        (shipping is ALWAYS taxed)
//! tax     = round2(taxable × rate(region))
//!
//! $100.00 + $10.00 in NC (4.75%) → round2(5.225) = $5.23
//! ```
//!
//! Regions without a configured rate use the table's default rate, which is
//! 0 in the reference configuration.

use std::collections::HashMap;

use rust_decimal::Decimal;

use crate::error::TableError;
use crate::money::Money;
use crate::types::{normalize_region, TaxRate};

/// Validated region tax-rate table.
#[derive(Debug, Clone, Default)]
pub struct TaxRateTable {
    rates: HashMap<String, TaxRate>,
    default_rate: TaxRate,
}

impl TaxRateTable {
    /// Builds the table from raw fractions. Region keys are normalized.
    ///
    /// Every rate, including `default_rate`, must be in `[0, 1)`.
    pub fn new<I, K>(rates: I, default_rate: Decimal) -> Result<Self, TableError>
    where
        I: IntoIterator<Item = (K, Decimal)>,
        K: AsRef<str>,
    {
        let default_rate = checked_rate("(default)", default_rate)?;

        let mut table = HashMap::new();
        for (region, rate) in rates {
            let region = normalize_region(region.as_ref());
            let rate = checked_rate(&region, rate)?;
            table.insert(region, rate);
        }

        Ok(TaxRateTable {
            rates: table,
            default_rate,
        })
    }

    /// Rate for a region; unknown regions get the default rate.
    pub fn rate_for(&self, region_code: &str) -> TaxRate {
        self.rates
            .get(&normalize_region(region_code))
            .copied()
            .unwrap_or(self.default_rate)
    }

    /// Whether the region has its own configured rate.
    pub fn has_rate(&self, region_code: &str) -> bool {
        self.rates.contains_key(&normalize_region(region_code))
    }

    pub fn default_rate(&self) -> TaxRate {
        self.default_rate
    }

    /// Configured regions and rates, in no particular order.
    pub fn rates(&self) -> impl Iterator<Item = (&str, TaxRate)> {
        self.rates.iter().map(|(region, rate)| (region.as_str(), *rate))
    }
}

fn checked_rate(region: &str, rate: Decimal) -> Result<TaxRate, TableError> {
    TaxRate::from_fraction(rate).map_err(|_| TableError::InvalidTaxRate {
        region: region.to_string(),
        rate,
    })
}

/// Tax owed on `subtotal + shipping` for a region.
///
/// ```rust
/// use verdant_core::{reference, tax::apply_tax, Money};
///
/// let table = reference::tax_table().unwrap();
/// let tax = apply_tax(Money::from_cents(10000), Money::from_cents(1000), "NC", &table);
/// assert_eq!(tax.cents(), 523);
/// ```
pub fn apply_tax(subtotal: Money, shipping: Money, region_code: &str, table: &TaxRateTable) -> Money {
    (subtotal + shipping).calculate_tax(table.rate_for(region_code))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn table() -> TaxRateTable {
        TaxRateTable::new([("NC", d("0.0475")), ("ca", d("0.0725"))], Decimal::ZERO).unwrap()
    }

    #[test]
    fn test_tax_on_subtotal_plus_shipping() {
        let tax = apply_tax(Money::from_cents(10000), Money::from_cents(1000), "NC", &table());
        assert_eq!(tax.cents(), 523);
    }

    #[test]
    fn test_tax_grows_with_shipping() {
        let t = table();
        let subtotal = Money::from_cents(10000);
        let low = apply_tax(subtotal, Money::from_cents(1000), "NC", &t);
        let high = apply_tax(subtotal, Money::from_cents(2000), "NC", &t);

        // Δshipping $10.00 × 4.75% = $0.475, within a cent of rounding.
        let delta = (high - low).cents();
        assert!((47..=48).contains(&delta), "delta was {delta}");
        assert!(high > low);
    }

    #[test]
    fn test_unknown_region_is_untaxed() {
        let t = table();
        assert!(apply_tax(Money::from_cents(10000), Money::from_cents(500), "ZZ", &t).is_zero());
        assert!(!t.has_rate("ZZ"));
    }

    #[test]
    fn test_region_lookup_is_normalized() {
        let t = table();
        assert_eq!(t.rate_for(" nc"), TaxRate::from_bps(475));
        assert_eq!(t.rate_for("CA"), TaxRate::from_bps(725));
        assert!(t.has_rate("Ca "));
    }

    #[test]
    fn test_default_rate_applies_to_unlisted_regions() {
        let t = TaxRateTable::new([("NC", d("0.0475"))], d("0.05")).unwrap();
        assert_eq!(t.rate_for("OR").fraction(), d("0.05"));
        assert_eq!(t.default_rate().fraction(), d("0.05"));
    }

    #[test]
    fn test_rejects_out_of_range_rates() {
        let err = TaxRateTable::new([("NC", d("1.0"))], Decimal::ZERO).unwrap_err();
        assert!(matches!(err, TableError::InvalidTaxRate { ref region, .. } if region == "NC"));

        assert!(TaxRateTable::new([("NC", d("-0.01"))], Decimal::ZERO).is_err());
        assert!(TaxRateTable::new(Vec::<(&str, Decimal)>::new(), d("4.75")).is_err());
    }

    #[test]
    fn test_zero_rate_zero_tax() {
        let t = TaxRateTable::default();
        assert!(apply_tax(Money::from_cents(99999), Money::from_cents(1999), "NC", &t).is_zero());
    }
}
