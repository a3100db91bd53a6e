//! # Delivery Estimates
//!
//! Human labels ("5-8 business days") and the estimated arrival date.
//!
//! ## Business-Day Walk
//! ```text
//! today = Thu Oct 24, method max_days = 3, business_days_only = true
//!
//!   Fri 25 ✔(1)   Sat 26 ✘   Sun 27 ✘   Mon 28 ✔(2)   Tue 29 ✔(3) → arrive
//!
//! business_days_only = false → today + 3 calendar days = Sun Oct 27
//! ```
//!
//! "Today" is always a parameter, never read from the clock here.

use chrono::{Datelike, Days, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::method::ShippingMethod;

/// Label shown next to a method: next-day, fixed-day, or a range.
///
/// ```rust
/// use verdant_core::{delivery::estimated_delivery_label, reference};
///
/// let methods = reference::methods();
/// assert_eq!(estimated_delivery_label(&methods[0]), "5-8 business days");
/// assert_eq!(estimated_delivery_label(&methods[2]), "Next business day");
/// ```
pub fn estimated_delivery_label(method: &ShippingMethod) -> String {
    match (method.min_days, method.max_days) {
        (1, 1) => "Next business day".to_string(),
        (min, max) if min == max => format!("{min} business days"),
        (min, max) => format!("{min}-{max} business days"),
    }
}

/// Estimated arrival date for a method shipped on `today`.
pub fn estimated_delivery_date(method: &ShippingMethod, today: NaiveDate) -> NaiveDate {
    if method.business_days_only {
        add_business_days(today, method.max_days)
    } else {
        today + Days::new(u64::from(method.max_days))
    }
}

/// Walks forward one day at a time, counting only Monday-Friday.
pub fn add_business_days(start: NaiveDate, business_days: u32) -> NaiveDate {
    let mut date = start;
    let mut counted = 0;
    while counted < business_days {
        date = date + Days::new(1);
        if !is_weekend(date) {
            counted += 1;
        }
    }
    date
}

fn is_weekend(date: NaiveDate) -> bool {
    matches!(date.weekday(), Weekday::Sat | Weekday::Sun)
}

/// Label, date and display string for a method's delivery window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DeliveryEstimate {
    /// e.g. `"2-4 business days"`.
    pub label: String,

    #[ts(type = "string")]
    pub date: NaiveDate,

    /// e.g. `"Friday, Oct 23"`.
    pub display: String,
}

impl DeliveryEstimate {
    /// Estimate for `method` shipped on `today`.
    pub fn for_method(method: &ShippingMethod, today: NaiveDate) -> Self {
        let date = estimated_delivery_date(method, today);
        DeliveryEstimate {
            label: estimated_delivery_label(method),
            date,
            display: date.format("%A, %b %-d").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Money;
    use rust_decimal::Decimal;

    fn method(min_days: u32, max_days: u32, business_days_only: bool) -> ShippingMethod {
        ShippingMethod {
            id: "m".to_string(),
            name: "Method".to_string(),
            description: String::new(),
            min_days,
            max_days,
            base_cost: Money::from_cents(100),
            weight_multiplier: Decimal::ONE,
            free_above_threshold: None,
            max_weight: None,
            business_days_only,
            has_tracking: false,
            has_insurance: false,
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_labels() {
        assert_eq!(estimated_delivery_label(&method(1, 1, true)), "Next business day");
        assert_eq!(estimated_delivery_label(&method(3, 3, true)), "3 business days");
        assert_eq!(estimated_delivery_label(&method(2, 4, true)), "2-4 business days");
    }

    #[test]
    fn test_business_days_skip_weekends() {
        // 2024-10-24 is a Thursday.
        let thursday = date(2024, 10, 24);
        assert_eq!(add_business_days(thursday, 1), date(2024, 10, 25));
        assert_eq!(add_business_days(thursday, 2), date(2024, 10, 28));
        assert_eq!(add_business_days(thursday, 3), date(2024, 10, 29));
        assert_eq!(add_business_days(thursday, 0), thursday);
    }

    #[test]
    fn test_business_days_from_saturday() {
        let saturday = date(2024, 10, 26);
        assert_eq!(add_business_days(saturday, 1), date(2024, 10, 28));
    }

    #[test]
    fn test_calendar_days_when_not_business_only() {
        let thursday = date(2024, 10, 24);
        let ground = method(7, 12, false);
        assert_eq!(estimated_delivery_date(&ground, thursday), date(2024, 11, 5));
    }

    #[test]
    fn test_display_format() {
        let thursday = date(2024, 10, 24);
        let estimate = DeliveryEstimate::for_method(&method(1, 1, true), thursday);
        assert_eq!(estimate.date, date(2024, 10, 25));
        assert_eq!(estimate.display, "Friday, Oct 25");
        assert_eq!(estimate.label, "Next business day");
    }

    #[test]
    fn test_same_input_same_estimate() {
        let m = method(5, 8, true);
        let today = date(2024, 12, 30);
        assert_eq!(
            DeliveryEstimate::for_method(&m, today),
            DeliveryEstimate::for_method(&m, today)
        );
    }
}
