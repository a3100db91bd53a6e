//! # Checkout Service
//!
//! The request-handler side of the rate engine: shipping options for the
//! checkout page and the final order summary passed on to payment.
//!
//! ## Summary Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  summarize(cart, region, method_id?, today)                             │
//! │                                                                         │
//! │  validate_cart ──► shipping_options ──► pick method ──► apply_tax       │
//! │       │                  │                   │                          │
//! │       ▼                  ▼                   ▼                          │
//! │  Err(Validation)   empty? Err(No-      unknown/excluded id?             │
//! │                    ShippingAvailable)  warn + best option               │
//! │                                                                         │
//! │  total = subtotal + shipping + tax                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Fail-Open Logging
//! Unknown products (default weight), unknown regions (catch-all zone) and
//! untaxed regions never block checkout, but each one is logged at `warn`
//! so silent mispricing shows up in the logs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};
use ts_rs::TS;
use verdant_core::quote::rank_quotes;
use verdant_core::types::subtotal;
use verdant_core::validation::validate_cart;
use verdant_core::{
    CartLine, DeliveryEstimate, FreeShippingProgress, Money, QuoteOutcome, RateEngine, ShippingQuote, TaxRate,
};

use crate::error::{CheckoutError, CheckoutResult};

// =============================================================================
// Order Summary
// =============================================================================

/// Totals shown on the review step and sent to the payment processor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct OrderSummary {
    #[serde(rename = "subtotalCents")]
    pub subtotal: Money,

    #[serde(rename = "shippingCents")]
    pub shipping: Money,

    #[serde(rename = "taxCents")]
    pub tax: Money,

    pub tax_rate: TaxRate,

    #[serde(rename = "totalCents")]
    pub total: Money,

    pub shipping_method_id: String,
    pub shipping_method_name: String,

    /// `"FREE"` or `"$7.59"`.
    pub shipping_display: String,

    pub is_free_shipping: bool,
    pub delivery_estimate: DeliveryEstimate,

    /// Progress toward the first configured free-shipping threshold.
    pub free_shipping_progress: Option<FreeShippingProgress>,
}

// =============================================================================
// Checkout Service
// =============================================================================

/// Checkout operations over a shared, immutable rate engine.
#[derive(Debug, Clone)]
pub struct CheckoutService {
    engine: RateEngine,
}

impl CheckoutService {
    pub fn new(engine: RateEngine) -> Self {
        CheckoutService { engine }
    }

    pub fn engine(&self) -> &RateEngine {
        &self.engine
    }

    /// Ranked shipping options for the checkout page.
    pub fn shipping_options(&self, lines: &[CartLine], region_code: &str, today: NaiveDate) -> Vec<ShippingQuote> {
        self.log_fallbacks(lines, region_code);

        let quotes = self
            .engine
            .quote_outcomes(lines, region_code, today)
            .into_iter()
            .filter_map(|outcome| match outcome {
                QuoteOutcome::Quoted(quote) => Some(quote),
                QuoteOutcome::Excluded(reason) => {
                    debug!(method_id = %reason.method_id(), %reason, "Shipping method excluded");
                    None
                }
            })
            .collect();

        rank_quotes(quotes)
    }

    /// The cheapest option, or `NoShippingAvailable`.
    pub fn best_option(&self, lines: &[CartLine], region_code: &str, today: NaiveDate) -> CheckoutResult<ShippingQuote> {
        self.shipping_options(lines, region_code, today)
            .into_iter()
            .next()
            .ok_or_else(|| no_shipping(region_code))
    }

    /// Builds the order summary for a cart and the shopper's chosen method.
    ///
    /// `method_id = None` picks the best option. An unknown or excluded
    /// method falls back to the best option as well.
    pub fn summarize(
        &self,
        lines: &[CartLine],
        region_code: &str,
        method_id: Option<&str>,
        today: NaiveDate,
    ) -> CheckoutResult<OrderSummary> {
        validate_cart(lines)?;

        let mut options = self.shipping_options(lines, region_code, today);
        if options.is_empty() {
            warn!(region = %region_code, "No shipping method can ship this order");
            return Err(no_shipping(region_code));
        }

        let position = match method_id {
            Some(id) => options.iter().position(|q| q.method.id == id).unwrap_or_else(|| {
                warn!(method_id = %id, region = %region_code, "Requested shipping method unavailable, using best option");
                0
            }),
            None => 0,
        };
        let selected = options.swap_remove(position);

        let subtotal = subtotal(lines);
        let shipping = selected.total;
        let tax = self.engine.apply_tax(subtotal, shipping, region_code);
        let tax_rate = self.engine.tax_rate(region_code);

        if !self.engine.taxes().has_rate(region_code) {
            debug!(region = %region_code, rate = %tax_rate.fraction(), "No tax rate for region, using default");
        }

        let summary = OrderSummary {
            subtotal,
            shipping,
            tax,
            tax_rate,
            total: subtotal + shipping + tax,
            shipping_method_id: selected.method.id.clone(),
            shipping_method_name: selected.method.name.clone(),
            shipping_display: selected.display_cost(),
            is_free_shipping: selected.is_free,
            free_shipping_progress: self.free_shipping_progress(subtotal),
            delivery_estimate: selected.delivery,
        };

        info!(
            region = %region_code,
            method_id = %summary.shipping_method_id,
            subtotal = %summary.subtotal,
            shipping = %summary.shipping,
            tax = %summary.tax,
            total = %summary.total,
            "Order summarized"
        );

        Ok(summary)
    }

    /// Progress toward the first configured method's free-shipping threshold.
    pub fn free_shipping_progress(&self, subtotal: Money) -> Option<FreeShippingProgress> {
        self.engine
            .methods()
            .iter()
            .find_map(|method| method.free_shipping_progress(subtotal))
    }

    fn log_fallbacks(&self, lines: &[CartLine], region_code: &str) {
        let weights = self.engine.weights();
        for product_id in weights.unknown_products(lines) {
            warn!(
                product_id = %product_id,
                default_weight = %weights.default_weight(),
                "Unknown product, using default weight"
            );
        }

        if !self.engine.zones().is_known_region(region_code) {
            warn!(
                region = %region_code,
                zone_id = %self.engine.zones().catch_all().id,
                "Unknown region, using catch-all zone"
            );
        }
    }
}

fn no_shipping(region_code: &str) -> CheckoutError {
    CheckoutError::NoShippingAvailable {
        region: region_code.trim().to_uppercase(),
    }
}
