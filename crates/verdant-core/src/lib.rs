//! # verdant-core: Pure Rate Engine for the Verdant Storefront
//!
//! This crate is the pricing **heart** of the storefront checkout. It turns a
//! cart and a destination region into shipping quotes and a tax amount, as
//! pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Verdant Checkout Flow                            │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 Storefront (checkout page)                      │   │
//! │  │     Cart ──► Shipping options ──► Method picked ──► Pay         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ request handler                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               verdant-checkout (config + logging)               │   │
//! │  │     RateConfig::load ──► CheckoutService::summarize             │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ verdant-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌──────────┐ ┌──────────┐ ┌──────────┐ ┌──────────┐          │   │
//! │  │   │  weight  │ │   zone   │ │  quote   │ │   tax    │          │   │
//! │  │   │  table   │ │  table   │ │ ranking  │ │  table   │          │   │
//! │  │   └──────────┘ └──────────┘ └──────────┘ └──────────┘          │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO CLOCK • NO GLOBALS • PURE FUNCTIONS              │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type in integer cents, rounding at the boundary
//! - [`types`] - Cart lines, tax rates, region codes
//! - [`weight`] - Product weight table
//! - [`zone`] - Shipping zones and zone resolution
//! - [`method`] - Shipping methods and free-shipping progress
//! - [`delivery`] - Delivery labels and business-day date math
//! - [`quote`] - Quoting, ranking, best option
//! - [`tax`] - Region tax table and tax on subtotal + shipping
//! - [`engine`] - [`RateEngine`], all tables bound together
//! - [`pricing`] - Dynamic pricing and competitor analysis heuristics
//! - [`reference`] - The storefront's reference configuration tables
//! - [`error`] / [`validation`] - Typed errors and input checks
//!
//! ## Design Principles
//!
//! 1. **Pure Functions**: same input = same output, "today" is a parameter
//! 2. **Exact Decimals**: weights, multipliers and rates use `Decimal`
//! 3. **Round Once**: cents rounding only happens when producing `Money`
//! 4. **Fail Open**: unknown products, regions and methods use defaults
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::NaiveDate;
//! use verdant_core::{reference, CartLine, Money};
//!
//! let engine = reference::engine().unwrap();
//! let cart = vec![CartLine::new("NWS_002", 1, Money::from_cents(3000))];
//! let today = NaiveDate::from_ymd_opt(2024, 10, 28).unwrap();
//!
//! let best = engine.best_quote(&cart, "NC", today).unwrap();
//! assert_eq!(best.method.id, "ground_saver");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod delivery;
pub mod engine;
pub mod error;
pub mod method;
pub mod money;
pub mod pricing;
pub mod quote;
pub mod reference;
pub mod tax;
pub mod types;
pub mod validation;
pub mod weight;
pub mod zone;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use delivery::DeliveryEstimate;
pub use engine::RateEngine;
pub use error::{CoreError, RateError, TableError, ValidationError};
pub use method::{FreeShippingProgress, ShippingMethod};
pub use money::Money;
pub use quote::{QuoteOutcome, ShippingQuote};
pub use tax::TaxRateTable;
pub use types::*;
pub use weight::ProductWeightTable;
pub use zone::{ShippingZone, ZoneTable};

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single checkout request.
pub const MAX_CART_LINES: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Prevents accidental over-ordering (e.g., typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: u32 = 999;
