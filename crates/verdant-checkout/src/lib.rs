//! # verdant-checkout: Checkout Façade for the Verdant Storefront
//!
//! Loads the rate tables, builds the [`RateEngine`](verdant_core::RateEngine)
//! once, and serves shipping options and order summaries to the checkout
//! request handlers.
//!
//! ## Start-up
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  RateConfig::load(path)                                                 │
//! │     defaults ──► rates.toml ──► VERDANT_* env ──► validate              │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  config.build_engine() ──► CheckoutService::new(engine)                 │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  every request: service.shipping_options(..) / service.summarize(..)   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`config`] - Layered rate configuration
//! - [`error`] - Checkout error types
//! - [`service`] - [`CheckoutService`] and [`OrderSummary`]
//!
//! ## Example
//! ```rust
//! use chrono::NaiveDate;
//! use verdant_checkout::{CheckoutService, RateConfig};
//! use verdant_core::{CartLine, Money};
//!
//! let engine = RateConfig::default().build_engine().unwrap();
//! let service = CheckoutService::new(engine);
//!
//! let cart = vec![CartLine::new("NWS_002", 1, Money::from_cents(3000))];
//! let today = NaiveDate::from_ymd_opt(2024, 10, 28).unwrap();
//! let summary = service.summarize(&cart, "NC", Some("standard"), today).unwrap();
//! assert_eq!(summary.shipping.cents(), 759);
//! ```

pub mod config;
pub mod error;
pub mod service;

pub use config::RateConfig;
pub use error::{CheckoutError, CheckoutResult};
pub use service::{CheckoutService, OrderSummary};
