//! # Money Module
//!
//! Provides the `Money` type for monetary values at the engine's output
//! boundary.
//!
//! ## Round Once, At The Edge
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE COMPOUNDING ROUNDING PROBLEM                                       │
//! │                                                                         │
//! │  Rounding every step of a quote:                                        │
//! │    base 4.99 + weight 4.50 = 9.49                                       │
//! │    zone 9.49 × -0.2 = -1.898 → -1.90                                    │
//! │    total 9.49 - 1.90 = 7.59   (happens to match, often does not)        │
//! │                                                                         │
//! │  OUR SOLUTION: exact Decimal intermediates, one rounding                │
//! │    total = round2(4.99 + 4.50 - 1.898) = round2(7.592) = 7.59           │
//! │                                                                         │
//! │  Money is integer cents. The only way in from a Decimal is              │
//! │  Money::from_decimal, which rounds half away from zero.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use rust_decimal::Decimal;
//! use verdant_core::money::Money;
//!
//! let price = Money::from_cents(1099); // $10.99
//! let doubled = price * 2;             // $21.98
//! assert_eq!(doubled.cents(), 2198);
//!
//! let exact: Decimal = "7.592".parse().unwrap();
//! assert_eq!(Money::from_decimal(exact).cents(), 759);
//! ```

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Mul, Sub};
use ts_rs::TS;

use crate::types::TaxRate;

/// Rounds a decimal to 2 places, half away from zero.
///
/// Used for non-monetary outputs such as percentages.
#[inline]
pub fn round2(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents for USD).
///
/// ## Design Decisions
/// - **i64 (signed)**: zone discounts produce negative components
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Serde as integer cents**: the storefront formats for display
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    pub const MAX: Money = Money(i64::MAX);
    pub const MIN: Money = Money(i64::MIN);

    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use verdant_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // Represents $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Rounds an exact decimal dollar amount to the nearest cent.
    ///
    /// Midpoints round away from zero: `2.225 → 2.23`, `-1.895 → -1.90`.
    /// Amounts beyond the i64 cent range clamp to [`Money::MIN`] or
    /// [`Money::MAX`].
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use verdant_core::money::Money;
    ///
    /// let tax: Decimal = "5.225".parse().unwrap();
    /// assert_eq!(Money::from_decimal(tax).cents(), 523);
    /// ```
    pub fn from_decimal(amount: Decimal) -> Self {
        let mut rounded = round2(amount);
        rounded.rescale(2);
        let cents = rounded.mantissa();
        Money(i64::try_from(cents).unwrap_or(if cents < 0 { i64::MIN } else { i64::MAX }))
    }

    /// Returns the exact dollar amount as a decimal (`1099` → `10.99`).
    #[inline]
    pub fn to_decimal(&self) -> Decimal {
        Decimal::new(self.0, 2)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the major unit (dollars) portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor unit (cents) portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero money value.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    /// Checks if the value is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checks if the value is positive (greater than zero).
    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Checks if the value is negative (less than zero).
    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Calculates tax at the given rate, rounded once to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use verdant_core::money::Money;
    /// use verdant_core::types::TaxRate;
    ///
    /// let taxable = Money::from_cents(11000); // $110.00
    /// let rate = TaxRate::from_bps(475);      // 4.75%
    ///
    /// // $110.00 × 4.75% = $5.225 → $5.23
    /// assert_eq!(taxable.calculate_tax(rate).cents(), 523);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        Money::from_decimal(self.to_decimal() * rate.fraction())
    }

    /// Multiplies by an exact factor and rounds once to the cent.
    ///
    /// ## Example
    /// ```rust
    /// use rust_decimal::Decimal;
    /// use verdant_core::money::Money;
    ///
    /// let base = Money::from_cents(2499);
    /// let factor: Decimal = "1.15".parse().unwrap();
    /// assert_eq!(base.scale(factor).cents(), 2874); // 28.7385 → 28.74
    /// ```
    pub fn scale(&self, factor: Decimal) -> Money {
        Money::from_decimal(self.to_decimal() * factor)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Display shows money the way the checkout page prints it: `$7.59`.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(
            f,
            "{}${}.{:02}",
            sign,
            self.dollars().abs(),
            self.cents_part()
        )
    }
}

impl Default for Money {
    fn default() -> Self {
        Money::zero()
    }
}

// Arithmetic saturates at the i64 bounds: an absurd cart prices at
// Money::MAX rather than wrapping negative.

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

/// Multiplication by a quantity.
impl Mul<u32> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: u32) -> Self {
        Money(self.0.saturating_mul(i64::from(qty)))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), Add::add)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
