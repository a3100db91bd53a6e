//! # Validation Module
//!
//! Input validation for checkout requests, run before any quoting.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Storefront (TypeScript)                                      │
//! │  ├── Quantity pickers, required address fields                         │
//! │  └── Immediate user feedback                                           │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Request handler → verdant-checkout                           │
//! │  ├── Deserialization of cart lines                                     │
//! │  └── THIS MODULE: cart shape rules                                     │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Engine tables (fail open)                                    │
//! │  └── Unknown product / region / method → defaults, never an error     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use verdant_core::validation::{validate_product_id, validate_quantity};
//!
//! validate_product_id("NWS_001").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::CartLine;
use crate::{MAX_CART_LINES, MAX_ITEM_QUANTITY};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Longest product identifier accepted.
const MAX_PRODUCT_ID_LEN: usize = 64;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a product identifier.
///
/// ## Rules
/// - Must not be empty
/// - At most 64 characters
/// - Only letters, digits, hyphens and underscores
///
/// Unknown IDs are fine: they get the default weight. This only rejects
/// IDs that cannot be a catalog key at all.
///
/// ## Example
/// ```rust
/// use verdant_core::validation::validate_product_id;
///
/// assert!(validate_product_id("NWS_012").is_ok());
/// assert!(validate_product_id("").is_err());
/// assert!(validate_product_id("has space").is_err());
/// ```
pub fn validate_product_id(product_id: &str) -> ValidationResult<()> {
    let product_id = product_id.trim();

    if product_id.is_empty() {
        return Err(ValidationError::Required {
            field: "product_id".to_string(),
        });
    }

    if product_id.len() > MAX_PRODUCT_ID_LEN {
        return Err(ValidationError::TooLong {
            field: "product_id".to_string(),
            max: MAX_PRODUCT_ID_LEN,
        });
    }

    if !product_id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "product_id".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
pub fn validate_quantity(qty: u32) -> ValidationResult<()> {
    if qty == 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY as i64,
        });
    }

    Ok(())
}

/// Validates a unit price. Zero is allowed (free samples).
///
/// ```rust
/// use verdant_core::{validation::validate_unit_price, Money};
///
/// assert!(validate_unit_price(Money::from_cents(0)).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

// =============================================================================
// Cart Validators
// =============================================================================

/// Validates one cart line.
pub fn validate_cart_line(line: &CartLine) -> ValidationResult<()> {
    validate_product_id(&line.product_id)?;
    validate_quantity(line.quantity)?;
    validate_unit_price(line.unit_price)?;
    Ok(())
}

/// Validates a full cart: line count, then every line.
///
/// An empty cart is valid; it weighs nothing and costs nothing.
pub fn validate_cart(lines: &[CartLine]) -> ValidationResult<()> {
    if lines.len() > MAX_CART_LINES {
        return Err(ValidationError::OutOfRange {
            field: "cart lines".to_string(),
            min: 0,
            max: MAX_CART_LINES as i64,
        });
    }

    lines.iter().try_for_each(validate_cart_line)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_product_id() {
        assert!(validate_product_id("NWS_001").is_ok());
        assert!(validate_product_id("liquid-kelp-32oz").is_ok());

        assert!(validate_product_id("").is_err());
        assert!(validate_product_id("   ").is_err());
        assert!(validate_product_id("NWS 001").is_err());
        assert!(validate_product_id(&"A".repeat(65)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(matches!(
            validate_quantity(0),
            Err(ValidationError::MustBePositive { .. })
        ));
        assert!(matches!(
            validate_quantity(1000),
            Err(ValidationError::OutOfRange { .. })
        ));
    }

    #[test]
    fn test_validate_cart() {
        let good = vec![
            CartLine::new("NWS_001", 1, Money::from_cents(1999)),
            CartLine::new("NWS_002", 2, Money::zero()),
        ];
        assert!(validate_cart(&good).is_ok());
        assert!(validate_cart(&[]).is_ok());

        let bad = vec![CartLine::new("NWS_001", 0, Money::from_cents(1999))];
        assert!(validate_cart(&bad).is_err());

        let too_many: Vec<CartLine> = (0..=MAX_CART_LINES)
            .map(|i| CartLine::new(format!("P{i}"), 1, Money::from_cents(100)))
            .collect();
        assert!(validate_cart(&too_many).is_err());
    }
}
