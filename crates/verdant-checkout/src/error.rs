//! # Checkout Error Types
//!
//! ## Error Categories
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     Checkout Error Categories                           │
//! │                                                                         │
//! │  ┌─────────────────┐  ┌─────────────────┐  ┌─────────────────────────┐ │
//! │  │  Configuration  │  │   Rate Engine   │  │     Checkout            │ │
//! │  │                 │  │                 │  │                         │ │
//! │  │  ConfigLoad     │  │  Core           │  │  NoShippingAvailable    │ │
//! │  │  InvalidConfig  │  │  (tables, cart  │  │  (user-facing message)  │ │
//! │  │                 │  │   validation)   │  │                         │ │
//! │  └─────────────────┘  └─────────────────┘  └─────────────────────────┘ │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;
use verdant_core::{CoreError, TableError, ValidationError};

/// Result type alias for checkout operations.
pub type CheckoutResult<T> = Result<T, CheckoutError>;

#[derive(Debug, Error)]
pub enum CheckoutError {
    // =========================================================================
    // Configuration Errors
    // =========================================================================
    /// Config file could not be read or parsed.
    #[error("Failed to load config: {0}")]
    ConfigLoadFailed(String),

    /// Config parsed but is unusable.
    #[error("Invalid rate configuration: {0}")]
    InvalidConfig(String),

    // =========================================================================
    // Engine Errors
    // =========================================================================
    #[error(transparent)]
    Core(#[from] CoreError),

    // =========================================================================
    // Checkout Errors
    // =========================================================================
    /// Every shipping method was excluded for this cart.
    ///
    /// The message is shown to the shopper as-is.
    #[error("This order cannot ship via any available method to {region}. Please contact support.")]
    NoShippingAvailable { region: String },
}

impl CheckoutError {
    /// Whether the shopper can fix this by changing the cart.
    pub fn is_user_facing(&self) -> bool {
        matches!(
            self,
            CheckoutError::NoShippingAvailable { .. } | CheckoutError::Core(CoreError::Validation(_))
        )
    }
}

impl From<TableError> for CheckoutError {
    fn from(err: TableError) -> Self {
        CheckoutError::Core(err.into())
    }
}

impl From<ValidationError> for CheckoutError {
    fn from(err: ValidationError) -> Self {
        CheckoutError::Core(err.into())
    }
}

impl From<std::io::Error> for CheckoutError {
    fn from(err: std::io::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::de::Error> for CheckoutError {
    fn from(err: toml::de::Error) -> Self {
        CheckoutError::ConfigLoadFailed(err.to_string())
    }
}

impl From<toml::ser::Error> for CheckoutError {
    fn from(err: toml::ser::Error) -> Self {
        CheckoutError::InvalidConfig(err.to_string())
    }
}

impl From<serde_json::Error> for CheckoutError {
    fn from(err: serde_json::Error) -> Self {
        CheckoutError::InvalidConfig(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_shipping_message_is_user_facing() {
        let err = CheckoutError::NoShippingAvailable {
            region: "HI".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "This order cannot ship via any available method to HI. Please contact support."
        );
        assert!(err.is_user_facing());
    }

    #[test]
    fn test_table_errors_wrap_into_core() {
        let err: CheckoutError = TableError::NoZones.into();
        assert!(matches!(err, CheckoutError::Core(CoreError::Table(_))));
        assert!(!err.is_user_facing());
        assert_eq!(err.to_string(), "Invalid rate table: At least one shipping zone must be configured");
    }
}
