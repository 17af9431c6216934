//! # Error Types
//!
//! Domain-specific error types for coupon-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  coupon-core errors (this file)                                        │
//! │  ├── CoreError        - Why a coupon cannot be applied to a cart       │
//! │  └── ValidationError  - Coupon fields that break the rules             │
//! │                                                                         │
//! │  coupon-store errors (separate crate)                                  │
//! │  └── StoreError       - NotFound / AlreadyExists / NoChange + above    │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → StoreError → boundary ErrorCode   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant is recoverable and deterministic: the same cart and coupon
//! always produce the same error, so nothing here is worth retrying.

use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::money::{Money, Percent};

// =============================================================================
// Core Error
// =============================================================================

/// Reasons a coupon cannot be applied.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// Coupon type name is empty or not one of the known types.
    #[error("Unsupported coupon type: '{0}'")]
    UnsupportedCouponType(String),

    /// The coupon was already applied in this cart operation.
    #[error("Coupon {0} already applied")]
    AlreadyApplied(String),

    /// The coupon's expiry date has passed.
    #[error("Coupon {coupon_id} expired at {expired_at}")]
    Expired {
        coupon_id: String,
        expired_at: DateTime<Utc>,
    },

    /// The coupon has no usage budget left.
    ///
    /// ## Note
    /// `max_uses == 0` means the coupon can never be used; zero is not
    /// "unlimited".
    #[error("Coupon {coupon_id} usage limit exceeded ({uses}/{max_uses})")]
    UsageLimitExceeded {
        coupon_id: String,
        uses: i64,
        max_uses: i64,
    },

    /// An exclusive coupon was applied after other coupons.
    #[error("Coupon {0} cannot be combined with others")]
    ExclusivityViolation(String),

    /// The cart has no items.
    #[error("Cart is empty")]
    EmptyCart,

    /// A product-wise coupon targets a product the cart does not contain.
    #[error("Product {0} is not in the cart")]
    ProductNotInCart(String),

    /// The cart does not hold enough buy-products for one repetition.
    #[error("Insufficient buy products for coupon {0}")]
    InsufficientBuyQuantity(String),

    /// Subtotal is below the coupon's minimum cart value.
    #[error("Cart value {subtotal} is below the minimum {min_cart_value}")]
    BelowMinCartValue {
        subtotal: Money,
        min_cart_value: Money,
    },

    /// Subtotal is below the coupon's threshold.
    #[error("Cart total {subtotal} does not meet the threshold {threshold}")]
    ThresholdNotMet { subtotal: Money, threshold: Money },

    /// Coupon fields are invalid for the requested operation.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Coupon field violations.
///
/// Raised by the validation policy on create/update, and by the calculators
/// when a stored rule is unusable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid threshold {0}: must not be negative")]
    InvalidThreshold(Money),

    #[error("Invalid discount {0}: must be between 0% and 100%")]
    InvalidDiscount(Percent),

    #[error("Invalid max uses {0}: must not be negative")]
    InvalidMaxUses(i64),

    #[error("Uses ({uses}) cannot exceed max uses ({max_uses})")]
    UsesExceedMaxUses { uses: i64, max_uses: i64 },

    #[error("Product id is required")]
    InvalidProductId,

    #[error("Invalid buy-x-get-y configuration: {reason}")]
    InvalidBxGyConfig { reason: String },

    /// A quantity or amount left the i64 range while applying a coupon.
    #[error("Cart quantities or amounts are too large")]
    AmountOverflow,
}

impl CoreError {
    pub fn overflow() -> Self {
        CoreError::Validation(ValidationError::AmountOverflow)
    }
}

impl ValidationError {
    pub fn bxgy(reason: impl Into<String>) -> Self {
        ValidationError::InvalidBxGyConfig {
            reason: reason.into(),
        }
    }
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::UsageLimitExceeded {
            coupon_id: "SPRING".to_string(),
            uses: 5,
            max_uses: 5,
        };
        assert_eq!(err.to_string(), "Coupon SPRING usage limit exceeded (5/5)");

        let err = CoreError::ThresholdNotMet {
            subtotal: Money::from_cents(4999),
            threshold: Money::from_cents(5000),
        };
        assert_eq!(
            err.to_string(),
            "Cart total $49.99 does not meet the threshold $50.00"
        );
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::InvalidDiscount(Percent::from_bps(12_000));
        assert_eq!(
            err.to_string(),
            "Invalid discount 120.00%: must be between 0% and 100%"
        );

        let err = ValidationError::bxgy("repetition limit must be positive");
        assert_eq!(
            err.to_string(),
            "Invalid buy-x-get-y configuration: repetition limit must be positive"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let core_err: CoreError = ValidationError::InvalidProductId.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
