//! # Validation Module
//!
//! Static field rules for coupons.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Boundary (serde)                                             │
//! │  └── Unknown coupon types fail to parse                                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE (create + update)                                │
//! │  ├── threshold ≥ 0                                                     │
//! │  ├── discount within 0%..=100%                                         │
//! │  ├── max_uses ≥ 0                                                      │
//! │  └── uses ≤ max_uses                                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Calculators (apply time)                                     │
//! │  └── Rule must be usable: threshold > 0, product id set, etc.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every function here is pure and has no side effects.

use crate::error::ValidationError;
use crate::money::{Money, Percent};
use crate::types::{Coupon, CouponPatch, CouponRule};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Field Validators
// =============================================================================

/// Thresholds may be zero but never negative.
pub fn validate_threshold(threshold: Money) -> ValidationResult<()> {
    if threshold.is_negative() {
        return Err(ValidationError::InvalidThreshold(threshold));
    }
    Ok(())
}

/// Discounts must be between 0% and 100% inclusive.
///
/// ## Example
/// ```rust
/// use coupon_core::money::Percent;
/// use coupon_core::validation::validate_discount;
///
/// assert!(validate_discount(Percent::from_bps(0)).is_ok());
/// assert!(validate_discount(Percent::from_bps(10_000)).is_ok());
/// assert!(validate_discount(Percent::from_bps(10_001)).is_err());
/// assert!(validate_discount(Percent::from_bps(-1)).is_err());
/// ```
pub fn validate_discount(discount: Percent) -> ValidationResult<()> {
    if !discount.is_within_whole() {
        return Err(ValidationError::InvalidDiscount(discount));
    }
    Ok(())
}

pub fn validate_max_uses(max_uses: i64) -> ValidationResult<()> {
    if max_uses < 0 {
        return Err(ValidationError::InvalidMaxUses(max_uses));
    }
    Ok(())
}

pub fn validate_usage(uses: i64, max_uses: i64) -> ValidationResult<()> {
    if uses > max_uses {
        return Err(ValidationError::UsesExceedMaxUses { uses, max_uses });
    }
    Ok(())
}

// =============================================================================
// Coupon Validators
// =============================================================================

/// Validates a whole coupon.
///
/// Checks run in a fixed order (threshold, discount, max uses, usage) and
/// stop at the first failure.
pub fn validate_coupon(coupon: &Coupon) -> ValidationResult<()> {
    if let CouponRule::CartWide(rule) = &coupon.rule {
        validate_threshold(rule.threshold)?;
    }
    if let Some(discount) = coupon.rule.discount() {
        validate_discount(discount)?;
    }
    validate_max_uses(coupon.max_uses)?;
    validate_usage(coupon.uses, coupon.max_uses)?;
    Ok(())
}

/// Validates the values an update is trying to set.
///
/// Absent fields are skipped. The usage rule is checked on the merged
/// coupon instead, because a patch cannot set `uses`.
pub fn validate_patch(patch: &CouponPatch) -> ValidationResult<()> {
    if let Some(threshold) = patch.threshold {
        validate_threshold(threshold)?;
    }
    if let Some(discount) = patch.discount {
        validate_discount(discount)?;
    }
    if let Some(max_uses) = patch.max_uses {
        validate_max_uses(max_uses)?;
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
