//! # Repository Module
//!
//! Keyed storage for coupon definitions.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Coupon Repository                                    │
//! │                                                                         │
//! │  DiscountEngine                                                        │
//! │       │                                                                 │
//! │       │  coupons.redeem("SAVE10", |coupon| evaluate(...))              │
//! │       ▼                                                                 │
//! │  CouponRepository (trait)                                              │
//! │  ├── create(&self, coupon)                                             │
//! │  ├── get(&self, id)                                                    │
//! │  ├── update(&self, id, patch)                                          │
//! │  ├── delete(&self, id)                                                 │
//! │  ├── list(&self)                                                       │
//! │  └── redeem(&self, id, evaluate)   ← check + uses += 1, one lock       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  InMemoryCouponStore (DashMap), or any other keyed store                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`InMemoryCouponStore`] - process-local table, lifecycle tied to the
//!   process that creates it

pub mod memory;

pub use memory::InMemoryCouponStore;

use coupon_core::validation::{validate_coupon, validate_patch};
use coupon_core::{Coupon, CoreResult, CouponPatch};

use crate::error::{StoreError, StoreResult};

/// Keyed coupon storage.
///
/// Implementations must make `redeem` atomic with respect to other calls on
/// the same id: the evaluation and the `uses` increment happen in one
/// critical section, so concurrent applications cannot push `uses` past
/// `max_uses`.
pub trait CouponRepository: Send + Sync {
    /// Inserts a new coupon. Fails with `AlreadyExists` if the id is taken.
    fn create(&self, coupon: Coupon) -> StoreResult<()>;

    /// Returns a copy of the stored coupon.
    fn get(&self, id: &str) -> StoreResult<Coupon>;

    /// Sparse-merges `patch` into the stored coupon (see [`merge_patch`]).
    fn update(&self, id: &str, patch: &CouponPatch) -> StoreResult<()>;

    fn delete(&self, id: &str) -> StoreResult<()>;

    /// Every stored coupon. Order is unspecified.
    fn list(&self) -> Vec<Coupon>;

    /// Runs `evaluate` against the stored coupon and, if it succeeds,
    /// increments the coupon's `uses` before releasing the entry.
    fn redeem<T, F>(&self, id: &str, evaluate: F) -> StoreResult<T>
    where
        F: FnOnce(&Coupon) -> CoreResult<T>;
}

/// Validates a coupon before it is inserted.
pub fn prepare_create(coupon: &Coupon) -> StoreResult<()> {
    validate_coupon(coupon)?;
    Ok(())
}

/// Computes the coupon an update would store.
///
/// ## Order
/// 1. Validate the values the patch sets
/// 2. `NoChange` if no mergeable field is present
/// 3. Merge onto a copy of `current`
/// 4. Validate the merged coupon (`uses` must still fit under `max_uses`)
pub fn merge_patch(current: &Coupon, patch: &CouponPatch) -> StoreResult<Coupon> {
    validate_patch(patch)?;

    if patch.is_empty() {
        return Err(StoreError::NoChange(current.id.clone()));
    }

    let mut merged = current.clone();
    merged.merge(patch);
    validate_coupon(&merged)?;

    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use coupon_core::{CartWideRule, CouponRule, Money, Percent, ValidationError};

    fn coupon() -> Coupon {
        let mut coupon = Coupon::new(
            "C1",
            CouponRule::CartWide(CartWideRule {
                threshold: Money::from_cents(10_000),
                discount: Percent::from_bps(1000),
                min_cart_value: Money::zero(),
            }),
        )
        .with_max_uses(5);
        coupon.uses = 4;
        coupon
    }

    #[test]
    fn test_merge_patch_validates_before_no_change() {
        let patch = CouponPatch {
            threshold: Some(Money::from_cents(-1)),
            ..CouponPatch::default()
        };

        assert_eq!(
            merge_patch(&coupon(), &patch),
            Err(StoreError::Validation(ValidationError::InvalidThreshold(
                Money::from_cents(-1)
            )))
        );
    }

    #[test]
    fn test_merge_patch_no_change() {
        assert_eq!(
            merge_patch(&coupon(), &CouponPatch::default()),
            Err(StoreError::NoChange("C1".to_string()))
        );
    }

    #[test]
    fn test_merge_patch_rejects_shrinking_below_uses() {
        let patch = CouponPatch {
            max_uses: Some(2),
            ..CouponPatch::default()
        };

        assert_eq!(
            merge_patch(&coupon(), &patch),
            Err(StoreError::Validation(ValidationError::UsesExceedMaxUses {
                uses: 4,
                max_uses: 2
            }))
        );
    }

    #[test]
    fn test_merge_patch_does_not_touch_current() {
        let current = coupon();
        let patch = CouponPatch {
            discount: Some(Percent::from_bps(2500)),
            ..CouponPatch::default()
        };

        let merged = merge_patch(&current, &patch).unwrap();

        assert_eq!(merged.rule.discount(), Some(Percent::from_bps(2500)));
        assert_eq!(current.rule.discount(), Some(Percent::from_bps(1000)));
    }

    #[test]
    fn test_prepare_create_validates() {
        let mut bad = coupon();
        bad.uses = 6;
        assert!(matches!(
            prepare_create(&bad),
            Err(StoreError::Validation(ValidationError::UsesExceedMaxUses { .. }))
        ));
        assert!(prepare_create(&coupon()).is_ok());
    }
}
