//! # Application Guard
//!
//! Decides whether one coupon may join the current cart operation.
//!
//! ## Check Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  check_application(coupon, applied, now)                               │
//! │                                                                         │
//! │  1. known type ........ guaranteed by CouponRule (see CouponType)      │
//! │  2. id in applied? .... AlreadyApplied                                 │
//! │  3. expiry < now? ..... Expired                                        │
//! │  4. uses ≥ max_uses? .. UsageLimitExceeded                             │
//! │  5. exclusive and                                                      │
//! │     applied non-empty?  ExclusivityViolation                           │
//! │                                                                         │
//! │  First failure wins. Nothing is mutated here.                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Exclusivity Is One-Directional
//! An exclusive coupon cannot join an operation that already has coupons,
//! but a non-exclusive coupon may still be added after an exclusive one.

use chrono::{DateTime, Utc};

use crate::error::{CoreError, CoreResult};
use crate::types::{AppliedCoupons, Coupon};

/// Runs the guard checks in order.
pub fn check_application(
    coupon: &Coupon,
    applied: &AppliedCoupons,
    now: DateTime<Utc>,
) -> CoreResult<()> {
    if applied.contains(&coupon.id) {
        return Err(CoreError::AlreadyApplied(coupon.id.clone()));
    }

    if let Some(expired_at) = coupon.expiry_date.filter(|_| coupon.is_expired_at(now)) {
        return Err(CoreError::Expired {
            coupon_id: coupon.id.clone(),
            expired_at,
        });
    }

    if coupon.uses >= coupon.max_uses {
        return Err(CoreError::UsageLimitExceeded {
            coupon_id: coupon.id.clone(),
            uses: coupon.uses,
            max_uses: coupon.max_uses,
        });
    }

    if coupon.exclusive && !applied.is_empty() {
        return Err(CoreError::ExclusivityViolation(coupon.id.clone()));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Percent;
    use crate::types::{CouponRule, ProductWiseRule};
    use chrono::Duration;

    fn coupon(id: &str) -> Coupon {
        Coupon::new(
            id,
            CouponRule::ProductWise(ProductWiseRule {
                product_id: "P1".to_string(),
                discount: Percent::from_bps(1000),
            }),
        )
        .with_max_uses(2)
    }

    #[test]
    fn test_fresh_coupon_passes() {
        assert!(check_application(&coupon("A"), &AppliedCoupons::new(), Utc::now()).is_ok());
    }

    #[test]
    fn test_already_applied() {
        let mut applied = AppliedCoupons::new();
        applied.insert("A");

        assert_eq!(
            check_application(&coupon("A"), &applied, Utc::now()),
            Err(CoreError::AlreadyApplied("A".to_string()))
        );
    }

    #[test]
    fn test_expired() {
        let now = Utc::now();
        let expired = coupon("A").with_expiry(now - Duration::minutes(1));
        let expires_now = coupon("B").with_expiry(now);

        assert!(expired.is_expired_at(now));
        assert_eq!(
            check_application(&expired, &AppliedCoupons::new(), now),
            Err(CoreError::Expired {
                coupon_id: "A".to_string(),
                expired_at: now - Duration::minutes(1),
            })
        );
        assert!(!expires_now.is_expired_at(now));
        assert!(check_application(&expires_now, &AppliedCoupons::new(), now).is_ok());
    }

    #[test]
    fn test_usage_limit() {
        let mut exhausted = coupon("A");
        exhausted.uses = 2;

        assert!(matches!(
            check_application(&exhausted, &AppliedCoupons::new(), Utc::now()),
            Err(CoreError::UsageLimitExceeded { uses: 2, max_uses: 2, .. })
        ));
    }

    #[test]
    fn test_zero_max_uses_is_not_unlimited() {
        let never = coupon("A").with_max_uses(0);

        assert!(matches!(
            check_application(&never, &AppliedCoupons::new(), Utc::now()),
            Err(CoreError::UsageLimitExceeded { uses: 0, max_uses: 0, .. })
        ));
    }

    #[test]
    fn test_exclusive_only_blocks_joining_late() {
        let exclusive = coupon("X").exclusive();
        let mut applied = AppliedCoupons::new();

        assert!(check_application(&exclusive, &applied, Utc::now()).is_ok());

        applied.insert("OTHER");
        assert_eq!(
            check_application(&exclusive, &applied, Utc::now()),
            Err(CoreError::ExclusivityViolation("X".to_string()))
        );

        // A regular coupon may still follow an exclusive one.
        let mut after_exclusive = AppliedCoupons::new();
        after_exclusive.insert("X");
        assert!(check_application(&coupon("A"), &after_exclusive, Utc::now()).is_ok());
    }

    #[test]
    fn test_checks_short_circuit_in_order() {
        let now = Utc::now();
        let mut applied = AppliedCoupons::new();
        applied.insert("A");
        let mut everything_wrong = coupon("A").with_expiry(now - Duration::days(1)).exclusive();
        everything_wrong.uses = 5;

        assert!(matches!(
            check_application(&everything_wrong, &applied, now),
            Err(CoreError::AlreadyApplied(_))
        ));
        assert!(matches!(
            check_application(&everything_wrong, &AppliedCoupons::new(), now),
            Err(CoreError::Expired { .. })
        ));
    }
}
