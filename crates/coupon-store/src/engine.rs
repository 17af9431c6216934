//! # Discount Engine
//!
//! Applies stored coupons to carts.
//!
//! ## Apply Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  engine.apply_coupon(&cart, "SAVE10", &mut applied)                    │
//! │       │                                                                 │
//! │       ├── cart empty? ─────────────────────────────► EmptyCart         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  coupons.redeem("SAVE10", ...)          ┌── entry locked ──────────┐   │
//! │       │                                 │ missing? ──► NotFound    │   │
//! │       │                                 │ guard ────► Err? stop    │   │
//! │       │                                 │ calculator ► Err? stop   │   │
//! │       │                                 │ apply_to ──► Err? stop   │   │
//! │       │                                 │ uses += 1                │   │
//! │       │                                 └──────────────────────────┘   │
//! │       ▼                                                                 │
//! │  new Cart, coupon id in `applied`                                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Discovery
//! `find_applicable_coupons` evaluates every stored coupon against the cart
//! with a fresh applied set each. It reads a snapshot of the table and never
//! touches `uses`.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use coupon_core::{
    ensure_not_empty, evaluate, AppliedCoupons, ApplicableCoupon, Cart, Coupon, CouponPatch,
};

use crate::error::StoreResult;
use crate::repository::CouponRepository;

/// Cart discount orchestrator over a coupon repository.
#[derive(Debug, Clone)]
pub struct DiscountEngine<R> {
    coupons: R,
}

impl<R: CouponRepository> DiscountEngine<R> {
    pub fn new(coupons: R) -> Self {
        DiscountEngine { coupons }
    }

    /// The underlying repository.
    pub fn coupons(&self) -> &R {
        &self.coupons
    }

    // =========================================================================
    // Coupon Management
    // =========================================================================

    pub fn create_coupon(&self, coupon: Coupon) -> StoreResult<()> {
        self.coupons.create(coupon)
    }

    pub fn get_coupon(&self, id: &str) -> StoreResult<Coupon> {
        self.coupons.get(id)
    }

    pub fn update_coupon(&self, id: &str, patch: &CouponPatch) -> StoreResult<()> {
        self.coupons.update(id, patch)
    }

    pub fn delete_coupon(&self, id: &str) -> StoreResult<()> {
        self.coupons.delete(id)
    }

    pub fn list_coupons(&self) -> Vec<Coupon> {
        self.coupons.list()
    }

    // =========================================================================
    // Application
    // =========================================================================

    /// Applies one coupon at the current time.
    pub fn apply_coupon(
        &self,
        cart: &Cart,
        coupon_id: &str,
        applied: &mut AppliedCoupons,
    ) -> StoreResult<Cart> {
        self.apply_coupon_at(cart, coupon_id, applied, Utc::now())
    }

    /// Applies one coupon as of `now`.
    ///
    /// On success the stored coupon's `uses` has gone up by one, `coupon_id`
    /// is in `applied`, and the returned cart carries the discount. A failed
    /// application changes nothing.
    pub fn apply_coupon_at(
        &self,
        cart: &Cart,
        coupon_id: &str,
        applied: &mut AppliedCoupons,
        now: DateTime<Utc>,
    ) -> StoreResult<Cart> {
        ensure_not_empty(cart)?;

        let mut updated = cart.clone();
        let evaluation = self
            .coupons
            .redeem(coupon_id, |coupon| {
                let evaluation = evaluate(cart, coupon, applied, now)?;
                evaluation.apply_to(&mut updated, applied)?;
                Ok(evaluation)
            })
            .inspect_err(|err| {
                debug!(coupon_id = %coupon_id, error = %err, "Coupon rejected");
            })?;

        info!(
            coupon_id = %coupon_id,
            coupon_type = %evaluation.coupon_type,
            discount = %evaluation.amount(),
            final_price = %updated.final_price,
            "Coupon applied"
        );

        Ok(updated)
    }

    /// Applies several coupons in order within one cart operation.
    ///
    /// Stops at the first failure. Coupons applied before the failure keep
    /// their incremented `uses`.
    pub fn apply_coupons<I, S>(&self, cart: &Cart, coupon_ids: I) -> StoreResult<Cart>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.apply_coupons_at(cart, coupon_ids, Utc::now())
    }

    pub fn apply_coupons_at<I, S>(
        &self,
        cart: &Cart,
        coupon_ids: I,
        now: DateTime<Utc>,
    ) -> StoreResult<Cart>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut applied = AppliedCoupons::new();
        let mut current = cart.clone();

        for coupon_id in coupon_ids {
            current = self.apply_coupon_at(&current, coupon_id.as_ref(), &mut applied, now)?;
        }

        Ok(current)
    }

    // =========================================================================
    // Discovery
    // =========================================================================

    pub fn find_applicable_coupons(&self, cart: &Cart) -> Vec<ApplicableCoupon> {
        self.find_applicable_coupons_at(cart, Utc::now())
    }

    /// Every stored coupon that would give this cart a positive discount,
    /// largest discount first (ties by id).
    pub fn find_applicable_coupons_at(
        &self,
        cart: &Cart,
        now: DateTime<Utc>,
    ) -> Vec<ApplicableCoupon> {
        if cart.is_empty() {
            return Vec::new();
        }

        let mut applicable: Vec<ApplicableCoupon> = self
            .coupons
            .list()
            .iter()
            .filter_map(|coupon| evaluate(cart, coupon, &AppliedCoupons::new(), now).ok())
            .filter(|evaluation| evaluation.amount().is_positive())
            .map(|evaluation| ApplicableCoupon::from(&evaluation))
            .collect();

        applicable.sort_by(|a, b| {
            b.discount
                .cmp(&a.discount)
                .then_with(|| a.coupon_id.cmp(&b.coupon_id))
        });

        debug!(count = applicable.len(), "Applicable coupons found");
        applicable
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
