//! # Evaluation
//!
//! The pure half of applying a coupon: guard, then calculator.
//!
//! ## Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  evaluate(&cart, &coupon, &applied, now)                               │
//! │       │                                                                 │
//! │       ├── guard::check_application ──► Err? stop, nothing changed      │
//! │       │                                                                 │
//! │       ├── calculator::calculate ─────► Err? stop, nothing changed      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Evaluation ──► apply_to(&mut cart, &mut applied)                      │
//! │                   • line adjustments                                    │
//! │                   • total_price / total_discount / final_price         │
//! │                   • coupon id added to the applied set                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The usage counter is not touched here; the store increments it in the
//! same critical section that runs the evaluation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calculator::{self, Discount};
use crate::cart::Cart;
use crate::error::{CoreError, CoreResult};
use crate::guard;
use crate::money::Money;
use crate::types::{AppliedCoupons, Coupon, CouponType};

/// A coupon that passed the guard and produced a discount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub coupon_id: String,
    pub coupon_type: CouponType,
    pub discount: Discount,
}

impl Evaluation {
    /// The discount in whole cents.
    pub fn amount(&self) -> Money {
        self.discount.amount
    }

    /// Folds the discount into the cart and records the coupon as applied.
    ///
    /// ## Totals
    /// - `total_price` = subtotal
    /// - `total_discount` += amount
    /// - `final_price` = subtotal − amount (this coupon's amount only),
    ///   floored at zero
    ///
    /// Fails with `AmountOverflow` when a new quantity or total leaves the
    /// i64 range; `cart` and `applied` are then left as they were.
    pub fn apply_to(&self, cart: &mut Cart, applied: &mut AppliedCoupons) -> CoreResult<()> {
        let mut items = cart.items.clone();
        for adjustment in &self.discount.adjustments {
            if let Some(item) = items.get_mut(adjustment.line) {
                item.quantity = item
                    .quantity
                    .checked_add(adjustment.extra_quantity)
                    .ok_or_else(CoreError::overflow)?;
                item.line_discount = item
                    .line_discount
                    .checked_add(adjustment.discount)
                    .ok_or_else(CoreError::overflow)?;
            }
        }

        let subtotal = self.discount.subtotal;
        let total_discount = cart
            .total_discount
            .checked_add(self.amount())
            .ok_or_else(CoreError::overflow)?;
        let final_price = subtotal
            .checked_sub(self.amount())
            .ok_or_else(CoreError::overflow)?
            .max(Money::zero());

        cart.items = items;
        cart.total_price = subtotal;
        cart.total_discount = total_discount;
        cart.final_price = final_price;
        applied.insert(self.coupon_id.clone());

        Ok(())
    }
}

/// Entry in a "which coupons fit this cart" answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ApplicableCoupon {
    pub coupon_id: String,
    #[serde(rename = "type")]
    pub coupon_type: CouponType,
    pub discount: Money,
}

impl From<&Evaluation> for ApplicableCoupon {
    fn from(evaluation: &Evaluation) -> Self {
        ApplicableCoupon {
            coupon_id: evaluation.coupon_id.clone(),
            coupon_type: evaluation.coupon_type,
            discount: evaluation.amount(),
        }
    }
}

/// An empty cart cannot take any coupon.
pub fn ensure_not_empty(cart: &Cart) -> CoreResult<()> {
    if cart.is_empty() {
        return Err(CoreError::EmptyCart);
    }
    Ok(())
}

/// Runs the guard and the calculator for one coupon.
pub fn evaluate(
    cart: &Cart,
    coupon: &Coupon,
    applied: &AppliedCoupons,
    now: DateTime<Utc>,
) -> CoreResult<Evaluation> {
    guard::check_application(coupon, applied, now)?;
    let discount = calculator::calculate(cart, coupon)?;

    Ok(Evaluation {
        coupon_id: coupon.id.clone(),
        coupon_type: coupon.coupon_type(),
        discount,
    })
}
