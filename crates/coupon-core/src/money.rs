//! # Money Module
//!
//! Provides the `Money` and `Percent` types used by every discount rule.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DISCOUNTS ON FLOATS DRIFT                                              │
//! │                                                                         │
//! │  10% of $33.33 as f64:  3.3330000000000002                              │
//! │  Summed over three coupons the cart total no longer matches the         │
//! │  receipt by a fraction of a cent.                                       │
//! │                                                                         │
//! │  OUR SOLUTION: Integer Cents + Basis Points                             │
//! │    3333 cents × 1000 bps = 333 cents (rounded once, at the cent)        │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use coupon_core::money::{Money, Percent};
//!
//! let subtotal = Money::from_cents(12_000); // $120.00
//! let off = subtotal.percentage(Percent::from_bps(1000)); // 10%
//! assert_eq!(off.cents(), 1200);
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

/// Basis points in one whole (100%).
pub const BASIS_POINTS_PER_WHOLE: i64 = 10_000;

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: update payloads may carry negative thresholds that the
///   validation policy has to see and reject
/// - **Single field tuple struct**: zero-cost abstraction over i64
///
/// ## Where Money Flows
/// ```text
/// CartItem.unit_price ──► line_total ──► subtotal ──► calculator
///                                                        │
///  CartWideRule.threshold / min_cart_value ─────────────┤
///                                                        ▼
///                               Cart.total_discount / Cart.final_price
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_core::money::Money;
    ///
    /// let price = Money::from_cents(1099); // $10.99
    /// assert_eq!(price.cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole-dollar portion.
    #[inline]
    pub const fn dollars(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the cents portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Multiplies a unit price by a quantity, or `None` on overflow.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_core::money::Money;
    ///
    /// let unit_price = Money::from_cents(299);
    /// assert_eq!(unit_price.checked_mul_quantity(3), Some(Money::from_cents(897)));
    /// assert_eq!(unit_price.checked_mul_quantity(i64::MAX), None);
    /// ```
    #[inline]
    pub const fn checked_mul_quantity(&self, qty: i64) -> Option<Money> {
        match self.0.checked_mul(qty) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_add(&self, other: Money) -> Option<Money> {
        match self.0.checked_add(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    #[inline]
    pub const fn checked_sub(&self, other: Money) -> Option<Money> {
        match self.0.checked_sub(other.0) {
            Some(cents) => Some(Money(cents)),
            None => None,
        }
    }

    /// Returns `pct` of this amount, rounded to the nearest cent.
    ///
    /// ## Implementation
    /// `(cents × bps + 5000) / 10000` in i128, so a half cent rounds up for
    /// non-negative amounts. This is the single rounding step for every
    /// percentage discount. Results beyond the i64 range saturate.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_core::money::{Money, Percent};
    ///
    /// // 12.5% of $10.01 = $1.25125 → $1.25
    /// let off = Money::from_cents(1001).percentage(Percent::from_bps(1250));
    /// assert_eq!(off.cents(), 125);
    /// ```
    pub fn percentage(&self, pct: Percent) -> Money {
        let half = BASIS_POINTS_PER_WHOLE as i128 / 2;
        let cents =
            (self.0 as i128 * pct.bps() as i128 + half) / BASIS_POINTS_PER_WHOLE as i128;
        Money::from_cents(cents.clamp(i64::MIN as i128, i64::MAX as i128) as i64)
    }
}

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

// =============================================================================
// Percent
// =============================================================================

/// A percentage represented in basis points.
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 1000 bps = 10% and 10000 bps = 100%.
/// Coupons like "12.5% off" stay exact without a float in storage.
///
/// Signed so that an out-of-range update (e.g. -5%) reaches validation
/// instead of failing to deserialize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Percent(i64);

impl Percent {
    /// 100%.
    pub const FULL: Percent = Percent(BASIS_POINTS_PER_WHOLE);

    #[inline]
    pub const fn from_bps(bps: i64) -> Self {
        Percent(bps)
    }

    #[inline]
    pub const fn bps(&self) -> i64 {
        self.0
    }

    #[inline]
    pub const fn zero() -> Self {
        Percent(0)
    }

    #[inline]
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// True for 0% through 100% inclusive.
    #[inline]
    pub const fn is_within_whole(&self) -> bool {
        self.0 >= 0 && self.0 <= BASIS_POINTS_PER_WHOLE
    }
}

impl Default for Percent {
    fn default() -> Self {
        Percent::zero()
    }
}

impl fmt::Display for Percent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}%", sign, (self.0 / 100).abs(), (self.0 % 100).abs())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
