//! # Cart
//!
//! The shopping cart a coupon is evaluated against.
//!
//! ## Ownership
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Who Touches the Cart                                 │
//! │                                                                         │
//! │  Caller ──► &Cart ──► calculators (read only, return adjustments)      │
//! │                              │                                          │
//! │                              ▼                                          │
//! │              Evaluation::apply_to(&mut Cart)  ← only writer            │
//! │                                                                         │
//! │  A failed evaluation never reaches apply_to, so a rejected coupon      │
//! │  leaves every line exactly as the caller sent it.                      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

/// A line in the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    /// Opaque product identifier.
    pub product_id: String,

    /// Units on this line. Free units granted by a buy-x-get-y coupon are
    /// added here.
    pub quantity: i64,

    /// Price of one unit in cents.
    pub unit_price: Money,

    /// Discount attributed to this line so far.
    #[serde(default)]
    pub line_discount: Money,
}

impl CartItem {
    pub fn new(product_id: impl Into<String>, quantity: i64, unit_price: Money) -> Self {
        CartItem {
            product_id: product_id.into(),
            quantity,
            unit_price,
            line_discount: Money::zero(),
        }
    }

    /// Unit price × quantity, with no filtering.
    #[inline]
    pub fn line_total(&self) -> CoreResult<Money> {
        self.unit_price
            .checked_mul_quantity(self.quantity)
            .ok_or_else(CoreError::overflow)
    }

    /// Lines with a non-positive quantity or price are left out of the
    /// subtotal entirely.
    #[inline]
    pub fn counts_toward_subtotal(&self) -> bool {
        self.quantity > 0 && self.unit_price.is_positive()
    }
}

/// The cart plus the running totals produced by coupon application.
///
/// ## Invariants
/// - `total_price`, `total_discount` and `final_price` are non-negative after
///   a successful application
/// - Only `Evaluation::apply_to` writes the totals
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub items: Vec<CartItem>,

    /// Pre-discount subtotal from the last application.
    #[serde(default)]
    pub total_price: Money,

    /// Sum of every discount applied so far.
    #[serde(default)]
    pub total_discount: Money,

    /// Subtotal minus the most recent discount.
    #[serde(default)]
    pub final_price: Money,
}

impl Cart {
    pub fn new(items: Vec<CartItem>) -> Self {
        Cart {
            items,
            ..Cart::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of `quantity × unit_price` over lines where both are positive.
    ///
    /// ## Example
    /// ```rust
    /// use coupon_core::{Cart, CartItem, Money};
    ///
    /// let cart = Cart::new(vec![
    ///     CartItem::new("P1", 2, Money::from_cents(500)),
    ///     CartItem::new("P2", 0, Money::from_cents(900)),  // excluded
    ///     CartItem::new("P3", 1, Money::from_cents(-100)), // excluded
    /// ]);
    /// assert_eq!(cart.subtotal().unwrap().cents(), 1000);
    /// ```
    pub fn subtotal(&self) -> CoreResult<Money> {
        self.items
            .iter()
            .filter(|item| item.counts_toward_subtotal())
            .try_fold(Money::zero(), |total, item| {
                total
                    .checked_add(item.line_total()?)
                    .ok_or_else(CoreError::overflow)
            })
    }

    /// Total quantity of a product across every line carrying it.
    pub fn quantity_of(&self, product_id: &str) -> CoreResult<i64> {
        self.items
            .iter()
            .filter(|item| item.product_id == product_id)
            .try_fold(0i64, |total, item| {
                total
                    .checked_add(item.quantity)
                    .ok_or_else(CoreError::overflow)
            })
    }

    /// Index of the first line carrying `product_id`.
    pub fn position_of(&self, product_id: &str) -> Option<usize> {
        self.items
            .iter()
            .position(|item| item.product_id == product_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(product_id: &str, quantity: i64, cents: i64) -> CartItem {
        CartItem::new(product_id, quantity, Money::from_cents(cents))
    }

    #[test]
    fn test_subtotal_excludes_zero_and_negative_lines() {
        let cart = Cart::new(vec![
            item("P1", 3, 1000),
            item("P2", 0, 500),
            item("P3", -2, 500),
            item("P4", 1, 0),
        ]);

        assert_eq!(cart.subtotal().unwrap().cents(), 3000);
    }

    #[test]
    fn test_subtotal_overflow_is_an_error() {
        let cart = Cart::new(vec![item("P1", i64::MAX / 2, 3)]);
        assert_eq!(cart.subtotal(), Err(CoreError::overflow()));

        let cart = Cart::new(vec![item("P1", 1, i64::MAX), item("P2", 1, 1)]);
        assert_eq!(cart.subtotal(), Err(CoreError::overflow()));
    }

    #[test]
    fn test_quantity_of_sums_duplicate_lines() {
        let cart = Cart::new(vec![item("P1", 2, 100), item("P2", 1, 100), item("P1", 3, 100)]);

        assert_eq!(cart.quantity_of("P1"), Ok(5));
        assert_eq!(cart.quantity_of("P9"), Ok(0));

        let cart = Cart::new(vec![item("P1", i64::MAX, 1), item("P1", 1, 1)]);
        assert_eq!(cart.quantity_of("P1"), Err(CoreError::overflow()));
    }

    #[test]
    fn test_position_of_returns_first_line() {
        let cart = Cart::new(vec![item("P2", 1, 100), item("P1", 1, 100), item("P1", 1, 100)]);

        assert_eq!(cart.position_of("P1"), Some(1));
        assert_eq!(cart.position_of("P9"), None);
    }

    #[test]
    fn test_cart_deserializes_without_totals() {
        let json = r#"{"items":[{"productId":"P1","quantity":2,"unitPrice":450}]}"#;
        let cart: Cart = serde_json::from_str(json).unwrap();

        assert_eq!(cart.items.len(), 1);
        assert!(cart.items[0].line_discount.is_zero());
        assert!(cart.total_discount.is_zero());
        assert_eq!(cart.subtotal().unwrap().cents(), 900);
    }
}
