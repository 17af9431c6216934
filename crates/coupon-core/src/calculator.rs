//! # Discount Calculators
//!
//! The three discount algorithms, dispatched by coupon type.
//!
//! ## Shape of a Calculation
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  calculate(&Cart, &Coupon)                                             │
//! │       │                                                                 │
//! │       ├── subtotal = Σ qty × price   (lines with qty > 0 and price > 0) │
//! │       │                                                                 │
//! │       ├── cart-wide ──────► % of subtotal                              │
//! │       ├── product-wise ───► % of the first matching line               │
//! │       └── buy-x-get-y ────► free units × unit price                    │
//! │                                                                         │
//! │  Result: Discount { amount, subtotal, adjustments }                    │
//! │                                                                         │
//! │  The cart is borrowed immutably. Per-line effects (free units, line    │
//! │  discounts) come back as LineAdjustments for the caller to apply.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::cart::Cart;
use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, Percent};
use crate::types::{BuyXGetYRule, CartWideRule, Coupon, CouponRule, ProductWiseRule};

/// A change to one cart line produced by a calculator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineAdjustment {
    /// Index into `Cart::items`.
    pub line: usize,
    /// Free units added to the line.
    pub extra_quantity: i64,
    /// Added to the line's `line_discount`.
    pub discount: Money,
}

/// Outcome of a successful calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Discount {
    /// Never negative.
    pub amount: Money,
    /// Pre-discount subtotal of the cart.
    pub subtotal: Money,
    pub adjustments: Vec<LineAdjustment>,
}

/// Dispatches to the calculator for the coupon's type.
pub fn calculate(cart: &Cart, coupon: &Coupon) -> CoreResult<Discount> {
    let subtotal = cart.subtotal()?;

    match &coupon.rule {
        CouponRule::CartWide(rule) => cart_wide(rule, subtotal),
        CouponRule::ProductWise(rule) => product_wise(cart, rule, subtotal),
        CouponRule::BuyXGetY(rule) => buy_x_get_y(&coupon.id, cart, rule, subtotal),
    }
}

// =============================================================================
// Cart-wide
// =============================================================================

/// Percentage off the whole subtotal.
///
/// The threshold is inclusive: a subtotal exactly at the threshold qualifies.
pub fn cart_wide(rule: &CartWideRule, subtotal: Money) -> CoreResult<Discount> {
    if !rule.threshold.is_positive() {
        return Err(ValidationError::InvalidThreshold(rule.threshold).into());
    }
    if !rule.discount.is_positive() {
        return Err(ValidationError::InvalidDiscount(rule.discount).into());
    }
    if rule.min_cart_value.is_positive() && subtotal < rule.min_cart_value {
        return Err(CoreError::BelowMinCartValue {
            subtotal,
            min_cart_value: rule.min_cart_value,
        });
    }
    if subtotal < rule.threshold {
        return Err(CoreError::ThresholdNotMet {
            subtotal,
            threshold: rule.threshold,
        });
    }

    Ok(Discount {
        amount: subtotal.percentage(rule.discount),
        subtotal,
        adjustments: Vec::new(),
    })
}

// =============================================================================
// Product-wise
// =============================================================================

/// Percentage off the first line carrying the product.
///
/// ## Note
/// Later lines with the same product are not discounted.
pub fn product_wise(cart: &Cart, rule: &ProductWiseRule, subtotal: Money) -> CoreResult<Discount> {
    if rule.product_id.is_empty() {
        return Err(ValidationError::InvalidProductId.into());
    }
    if !rule.discount.is_positive() || rule.discount > Percent::FULL {
        return Err(ValidationError::InvalidDiscount(rule.discount).into());
    }

    let line = cart
        .position_of(&rule.product_id)
        .ok_or_else(|| CoreError::ProductNotInCart(rule.product_id.clone()))?;
    let amount = cart.items[line]
        .line_total()?
        .percentage(rule.discount)
        .max(Money::zero());

    Ok(Discount {
        amount,
        subtotal,
        adjustments: vec![LineAdjustment {
            line,
            extra_quantity: 0,
            discount: amount,
        }],
    })
}

// =============================================================================
// Buy X Get Y
// =============================================================================

/// Grants free units of the get-products for every complete buy bundle.
///
/// ## Repetitions
/// ```text
/// reps = min(repetition_limit, min over buy-products of in_cart / required)
///
/// buy [P1 ×2], get [P2 ×1], limit 3, cart P1 ×5
///   → min(3, 5 / 2) = 2 → two free P2
/// ```
///
/// ## Line Attribution
/// Each get-product found in the cart gets `free × unit_price` added to the
/// running discount, and its line is credited with the running total so far
/// (not its own share). With several get-products, later lines therefore
/// carry the earlier ones' amounts as well; downstream consumers read these
/// numbers as they are.
pub fn buy_x_get_y(
    coupon_id: &str,
    cart: &Cart,
    rule: &BuyXGetYRule,
    subtotal: Money,
) -> CoreResult<Discount> {
    validate_bundle(rule)?;

    let mut repetitions = rule.repetition_limit;
    for buy in &rule.buy_products {
        repetitions = repetitions.min(cart.quantity_of(&buy.product_id)? / buy.quantity);
    }

    if repetitions <= 0 {
        return Err(CoreError::InsufficientBuyQuantity(coupon_id.to_string()));
    }

    let mut amount = Money::zero();
    let mut adjustments = Vec::new();

    for get in &rule.get_products {
        let free_quantity = get
            .quantity
            .checked_mul(repetitions)
            .ok_or_else(CoreError::overflow)?;
        let Some(line) = cart.position_of(&get.product_id) else {
            continue;
        };

        let unit_price = cart.items[line].unit_price.max(Money::zero());
        amount = unit_price
            .checked_mul_quantity(free_quantity)
            .and_then(|free_value| amount.checked_add(free_value))
            .ok_or_else(CoreError::overflow)?;
        adjustments.push(LineAdjustment {
            line,
            extra_quantity: free_quantity,
            discount: amount,
        });
    }

    Ok(Discount {
        amount,
        subtotal,
        adjustments,
    })
}

fn validate_bundle(rule: &BuyXGetYRule) -> CoreResult<()> {
    if rule.buy_products.is_empty() {
        return Err(ValidationError::bxgy("buy products are required").into());
    }
    if rule.get_products.is_empty() {
        return Err(ValidationError::bxgy("get products are required").into());
    }
    if rule.repetition_limit <= 0 {
        return Err(ValidationError::bxgy("repetition limit must be positive").into());
    }
    if rule.buy_products.iter().any(|buy| buy.quantity <= 0) {
        return Err(ValidationError::bxgy("buy quantities must be positive").into());
    }
    if rule.get_products.iter().any(|get| get.quantity <= 0) {
        return Err(ValidationError::bxgy("get quantities must be positive").into());
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cart::CartItem;
    use crate::types::ProductQuantity;

    fn item(product_id: &str, quantity: i64, cents: i64) -> CartItem {
        CartItem::new(product_id, quantity, Money::from_cents(cents))
    }

    fn cart_wide_rule(threshold: i64, discount_bps: i64, min_cart_value: i64) -> CartWideRule {
        CartWideRule {
            threshold: Money::from_cents(threshold),
            discount: Percent::from_bps(discount_bps),
            min_cart_value: Money::from_cents(min_cart_value),
        }
    }

    fn bxgy_rule(buy: Vec<(&str, i64)>, get: Vec<(&str, i64)>, limit: i64) -> BuyXGetYRule {
        BuyXGetYRule {
            buy_products: buy
                .into_iter()
                .map(|(id, qty)| ProductQuantity::new(id, qty))
                .collect(),
            get_products: get
                .into_iter()
                .map(|(id, qty)| ProductQuantity::new(id, qty))
                .collect(),
            repetition_limit: limit,
        }
    }

    // -------------------------------------------------------------------------
    // cart-wide
    // -------------------------------------------------------------------------

    #[test]
    fn test_cart_wide_discount() {
        let discount = cart_wide(&cart_wide_rule(10_000, 1000, 0), Money::from_cents(25_000)).unwrap();

        assert_eq!(discount.amount.cents(), 2500);
        assert_eq!(discount.subtotal.cents(), 25_000);
        assert!(discount.adjustments.is_empty());
    }

    #[test]
    fn test_cart_wide_threshold_is_inclusive() {
        let discount = cart_wide(&cart_wide_rule(10_000, 1000, 0), Money::from_cents(10_000)).unwrap();
        assert_eq!(discount.amount.cents(), 1000);
    }

    #[test]
    fn test_cart_wide_threshold_not_met() {
        assert_eq!(
            cart_wide(&cart_wide_rule(10_000, 1000, 0), Money::from_cents(9_999)),
            Err(CoreError::ThresholdNotMet {
                subtotal: Money::from_cents(9_999),
                threshold: Money::from_cents(10_000),
            })
        );
    }

    #[test]
    fn test_cart_wide_min_cart_value_checked_first() {
        assert!(matches!(
            cart_wide(&cart_wide_rule(10_000, 1000, 5000), Money::from_cents(4000)),
            Err(CoreError::BelowMinCartValue { .. })
        ));
    }

    #[test]
    fn test_cart_wide_rejects_unusable_rules() {
        assert!(matches!(
            cart_wide(&cart_wide_rule(0, 1000, 0), Money::from_cents(4000)),
            Err(CoreError::Validation(ValidationError::InvalidThreshold(_)))
        ));
        assert!(matches!(
            cart_wide(&cart_wide_rule(100, 0, 0), Money::from_cents(4000)),
            Err(CoreError::Validation(ValidationError::InvalidDiscount(_)))
        ));
    }

    // -------------------------------------------------------------------------
    // product-wise
    // -------------------------------------------------------------------------

    #[test]
    fn test_product_wise_full_discount_equals_line_value() {
        let cart = Cart::new(vec![item("P1", 3, 1250), item("P2", 1, 400)]);
        let rule = ProductWiseRule {
            product_id: "P1".to_string(),
            discount: Percent::FULL,
        };

        let discount = product_wise(&cart, &rule, cart.subtotal().unwrap()).unwrap();

        assert_eq!(discount.amount.cents(), 3750);
        assert_eq!(discount.subtotal.cents(), 4150);
        assert_eq!(
            discount.adjustments,
            vec![LineAdjustment {
                line: 0,
                extra_quantity: 0,
                discount: Money::from_cents(3750)
            }]
        );
    }

    #[test]
    fn test_product_wise_only_first_matching_line() {
        let cart = Cart::new(vec![item("P2", 1, 400), item("P1", 1, 1000), item("P1", 5, 1000)]);
        let rule = ProductWiseRule {
            product_id: "P1".to_string(),
            discount: Percent::from_bps(5000),
        };

        let discount = product_wise(&cart, &rule, cart.subtotal().unwrap()).unwrap();

        assert_eq!(discount.amount.cents(), 500);
        assert_eq!(discount.adjustments[0].line, 1);
    }

    #[test]
    fn test_product_wise_errors() {
        let cart = Cart::new(vec![item("P1", 1, 1000)]);

        let missing = ProductWiseRule {
            product_id: "P9".to_string(),
            discount: Percent::from_bps(1000),
        };
        assert_eq!(
            product_wise(&cart, &missing, cart.subtotal().unwrap()),
            Err(CoreError::ProductNotInCart("P9".to_string()))
        );

        let no_product = ProductWiseRule {
            product_id: String::new(),
            discount: Percent::from_bps(1000),
        };
        assert_eq!(
            product_wise(&cart, &no_product, cart.subtotal().unwrap()),
            Err(CoreError::Validation(ValidationError::InvalidProductId))
        );

        for bps in [0, -100, 10_001] {
            let bad = ProductWiseRule {
                product_id: "P1".to_string(),
                discount: Percent::from_bps(bps),
            };
            assert!(matches!(
                product_wise(&cart, &bad, cart.subtotal().unwrap()),
                Err(CoreError::Validation(ValidationError::InvalidDiscount(_)))
            ));
        }
    }

    // -------------------------------------------------------------------------
    // buy-x-get-y
    // -------------------------------------------------------------------------

    #[test]
    fn test_bxgy_repetitions_capped_by_cart() {
        let cart = Cart::new(vec![item("P1", 5, 300), item("P2", 1, 1000)]);
        let rule = bxgy_rule(vec![("P1", 2)], vec![("P2", 1)], 3);

        let discount = buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()).unwrap();

        assert_eq!(discount.amount.cents(), 2000);
        assert_eq!(discount.subtotal.cents(), 2500);
        assert_eq!(
            discount.adjustments,
            vec![LineAdjustment {
                line: 1,
                extra_quantity: 2,
                discount: Money::from_cents(2000)
            }]
        );
    }

    #[test]
    fn test_bxgy_repetitions_capped_by_limit() {
        let cart = Cart::new(vec![item("P1", 20, 100), item("P2", 1, 500)]);
        let rule = bxgy_rule(vec![("P1", 2)], vec![("P2", 1)], 3);

        let discount = buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()).unwrap();

        assert_eq!(discount.adjustments[0].extra_quantity, 3);
        assert_eq!(discount.amount.cents(), 1500);
    }

    #[test]
    fn test_bxgy_uses_scarcest_buy_product() {
        let cart = Cart::new(vec![item("P1", 6, 100), item("P3", 2, 100), item("P2", 1, 700)]);
        let rule = bxgy_rule(vec![("P1", 2), ("P3", 1)], vec![("P2", 1)], 10);

        let discount = buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()).unwrap();

        assert_eq!(discount.adjustments[0].extra_quantity, 2);
        assert_eq!(discount.amount.cents(), 1400);
    }

    #[test]
    fn test_bxgy_line_discount_carries_running_total() {
        let cart = Cart::new(vec![item("P1", 4, 100), item("P2", 1, 1000), item("P3", 1, 300)]);
        let rule = bxgy_rule(vec![("P1", 2)], vec![("P2", 1), ("P3", 1)], 2);

        let discount = buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()).unwrap();

        // P2: 2 × $10 = $20 → line credited $20
        // P3: 2 × $3  = $6  → line credited the running $26
        assert_eq!(discount.amount.cents(), 2600);
        assert_eq!(discount.adjustments[0].discount.cents(), 2000);
        assert_eq!(discount.adjustments[1].discount.cents(), 2600);
    }

    #[test]
    fn test_bxgy_missing_get_product_contributes_nothing() {
        let cart = Cart::new(vec![item("P1", 2, 100)]);
        let rule = bxgy_rule(vec![("P1", 2)], vec![("P2", 1)], 1);

        let discount = buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()).unwrap();

        assert!(discount.amount.is_zero());
        assert!(discount.adjustments.is_empty());
    }

    #[test]
    fn test_bxgy_insufficient_buy_quantity() {
        let cart = Cart::new(vec![item("P1", 1, 100), item("P2", 1, 100)]);
        let rule = bxgy_rule(vec![("P1", 2)], vec![("P2", 1)], 3);

        assert_eq!(
            buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()),
            Err(CoreError::InsufficientBuyQuantity("B".to_string()))
        );
    }

    #[test]
    fn test_bxgy_huge_quantities_are_an_error() {
        let cart = Cart::new(vec![item("P1", 3, 100), item("P2", 1, 1000)]);

        // free quantity itself overflows
        let rule = bxgy_rule(vec![("P1", 1)], vec![("P2", i64::MAX / 2)], 3);
        assert_eq!(
            buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()),
            Err(CoreError::overflow())
        );

        // free quantity fits, its value does not
        let rule = bxgy_rule(vec![("P1", 1)], vec![("P2", i64::MAX / 100)], 1);
        assert_eq!(
            buy_x_get_y("B", &cart, &rule, cart.subtotal().unwrap()),
            Err(CoreError::overflow())
        );
    }

    #[test]
    fn test_calculate_rejects_overflowing_cart() {
        let cart = Cart::new(vec![item("P1", i64::MAX, 2)]);
        let coupon = Coupon::new(
            "CW",
            CouponRule::CartWide(cart_wide_rule(100, 1000, 0)),
        );

        assert_eq!(calculate(&cart, &coupon), Err(CoreError::overflow()));
    }

    #[test]
    fn test_bxgy_invalid_configs() {
        let cart = Cart::new(vec![item("P1", 4, 100)]);
        let bad_rules = [
            bxgy_rule(vec![], vec![("P2", 1)], 1),
            bxgy_rule(vec![("P1", 2)], vec![], 1),
            bxgy_rule(vec![("P1", 2)], vec![("P2", 1)], 0),
            bxgy_rule(vec![("P1", 0)], vec![("P2", 1)], 1),
            bxgy_rule(vec![("P1", 2)], vec![("P2", -1)], 1),
        ];

        for rule in &bad_rules {
            assert!(matches!(
                buy_x_get_y("B", &cart, rule, cart.subtotal().unwrap()),
                Err(CoreError::Validation(ValidationError::InvalidBxGyConfig { .. }))
            ));
        }
    }

    #[test]
    fn test_calculate_dispatches_by_rule() {
        let cart = Cart::new(vec![item("P1", 2, 5000)]);
        let coupon = Coupon::new(
            "C",
            CouponRule::CartWide(cart_wide_rule(5000, 1500, 0)),
        );

        let discount = calculate(&cart, &coupon).unwrap();
        assert_eq!(discount.amount.cents(), 1500);
        assert_eq!(discount.subtotal.cents(), 10_000);
    }
}
