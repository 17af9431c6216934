//! # coupon-core: Pure Discount Logic
//!
//! This crate decides whether a coupon fits a cart and what it is worth.
//! Everything here is a pure function over borrowed data: no storage, no
//! clock reads, no logging.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coupon Engine Architecture                       │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │              HTTP layer (outside this workspace)                │   │
//! │  │   POST /coupons · PUT /coupons/{id} · POST /apply-coupon/{id}   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │           coupon-store (repository + DiscountEngine)            │   │
//! │  │     fetch coupon ─► evaluate ─► uses += 1 ─► updated cart       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ coupon-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │  ┌─────────┐ ┌──────────┐ ┌───────┐ ┌────────────┐ ┌─────────┐ │   │
//! │  │  │  money  │ │validation│ │ guard │ │ calculator │ │evaluate │ │   │
//! │  │  │ Money   │ │ coupon   │ │ 5     │ │ cart-wide  │ │ guard + │ │   │
//! │  │  │ Percent │ │ + patch  │ │checks │ │ product    │ │ calc +  │ │   │
//! │  │  └─────────┘ └──────────┘ └───────┘ │ bxgy       │ │ fold    │ │   │
//! │  │                                      └────────────┘ └─────────┘ │   │
//! │  │   NO I/O • NO STORAGE • NO LOGGING • PURE FUNCTIONS            │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Integer-cent `Money` and basis-point `Percent`
//! - [`cart`] - `Cart` and `CartItem`
//! - [`types`] - `Coupon`, `CouponRule`, `CouponPatch`, `AppliedCoupons`
//! - [`validation`] - Static coupon field rules
//! - [`guard`] - Whether a coupon may join the current cart operation
//! - [`calculator`] - The three discount algorithms
//! - [`evaluate`] - Guard + calculator, and folding the result into a cart
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use chrono::Utc;
//! use coupon_core::{
//!     evaluate, AppliedCoupons, Cart, CartItem, CartWideRule, Coupon, CouponRule, Money, Percent,
//! };
//!
//! let coupon = Coupon::new(
//!     "TEN-OFF",
//!     CouponRule::CartWide(CartWideRule {
//!         threshold: Money::from_cents(5000),
//!         discount: Percent::from_bps(1000),
//!         min_cart_value: Money::zero(),
//!     }),
//! );
//! let mut cart = Cart::new(vec![CartItem::new("P1", 3, Money::from_cents(2000))]);
//! let mut applied = AppliedCoupons::new();
//!
//! let evaluation = evaluate(&cart, &coupon, &applied, Utc::now()).unwrap();
//! evaluation.apply_to(&mut cart, &mut applied).unwrap();
//!
//! assert_eq!(cart.total_discount.cents(), 600);
//! assert_eq!(cart.final_price.cents(), 5400);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod calculator;
pub mod cart;
pub mod error;
pub mod evaluate;
pub mod guard;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use calculator::{Discount, LineAdjustment};
pub use cart::{Cart, CartItem};
pub use error::{CoreError, CoreResult, ValidationError};
pub use evaluate::{ensure_not_empty, evaluate, ApplicableCoupon, Evaluation};
pub use money::{Money, Percent};
pub use types::*;
