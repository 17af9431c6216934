//! # coupon-store: Coupon Storage and Discount Engine
//!
//! This crate owns the coupon table and applies coupons to carts on top of
//! the pure rules in `coupon-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Coupon Engine Data Flow                          │
//! │                                                                         │
//! │  HTTP handler (apply_coupon)                                           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  coupon-store (THIS CRATE)                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │DiscountEngine │    │  Repository   │    │    Seed      │  │   │
//! │  │   │  (engine.rs)  │    │  (memory.rs)  │    │  (seed.rs)   │  │   │
//! │  │   │               │    │               │    │              │  │   │
//! │  │   │ apply_coupon  │───►│ DashMap       │◄───│ coupons.json │  │   │
//! │  │   │ find_applic.. │    │ per-entry lock│    │              │  │   │
//! │  │   └───────────────┘    └───────────────┘    └──────────────┘  │   │
//! │  │                                                                 │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  coupon-core (guard, calculators, validation)                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`engine`] - Cart discount orchestrator
//! - [`repository`] - `CouponRepository` trait and the in-memory store
//! - [`config`] - Environment-driven configuration
//! - [`seed`] - Loading coupons from JSON
//! - [`error`] - Store error types and boundary error codes
//!
//! ## Usage
//!
//! ```rust
//! use coupon_core::{AppliedCoupons, Cart, CartItem, CartWideRule, Coupon, CouponRule, Money, Percent};
//! use coupon_store::{DiscountEngine, InMemoryCouponStore};
//!
//! let engine = DiscountEngine::new(InMemoryCouponStore::new());
//! engine
//!     .create_coupon(Coupon::new(
//!         "TEN-OFF",
//!         CouponRule::CartWide(CartWideRule {
//!             threshold: Money::from_cents(5000),
//!             discount: Percent::from_bps(1000),
//!             min_cart_value: Money::zero(),
//!         }),
//!     ))
//!     .unwrap();
//!
//! let cart = Cart::new(vec![CartItem::new("P1", 3, Money::from_cents(2000))]);
//! let updated = engine
//!     .apply_coupon(&cart, "TEN-OFF", &mut AppliedCoupons::new())
//!     .unwrap();
//!
//! assert_eq!(updated.final_price.cents(), 5400);
//! assert_eq!(engine.get_coupon("TEN-OFF").unwrap().uses, 1);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod config;
pub mod engine;
pub mod error;
pub mod repository;
pub mod seed;

// =============================================================================
// Re-exports
// =============================================================================

pub use config::{ConfigError, StoreConfig};
pub use engine::DiscountEngine;
pub use error::{ErrorCode, StoreError, StoreResult};
pub use repository::{CouponRepository, InMemoryCouponStore};
pub use seed::{load_coupons, parse_coupons, seed_store, SeedError};
