//! # Coupon Seeder
//!
//! Loads coupons into an in-memory store, then prints which of them fit a
//! demo cart and applies the best one.
//!
//! ## Usage
//! ```bash
//! # Built-in demo coupons
//! cargo run -p coupon-store --bin seed
//!
//! # Coupons from a file, with debug logs from the store
//! COUPON_SEED_FILE=./coupons.json COUPON_LOG=coupon_store=debug \
//!     cargo run -p coupon-store --bin seed
//! ```

use std::error::Error;

use chrono::{Duration, Utc};
use coupon_core::{
    AppliedCoupons, BuyXGetYRule, Cart, CartItem, CartWideRule, Coupon, CouponRule, Money,
    Percent, ProductQuantity, ProductWiseRule,
};
use coupon_store::{load_coupons, seed_store, DiscountEngine, InMemoryCouponStore, StoreConfig};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), Box<dyn Error>> {
    let config = StoreConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.log_filter))
        .init();

    let coupons = match &config.seed_file {
        Some(path) => {
            info!(path = %path.display(), "Loading seed file");
            load_coupons(path)?
        }
        None => demo_coupons(),
    };

    let engine = DiscountEngine::new(InMemoryCouponStore::new());
    seed_store(engine.coupons(), coupons)?;

    let cart = demo_cart();
    println!("Cart subtotal: {}", cart.subtotal()?);

    let applicable = engine.find_applicable_coupons(&cart);
    if applicable.is_empty() {
        println!("No applicable coupons");
        return Ok(());
    }

    println!("Applicable coupons:");
    for entry in &applicable {
        println!(
            "  {:<16} {:<14} -{}",
            entry.coupon_id, entry.coupon_type, entry.discount
        );
    }

    let best = &applicable[0];
    let updated = engine.apply_coupon(&cart, &best.coupon_id, &mut AppliedCoupons::new())?;
    println!(
        "Applied {}: total {} discount {} final {}",
        best.coupon_id, updated.total_price, updated.total_discount, updated.final_price
    );

    Ok(())
}

fn demo_cart() -> Cart {
    Cart::new(vec![
        CartItem::new("COFFEE-BEANS", 4, Money::from_cents(1299)),
        CartItem::new("MUG", 1, Money::from_cents(899)),
        CartItem::new("FILTERS", 2, Money::from_cents(450)),
    ])
}

fn demo_coupons() -> Vec<Coupon> {
    let month = Utc::now() + Duration::days(30);

    vec![
        Coupon::new(
            "WELCOME10",
            CouponRule::CartWide(CartWideRule {
                threshold: Money::from_cents(5000),
                discount: Percent::from_bps(1000),
                min_cart_value: Money::from_cents(2000),
            }),
        )
        .with_max_uses(100)
        .with_expiry(month),
        Coupon::new(
            "BEANS25",
            CouponRule::ProductWise(ProductWiseRule {
                product_id: "COFFEE-BEANS".to_string(),
                discount: Percent::from_bps(2500),
            }),
        )
        .with_max_uses(50),
        Coupon::new(
            "BEANS-FREE-MUG",
            CouponRule::BuyXGetY(BuyXGetYRule {
                buy_products: vec![ProductQuantity::new("COFFEE-BEANS", 2)],
                get_products: vec![ProductQuantity::new("MUG", 1)],
                repetition_limit: 1,
            }),
        )
        .with_max_uses(20)
        .exclusive(),
        Coupon::issue(CouponRule::CartWide(CartWideRule {
            threshold: Money::from_cents(50_000),
            discount: Percent::from_bps(2000),
            min_cart_value: Money::zero(),
        })),
    ]
}
