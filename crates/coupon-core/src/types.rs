//! # Domain Types
//!
//! Coupon definitions and the per-operation applied set.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Coupon                                          │
//! │  id · expiry_date · max_uses · uses · exclusive · excluded_products     │
//! │                           │                                             │
//! │                    rule: CouponRule  (tagged by "type")                 │
//! │        ┌──────────────────┼───────────────────────┐                     │
//! │        ▼                  ▼                       ▼                     │
//! │  ┌────────────┐    ┌──────────────┐     ┌──────────────────┐            │
//! │  │ cart-wide  │    │ product-wise │     │   buy-x-get-y    │            │
//! │  │ threshold  │    │ product_id   │     │ buy_products     │            │
//! │  │ discount   │    │ discount     │     │ get_products     │            │
//! │  │ min_cart_  │    └──────────────┘     │ repetition_limit │            │
//! │  │   value    │                         └──────────────────┘            │
//! │  └────────────┘                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Only the fields that matter for a coupon's type exist on its rule, so a
//! product-wise coupon cannot carry a stray threshold.

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

use crate::error::CoreError;
use crate::money::{Money, Percent};

// =============================================================================
// Coupon Type
// =============================================================================

/// The discount algorithm a coupon uses.
///
/// Deserializes through [`FromStr`], so the legacy names parse too.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(try_from = "String")]
pub enum CouponType {
    #[serde(rename = "cart-wide")]
    CartWide,
    #[serde(rename = "product-wise")]
    ProductWise,
    #[serde(rename = "buy-x-get-y")]
    BuyXGetY,
}

impl CouponType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            CouponType::CartWide => "cart-wide",
            CouponType::ProductWise => "product-wise",
            CouponType::BuyXGetY => "buy-x-get-y",
        }
    }
}

impl fmt::Display for CouponType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Parses a type name coming in from the boundary.
///
/// Accepts the legacy names `cart-wise` and `bxgy` as well. An empty or
/// unknown name is `UnsupportedCouponType`; once parsed, a coupon always has
/// a known type.
impl FromStr for CouponType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "cart-wide" | "cart-wise" => Ok(CouponType::CartWide),
            "product-wise" => Ok(CouponType::ProductWise),
            "buy-x-get-y" | "bxgy" => Ok(CouponType::BuyXGetY),
            other => Err(CoreError::UnsupportedCouponType(other.to_string())),
        }
    }
}

impl TryFrom<String> for CouponType {
    type Error = CoreError;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        name.parse()
    }
}

// =============================================================================
// Coupon Rules
// =============================================================================

/// A (product, quantity) pair in a buy-x-get-y bundle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantity {
    pub product_id: String,
    pub quantity: i64,
}

impl ProductQuantity {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        ProductQuantity {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// Percentage off the whole cart once the subtotal reaches a threshold.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CartWideRule {
    /// Minimum subtotal to qualify.
    pub threshold: Money,
    pub discount: Percent,
    /// Additional minimum-subtotal gate; zero disables it.
    #[serde(default)]
    pub min_cart_value: Money,
}

/// Percentage off the first cart line carrying one product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct ProductWiseRule {
    pub product_id: String,
    pub discount: Percent,
}

/// Buy a bundle of products, get another bundle free.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BuyXGetYRule {
    pub buy_products: Vec<ProductQuantity>,
    pub get_products: Vec<ProductQuantity>,
    /// Most times the bundle may repeat in one application.
    pub repetition_limit: i64,
}

/// The type-specific half of a coupon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(tag = "type")]
pub enum CouponRule {
    #[serde(rename = "cart-wide", alias = "cart-wise")]
    CartWide(CartWideRule),
    #[serde(rename = "product-wise")]
    ProductWise(ProductWiseRule),
    #[serde(rename = "buy-x-get-y", alias = "bxgy")]
    BuyXGetY(BuyXGetYRule),
}

impl CouponRule {
    pub fn coupon_type(&self) -> CouponType {
        match self {
            CouponRule::CartWide(_) => CouponType::CartWide,
            CouponRule::ProductWise(_) => CouponType::ProductWise,
            CouponRule::BuyXGetY(_) => CouponType::BuyXGetY,
        }
    }

    /// The percentage discount, for the types that have one.
    pub fn discount(&self) -> Option<Percent> {
        match self {
            CouponRule::CartWide(rule) => Some(rule.discount),
            CouponRule::ProductWise(rule) => Some(rule.discount),
            CouponRule::BuyXGetY(_) => None,
        }
    }

    /// Re-shapes the rule as another type.
    ///
    /// `discount` survives a switch between cart-wide and product-wise;
    /// every other field starts from its default and has to be supplied by
    /// the same update.
    fn retyped(&self, kind: CouponType) -> CouponRule {
        let discount = self.discount().unwrap_or_default();
        match kind {
            CouponType::CartWide => CouponRule::CartWide(CartWideRule {
                discount,
                ..CartWideRule::default()
            }),
            CouponType::ProductWise => CouponRule::ProductWise(ProductWiseRule {
                discount,
                ..ProductWiseRule::default()
            }),
            CouponType::BuyXGetY => CouponRule::BuyXGetY(BuyXGetYRule::default()),
        }
    }
}

// =============================================================================
// Coupon
// =============================================================================

/// A stored coupon definition.
///
/// ## Lifecycle
/// ```text
/// create ──► (update)* ──► apply ──► apply ──► ... ──► delete
///                            │
///                            └── uses += 1 on every success, never past max_uses
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Coupon {
    /// Unique key in the coupon store.
    pub id: String,

    pub rule: CouponRule,

    /// Unusable once the current time is past this instant.
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<DateTime<Utc>>,

    /// Usage budget. Zero means the coupon can never be applied.
    #[serde(default)]
    pub max_uses: i64,

    /// Successful applications so far.
    #[serde(default)]
    pub uses: i64,

    /// Must be the only coupon applied in a cart operation.
    #[serde(default)]
    pub exclusive: bool,

    /// Carried for clients; no discount rule reads it.
    #[serde(default)]
    pub excluded_products: Vec<String>,
}

impl Coupon {
    /// Creates a coupon with a budget of one use.
    pub fn new(id: impl Into<String>, rule: CouponRule) -> Self {
        Coupon {
            id: id.into(),
            rule,
            expiry_date: None,
            max_uses: 1,
            uses: 0,
            exclusive: false,
            excluded_products: Vec::new(),
        }
    }

    /// Creates a coupon with a generated UUID v4 id.
    pub fn issue(rule: CouponRule) -> Self {
        Coupon::new(Uuid::new_v4().to_string(), rule)
    }

    pub fn with_max_uses(mut self, max_uses: i64) -> Self {
        self.max_uses = max_uses;
        self
    }

    pub fn with_expiry(mut self, expiry_date: DateTime<Utc>) -> Self {
        self.expiry_date = Some(expiry_date);
        self
    }

    pub fn exclusive(mut self) -> Self {
        self.exclusive = true;
        self
    }

    pub fn coupon_type(&self) -> CouponType {
        self.rule.coupon_type()
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        matches!(self.expiry_date, Some(expiry) if expiry < now)
    }

    /// Sparse-merges an update into this coupon.
    ///
    /// ## Merge Rules
    /// - A field overwrites the stored one only when present: `Some` and
    ///   non-zero / non-empty
    /// - A present `coupon_type` different from the current one re-shapes
    ///   the rule first, then the rest of the patch lands on the new shape
    /// - Fields that do not belong to the resulting type are ignored
    /// - `exclusive` is ALWAYS overwritten, even with `false`
    ///
    /// Validation and the "nothing to change" check belong to the caller.
    pub fn merge(&mut self, patch: &CouponPatch) {
        if let Some(kind) = patch.coupon_type {
            if kind != self.coupon_type() {
                self.rule = self.rule.retyped(kind);
            }
        }

        match &mut self.rule {
            CouponRule::CartWide(rule) => {
                if let Some(threshold) = patch.present_threshold() {
                    rule.threshold = threshold;
                }
                if let Some(discount) = patch.present_discount() {
                    rule.discount = discount;
                }
                if let Some(min_cart_value) = patch.present_min_cart_value() {
                    rule.min_cart_value = min_cart_value;
                }
            }
            CouponRule::ProductWise(rule) => {
                if let Some(product_id) = patch.present_product_id() {
                    rule.product_id = product_id.to_string();
                }
                if let Some(discount) = patch.present_discount() {
                    rule.discount = discount;
                }
            }
            CouponRule::BuyXGetY(rule) => {
                if let Some(buy_products) = patch.present_buy_products() {
                    rule.buy_products = buy_products.to_vec();
                }
                if let Some(get_products) = patch.present_get_products() {
                    rule.get_products = get_products.to_vec();
                }
                if let Some(limit) = patch.present_repetition_limit() {
                    rule.repetition_limit = limit;
                }
            }
        }

        if let Some(expiry_date) = patch.expiry_date {
            self.expiry_date = Some(expiry_date);
        }
        if let Some(max_uses) = patch.present_max_uses() {
            self.max_uses = max_uses;
        }
        self.exclusive = patch.exclusive;
    }
}

// =============================================================================
// Coupon Patch
// =============================================================================

/// A partial coupon sent to update.
///
/// Flat on purpose: clients send whichever fields they want to change
/// without restating the type. `uses` is not patchable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CouponPatch {
    #[serde(rename = "type", default)]
    pub coupon_type: Option<CouponType>,
    #[serde(default)]
    pub threshold: Option<Money>,
    #[serde(default)]
    pub discount: Option<Percent>,
    #[serde(default)]
    pub min_cart_value: Option<Money>,
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub buy_products: Option<Vec<ProductQuantity>>,
    #[serde(default)]
    pub get_products: Option<Vec<ProductQuantity>>,
    #[serde(default)]
    pub repetition_limit: Option<i64>,
    #[serde(default)]
    #[ts(as = "Option<String>")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub max_uses: Option<i64>,
    /// Always written on update.
    #[serde(default)]
    pub exclusive: bool,
}

impl CouponPatch {
    /// True when every field is absent or zero / empty.
    ///
    /// `exclusive` does not count: a patch carrying only `exclusive` is
    /// still "no changes". A non-zero value that `merge` then ignores (a
    /// negative `repetition_limit`, say) still makes the patch non-empty.
    pub fn is_empty(&self) -> bool {
        self.coupon_type.is_none()
            && self.threshold.map_or(true, |threshold| threshold.is_zero())
            && self.discount.map_or(true, |discount| discount.bps() == 0)
            && self.min_cart_value.map_or(true, |min| min.is_zero())
            && self.max_uses.map_or(true, |max_uses| max_uses == 0)
            && self.product_id.as_deref().map_or(true, str::is_empty)
            && self.expiry_date.is_none()
            && self.buy_products.as_deref().map_or(true, <[_]>::is_empty)
            && self.get_products.as_deref().map_or(true, <[_]>::is_empty)
            && self.repetition_limit.map_or(true, |limit| limit == 0)
    }

    fn present_threshold(&self) -> Option<Money> {
        self.threshold.filter(Money::is_positive)
    }

    fn present_discount(&self) -> Option<Percent> {
        self.discount.filter(Percent::is_positive)
    }

    fn present_min_cart_value(&self) -> Option<Money> {
        self.min_cart_value.filter(Money::is_positive)
    }

    fn present_max_uses(&self) -> Option<i64> {
        self.max_uses.filter(|max_uses| *max_uses > 0)
    }

    fn present_product_id(&self) -> Option<&str> {
        self.product_id.as_deref().filter(|id| !id.is_empty())
    }

    fn present_buy_products(&self) -> Option<&[ProductQuantity]> {
        self.buy_products.as_deref().filter(|products| !products.is_empty())
    }

    fn present_get_products(&self) -> Option<&[ProductQuantity]> {
        self.get_products.as_deref().filter(|products| !products.is_empty())
    }

    fn present_repetition_limit(&self) -> Option<i64> {
        self.repetition_limit.filter(|limit| *limit > 0)
    }
}

// =============================================================================
// Applied Coupons
// =============================================================================

/// Coupon ids already applied in the current cart operation.
///
/// Start a fresh set for every cart operation. Coupons are inserted only
/// after a successful application.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppliedCoupons(HashSet<String>);

impl AppliedCoupons {
    pub fn new() -> Self {
        AppliedCoupons::default()
    }

    pub fn contains(&self, coupon_id: &str) -> bool {
        self.0.contains(coupon_id)
    }

    /// Returns false if the id was already present.
    pub fn insert(&mut self, coupon_id: impl Into<String>) -> bool {
        self.0.insert(coupon_id.into())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
