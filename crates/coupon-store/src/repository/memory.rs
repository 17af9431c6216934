//! # In-Memory Coupon Store
//!
//! `CouponRepository` backed by a `DashMap`.
//!
//! ## Locking
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DashMap shards the table; get_mut holds the entry's shard lock        │
//! │                                                                         │
//! │  redeem("A")  ──► lock(A) ─ evaluate ─ uses += 1 ─ unlock              │
//! │  redeem("A")  ──────────────────────────────────► lock(A) ─ ...        │
//! │  redeem("B")  ──► lock(B) ─ ...   (other shard: runs in parallel)      │
//! │                                                                         │
//! │  The guard's `uses < max_uses` check and the increment cannot be       │
//! │  interleaved by another request for the same coupon.                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cloning the store is cheap and every clone sees the same table.

use std::sync::Arc;

use coupon_core::{Coupon, CoreResult, CouponPatch};
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use tracing::debug;

use super::{merge_patch, prepare_create, CouponRepository};
use crate::error::{StoreError, StoreResult};

/// Process-local coupon table.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCouponStore {
    coupons: Arc<DashMap<String, Coupon>>,
}

impl InMemoryCouponStore {
    pub fn new() -> Self {
        InMemoryCouponStore::default()
    }

    pub fn len(&self) -> usize {
        self.coupons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coupons.is_empty()
    }
}

impl CouponRepository for InMemoryCouponStore {
    fn create(&self, coupon: Coupon) -> StoreResult<()> {
        prepare_create(&coupon)?;

        match self.coupons.entry(coupon.id.clone()) {
            Entry::Occupied(_) => Err(StoreError::AlreadyExists(coupon.id)),
            Entry::Vacant(slot) => {
                debug!(coupon_id = %coupon.id, coupon_type = %coupon.coupon_type(), "Coupon created");
                slot.insert(coupon);
                Ok(())
            }
        }
    }

    fn get(&self, id: &str) -> StoreResult<Coupon> {
        self.coupons
            .get(id)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| StoreError::not_found(id))
    }

    fn update(&self, id: &str, patch: &CouponPatch) -> StoreResult<()> {
        let mut entry = self
            .coupons
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let merged = merge_patch(entry.value(), patch)?;
        *entry.value_mut() = merged;

        debug!(coupon_id = %id, "Coupon updated");
        Ok(())
    }

    fn delete(&self, id: &str) -> StoreResult<()> {
        if self.coupons.remove(id).is_none() {
            return Err(StoreError::not_found(id));
        }

        debug!(coupon_id = %id, "Coupon deleted");
        Ok(())
    }

    fn list(&self) -> Vec<Coupon> {
        self.coupons
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    fn redeem<T, F>(&self, id: &str, evaluate: F) -> StoreResult<T>
    where
        F: FnOnce(&Coupon) -> CoreResult<T>,
    {
        let mut entry = self
            .coupons
            .get_mut(id)
            .ok_or_else(|| StoreError::not_found(id))?;

        let outcome = evaluate(entry.value())?;

        let coupon = entry.value_mut();
        coupon.uses += 1;
        debug!(
            coupon_id = %id,
            uses = coupon.uses,
            max_uses = coupon.max_uses,
            "Coupon redeemed"
        );

        Ok(outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
