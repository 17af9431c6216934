//! # Seed Loading
//!
//! Reads coupon definitions from a JSON file and inserts them into a store.
//!
//! ## File Format
//! A JSON array of coupons. Amounts are integer cents, percentages are
//! basis points:
//! ```json
//! [
//!   {
//!     "id": "TEN-OFF",
//!     "rule": { "type": "cart-wide", "threshold": 10000, "discount": 1000 },
//!     "maxUses": 100
//!   }
//! ]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use coupon_core::Coupon;
use thiserror::Error;
use tracing::{info, warn};

use crate::error::{StoreError, StoreResult};
use crate::repository::CouponRepository;

/// Seed file errors.
#[derive(Debug, Error)]
pub enum SeedError {
    #[error("Failed to read seed file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid seed data: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parses a JSON array of coupons.
pub fn parse_coupons(json: &str) -> Result<Vec<Coupon>, SeedError> {
    Ok(serde_json::from_str(json)?)
}

/// Reads and parses a seed file.
pub fn load_coupons(path: &Path) -> Result<Vec<Coupon>, SeedError> {
    let json = fs::read_to_string(path).map_err(|source| SeedError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_coupons(&json)
}

/// Inserts every coupon, skipping ids that already exist.
///
/// Returns how many coupons were inserted. Any other error stops the load.
pub fn seed_store<R: CouponRepository>(repo: &R, coupons: Vec<Coupon>) -> StoreResult<usize> {
    let mut inserted = 0;

    for coupon in coupons {
        let id = coupon.id.clone();
        match repo.create(coupon) {
            Ok(()) => inserted += 1,
            Err(StoreError::AlreadyExists(_)) => {
                warn!(coupon_id = %id, "Skipping duplicate seed coupon");
            }
            Err(err) => return Err(err),
        }
    }

    info!(count = inserted, "Seeded coupons");
    Ok(inserted)
}
