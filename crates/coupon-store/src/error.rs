//! # Store Error Types
//!
//! Error types for coupon repository and engine operations.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Propagation                                    │
//! │                                                                         │
//! │  ValidationError / CoreError (coupon-core)                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  StoreError (this module) ← adds NotFound / AlreadyExists / NoChange   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  code() + status() ← what the HTTP layer sends back                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use coupon_core::{CoreError, ValidationError};
use serde::Serialize;
use thiserror::Error;

/// Coupon store and engine errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// No coupon with this id.
    #[error("Coupon not found: {0}")]
    NotFound(String),

    /// Create with an id that is already taken.
    #[error("Coupon '{0}' already exists")]
    AlreadyExists(String),

    /// Update carried no mergeable field.
    #[error("No changes provided for coupon {0}")]
    NoChange(String),

    /// Create/update payload broke a field rule.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The coupon cannot be applied to this cart.
    #[error("{0}")]
    Rejected(#[from] CoreError),
}

/// Machine-readable error codes for the boundary layer.
///
/// ## Mapping
/// ```text
/// NotFound ────────────────────────► NOT_FOUND              404
/// AlreadyExists ───────────────────► ALREADY_EXISTS         409
/// NoChange ────────────────────────► NO_CHANGE              400
/// Validation, Rejected(Validation) ► VALIDATION_ERROR       400
/// Rejected(anything else) ─────────► COUPON_NOT_APPLICABLE  422
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    NotFound,
    AlreadyExists,
    NoChange,
    ValidationError,
    CouponNotApplicable,
}

impl ErrorCode {
    /// HTTP status the boundary layer should answer with.
    pub const fn status(&self) -> u16 {
        match self {
            ErrorCode::NotFound => 404,
            ErrorCode::AlreadyExists => 409,
            ErrorCode::NoChange | ErrorCode::ValidationError => 400,
            ErrorCode::CouponNotApplicable => 422,
        }
    }
}

impl StoreError {
    pub fn not_found(id: impl Into<String>) -> Self {
        StoreError::NotFound(id.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            StoreError::NotFound(_) => ErrorCode::NotFound,
            StoreError::AlreadyExists(_) => ErrorCode::AlreadyExists,
            StoreError::NoChange(_) => ErrorCode::NoChange,
            StoreError::Validation(_) | StoreError::Rejected(CoreError::Validation(_)) => {
                ErrorCode::ValidationError
            }
            StoreError::Rejected(_) => ErrorCode::CouponNotApplicable,
        }
    }
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_codes() {
        assert_eq!(StoreError::not_found("X").code(), ErrorCode::NotFound);
        assert_eq!(
            StoreError::AlreadyExists("X".to_string()).code().status(),
            409
        );
        assert_eq!(
            StoreError::from(ValidationError::InvalidMaxUses(-1)).code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            StoreError::from(CoreError::from(ValidationError::InvalidProductId)).code(),
            ErrorCode::ValidationError
        );
        assert_eq!(
            StoreError::from(CoreError::EmptyCart).code(),
            ErrorCode::CouponNotApplicable
        );
    }

    #[test]
    fn test_rejected_message_is_the_core_message() {
        let err = StoreError::from(CoreError::AlreadyApplied("SAVE5".to_string()));
        assert_eq!(err.to_string(), "Coupon SAVE5 already applied");
    }

    #[test]
    fn test_error_code_serializes_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&ErrorCode::CouponNotApplicable).unwrap(),
            "\"COUPON_NOT_APPLICABLE\""
        );
    }
}
