//! # Error Types
//!
//! Domain-specific error types for till-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  till-core errors (this file)                                          │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Field validation failures                      │
//! │                                                                         │
//! │  till-db errors (separate crate)                                       │
//! │  └── DbError          - Storage failures (never retried)               │
//! │                                                                         │
//! │  till-api errors (in app)                                              │
//! │  ├── ServiceError     - CoreError | DbError                            │
//! │  └── ApiError         - What HTTP clients see (status + message)       │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ServiceError → ApiError → Client  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` text is the message shown to the client
//! 3. Errors are enum variants, never String

use thiserror::Error;

use crate::money::Money;
use crate::types::{ItemId, OrderId};

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
///
/// None of these are transient: callers recover by supplying corrected
/// input, nothing is retried internally.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Item failed catalog validation.
    #[error("{0}")]
    InvalidItem(ValidationError),

    /// Requested line quantity is not usable.
    #[error("{0}")]
    InvalidQuantity(ValidationError),

    /// Tendered amount is not usable.
    #[error("{0}")]
    InvalidPayment(ValidationError),

    /// Tendered payment is below the order total.
    ///
    /// ## User Workflow
    /// ```text
    /// Order total: 10.01
    ///      │
    ///      ▼
    /// pay(10.00)
    ///      │
    ///      ▼
    /// InsufficientPayment { total: 10.01, payment: 10.00 }
    ///      │
    ///      ▼
    /// Order stays unpaid, no receipt is written
    /// ```
    #[error("insufficient payment")]
    InsufficientPayment { total: Money, payment: Money },

    /// Item id does not resolve.
    #[error("item not found: {0}")]
    ItemNotFound(ItemId),

    /// Order id does not resolve.
    #[error("order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order has no receipt (it has not been paid).
    #[error("receipt not found for order: {0}")]
    ReceiptNotFound(OrderId),

    /// The order was already settled and can no longer change.
    #[error("order {0} is already paid")]
    OrderAlreadyPaid(OrderId),

    /// A line total, order total or change does not fit in `Money`.
    #[error("amount is too large")]
    AmountOverflow,
}

impl CoreError {
    /// True for the variants a presentation layer reports as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::ItemNotFound(_) | CoreError::OrderNotFound(_) | CoreError::ReceiptNotFound(_)
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field validation errors.
///
/// The messages are part of the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("item must be provided")]
    ItemMissing,

    #[error("item name must be provided")]
    NameMissing,

    #[error("item price must be provided")]
    PriceMissing,

    #[error("item price cannot be negative")]
    NegativePrice,

    #[error("quantity must be at least 1")]
    QuantityTooSmall { quantity: i64 },

    #[error("quantity is too large")]
    QuantityOverflow,

    #[error("payment cannot be negative")]
    NegativePayment,
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
