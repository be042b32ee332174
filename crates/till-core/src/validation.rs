//! # Validation Module
//!
//! Input validation rules for Till.
//!
//! ## Item Rules
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Item Validation Order                              │
//! │                                                                         │
//! │  1. item present?            no → "item must be provided"              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  2. name non-blank?          no → "item name must be provided"         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  3. price present?           no → "item price must be provided"        │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  4. price >= 0?              no → "item price cannot be negative"      │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  OK (zero price is a free item)                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The order of checks is part of the contract: the first failing rule wins.
//!
//! ## Usage
//! ```rust
//! use till_core::validation::{validate_draft, validate_quantity};
//! use till_core::{ItemDraft, Money};
//!
//! let item = validate_draft(Some(ItemDraft::new("Burger", Money::from_cents(499)))).unwrap();
//! assert_eq!(item.name, "Burger");
//!
//! assert!(validate_quantity(0).is_err());
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::types::{Item, ItemDraft};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Item Validators
// =============================================================================

/// Validates caller-supplied item fields and builds an unsaved [`Item`].
///
/// `None` stands for "no item in the request".
pub fn validate_draft(draft: Option<ItemDraft>) -> ValidationResult<Item> {
    let draft = draft.ok_or(ValidationError::ItemMissing)?;
    let name = check_name(draft.name.as_deref())?;
    let price = check_price(draft.price)?;
    Ok(Item::new(name, price))
}

/// Re-validates a complete item (used after mutating a stored item).
///
/// ## Example
/// ```rust
/// use till_core::validation::validate_item;
/// use till_core::{Item, Money};
///
/// assert!(validate_item(Some(&Item::new("Fries", Money::zero()))).is_ok());
/// assert!(validate_item(Some(&Item::new("Fries", Money::from_cents(-1)))).is_err());
/// assert!(validate_item(None).is_err());
/// ```
pub fn validate_item(item: Option<&Item>) -> ValidationResult<()> {
    let item = item.ok_or(ValidationError::ItemMissing)?;
    check_name(Some(&item.name))?;
    check_price(Some(item.price))?;
    Ok(())
}

fn check_name(name: Option<&str>) -> ValidationResult<&str> {
    match name {
        Some(name) if !name.trim().is_empty() => Ok(name),
        _ => Err(ValidationError::NameMissing),
    }
}

fn check_price(price: Option<Money>) -> ValidationResult<Money> {
    let price = price.ok_or(ValidationError::PriceMissing)?;
    if price.is_negative() {
        return Err(ValidationError::NegativePrice);
    }
    Ok(price)
}

// =============================================================================
// Order Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - No upper bound
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty < 1 {
        return Err(ValidationError::QuantityTooSmall { quantity: qty });
    }

    Ok(())
}

/// Validates a tendered payment.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Zero is allowed (settles an empty order)
pub fn validate_payment(payment: Money) -> ValidationResult<()> {
    if payment.is_negative() {
        return Err(ValidationError::NegativePayment);
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
