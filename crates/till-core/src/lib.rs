//! # till-core: Pure Business Logic for Till
//!
//! This crate is the **heart** of Till. It contains all business logic
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Till Architecture                              │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    HTTP (till-api, axum)                        │   │
//! │  │    /item ──► /order ──► /order/:id/addItem ──► /order/:id/pay   │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                ItemService / OrderService                       │   │
//! │  │          one unit of work per operation                         │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ till-core (THIS CRATE) ★                        │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   order   │  │ validation│  │   │
//! │  │   │   Item    │  │   Money   │  │  accrue   │  │   item    │  │   │
//! │  │   │  Receipt  │  │  Decimal  │  │  settle   │  │  quantity │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    till-db (Repository Ports)                   │   │
//! │  │              SQLite, in-memory store, migrations                │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Item, LineItem, Order, Receipt)
//! - [`money`] - Money type with exact decimal arithmetic (no floating point!)
//! - [`order`] - Line-item accrual and settlement
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use till_core::{Item, ItemId, Money, Order, OrderId, Receipt};
//!
//! let burger = Item::new("itemName", Money::from_cents(1000));
//!
//! let mut order = Order { id: Some(OrderId(101)), ..Order::new() };
//! order.accrue(&burger, ItemId(3030), 1).unwrap();
//! order.accrue(&burger, ItemId(3030), 22).unwrap();
//!
//! let payment = Money::from_cents(30000);
//! order.settle(payment).unwrap();
//!
//! let receipt = Receipt::new(order, payment);
//! assert_eq!(receipt.change().unwrap(), Money::from_cents(7000));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod order;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================
// These allow users to do `use till_core::Money` instead of
// `use till_core::money::Money`

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use order::Accrual;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Quantity used when a caller adds an item without naming one.
pub const DEFAULT_QUANTITY: i64 = 1;
