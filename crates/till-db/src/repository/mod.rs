//! # Repository Module
//!
//! Persistence ports for Till and their SQLite implementations.
//!
//! ## Unit of Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    One Operation = One Unit of Work                     │
//! │                                                                         │
//! │  OrderService::pay(order_id, payment)                                  │
//! │       │                                                                 │
//! │       │  let mut uow = store.begin().await?;                           │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────┐                       │
//! │  │  UnitOfWork                                 │                       │
//! │  │  ├── items()      → ItemRepository          │                       │
//! │  │  ├── orders()     → OrderRepository         │                       │
//! │  │  ├── line_items() → LineItemRepository      │                       │
//! │  │  └── receipts()   → ReceiptRepository       │                       │
//! │  └─────────────────────────────────────────────┘                       │
//! │       │                                                                 │
//! │       ├── Ok  → uow.commit().await   (all writes become visible)       │
//! │       └── Err → uow.rollback() / drop (no write becomes visible)       │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Implementations
//!
//! - [`crate::Database`] / `SqliteUnitOfWork` - SQLite through sqlx
//! - [`crate::memory::MemoryStore`] - in-process store used by tests

use async_trait::async_trait;
use till_core::{Item, ItemId, LineItem, Order, OrderId, Receipt};

use crate::error::DbResult;

pub mod item;
pub mod order;
pub mod receipt;

// =============================================================================
// Ports
// =============================================================================

/// Catalog persistence.
#[async_trait]
pub trait ItemRepository: Send {
    /// Every catalog item, ordered by id.
    async fn find_all(&mut self) -> DbResult<Vec<Item>>;

    async fn find_by_id(&mut self, id: ItemId) -> DbResult<Option<Item>>;

    /// Inserts (assigning an id) or updates the item.
    async fn save(&mut self, item: Item) -> DbResult<Item>;
}

/// Order persistence. Orders are loaded together with their line items.
#[async_trait]
pub trait OrderRepository: Send {
    /// Every order, ordered by id.
    async fn find_all(&mut self) -> DbResult<Vec<Order>>;

    async fn find_by_id(&mut self, id: OrderId) -> DbResult<Option<Order>>;

    /// Inserts or updates the order, then saves every owned line item.
    async fn save(&mut self, order: Order) -> DbResult<Order>;
}

#[async_trait]
pub trait LineItemRepository: Send {
    /// Inserts (assigning an id) or updates the line item.
    async fn save(&mut self, line_item: LineItem) -> DbResult<LineItem>;
}

#[async_trait]
pub trait ReceiptRepository: Send {
    /// Inserts the receipt. Receipts are write-once.
    async fn save(&mut self, receipt: Receipt) -> DbResult<Receipt>;

    async fn find_by_order_id(&mut self, order_id: OrderId) -> DbResult<Option<Receipt>>;
}

// =============================================================================
// Unit of Work
// =============================================================================

/// A transaction spanning every repository.
///
/// Dropping a unit of work without calling [`UnitOfWork::commit`] discards
/// its writes.
#[async_trait]
pub trait UnitOfWork:
    ItemRepository + OrderRepository + LineItemRepository + ReceiptRepository + Sized
{
    fn items(&mut self) -> &mut dyn ItemRepository {
        self
    }

    fn orders(&mut self) -> &mut dyn OrderRepository {
        self
    }

    fn line_items(&mut self) -> &mut dyn LineItemRepository {
        self
    }

    fn receipts(&mut self) -> &mut dyn ReceiptRepository {
        self
    }

    async fn commit(self) -> DbResult<()>;

    async fn rollback(self) -> DbResult<()>;
}

/// Source of units of work. Cheap to clone; shared by every service.
#[async_trait]
pub trait Store: Clone + Send + Sync + 'static {
    type Tx: UnitOfWork + 'static;

    async fn begin(&self) -> DbResult<Self::Tx>;

    /// `true` when the backing storage answers queries.
    async fn health_check(&self) -> bool;
}
