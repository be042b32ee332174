//! # In-Memory Store
//!
//! A [`Store`] that keeps every table in process memory. Used by service
//! and API tests so they run without SQLite.
//!
//! ## Transaction Model
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  MemoryStore { state: Arc<Mutex<MemoryState>> }                        │
//! │       │                                                                 │
//! │       │  begin()  → lock_owned().await   (one unit of work at a time)  │
//! │       ▼                                                                 │
//! │  MemoryUnitOfWork                                                      │
//! │  ├── guard:   OwnedMutexGuard<MemoryState>   (committed state)         │
//! │  └── working: MemoryState                    (private copy)            │
//! │       │                                                                 │
//! │       ├── commit()   → *guard = working                                │
//! │       └── rollback() / drop → working discarded                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Units of work are serialized, so the read-modify-write of a line-item
//! quantity can never lose an update here. The store enforces the same
//! keys and references as the SQLite schema: a line item needs an existing
//! order and item, one line per item per order, one receipt per order.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{
    ItemRepository, LineItemRepository, OrderRepository, ReceiptRepository, Store, UnitOfWork,
};
use till_core::{Item, ItemId, LineItem, LineItemId, Money, Order, OrderId, Receipt, ReceiptId};

/// A committed write, recorded in commit order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Write {
    ItemSaved(ItemId),
    OrderSaved(OrderId),
    LineItemSaved(LineItemId),
    ReceiptSaved(ReceiptId),
}

#[derive(Debug, Clone)]
struct ReceiptRecord {
    order_id: OrderId,
    payment: Money,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default)]
struct Sequences {
    items: i64,
    orders: i64,
    line_items: i64,
    receipts: i64,
}

fn next(seq: &mut i64) -> i64 {
    *seq += 1;
    *seq
}

#[derive(Debug, Clone, Default)]
struct MemoryState {
    items: BTreeMap<ItemId, Item>,
    /// Order id → paid flag. Line items live in their own table.
    orders: BTreeMap<OrderId, bool>,
    line_items: BTreeMap<LineItemId, LineItem>,
    receipts: BTreeMap<ReceiptId, ReceiptRecord>,
    sequences: Sequences,
    journal: Vec<Write>,
}

impl MemoryState {
    fn load_order(&self, id: OrderId) -> Option<Order> {
        let paid = *self.orders.get(&id)?;
        let line_items = self
            .line_items
            .values()
            .filter(|line| line.order_id == id)
            .cloned()
            .collect();
        Some(Order {
            id: Some(id),
            paid,
            line_items,
        })
    }
}

/// In-process [`Store`]. Clones share the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore::default()
    }

    /// Every committed write so far, oldest first.
    pub async fn journal(&self) -> Vec<Write> {
        self.state.lock().await.journal.clone()
    }
}

#[async_trait]
impl Store for MemoryStore {
    type Tx = MemoryUnitOfWork;

    async fn begin(&self) -> DbResult<MemoryUnitOfWork> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let working = guard.clone();
        Ok(MemoryUnitOfWork { guard, working })
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Unit of work over a private copy of the [`MemoryStore`] state.
pub struct MemoryUnitOfWork {
    guard: OwnedMutexGuard<MemoryState>,
    working: MemoryState,
}

impl std::fmt::Debug for MemoryUnitOfWork {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryUnitOfWork")
            .field("pending", &(self.working.journal.len() - self.guard.journal.len()))
            .finish()
    }
}

#[async_trait]
impl UnitOfWork for MemoryUnitOfWork {
    async fn commit(self) -> DbResult<()> {
        let MemoryUnitOfWork { mut guard, working } = self;
        debug!(
            writes = working.journal.len() - guard.journal.len(),
            "Committing memory unit of work"
        );
        *guard = working;
        Ok(())
    }

    async fn rollback(self) -> DbResult<()> {
        debug!("Rolling back memory unit of work");
        Ok(())
    }
}

#[async_trait]
impl ItemRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> DbResult<Vec<Item>> {
        Ok(self.working.items.values().cloned().collect())
    }

    async fn find_by_id(&mut self, id: ItemId) -> DbResult<Option<Item>> {
        Ok(self.working.items.get(&id).cloned())
    }

    async fn save(&mut self, mut item: Item) -> DbResult<Item> {
        let state = &mut self.working;
        let id = match item.id {
            Some(id) if !state.items.contains_key(&id) => {
                return Err(DbError::not_found("Item", id));
            }
            Some(id) => id,
            None => ItemId(next(&mut state.sequences.items)),
        };

        item.id = Some(id);
        state.items.insert(id, item.clone());
        state.journal.push(Write::ItemSaved(id));
        Ok(item)
    }
}

#[async_trait]
impl OrderRepository for MemoryUnitOfWork {
    async fn find_all(&mut self) -> DbResult<Vec<Order>> {
        let state = &self.working;
        Ok(state
            .orders
            .keys()
            .filter_map(|id| state.load_order(*id))
            .collect())
    }

    async fn find_by_id(&mut self, id: OrderId) -> DbResult<Option<Order>> {
        Ok(self.working.load_order(id))
    }

    async fn save(&mut self, mut order: Order) -> DbResult<Order> {
        let state = &mut self.working;
        let id = match order.id {
            Some(id) if !state.orders.contains_key(&id) => {
                return Err(DbError::not_found("Order", id));
            }
            Some(id) => id,
            None => OrderId(next(&mut state.sequences.orders)),
        };

        state.orders.insert(id, order.paid);
        state.journal.push(Write::OrderSaved(id));
        order.id = Some(id);

        let mut saved = Vec::with_capacity(order.line_items.len());
        for mut line in std::mem::take(&mut order.line_items) {
            line.order_id = id;
            saved.push(LineItemRepository::save(self, line).await?);
        }
        order.line_items = saved;

        Ok(order)
    }
}

#[async_trait]
impl LineItemRepository for MemoryUnitOfWork {
    async fn save(&mut self, mut line_item: LineItem) -> DbResult<LineItem> {
        let state = &mut self.working;

        if !state.orders.contains_key(&line_item.order_id)
            || !state.items.contains_key(&line_item.item_id)
        {
            return Err(DbError::ForeignKeyViolation {
                message: format!(
                    "line item references order {} / item {}",
                    line_item.order_id, line_item.item_id
                ),
            });
        }

        let id = match line_item.id {
            Some(id) if !state.line_items.contains_key(&id) => {
                return Err(DbError::not_found("LineItem", id));
            }
            Some(id) => id,
            None => {
                let duplicate = state.line_items.values().any(|line| {
                    line.order_id == line_item.order_id && line.item_id == line_item.item_id
                });
                if duplicate {
                    return Err(DbError::duplicate(
                        "line_items.order_id, line_items.item_id",
                        format!("{}, {}", line_item.order_id, line_item.item_id),
                    ));
                }
                LineItemId(next(&mut state.sequences.line_items))
            }
        };

        line_item.id = Some(id);
        state.line_items.insert(id, line_item.clone());
        state.journal.push(Write::LineItemSaved(id));
        Ok(line_item)
    }
}

#[async_trait]
impl ReceiptRepository for MemoryUnitOfWork {
    async fn save(&mut self, mut receipt: Receipt) -> DbResult<Receipt> {
        if let Some(id) = receipt.id {
            return Err(DbError::Immutable {
                entity: "Receipt".to_string(),
                id: id.to_string(),
            });
        }

        let state = &mut self.working;
        let order_id = receipt
            .order
            .id
            .filter(|id| state.orders.contains_key(id))
            .ok_or_else(|| DbError::ForeignKeyViolation {
                message: "receipt references an unsaved order".to_string(),
            })?;

        if state.receipts.values().any(|r| r.order_id == order_id) {
            return Err(DbError::duplicate("receipts.order_id", order_id.to_string()));
        }

        let id = ReceiptId(next(&mut state.sequences.receipts));
        state.receipts.insert(
            id,
            ReceiptRecord {
                order_id,
                payment: receipt.payment,
                created_at: receipt.created_at,
            },
        );
        state.journal.push(Write::ReceiptSaved(id));
        receipt.id = Some(id);
        Ok(receipt)
    }

    async fn find_by_order_id(&mut self, order_id: OrderId) -> DbResult<Option<Receipt>> {
        let state = &self.working;
        let Some((id, record)) = state.receipts.iter().find(|(_, r)| r.order_id == order_id)
        else {
            return Ok(None);
        };

        let order = state
            .load_order(order_id)
            .ok_or_else(|| DbError::not_found("Order", order_id))?;

        Ok(Some(Receipt {
            id: Some(*id),
            order,
            payment: record.payment,
            created_at: record.created_at,
        }))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_commit_publishes_writes() {
        let store = MemoryStore::new();

        let mut uow = store.begin().await.unwrap();
        let item = uow
            .items()
            .save(Item::new("itemName", Money::from_cents(1000)))
            .await
            .unwrap();
        uow.commit().await.unwrap();

        assert_eq!(item.id, Some(ItemId(1)));
        assert_eq!(store.journal().await, vec![Write::ItemSaved(ItemId(1))]);

        let mut uow = store.begin().await.unwrap();
        assert_eq!(uow.items().find_all().await.unwrap(), vec![item]);
    }

    #[tokio::test]
    async fn test_drop_and_rollback_discard_writes() {
        let store = MemoryStore::new();

        {
            let mut uow = store.begin().await.unwrap();
            uow.orders().save(Order::new()).await.unwrap();
        }

        let mut uow = store.begin().await.unwrap();
        uow.orders().save(Order::new()).await.unwrap();
        uow.rollback().await.unwrap();

        let mut uow = store.begin().await.unwrap();
        assert!(uow.orders().find_all().await.unwrap().is_empty());
        drop(uow);

        assert!(store.journal().await.is_empty());
    }

    #[tokio::test]
    async fn test_ids_are_assigned_per_table() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();

        let item = uow
            .items()
            .save(Item::new("a", Money::zero()))
            .await
            .unwrap();
        let order = uow.orders().save(Order::new()).await.unwrap();
        let second = uow.orders().save(Order::new()).await.unwrap();

        assert_eq!(item.id, Some(ItemId(1)));
        assert_eq!(order.id, Some(OrderId(1)));
        assert_eq!(second.id, Some(OrderId(2)));
    }

    #[tokio::test]
    async fn test_line_item_constraints() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();

        let item = uow
            .items()
            .save(Item::new("a", Money::from_cents(100)))
            .await
            .unwrap();
        let item_id = item.id.unwrap();
        let order_id = uow.orders().save(Order::new()).await.unwrap().id.unwrap();

        let orphan = LineItem::snapshot(&item, item_id, OrderId(99), 1);
        assert!(matches!(
            uow.line_items().save(orphan).await,
            Err(DbError::ForeignKeyViolation { .. })
        ));

        let line = LineItem::snapshot(&item, item_id, order_id, 1);
        uow.line_items().save(line.clone()).await.unwrap();
        assert!(matches!(
            uow.line_items().save(line).await,
            Err(DbError::UniqueViolation { .. })
        ));
    }

    #[tokio::test]
    async fn test_receipt_is_write_once() {
        let store = MemoryStore::new();
        let mut uow = store.begin().await.unwrap();

        let mut order = uow.orders().save(Order::new()).await.unwrap();
        order.settle(Money::zero()).unwrap();
        let order = uow.orders().save(order).await.unwrap();
        let order_id = order.id.unwrap();

        let receipt = uow
            .receipts()
            .save(Receipt::new(order.clone(), Money::from_cents(500)))
            .await
            .unwrap();

        assert!(matches!(
            uow.receipts().save(receipt).await,
            Err(DbError::Immutable { .. })
        ));
        assert!(matches!(
            uow.receipts()
                .save(Receipt::new(order, Money::from_cents(500)))
                .await,
            Err(DbError::UniqueViolation { .. })
        ));

        let loaded = uow
            .receipts()
            .find_by_order_id(order_id)
            .await
            .unwrap()
            .unwrap();
        assert!(loaded.order.paid);
        assert_eq!(loaded.change().unwrap(), Money::from_cents(500));
    }
}
