//! # Order Service
//!
//! Line-item accrual and settlement against the store.
//!
//! ## Pay Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pay(order_id, payment)                                                 │
//! │       │                                                                 │
//! │       ├── begin unit of work                                           │
//! │       ├── load order            (absent → OrderNotFound)               │
//! │       ├── order.settle(payment) (paid → OrderAlreadyPaid,              │
//! │       │                          negative → InvalidPayment,            │
//! │       │                          short → InsufficientPayment)          │
//! │       ├── save order            (paid = true)                          │
//! │       ├── save receipt                                                 │
//! │       └── commit                                                       │
//! │                                                                         │
//! │  Any failure drops the unit of work: the order stays unpaid and no    │
//! │  receipt exists.                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, info, warn};

use till_core::{Accrual, CoreError, ItemId, Money, Order, OrderId, Receipt};
use till_db::{Store, UnitOfWork};

use crate::error::ServiceResult;

/// Order operations over any [`Store`].
#[derive(Clone)]
pub struct OrderService<S: Store> {
    store: S,
}

impl<S: Store> OrderService<S> {
    pub fn new(store: S) -> Self {
        OrderService { store }
    }

    /// All orders with their line items, ordered by id.
    pub async fn list_orders(&self) -> ServiceResult<Vec<Order>> {
        let mut uow = self.store.begin().await?;
        let orders = uow.orders().find_all().await?;
        uow.commit().await?;
        Ok(orders)
    }

    /// Persists a new empty, unpaid order.
    pub async fn create_order(&self) -> ServiceResult<Order> {
        let mut uow = self.store.begin().await?;
        let order = uow.orders().save(Order::new()).await?;
        uow.commit().await?;

        info!(id = ?order.id, "Order created");
        Ok(order)
    }

    /// Adds `quantity` units of an item to an order.
    ///
    /// A repeat add only rewrites the existing line item; a first add
    /// snapshots the item into a new line and saves the order with it.
    pub async fn add_item(
        &self,
        order_id: OrderId,
        item_id: ItemId,
        quantity: i64,
    ) -> ServiceResult<Order> {
        debug!(%order_id, %item_id, quantity, "add_item");

        let mut uow = self.store.begin().await?;
        let mut order = uow
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;
        let item = uow
            .items()
            .find_by_id(item_id)
            .await?
            .ok_or(CoreError::ItemNotFound(item_id))?;

        let accrual = order
            .accrue(&item, item_id, quantity)
            .inspect_err(|e| warn!(%order_id, %item_id, reason = %e, "Rejected add_item"))?;

        let order = match accrual {
            Accrual::Incremented(index) => {
                let line = uow.line_items().save(order.line_items[index].clone()).await?;
                order.line_items[index] = line;
                order
            }
            Accrual::Appended(_) => uow.orders().save(order).await?,
        };
        let total = order.total()?;
        uow.commit().await?;

        info!(
            %order_id,
            %item_id,
            quantity,
            ?accrual,
            %total,
            "Item added to order"
        );
        Ok(order)
    }

    /// Settles the order and records a receipt.
    ///
    /// `payment` equal to the total is enough; change is zero then.
    pub async fn pay(&self, order_id: OrderId, payment: Money) -> ServiceResult<Receipt> {
        debug!(%order_id, %payment, "pay");

        let mut uow = self.store.begin().await?;
        let mut order = uow
            .orders()
            .find_by_id(order_id)
            .await?
            .ok_or(CoreError::OrderNotFound(order_id))?;

        order
            .settle(payment)
            .inspect_err(|e| warn!(%order_id, %payment, reason = %e, "Rejected payment"))?;

        let order = uow.orders().save(order).await?;
        let receipt = uow.receipts().save(Receipt::new(order, payment)).await?;
        let (total, change) = (receipt.total()?, receipt.change()?);
        uow.commit().await?;

        info!(
            %order_id,
            receipt_id = ?receipt.id,
            %total,
            %payment,
            %change,
            "Order paid"
        );
        Ok(receipt)
    }

    /// The receipt of a paid order.
    pub async fn receipt(&self, order_id: OrderId) -> ServiceResult<Receipt> {
        let mut uow = self.store.begin().await?;

        let receipt = uow.receipts().find_by_order_id(order_id).await?;
        let Some(receipt) = receipt else {
            let err = match uow.orders().find_by_id(order_id).await? {
                Some(_) => CoreError::ReceiptNotFound(order_id),
                None => CoreError::OrderNotFound(order_id),
            };
            return Err(err.into());
        };
        uow.commit().await?;

        Ok(receipt)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
