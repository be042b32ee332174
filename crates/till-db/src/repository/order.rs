//! # Order Repository (SQLite)
//!
//! Orders and their owned line items.
//!
//! ## Cascade on Save
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  OrderRepository::save(order)                                           │
//! │       │                                                                 │
//! │       ├── id None?  INSERT INTO orders → id assigned                   │
//! │       └── id Some?  UPDATE orders SET paid                             │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  for each line item (order_id rewritten to the order's id):           │
//! │       ├── id None?  INSERT INTO line_items                            │
//! │       └── id Some?  UPDATE line_items                                 │
//! │                                                                         │
//! │  All inside the caller's transaction                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::pool::SqliteUnitOfWork;
use crate::repository::{LineItemRepository, OrderRepository};
use till_core::{ItemId, LineItem, LineItemId, Money, Order, OrderId};

#[derive(Debug, FromRow)]
struct OrderRow {
    id: i64,
    paid: bool,
}

#[derive(Debug, FromRow)]
struct LineItemRow {
    id: i64,
    order_id: i64,
    item_id: i64,
    name: String,
    price: String,
    quantity: i64,
}

impl TryFrom<LineItemRow> for LineItem {
    type Error = DbError;

    fn try_from(row: LineItemRow) -> DbResult<Self> {
        let price: Money = row
            .price
            .parse()
            .map_err(|e| DbError::corrupt("line_items", "price", e))?;
        Ok(LineItem {
            id: Some(LineItemId(row.id)),
            name: row.name,
            price,
            quantity: row.quantity,
            item_id: ItemId(row.item_id),
            order_id: OrderId(row.order_id),
        })
    }
}

const LINE_ITEM_COLUMNS: &str = "id, order_id, item_id, name, price, quantity";

impl SqliteUnitOfWork {
    async fn line_items_of(&mut self, order_id: OrderId) -> DbResult<Vec<LineItem>> {
        let sql = format!(
            "SELECT {} FROM line_items WHERE order_id = ?1 ORDER BY id",
            LINE_ITEM_COLUMNS
        );
        let rows: Vec<LineItemRow> = sqlx::query_as(&sql)
            .bind(order_id.get())
            .fetch_all(&mut *self.tx)
            .await?;

        rows.into_iter().map(LineItem::try_from).collect()
    }
}

#[async_trait]
impl OrderRepository for SqliteUnitOfWork {
    async fn find_all(&mut self) -> DbResult<Vec<Order>> {
        let orders: Vec<OrderRow> = sqlx::query_as("SELECT id, paid FROM orders ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;

        let sql = format!(
            "SELECT {} FROM line_items ORDER BY order_id, id",
            LINE_ITEM_COLUMNS
        );
        let lines: Vec<LineItemRow> = sqlx::query_as(&sql).fetch_all(&mut *self.tx).await?;

        let mut by_order: HashMap<i64, Vec<LineItem>> = HashMap::new();
        for row in lines {
            let order_id = row.order_id;
            by_order
                .entry(order_id)
                .or_default()
                .push(LineItem::try_from(row)?);
        }

        debug!(count = orders.len(), "Loaded orders");
        Ok(orders
            .into_iter()
            .map(|row| Order {
                id: Some(OrderId(row.id)),
                paid: row.paid,
                line_items: by_order.remove(&row.id).unwrap_or_default(),
            })
            .collect())
    }

    async fn find_by_id(&mut self, id: OrderId) -> DbResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as("SELECT id, paid FROM orders WHERE id = ?1")
            .bind(id.get())
            .fetch_optional(&mut *self.tx)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let line_items = self.line_items_of(id).await?;
        Ok(Some(Order {
            id: Some(OrderId(row.id)),
            paid: row.paid,
            line_items,
        }))
    }

    async fn save(&mut self, mut order: Order) -> DbResult<Order> {
        let id = match order.id {
            None => {
                let result = sqlx::query("INSERT INTO orders (paid) VALUES (?1)")
                    .bind(order.paid)
                    .execute(&mut *self.tx)
                    .await?;
                let id = OrderId(result.last_insert_rowid());
                debug!(id = %id, "Inserted order");
                id
            }
            Some(id) => {
                let result = sqlx::query("UPDATE orders SET paid = ?2 WHERE id = ?1")
                    .bind(id.get())
                    .bind(order.paid)
                    .execute(&mut *self.tx)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("Order", id));
                }
                debug!(id = %id, paid = order.paid, "Updated order");
                id
            }
        };
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
impl LineItemRepository for SqliteUnitOfWork {
    async fn save(&mut self, mut line_item: LineItem) -> DbResult<LineItem> {
        let price = line_item.price.amount().to_string();

        match line_item.id {
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO line_items (order_id, item_id, name, price, quantity)
                    VALUES (?1, ?2, ?3, ?4, ?5)
                    "#,
                )
                .bind(line_item.order_id.get())
                .bind(line_item.item_id.get())
                .bind(&line_item.name)
                .bind(&price)
                .bind(line_item.quantity)
                .execute(&mut *self.tx)
                .await?;

                let id = LineItemId(result.last_insert_rowid());
                debug!(
                    id = %id,
                    order_id = %line_item.order_id,
                    item_id = %line_item.item_id,
                    quantity = line_item.quantity,
                    "Inserted line item"
                );
                line_item.id = Some(id);
            }
            Some(id) => {
                let result = sqlx::query(
                    r#"
                    UPDATE line_items SET
                        name = ?2,
                        price = ?3,
                        quantity = ?4
                    WHERE id = ?1
                    "#,
                )
                .bind(id.get())
                .bind(&line_item.name)
                .bind(&price)
                .bind(line_item.quantity)
                .execute(&mut *self.tx)
                .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("LineItem", id));
                }
                debug!(id = %id, quantity = line_item.quantity, "Updated line item");
            }
        }

        Ok(line_item)
    }
}
