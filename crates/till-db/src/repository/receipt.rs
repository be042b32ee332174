//! # Receipt Repository (SQLite)
//!
//! Receipts are written once when an order is paid and never updated.
//! A receipt row stores only the payment and the order reference; the
//! order itself is reloaded on read.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::pool::SqliteUnitOfWork;
use crate::repository::{OrderRepository, ReceiptRepository};
use till_core::{Money, OrderId, Receipt, ReceiptId};

#[derive(Debug, FromRow)]
struct ReceiptRow {
    id: i64,
    order_id: i64,
    payment: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl ReceiptRepository for SqliteUnitOfWork {
    async fn save(&mut self, mut receipt: Receipt) -> DbResult<Receipt> {
        if let Some(id) = receipt.id {
            return Err(DbError::Immutable {
                entity: "Receipt".to_string(),
                id: id.to_string(),
            });
        }

        let order_id = receipt
            .order
            .id
            .ok_or_else(|| DbError::ForeignKeyViolation {
                message: "receipt references an unsaved order".to_string(),
            })?;

        let result = sqlx::query(
            r#"
            INSERT INTO receipts (order_id, payment, created_at)
            VALUES (?1, ?2, ?3)
            "#,
        )
        .bind(order_id.get())
        .bind(receipt.payment.amount().to_string())
        .bind(receipt.created_at)
        .execute(&mut *self.tx)
        .await?;

        let id = ReceiptId(result.last_insert_rowid());
        debug!(id = %id, order_id = %order_id, payment = %receipt.payment, "Inserted receipt");
        receipt.id = Some(id);

        Ok(receipt)
    }

    async fn find_by_order_id(&mut self, order_id: OrderId) -> DbResult<Option<Receipt>> {
        let row: Option<ReceiptRow> = sqlx::query_as(
            "SELECT id, order_id, payment, created_at FROM receipts WHERE order_id = ?1",
        )
        .bind(order_id.get())
        .fetch_optional(&mut *self.tx)
        .await?;

        let Some(row) = row else {
            return Ok(None);
        };

        let payment: Money = row
            .payment
            .parse()
            .map_err(|e| DbError::corrupt("receipts", "payment", e))?;

        let order = OrderRepository::find_by_id(self, OrderId(row.order_id))
            .await?
            .ok_or_else(|| DbError::not_found("Order", row.order_id))?;

        Ok(Some(Receipt {
            id: Some(ReceiptId(row.id)),
            order,
            payment,
            created_at: row.created_at,
        }))
    }
}
