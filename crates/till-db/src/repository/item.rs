//! # Item Repository (SQLite)
//!
//! Catalog reads and writes inside a [`SqliteUnitOfWork`].

use async_trait::async_trait;
use sqlx::FromRow;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::pool::SqliteUnitOfWork;
use crate::repository::ItemRepository;
use till_core::{Item, ItemId, Money};

#[derive(Debug, FromRow)]
struct ItemRow {
    id: i64,
    name: String,
    price: String,
}

impl TryFrom<ItemRow> for Item {
    type Error = DbError;

    fn try_from(row: ItemRow) -> DbResult<Self> {
        let price: Money = row
            .price
            .parse()
            .map_err(|e| DbError::corrupt("items", "price", e))?;
        Ok(Item {
            id: Some(ItemId(row.id)),
            name: row.name,
            price,
        })
    }
}

#[async_trait]
impl ItemRepository for SqliteUnitOfWork {
    async fn find_all(&mut self) -> DbResult<Vec<Item>> {
        let rows: Vec<ItemRow> = sqlx::query_as("SELECT id, name, price FROM items ORDER BY id")
            .fetch_all(&mut *self.tx)
            .await?;

        debug!(count = rows.len(), "Loaded items");
        rows.into_iter().map(Item::try_from).collect()
    }

    async fn find_by_id(&mut self, id: ItemId) -> DbResult<Option<Item>> {
        let row: Option<ItemRow> =
            sqlx::query_as("SELECT id, name, price FROM items WHERE id = ?1")
                .bind(id.get())
                .fetch_optional(&mut *self.tx)
                .await?;

        row.map(Item::try_from).transpose()
    }

    async fn save(&mut self, mut item: Item) -> DbResult<Item> {
        let price = item.price.amount().to_string();

        match item.id {
            None => {
                let result = sqlx::query("INSERT INTO items (name, price) VALUES (?1, ?2)")
                    .bind(&item.name)
                    .bind(&price)
                    .execute(&mut *self.tx)
                    .await?;

                let id = ItemId(result.last_insert_rowid());
                debug!(id = %id, name = %item.name, price = %price, "Inserted item");
                item.id = Some(id);
            }
            Some(id) => {
                let result = sqlx::query("UPDATE items SET name = ?2, price = ?3 WHERE id = ?1")
                    .bind(id.get())
                    .bind(&item.name)
                    .bind(&price)
                    .execute(&mut *self.tx)
                    .await?;

                if result.rows_affected() == 0 {
                    return Err(DbError::not_found("Item", id));
                }
                debug!(id = %id, price = %price, "Updated item");
            }
        }

        Ok(item)
    }
}
