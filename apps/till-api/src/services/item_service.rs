//! Item catalog service.
//!
//! Every write passes item validation before touching the repository, so a
//! rejected item never reaches storage.

use tracing::{debug, info, warn};

use till_core::validation::{validate_draft, validate_item};
use till_core::{CoreError, Item, ItemDraft, ItemId, Money, ValidationError};
use till_db::{Store, UnitOfWork};

use crate::error::ServiceResult;

/// Catalog operations over any [`Store`].
#[derive(Clone)]
pub struct ItemService<S: Store> {
    store: S,
}

impl<S: Store> ItemService<S> {
    pub fn new(store: S) -> Self {
        ItemService { store }
    }

    /// All catalog items, ordered by id.
    pub async fn list_items(&self) -> ServiceResult<Vec<Item>> {
        let mut uow = self.store.begin().await?;
        let items = uow.items().find_all().await?;
        uow.commit().await?;
        Ok(items)
    }

    /// Validates and persists a new item. `None` means no item was sent.
    pub async fn create_item(&self, draft: Option<ItemDraft>) -> ServiceResult<Item> {
        debug!(?draft, "create_item");

        let item = validate_draft(draft)
            .inspect_err(|e| warn!(reason = %e, "Rejected item"))
            .map_err(CoreError::InvalidItem)?;

        let mut uow = self.store.begin().await?;
        let item = uow.items().save(item).await?;
        uow.commit().await?;

        info!(id = ?item.id, name = %item.name, price = %item.price, "Item created");
        Ok(item)
    }

    /// Assigns `price` to the stored item, re-validates the whole item and
    /// persists it. A rejected price leaves the stored item untouched;
    /// `None` means no price was sent.
    pub async fn update_price(&self, item_id: ItemId, price: Option<Money>) -> ServiceResult<Item> {
        debug!(%item_id, ?price, "update_price");

        let mut uow = self.store.begin().await?;
        let mut item = uow
            .items()
            .find_by_id(item_id)
            .await?
            .ok_or(CoreError::ItemNotFound(item_id))?;

        let price = price
            .ok_or(ValidationError::PriceMissing)
            .inspect_err(|e| warn!(%item_id, reason = %e, "Rejected price update"))
            .map_err(CoreError::InvalidItem)?;

        let previous = item.price;
        item.price = price;
        validate_item(Some(&item))
            .inspect_err(|e| warn!(%item_id, reason = %e, "Rejected price update"))
            .map_err(CoreError::InvalidItem)?;

        let item = uow.items().save(item).await?;
        uow.commit().await?;

        info!(%item_id, %previous, %price, "Item price updated");
        Ok(item)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
