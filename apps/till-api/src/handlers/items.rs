//! # Item Handlers
//!
//! | Method | Path              | Body                 |
//! |--------|-------------------|----------------------|
//! | GET    | `/item`           |                      |
//! | POST   | `/item`           | `{name, price}`/null |
//! | PUT    | `/item/:id/price` | decimal/null         |

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use till_core::{ItemDraft, ItemId, Money};
use till_db::Store;

use crate::dto::ItemResponse;
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

pub async fn list_items<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<ItemResponse>>, ApiError> {
    let items = state.items.list_items().await?;
    debug!(count = items.len(), "list_items");
    Ok(Json(items.into_iter().map(ItemResponse::from).collect()))
}

pub async fn create_item<S: Store>(
    State(state): State<AppState<S>>,
    ApiJson(draft): ApiJson<Option<ItemDraft>>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.create_item(draft).await?;
    Ok(Json(item.into()))
}

pub async fn update_price<S: Store>(
    State(state): State<AppState<S>>,
    Path(item_id): Path<ItemId>,
    ApiJson(price): ApiJson<Option<Money>>,
) -> Result<Json<ItemResponse>, ApiError> {
    let item = state.items.update_price(item_id, price).await?;
    Ok(Json(item.into()))
}
