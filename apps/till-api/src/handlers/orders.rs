//! # Order Handlers
//!
//! | Method | Path                                        | Body    |
//! |--------|---------------------------------------------|---------|
//! | GET    | `/order`                                    |         |
//! | POST   | `/order`                                    |         |
//! | PUT    | `/order/:id/addItem/:item_id`               |         |
//! | PUT    | `/order/:id/addItem/:item_id/quantity/:qty` |         |
//! | PUT    | `/order/:id/pay`                            | decimal |
//! | GET    | `/order/:id/receipt`                        |         |

use axum::extract::{Path, State};
use axum::Json;
use tracing::debug;

use till_core::{ItemId, Money, OrderId, DEFAULT_QUANTITY};
use till_db::Store;

use crate::dto::{OrderResponse, ReceiptResponse};
use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::AppState;

pub async fn list_orders<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<Vec<OrderResponse>>, ApiError> {
    let orders = state.orders.list_orders().await?;
    debug!(count = orders.len(), "list_orders");
    let orders = orders
        .into_iter()
        .map(OrderResponse::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Json(orders))
}

pub async fn create_order<S: Store>(
    State(state): State<AppState<S>>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.create_order().await?;
    Ok(Json(OrderResponse::try_from(order)?))
}

/// Adds one unit.
pub async fn add_item<S: Store>(
    State(state): State<AppState<S>>,
    Path((order_id, item_id)): Path<(OrderId, ItemId)>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state
        .orders
        .add_item(order_id, item_id, DEFAULT_QUANTITY)
        .await?;
    Ok(Json(OrderResponse::try_from(order)?))
}

pub async fn add_item_quantity<S: Store>(
    State(state): State<AppState<S>>,
    Path((order_id, item_id, quantity)): Path<(OrderId, ItemId, i64)>,
) -> Result<Json<OrderResponse>, ApiError> {
    let order = state.orders.add_item(order_id, item_id, quantity).await?;
    Ok(Json(OrderResponse::try_from(order)?))
}

pub async fn pay<S: Store>(
    State(state): State<AppState<S>>,
    Path(order_id): Path<OrderId>,
    ApiJson(payment): ApiJson<Money>,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let receipt = state.orders.pay(order_id, payment).await?;
    Ok(Json(ReceiptResponse::try_from(receipt)?))
}

pub async fn receipt<S: Store>(
    State(state): State<AppState<S>>,
    Path(order_id): Path<OrderId>,
) -> Result<Json<ReceiptResponse>, ApiError> {
    let receipt = state.orders.receipt(order_id).await?;
    Ok(Json(ReceiptResponse::try_from(receipt)?))
}
