//! Response bodies.
//!
//! Money fields serialize as decimal strings (`"70.00"`). Orders and receipts
//! convert with `TryFrom` because their totals are computed with checked
//! arithmetic.

use serde::{Deserialize, Serialize};

use till_core::{
    CoreError, Item, ItemId, LineItem, LineItemId, Money, Order, OrderId, Receipt, ReceiptId,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemResponse {
    pub id: Option<ItemId>,
    pub name: String,
    pub price: Money,
}

impl From<Item> for ItemResponse {
    fn from(item: Item) -> Self {
        ItemResponse {
            id: item.id,
            name: item.name,
            price: item.price,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItemResponse {
    pub id: Option<LineItemId>,
    pub item_id: ItemId,
    pub name: String,
    pub price: Money,
    pub quantity: i64,
    pub line_total: Money,
}

impl TryFrom<LineItem> for LineItemResponse {
    type Error = CoreError;

    fn try_from(line: LineItem) -> Result<Self, Self::Error> {
        Ok(LineItemResponse {
            line_total: line.line_total()?,
            id: line.id,
            item_id: line.item_id,
            name: line.name,
            price: line.price,
            quantity: line.quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Option<OrderId>,
    pub paid: bool,
    pub items: Vec<LineItemResponse>,
    pub total: Money,
}

impl TryFrom<Order> for OrderResponse {
    type Error = CoreError;

    fn try_from(order: Order) -> Result<Self, Self::Error> {
        Ok(OrderResponse {
            total: order.total()?,
            id: order.id,
            paid: order.paid,
            items: order
                .line_items
                .into_iter()
                .map(LineItemResponse::try_from)
                .collect::<Result<Vec<_>, _>>()?,
        })
    }
}

/// Receipt with the change computed at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptResponse {
    pub id: Option<ReceiptId>,
    pub payment: Money,
    pub order: OrderResponse,
    pub change: Money,
    /// RFC 3339
    pub created_at: String,
}

impl TryFrom<Receipt> for ReceiptResponse {
    type Error = CoreError;

    fn try_from(receipt: Receipt) -> Result<Self, Self::Error> {
        Ok(ReceiptResponse {
            change: receipt.change()?,
            created_at: receipt.created_at.to_rfc3339(),
            id: receipt.id,
            payment: receipt.payment,
            order: OrderResponse::try_from(receipt.order)?,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub database: bool,
}
