//! # Domain Types
//!
//! Core domain types used throughout Till.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Item       │   │      Order      │   │     Receipt     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  id             │       │
//! │  │  name           │   │  paid           │   │  order (owned   │       │
//! │  │  price          │   │  line_items ─┐  │   │   snapshot)     │       │
//! │  └────────▲────────┘   └──────────────┼──┘   │  payment        │       │
//! │           │ item_id                   │      │  created_at     │       │
//! │  ┌────────┴────────┐                  │      └─────────────────┘       │
//! │  │    LineItem     │◄─────────────────┘ owned                          │
//! │  │  name, price    │  (snapshot of the Item at add-time)               │
//! │  │  quantity       │                                                   │
//! │  │  order_id       │                                                   │
//! │  └─────────────────┘                                                   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Identity
//! Every entity carries an optional storage-assigned id. It is `None` until
//! the repository persists the entity for the first time.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;

// =============================================================================
// Identifiers
// =============================================================================

macro_rules! entity_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            /// Returns the raw storage key.
            #[inline]
            pub const fn get(&self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(id: i64) -> Self {
                $name(id)
            }
        }
    };
}

entity_id!(
    /// Identifier of a catalog item.
    ItemId
);
entity_id!(
    /// Identifier of an order.
    OrderId
);
entity_id!(
    /// Identifier of a line item.
    LineItemId
);
entity_id!(
    /// Identifier of a receipt.
    ReceiptId
);

// =============================================================================
// Item
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Storage id, `None` until first saved.
    pub id: Option<ItemId>,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    /// Current catalog price.
    pub price: Money,
}

impl Item {
    /// Creates an unsaved item.
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        Item {
            id: None,
            name: name.into(),
            price,
        }
    }

    /// Returns a copy of this item carrying the given id.
    pub fn with_id(mut self, id: ItemId) -> Self {
        self.id = Some(id);
        self
    }
}

/// Caller-supplied item fields, before validation.
///
/// Both fields are optional so that "not provided" can be reported with
/// its own message instead of a deserialization failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemDraft {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub price: Option<Money>,
}

impl ItemDraft {
    pub fn new(name: impl Into<String>, price: Money) -> Self {
        ItemDraft {
            name: Some(name.into()),
            price: Some(price),
        }
    }
}

// =============================================================================
// Line Item
// =============================================================================

/// A quantity of one item attached to one order.
///
/// Uses snapshot pattern: `name` and `price` are frozen when the item is
/// first added, so later catalog price changes never reach existing orders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub id: Option<LineItemId>,
    /// Item name at time of adding (frozen).
    pub name: String,
    /// Unit price at time of adding (frozen).
    pub price: Money,
    /// Always >= 1.
    pub quantity: i64,
    /// Source catalog item (not owned).
    pub item_id: ItemId,
    /// Owning order.
    pub order_id: OrderId,
}

impl LineItem {
    /// Snapshots `item` into a new, unsaved line item.
    pub fn snapshot(item: &Item, item_id: ItemId, order_id: OrderId, quantity: i64) -> Self {
        LineItem {
            id: None,
            name: item.name.clone(),
            price: item.price,
            quantity,
            item_id,
            order_id,
        }
    }

    /// Unit price × quantity.
    #[inline]
    pub fn line_total(&self) -> CoreResult<Money> {
        self.price
            .checked_multiply_quantity(self.quantity)
            .ok_or(CoreError::AmountOverflow)
    }
}

// =============================================================================
// Order
// =============================================================================

/// A cart of line items, paid or unpaid.
///
/// The order exclusively owns its line items; at most one line item exists
/// per distinct item.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: Option<OrderId>,
    pub paid: bool,
    pub line_items: Vec<LineItem>,
}

// =============================================================================
// Receipt
// =============================================================================

/// The record of a completed payment against an order.
///
/// `change` is never stored: it is derived from the order snapshot each
/// time it is requested.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Receipt {
    pub id: Option<ReceiptId>,
    /// The settled order.
    pub order: Order,
    /// Amount tendered.
    pub payment: Money,
    /// When the order was settled.
    pub created_at: DateTime<Utc>,
}

impl Receipt {
    /// Creates an unsaved receipt for `order`.
    pub fn new(order: Order, payment: Money) -> Self {
        Receipt {
            id: None,
            order,
            payment,
            created_at: Utc::now(),
        }
    }

    /// Total of the settled order.
    pub fn total(&self) -> CoreResult<Money> {
        self.order.total()
    }

    /// Payment minus order total.
    pub fn change(&self) -> CoreResult<Money> {
        self.payment
            .checked_sub(self.total()?)
            .ok_or(CoreError::AmountOverflow)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(price_cents: i64, quantity: i64) -> LineItem {
        LineItem {
            id: None,
            name: "itemName".to_string(),
            price: Money::from_cents(price_cents),
            quantity,
            item_id: ItemId(3030),
            order_id: OrderId(101),
        }
    }

    #[test]
    fn test_id_display_and_serde() {
        assert_eq!(ItemId(3030).to_string(), "3030");
        assert_eq!(serde_json::to_string(&OrderId(101)).unwrap(), "101");
        let id: ReceiptId = serde_json::from_str("7").unwrap();
        assert_eq!(id.get(), 7);
    }

    #[test]
    fn test_snapshot_copies_name_and_price() {
        let mut item = Item::new("itemName", Money::from_cents(1000)).with_id(ItemId(3030));
        let snapshot = LineItem::snapshot(&item, ItemId(3030), OrderId(101), 1);

        item.price = Money::from_cents(2000);

        assert_eq!(snapshot.name, "itemName");
        assert_eq!(snapshot.price, Money::from_cents(1000));
        assert_eq!(snapshot.id, None);
    }

    #[test]
    fn test_line_total() {
        assert_eq!(line(1000, 23).line_total().unwrap(), Money::from_cents(23000));
    }

    #[test]
    fn test_line_total_overflow_is_an_error() {
        let mut huge = line(0, 1_000_000_000);
        huge.price = "100000000000000000000".parse().unwrap();
        assert!(matches!(huge.line_total(), Err(CoreError::AmountOverflow)));
    }

    #[test]
    fn test_receipt_change_is_derived() {
        let mut order = Order {
            id: Some(OrderId(101)),
            paid: true,
            line_items: vec![line(1000, 23)],
        };
        let mut receipt = Receipt::new(order.clone(), Money::from_cents(30000));
        assert_eq!(receipt.change().unwrap(), Money::from_cents(7000));

        // Recomputed on every read
        order.line_items[0].quantity = 30;
        receipt.order = order;
        assert_eq!(receipt.change().unwrap(), Money::zero());
    }

    #[test]
    fn test_draft_deserializes_missing_fields_as_none() {
        let draft: ItemDraft = serde_json::from_str(r#"{"price": "1.50"}"#).unwrap();
        assert_eq!(draft.name, None);
        assert_eq!(draft.price, Some(Money::from_cents(150)));
    }
}
