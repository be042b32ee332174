//! # Order Aggregate
//!
//! Line-item accrual and settlement rules for [`Order`].
//!
//! ## Order Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Order Lifecycle                                   │
//! │                                                                         │
//! │  1. CREATE                                                              │
//! │     └── Order::new() → Order { paid: false, line_items: [] }           │
//! │                                                                         │
//! │  2. ACCRUE                                                              │
//! │     └── accrue(item, 1)  → Appended(0)     (new line, qty 1)           │
//! │     └── accrue(item, 22) → Incremented(0)  (same line, qty 23)         │
//! │                                                                         │
//! │  3. SETTLE                                                              │
//! │     └── settle(payment) → paid = true                                  │
//! │         (checked: not paid yet, payment >= 0, payment >= total)        │
//! │                                                                         │
//! │  4. FROZEN                                                              │
//! │     └── accrue / settle → OrderAlreadyPaid                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every check runs before the first mutation, so a failed call leaves the
//! order exactly as it was.

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{Item, ItemId, LineItem, Order, OrderId};
use crate::validation::{validate_payment, validate_quantity};

/// What [`Order::accrue`] did to the line items.
///
/// The index points into [`Order::line_items`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accrual {
    /// An existing line for the same item had its quantity raised.
    Incremented(usize),
    /// A new, unsaved line was pushed.
    Appended(usize),
}

impl Order {
    /// Creates an empty, unpaid, unsaved order.
    pub fn new() -> Self {
        Order::default()
    }

    /// Sum of price × quantity over the line items (snapshot prices).
    pub fn total(&self) -> CoreResult<Money> {
        sum_lines(self.line_items.iter())
    }

    /// Total number of units across all lines.
    pub fn unit_count(&self) -> i64 {
        self.line_items.iter().map(|line| line.quantity).sum()
    }

    /// Finds the line for `item_id`, if any.
    pub fn line_for(&self, item_id: ItemId) -> Option<&LineItem> {
        self.line_items.iter().find(|line| line.item_id == item_id)
    }

    /// Fails with `OrderAlreadyPaid` once the order is settled.
    pub fn ensure_unpaid(&self) -> CoreResult<()> {
        if self.paid {
            return Err(CoreError::OrderAlreadyPaid(self.persisted_id()));
        }
        Ok(())
    }

    /// Adds `quantity` units of `item` to the order.
    ///
    /// ## Rules
    /// - The order must be saved and unpaid
    /// - `quantity` must be at least 1
    /// - One line per distinct item: a repeat add raises the quantity,
    ///   the line keeps its original name/price snapshot
    /// - The order total must stay representable, otherwise the quantity
    ///   is rejected as too large
    pub fn accrue(&mut self, item: &Item, item_id: ItemId, quantity: i64) -> CoreResult<Accrual> {
        self.ensure_unpaid()?;
        validate_quantity(quantity).map_err(CoreError::InvalidQuantity)?;
        let order_id = self.persisted_id();
        let too_large = || CoreError::InvalidQuantity(ValidationError::QuantityOverflow);

        let existing = self.line_items.iter().position(|line| line.item_id == item_id);
        let candidate = match existing {
            Some(index) => {
                let line = &self.line_items[index];
                LineItem {
                    quantity: line.quantity.checked_add(quantity).ok_or_else(too_large)?,
                    ..line.clone()
                }
            }
            None => LineItem::snapshot(item, item_id, order_id, quantity),
        };

        let others = self
            .line_items
            .iter()
            .enumerate()
            .filter(|(index, _)| Some(*index) != existing)
            .map(|(_, line)| line);
        sum_lines(others.chain(std::iter::once(&candidate))).map_err(|_| too_large())?;

        match existing {
            Some(index) => {
                self.line_items[index] = candidate;
                Ok(Accrual::Incremented(index))
            }
            None => {
                self.line_items.push(candidate);
                Ok(Accrual::Appended(self.line_items.len() - 1))
            }
        }
    }

    /// Marks the order paid if `payment` covers the total.
    ///
    /// ## Rules
    /// - The order must be unpaid
    /// - `payment` must be non-negative
    /// - `payment >= total` (exact equality settles)
    pub fn settle(&mut self, payment: Money) -> CoreResult<()> {
        self.ensure_unpaid()?;
        validate_payment(payment).map_err(CoreError::InvalidPayment)?;

        let total = self.total()?;
        if payment < total {
            return Err(CoreError::InsufficientPayment { total, payment });
        }

        self.paid = true;
        Ok(())
    }

    /// Id used in error reports; unsaved orders report id 0.
    fn persisted_id(&self) -> OrderId {
        self.id.unwrap_or(OrderId(0))
    }
}

fn sum_lines<'a>(mut lines: impl Iterator<Item = &'a LineItem>) -> CoreResult<Money> {
    lines.try_fold(Money::zero(), |total, line| {
        total
            .checked_add(line.line_total()?)
            .ok_or(CoreError::AmountOverflow)
    })
}

// =============================================================================
// Unit Tests
// =============================================================================
