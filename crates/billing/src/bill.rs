//! Bill snapshot handed from the order model to the views.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use webpos_core::ProductId;

use crate::catalog::OrderLineItem;

/// Line items keyed by product id; iteration is ascending id.
pub type BillItems = BTreeMap<ProductId, OrderLineItem>;

/// Exact sum of the line totals, or `None` on overflow.
pub fn checked_total<'a>(items: impl IntoIterator<Item = &'a OrderLineItem>) -> Option<Decimal> {
    items
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, item| acc.checked_add(item.line_total()?))
}

/// The in-progress order at one point in time.
///
/// Rebuilt on every change; nothing holds on to a `Bill` across renders.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bill {
    pub items: BillItems,
    pub total: Decimal,
}

impl Bill {
    pub fn new(items: BillItems, total: Decimal) -> Self {
        Self { items, total }
    }

    /// Build a bill whose total is the exact sum of its lines.
    ///
    /// Saturates at `Decimal::MAX` when the sum is not representable.
    pub fn from_items(items: impl IntoIterator<Item = OrderLineItem>) -> Self {
        let items: BillItems = items.into_iter().map(|item| (item.id, item)).collect();
        let total = checked_total(items.values()).unwrap_or(Decimal::MAX);
        Self { items, total }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
