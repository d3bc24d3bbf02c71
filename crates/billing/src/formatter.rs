//! Bill rendering: group line items by category and turn them into rows.
//!
//! The view never sees line items directly; it receives a flat list of
//! [`BillRow`] instructions and materializes them however it likes.

use rust_decimal::Decimal;

use webpos_core::{CategoryId, ProductId};

use crate::bill::{Bill, BillItems};
use crate::catalog::{Categories, OrderLineItem};
use crate::config::BillingConfig;
use crate::money::format_amount;

/// One render instruction for the bill table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BillRow {
    /// Visual break between category groups (and after the last one).
    Separator,
    /// Group heading; only emitted for recognized categories.
    CategoryHeader { name: String },
    /// A product line with its formatted line total.
    Item {
        id: ProductId,
        name: String,
        quantity: u32,
        price: String,
    },
    /// The grand total, taken from the bill as-is.
    Total { amount: String },
}

/// Order line items by the priority of their category, ascending.
///
/// Items in categories missing from `categories` go after every recognized
/// category. The sort is stable: items with equal priority, and unrecognized
/// items among themselves, keep the map's ascending product-id order.
pub fn group_and_order(items: &BillItems, categories: &Categories) -> Vec<OrderLineItem> {
    let mut ordered: Vec<OrderLineItem> = items.values().cloned().collect();
    ordered.sort_by_key(|item| match categories.priority_of(item.category) {
        Some(priority) => (false, priority),
        None => (true, 0),
    });
    ordered
}

/// Turns bill snapshots into render instructions.
#[derive(Debug, Clone, Default)]
pub struct BillFormatter {
    config: BillingConfig,
}

impl BillFormatter {
    pub fn new(config: BillingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BillingConfig {
        &self.config
    }

    /// Format an amount with this formatter's currency settings.
    pub fn format(&self, amount: Option<Decimal>) -> String {
        format_amount(amount, &self.config)
    }

    /// Walk already-ordered items and emit rows, then the trailing separator
    /// and the grand total.
    pub fn render_rows(
        &self,
        ordered: &[OrderLineItem],
        categories: &Categories,
        total: Option<Decimal>,
    ) -> Vec<BillRow> {
        let mut rows = Vec::with_capacity(ordered.len() * 2 + 2);
        let mut last_category: Option<CategoryId> = None;

        for item in ordered {
            if last_category != Some(item.category) {
                if last_category.is_some() {
                    rows.push(BillRow::Separator);
                }
                if let Some(category) = categories.get(item.category) {
                    rows.push(BillRow::CategoryHeader {
                        name: category.name.clone(),
                    });
                }
            }

            rows.push(BillRow::Item {
                id: item.id,
                name: item.name.clone(),
                quantity: item.quantity,
                // Saturates on overflow.
                price: self.format(Some(item.line_total().unwrap_or(Decimal::MAX))),
            });

            last_category = Some(item.category);
        }

        rows.push(BillRow::Separator);
        rows.push(BillRow::Total {
            amount: self.format(total),
        });

        rows
    }

    /// Group, order and render a whole bill.
    pub fn render_bill(&self, bill: &Bill, categories: &Categories) -> Vec<BillRow> {
        let ordered = group_and_order(&bill.items, categories);
        tracing::debug!(
            items = ordered.len(),
            categories = categories.len(),
            "rendering bill"
        );
        self.render_rows(&ordered, categories, Some(bill.total))
    }
}
