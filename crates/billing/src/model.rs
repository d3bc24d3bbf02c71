//! The order model the presenter talks to.
//!
//! Wraps the `Order` aggregate with the category set and a bus that
//! announces every bill change to whoever renders it.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use webpos_core::{Aggregate, DomainResult, OrderId, ProductId, SubmissionId};
use webpos_events::{Event, EventBus, InMemoryEventBus, Subscription};

use crate::bill::Bill;
use crate::catalog::{Categories, OrderLineItem};
use crate::formatter::group_and_order;
use crate::order::{AddProduct, ChangeQuantity, ClearBill, Order, OrderCommand};
use crate::submission::BillSubmission;

/// Notification carrying the bill as it is after a change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillChanged {
    pub bill: Bill,
    pub occurred_at: DateTime<Utc>,
}

impl Event for BillChanged {
    fn event_type(&self) -> &'static str {
        "order.bill.changed"
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

#[derive(Debug)]
pub struct OrderModel {
    order: Order,
    categories: Categories,
    bus: InMemoryEventBus<BillChanged>,
}

impl OrderModel {
    pub fn new(categories: Categories) -> Self {
        Self {
            order: Order::empty(OrderId::new()),
            categories,
            bus: InMemoryEventBus::new(),
        }
    }

    /// Subscribe to bill change notifications.
    pub fn subscribe(&self) -> Subscription<BillChanged> {
        self.bus.subscribe()
    }

    pub fn categories(&self) -> &Categories {
        &self.categories
    }

    pub fn set_categories(&mut self, categories: Categories) {
        self.categories = categories;
    }

    pub fn order(&self) -> &Order {
        &self.order
    }

    pub fn bill(&self) -> Bill {
        self.order.bill()
    }

    pub fn total(&self) -> Decimal {
        self.order.total()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn add_product(&mut self, product: OrderLineItem) -> DomainResult<()> {
        self.execute(OrderCommand::AddProduct(AddProduct {
            product,
            occurred_at: Utc::now(),
        }))
    }

    pub fn increment_product(&mut self, product_id: ProductId, qty: u32) -> DomainResult<()> {
        self.execute(OrderCommand::IncrementProduct(ChangeQuantity {
            product_id,
            qty,
            occurred_at: Utc::now(),
        }))
    }

    pub fn decrement_product(&mut self, product_id: ProductId, qty: u32) -> DomainResult<()> {
        self.execute(OrderCommand::DecrementProduct(ChangeQuantity {
            product_id,
            qty,
            occurred_at: Utc::now(),
        }))
    }

    /// Start a new bill after a successful print.
    pub fn clear(&mut self) -> DomainResult<()> {
        self.execute(OrderCommand::ClearBill(ClearBill {
            occurred_at: Utc::now(),
        }))
    }

    /// Build the commit request for the current bill.
    pub fn submission(&self, customer_name: &str) -> BillSubmission {
        BillSubmission {
            submission_id: SubmissionId::new(),
            order_id: self.order.id_typed(),
            customer_name: customer_name.trim().to_string(),
            items: group_and_order(self.order.items(), &self.categories),
            total: self.order.total(),
        }
    }

    fn execute(&mut self, command: OrderCommand) -> DomainResult<()> {
        let events = self.order.execute(&command)?;

        let occurred_at = events
            .last()
            .map(Event::occurred_at)
            .unwrap_or_else(Utc::now);
        let change = BillChanged {
            bill: self.order.bill(),
            occurred_at,
        };

        tracing::debug!(
            event = change.event_type(),
            items = change.bill.items.len(),
            total = %change.bill.total,
            "bill changed"
        );

        // Views only miss a redraw if the bus is poisoned; state is already updated.
        if let Err(err) = self.bus.publish(change) {
            tracing::warn!(?err, "failed to publish bill change");
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Category;
    use rust_decimal_macros::dec;
    use webpos_core::{CategoryId, DomainError};

    fn model() -> OrderModel {
        OrderModel::new(
            [
                Category::new(CategoryId::new(1), "Drinks", 2),
                Category::new(CategoryId::new(2), "Food", 1),
            ]
            .into_iter()
            .collect(),
        )
    }

    fn product(id: u32, category: u32, price: Decimal) -> OrderLineItem {
        OrderLineItem::new(
            ProductId::new(id),
            CategoryId::new(category),
            format!("p{id}"),
            price,
        )
    }

    #[test]
    fn every_change_publishes_a_snapshot() {
        let mut model = model();
        let sub = model.subscribe();

        model.add_product(product(1, 1, dec!(1.5))).unwrap();
        model.add_product(product(1, 1, dec!(1.5))).unwrap();

        let first = sub.try_recv().unwrap();
        let second = sub.try_recv().unwrap();
        assert_eq!(first.bill.total, dec!(1.5));
        assert_eq!(second.bill.total, dec!(3.0));
        assert_eq!(second.event_type(), "order.bill.changed");
    }

    #[test]
    fn rejected_command_publishes_nothing() {
        let mut model = model();
        let sub = model.subscribe();

        let err = model.increment_product(ProductId::new(3), 1).unwrap_err();

        assert_eq!(err, DomainError::NotFound);
        assert!(sub.latest().is_none());
    }

    #[test]
    fn submission_lists_items_in_bill_order() {
        let mut model = model();
        model.add_product(product(1, 1, dec!(1))).unwrap();
        model.add_product(product(2, 2, dec!(2))).unwrap();

        let submission = model.submission("  Maria ");

        assert_eq!(submission.customer_name, "Maria");
        assert_eq!(submission.order_id, model.order().id_typed());
        assert_eq!(
            submission.items.iter().map(|i| i.id.get()).collect::<Vec<_>>(),
            vec![2, 1]
        );
        assert_eq!(submission.total, dec!(3));
    }

    #[test]
    fn clear_resets_bill_and_notifies() {
        let mut model = model();
        let sub = model.subscribe();
        model.add_product(product(1, 1, dec!(1))).unwrap();

        model.clear().unwrap();

        assert!(model.is_empty());
        assert!(sub.latest().unwrap().bill.is_empty());
    }
}
