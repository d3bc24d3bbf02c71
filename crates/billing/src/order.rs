use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use webpos_core::{Aggregate, AggregateRoot, DomainError, Entity, OrderId, ProductId};
use webpos_events::Event;

use crate::bill::{Bill, BillItems, checked_total};
use crate::catalog::OrderLineItem;

/// Aggregate root: the order being rung up at the till.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Order {
    id: OrderId,
    items: BillItems,
    version: u64,
}

impl Order {
    pub fn empty(id: OrderId) -> Self {
        Self {
            id,
            items: BillItems::new(),
            version: 0,
        }
    }

    pub fn id_typed(&self) -> OrderId {
        self.id
    }

    pub fn items(&self) -> &BillItems {
        &self.items
    }

    pub fn quantity_of(&self, product_id: ProductId) -> Option<u32> {
        self.items.get(&product_id).map(|item| item.quantity)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Exact sum of every line total.
    ///
    /// Commands that would make this unrepresentable are rejected, so the
    /// saturation never triggers for an order built through `handle`.
    pub fn total(&self) -> Decimal {
        checked_total(self.items.values()).unwrap_or(Decimal::MAX)
    }

    /// Fresh snapshot for views and submission.
    pub fn bill(&self) -> Bill {
        Bill::new(self.items.clone(), self.total())
    }
}

impl AggregateRoot for Order {
    type Id = OrderId;

    fn id(&self) -> &Self::Id {
        &self.id
    }

    fn version(&self) -> u64 {
        self.version
    }
}

/// Command: AddProduct (a product button was pressed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddProduct {
    pub product: OrderLineItem,
    pub occurred_at: DateTime<Utc>,
}

/// Command payload for the +/- buttons on a bill line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeQuantity {
    pub product_id: ProductId,
    pub qty: u32,
    pub occurred_at: DateTime<Utc>,
}

/// Command: ClearBill.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearBill {
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderCommand {
    AddProduct(AddProduct),
    IncrementProduct(ChangeQuantity),
    DecrementProduct(ChangeQuantity),
    ClearBill(ClearBill),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderEvent {
    ProductAdded {
        item: OrderLineItem,
        occurred_at: DateTime<Utc>,
    },
    QuantityIncreased {
        product_id: ProductId,
        qty: u32,
        occurred_at: DateTime<Utc>,
    },
    QuantityDecreased {
        product_id: ProductId,
        qty: u32,
        occurred_at: DateTime<Utc>,
    },
    ProductRemoved {
        product_id: ProductId,
        occurred_at: DateTime<Utc>,
    },
    BillCleared {
        occurred_at: DateTime<Utc>,
    },
}

impl Event for OrderEvent {
    fn event_type(&self) -> &'static str {
        match self {
            OrderEvent::ProductAdded { .. } => "order.product.added",
            OrderEvent::QuantityIncreased { .. } => "order.product.increased",
            OrderEvent::QuantityDecreased { .. } => "order.product.decreased",
            OrderEvent::ProductRemoved { .. } => "order.product.removed",
            OrderEvent::BillCleared { .. } => "order.bill.cleared",
        }
    }

    fn version(&self) -> u32 {
        1
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        match self {
            OrderEvent::ProductAdded { occurred_at, .. }
            | OrderEvent::QuantityIncreased { occurred_at, .. }
            | OrderEvent::QuantityDecreased { occurred_at, .. }
            | OrderEvent::ProductRemoved { occurred_at, .. }
            | OrderEvent::BillCleared { occurred_at } => *occurred_at,
        }
    }
}

impl Aggregate for Order {
    type Command = OrderCommand;
    type Event = OrderEvent;
    type Error = DomainError;

    fn apply(&mut self, event: &Self::Event) {
        match event {
            OrderEvent::ProductAdded { item, .. } => {
                self.items.insert(*item.id(), item.clone());
            }
            OrderEvent::QuantityIncreased { product_id, qty, .. } => {
                if let Some(item) = self.items.get_mut(product_id) {
                    item.quantity = item.quantity.saturating_add(*qty);
                }
            }
            OrderEvent::QuantityDecreased { product_id, qty, .. } => {
                if let Some(item) = self.items.get_mut(product_id) {
                    item.quantity = item.quantity.saturating_sub(*qty);
                }
            }
            OrderEvent::ProductRemoved { product_id, .. } => {
                self.items.remove(product_id);
            }
            OrderEvent::BillCleared { .. } => {
                self.items.clear();
            }
        }

        // Deterministic version tracking: +1 per applied event.
        self.version += 1;
    }

    fn handle(&self, command: &Self::Command) -> Result<Vec<Self::Event>, Self::Error> {
        match command {
            OrderCommand::AddProduct(cmd) => self.handle_add(cmd),
            OrderCommand::IncrementProduct(cmd) => self.handle_increment(cmd),
            OrderCommand::DecrementProduct(cmd) => self.handle_decrement(cmd),
            OrderCommand::ClearBill(cmd) => Ok(vec![OrderEvent::BillCleared {
                occurred_at: cmd.occurred_at,
            }]),
        }
    }
}

impl Order {
    fn ensure_increment_fits(&self, line: &OrderLineItem, qty: u32) -> Result<(), DomainError> {
        let quantity = line
            .quantity
            .checked_add(qty)
            .ok_or_else(|| DomainError::validation("quantity overflow"))?;
        self.ensure_total_fits(&line.clone().with_quantity(quantity))
    }

    /// The bill with `line` in place must still have a representable total.
    fn ensure_total_fits(&self, line: &OrderLineItem) -> Result<(), DomainError> {
        let others = checked_total(self.items.values().filter(|item| item.id != line.id));
        others
            .zip(line.line_total())
            .and_then(|(others, line_total)| others.checked_add(line_total))
            .map(|_| ())
            .ok_or_else(|| DomainError::validation("bill total overflow"))
    }

    fn handle_add(&self, cmd: &AddProduct) -> Result<Vec<OrderEvent>, DomainError> {
        let product = &cmd.product;

        if product.quantity == 0 {
            return Err(DomainError::validation("quantity must be positive"));
        }

        if product.unit_price.is_sign_negative() && !product.unit_price.is_zero() {
            return Err(DomainError::validation("unit_price must not be negative"));
        }

        if let Some(existing) = self.items.get(&product.id) {
            self.ensure_increment_fits(existing, product.quantity)?;
            return Ok(vec![OrderEvent::QuantityIncreased {
                product_id: product.id,
                qty: product.quantity,
                occurred_at: cmd.occurred_at,
            }]);
        }

        self.ensure_total_fits(product)?;

        Ok(vec![OrderEvent::ProductAdded {
            item: product.clone(),
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_increment(&self, cmd: &ChangeQuantity) -> Result<Vec<OrderEvent>, DomainError> {
        if cmd.qty == 0 {
            return Err(DomainError::validation("qty must be positive"));
        }
        let Some(existing) = self.items.get(&cmd.product_id) else {
            return Err(DomainError::not_found());
        };
        self.ensure_increment_fits(existing, cmd.qty)?;

        Ok(vec![OrderEvent::QuantityIncreased {
            product_id: cmd.product_id,
            qty: cmd.qty,
            occurred_at: cmd.occurred_at,
        }])
    }

    fn handle_decrement(&self, cmd: &ChangeQuantity) -> Result<Vec<OrderEvent>, DomainError> {
        if cmd.qty == 0 {
            return Err(DomainError::validation("qty must be positive"));
        }
        let Some(current) = self.quantity_of(cmd.product_id) else {
            return Err(DomainError::not_found());
        };

        // A line never lingers at zero: it leaves the bill.
        if cmd.qty >= current {
            return Ok(vec![OrderEvent::ProductRemoved {
                product_id: cmd.product_id,
                occurred_at: cmd.occurred_at,
            }]);
        }

        Ok(vec![OrderEvent::QuantityDecreased {
            product_id: cmd.product_id,
            qty: cmd.qty,
            occurred_at: cmd.occurred_at,
        }])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use webpos_core::CategoryId;

    fn test_time() -> DateTime<Utc> {
        Utc::now()
    }

    fn coffee() -> OrderLineItem {
        OrderLineItem::new(ProductId::new(1), CategoryId::new(1), "Coffee", dec!(1.20))
    }

    fn add(product: OrderLineItem) -> OrderCommand {
        OrderCommand::AddProduct(AddProduct {
            product,
            occurred_at: test_time(),
        })
    }

    fn change(id: u32, qty: u32) -> ChangeQuantity {
        ChangeQuantity {
            product_id: ProductId::new(id),
            qty,
            occurred_at: test_time(),
        }
    }

    #[test]
    fn adding_new_product_emits_product_added() {
        let order = Order::empty(OrderId::new());

        let events = order.handle(&add(coffee())).unwrap();

        assert_eq!(events.len(), 1);
        match &events[0] {
            OrderEvent::ProductAdded { item, .. } => assert_eq!(item.name, "Coffee"),
            other => panic!("Expected ProductAdded, got {other:?}"),
        }
    }

    #[test]
    fn adding_existing_product_increments_it() {
        let mut order = Order::empty(OrderId::new());
        order.execute(&add(coffee())).unwrap();

        let events = order.execute(&add(coffee())).unwrap();

        assert!(matches!(events[0], OrderEvent::QuantityIncreased { qty: 1, .. }));
        assert_eq!(order.quantity_of(ProductId::new(1)), Some(2));
        assert_eq!(order.total(), dec!(2.40));
    }

    #[test]
    fn decrement_to_zero_removes_line() {
        let mut order = Order::empty(OrderId::new());
        order.execute(&add(coffee().with_quantity(2))).unwrap();

        order
            .execute(&OrderCommand::DecrementProduct(change(1, 1)))
            .unwrap();
        assert_eq!(order.quantity_of(ProductId::new(1)), Some(1));

        let events = order
            .execute(&OrderCommand::DecrementProduct(change(1, 1)))
            .unwrap();
        assert!(matches!(events[0], OrderEvent::ProductRemoved { .. }));
        assert!(order.is_empty());
        assert_eq!(order.total(), Decimal::ZERO);
    }

    #[test]
    fn changing_unknown_product_is_not_found() {
        let order = Order::empty(OrderId::new());

        for cmd in [
            OrderCommand::IncrementProduct(change(7, 1)),
            OrderCommand::DecrementProduct(change(7, 1)),
        ] {
            assert_eq!(order.handle(&cmd).unwrap_err(), DomainError::NotFound);
        }
    }

    #[test]
    fn rejects_zero_quantities_and_negative_prices() {
        let order = Order::empty(OrderId::new());

        let err = order.handle(&add(coffee().with_quantity(0))).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut bad = coffee();
        bad.unit_price = dec!(-1);
        let err = order.handle(&add(bad)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("unit_price")));

        let err = order
            .handle(&OrderCommand::IncrementProduct(change(1, 0)))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn increment_overflow_is_rejected() {
        let mut order = Order::empty(OrderId::new());
        order.execute(&add(coffee().with_quantity(u32::MAX))).unwrap();

        let err = order
            .handle(&OrderCommand::IncrementProduct(change(1, 1)))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("overflow")));
    }

    #[test]
    fn unrepresentable_totals_are_rejected() {
        let mut order = Order::empty(OrderId::new());
        let mut gold = coffee();
        gold.unit_price = Decimal::MAX;
        order.execute(&add(gold.clone())).unwrap();

        let err = order
            .handle(&OrderCommand::IncrementProduct(change(1, 1)))
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("total overflow")));

        let err = order.handle(&add(gold)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));

        let mut tea = coffee();
        tea.id = ProductId::new(2);
        let err = order.handle(&add(tea)).unwrap_err();
        assert!(matches!(err, DomainError::Validation(msg) if msg.contains("total overflow")));

        assert_eq!(order.quantity_of(ProductId::new(1)), Some(1));
        assert_eq!(order.total(), Decimal::MAX);
    }

    #[test]
    fn clear_empties_the_bill() {
        let mut order = Order::empty(OrderId::new());
        order.execute(&add(coffee())).unwrap();

        order
            .execute(&OrderCommand::ClearBill(ClearBill {
                occurred_at: test_time(),
            }))
            .unwrap();

        assert!(order.bill().is_empty());
    }

    #[test]
    fn handle_does_not_mutate_state_and_apply_versions() {
        let mut order = Order::empty(OrderId::new());
        let before = order.clone();

        let events = order.handle(&add(coffee())).unwrap();
        assert_eq!(order, before);
        assert_eq!(order.version(), 0);

        order.apply(&events[0]);
        assert_eq!(order.version(), 1);
        assert_eq!(order.bill().total, dec!(1.20));
    }
}
