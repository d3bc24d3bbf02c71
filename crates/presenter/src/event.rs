//! Typed UI events.
//!
//! The screen reports what the cashier did as a `UiAction`; the presenter
//! routes it by [`ActionKind`] through its handler table.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use webpos_billing::{OrderLineItem, parse_decimal};
use webpos_core::{CategoryId, DomainError, DomainResult, ProductId};

/// Data carried by a product button.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductButton {
    pub id: ProductId,
    pub category: CategoryId,
    pub name: String,
    pub price: Decimal,
}

impl ProductButton {
    /// Build from the raw attribute strings a button carries.
    pub fn from_attributes(
        id: &str,
        category: &str,
        name: &str,
        price: &str,
    ) -> DomainResult<Self> {
        let price = parse_decimal(price)
            .ok_or_else(|| DomainError::validation(format!("invalid price: {price:?}")))?;
        Ok(Self {
            id: id.parse()?,
            category: category.parse()?,
            name: name.to_string(),
            price,
        })
    }

    /// One unit of this product as a bill line.
    pub fn to_line_item(&self) -> OrderLineItem {
        OrderLineItem::new(self.id, self.category, self.name.clone(), self.price)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiAction {
    /// Toggle the product filter of a category button.
    SelectCategory(CategoryId),
    OrderProduct(ProductButton),
    IncrementProduct(ProductId),
    DecrementProduct(ProductId),
    PrintBill,
    DismissAlert,
    CustomerNameChanged(String),
}

/// Discriminant of [`UiAction`], used as the dispatch key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionKind {
    SelectCategory,
    OrderProduct,
    IncrementProduct,
    DecrementProduct,
    PrintBill,
    DismissAlert,
    CustomerNameChanged,
}

impl ActionKind {
    pub const ALL: [ActionKind; 7] = [
        ActionKind::SelectCategory,
        ActionKind::OrderProduct,
        ActionKind::IncrementProduct,
        ActionKind::DecrementProduct,
        ActionKind::PrintBill,
        ActionKind::DismissAlert,
        ActionKind::CustomerNameChanged,
    ];
}

impl UiAction {
    pub fn kind(&self) -> ActionKind {
        match self {
            UiAction::SelectCategory(_) => ActionKind::SelectCategory,
            UiAction::OrderProduct(_) => ActionKind::OrderProduct,
            UiAction::IncrementProduct(_) => ActionKind::IncrementProduct,
            UiAction::DecrementProduct(_) => ActionKind::DecrementProduct,
            UiAction::PrintBill => ActionKind::PrintBill,
            UiAction::DismissAlert => ActionKind::DismissAlert,
            UiAction::CustomerNameChanged(_) => ActionKind::CustomerNameChanged,
        }
    }
}

/// One user interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UiEvent {
    pub action: UiAction,
}

impl From<UiAction> for UiEvent {
    fn from(action: UiAction) -> Self {
        Self { action }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn button_attributes_parse_into_a_single_unit_line() {
        let button = ProductButton::from_attributes("12", "3", "Espresso", "1.10").unwrap();
        let line = button.to_line_item();

        assert_eq!(line.id, ProductId::new(12));
        assert_eq!(line.category, CategoryId::new(3));
        assert_eq!(line.quantity, 1);
        assert_eq!(line.unit_price, dec!(1.10));
    }

    #[test]
    fn malformed_attributes_are_rejected() {
        assert!(matches!(
            ProductButton::from_attributes("x", "3", "Espresso", "1"),
            Err(DomainError::InvalidId(_))
        ));
        assert!(matches!(
            ProductButton::from_attributes("1", "3", "Espresso", "cheap"),
            Err(DomainError::Validation(_))
        ));
    }

    fn button() -> ProductButton {
        ProductButton::from_attributes("1", "1", "Espresso", "1").unwrap()
    }

    #[test]
    fn every_kind_is_listed_once() {
        let kinds = [
            UiAction::SelectCategory(CategoryId::new(1)).kind(),
            UiAction::OrderProduct(button()).kind(),
            UiAction::IncrementProduct(ProductId::new(1)).kind(),
            UiAction::DecrementProduct(ProductId::new(1)).kind(),
            UiAction::PrintBill.kind(),
            UiAction::DismissAlert.kind(),
            UiAction::CustomerNameChanged(String::new()).kind(),
        ];
        for kind in kinds {
            assert_eq!(ActionKind::ALL.iter().filter(|k| **k == kind).count(), 1);
        }
        assert_eq!(kinds.len(), ActionKind::ALL.len());
    }
}
