//! Products on the bill and the categories that group them.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use webpos_core::{CategoryId, Entity, ProductId};

use crate::money::line_total;

/// One product entry on the bill.
///
/// Field names on the wire follow the product buttons (`qty`, `price`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderLineItem {
    pub id: ProductId,
    pub category: CategoryId,
    pub name: String,
    #[serde(rename = "qty")]
    pub quantity: u32,
    #[serde(rename = "price")]
    pub unit_price: Decimal,
}

impl OrderLineItem {
    /// A fresh bill line with quantity 1.
    pub fn new(
        id: ProductId,
        category: CategoryId,
        name: impl Into<String>,
        unit_price: Decimal,
    ) -> Self {
        Self {
            id,
            category,
            name: name.into(),
            quantity: 1,
            unit_price,
        }
    }

    pub fn with_quantity(mut self, quantity: u32) -> Self {
        self.quantity = quantity;
        self
    }

    pub fn line_total(&self) -> Option<Decimal> {
        line_total(self.quantity, self.unit_price)
    }
}

impl Entity for OrderLineItem {
    type Id = ProductId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// A product category with its display priority (lower comes first).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub priority: i32,
}

impl Category {
    pub fn new(id: CategoryId, name: impl Into<String>, priority: i32) -> Self {
        Self {
            id,
            name: name.into(),
            priority,
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}

/// The known category set, keyed by id.
///
/// Line items may reference ids missing from here; lookups then return
/// `None` and callers degrade instead of failing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Categories(BTreeMap<CategoryId, Category>);

impl Categories {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a category.
    pub fn insert(&mut self, category: Category) -> Option<Category> {
        self.0.insert(*category.id(), category)
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.0.get(&id)
    }

    pub fn contains(&self, id: CategoryId) -> bool {
        self.0.contains_key(&id)
    }

    pub fn priority_of(&self, id: CategoryId) -> Option<i32> {
        self.get(id).map(|c| c.priority)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.0.values()
    }
}

impl FromIterator<Category> for Categories {
    fn from_iter<I: IntoIterator<Item = Category>>(iter: I) -> Self {
        let mut categories = Self::new();
        for category in iter {
            categories.insert(category);
        }
        categories
    }
}
