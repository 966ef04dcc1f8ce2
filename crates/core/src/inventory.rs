//! Inventory - feed, medicines and supplies kept on the farm.

use serde::{Deserialize, Serialize};
use crate::id::StockId;

/// A stocked product, valued at weighted average cost.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    /// Unique identifier
    pub id: StockId,

    /// Product name; matched case-insensitively
    pub name: String,

    /// Quantity on hand
    pub quantity: f64,

    /// Unit of measure (kg, L, dose, ...)
    pub unit: String,

    /// Weighted average cost per unit
    pub average_cost: f64,
}

impl StockItem {
    /// Create an empty item.
    pub fn new(name: impl Into<String>, unit: impl Into<String>) -> Self {
        Self {
            id: StockId::new(),
            name: name.into(),
            quantity: 0.0,
            unit: unit.into(),
            average_cost: 0.0,
        }
    }

    /// Whether `name` designates this item.
    pub fn matches(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    /// Value of the quantity on hand.
    pub fn value(&self) -> f64 {
        self.quantity * self.average_cost
    }
}
