//! Ledger entries - farm revenue and expenses.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use crate::id::{AnimalId, EntryId};

/// A single financial movement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerEntry {
    /// Unique identifier
    pub id: EntryId,

    /// Booking date
    pub date: NaiveDate,

    /// Category; decides whether this is revenue or expense
    pub category: Category,

    /// Free text
    #[serde(default)]
    pub description: String,

    /// Amount, always positive
    pub amount: f64,

    /// Animal the movement is attributed to, if any
    #[serde(default)]
    pub animal_id: Option<AnimalId>,

    /// Production period a milk payment refers to
    #[serde(default)]
    pub reference_period: Option<ReferencePeriod>,
}

impl LedgerEntry {
    /// Create a new entry.
    pub fn new(
        date: NaiveDate,
        category: Category,
        description: impl Into<String>,
        amount: f64,
    ) -> Self {
        Self {
            id: EntryId::new(),
            date,
            category,
            description: description.into(),
            amount,
            animal_id: None,
            reference_period: None,
        }
    }

    /// Attribute the entry to an animal.
    pub fn for_animal(mut self, animal_id: AnimalId) -> Self {
        self.animal_id = Some(animal_id);
        self
    }

    /// Link a milk payment to the production period it pays for.
    pub fn referring_to(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.reference_period = Some(ReferencePeriod { start, end });
        self
    }
}

/// Production period covered by a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReferencePeriod {
    /// First day
    pub start: NaiveDate,
    /// Last day
    pub end: NaiveDate,
}

/// Revenue or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntryKind {
    /// Money in
    Revenue,
    /// Money out
    Expense,
}

/// Ledger category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Milk sold to the dairy
    MilkSale,
    /// Animals sold
    AnimalSale,
    /// Services provided
    Services,
    /// Any other revenue
    OtherRevenue,
    /// Feed and nutrition
    Feed,
    /// Medicines, vaccines, vet services
    Veterinary,
    /// Buildings and equipment
    Infrastructure,
    /// Wages
    Labor,
    /// Electricity and fuel
    Energy,
    /// Animals bought
    AnimalPurchase,
    /// Any other expense
    OtherExpense,
}

impl Category {
    /// Every category, revenue first.
    pub const ALL: [Category; 11] = [
        Category::MilkSale,
        Category::AnimalSale,
        Category::Services,
        Category::OtherRevenue,
        Category::Feed,
        Category::Veterinary,
        Category::Infrastructure,
        Category::Labor,
        Category::Energy,
        Category::AnimalPurchase,
        Category::OtherExpense,
    ];

    /// Revenue or expense.
    pub fn kind(&self) -> EntryKind {
        match self {
            Category::MilkSale
            | Category::AnimalSale
            | Category::Services
            | Category::OtherRevenue => EntryKind::Revenue,
            _ => EntryKind::Expense,
        }
    }

    /// Whether this category is an expense.
    pub fn is_expense(&self) -> bool {
        self.kind() == EntryKind::Expense
    }

    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::MilkSale => "milk_sale",
            Category::AnimalSale => "animal_sale",
            Category::Services => "services",
            Category::OtherRevenue => "other_revenue",
            Category::Feed => "feed",
            Category::Veterinary => "veterinary",
            Category::Infrastructure => "infrastructure",
            Category::Labor => "labor",
            Category::Energy => "energy",
            Category::AnimalPurchase => "animal_purchase",
            Category::OtherExpense => "other_expense",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim().to_lowercase())
            .ok_or_else(|| format!("unknown category: {s}"))
    }
}
