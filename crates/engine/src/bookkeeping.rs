//! Ledger entries and stock movements implied by herd events.
//!
//! Treatments, purchases and sales each book money. Nothing here writes:
//! the caller stores the returned records.

use chrono::NaiveDate;
use dairyman_core::{Animal, Category, HealthRecord, LedgerEntry, StockItem};
use tracing::info;

/// Errors raised by stock movements and sales.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BookkeepingError {
    /// Quantities and prices must be positive
    #[error("{what} must be positive, got {value}")]
    NotPositive {
        /// Offending input
        what: &'static str,
        /// Its value
        value: f64,
    },

    /// Amount must not be negative
    #[error("{what} cannot be negative, got {value}")]
    Negative {
        /// Offending input
        what: &'static str,
        /// Its value
        value: f64,
    },

    /// Purchases are booked under an expense category
    #[error("{0} is not an expense category")]
    NotAnExpense(Category),

    /// Not enough on hand
    #[error("only {available} {unit} of {item} left, {requested} requested")]
    InsufficientStock {
        /// Item name
        item: String,
        /// Quantity on hand
        available: f64,
        /// Quantity asked for
        requested: f64,
        /// Unit of measure
        unit: String,
    },
}

fn positive(what: &'static str, value: f64) -> Result<(), BookkeepingError> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(BookkeepingError::NotPositive { what, value })
    }
}

fn non_negative(what: &'static str, value: f64) -> Result<(), BookkeepingError> {
    if value >= 0.0 {
        Ok(())
    } else {
        Err(BookkeepingError::Negative { what, value })
    }
}

/// Veterinary expense for a treatment, `None` when it was free.
pub fn health_expense(record: &HealthRecord) -> Option<LedgerEntry> {
    if record.cost <= 0.0 {
        return None;
    }
    let description = if record.product.is_empty() {
        record.kind.to_string()
    } else {
        format!("{} - {}", record.kind, record.product)
    };
    let entry = LedgerEntry::new(record.date, Category::Veterinary, description, record.cost);
    Some(match &record.animal_id {
        Some(id) => entry.for_animal(id.clone()),
        None => entry,
    })
}

/// Revenue entry for selling `animal`. The caller removes her from the herd.
pub fn sale_entry(
    animal: &Animal,
    price: f64,
    date: NaiveDate,
    reason: &str,
) -> Result<LedgerEntry, BookkeepingError> {
    non_negative("sale price", price)?;
    let mut description = format!("Sale {} {} ({})", animal.id, animal.name, animal.status);
    if !reason.is_empty() {
        description.push_str(" - ");
        description.push_str(reason);
    }
    info!(animal = %animal.id, price, "animal sold");
    Ok(LedgerEntry::new(date, Category::AnimalSale, description, price)
        .for_animal(animal.id.clone()))
}

/// Expense entry for an animal bought in, `None` when she came free.
pub fn purchase_entry(animal: &Animal, price: f64, date: NaiveDate) -> Option<LedgerEntry> {
    (price > 0.0).then(|| {
        LedgerEntry::new(date, Category::AnimalPurchase, format!("Purchase {}", animal.id), price)
            .for_animal(animal.id.clone())
    })
}

/// A supplier invoice for stock.
#[derive(Debug, Clone, PartialEq)]
pub struct StockPurchase {
    /// Product name
    pub item: String,
    /// Quantity bought
    pub quantity: f64,
    /// Unit of measure
    pub unit: String,
    /// Invoice total
    pub total_cost: f64,
    /// Expense category to book under
    pub category: Category,
    /// Supplier, if known
    pub supplier: Option<String>,
    /// Invoice date
    pub date: NaiveDate,
}

/// Add a purchase to stock and book the expense.
///
/// `current` is the existing item with the same name, if any; its average
/// cost is re-weighted with the purchase.
pub fn receive_stock(
    current: Option<&StockItem>,
    purchase: &StockPurchase,
) -> Result<(StockItem, LedgerEntry), BookkeepingError> {
    positive("quantity", purchase.quantity)?;
    positive("invoice total", purchase.total_cost)?;
    if !purchase.category.is_expense() {
        return Err(BookkeepingError::NotAnExpense(purchase.category));
    }

    let mut item = current
        .cloned()
        .unwrap_or_else(|| StockItem::new(purchase.item.trim(), purchase.unit.clone()));
    let quantity = item.quantity + purchase.quantity;
    item.average_cost = (item.value() + purchase.total_cost) / quantity;
    item.quantity = quantity;
    item.unit = purchase.unit.clone();

    let mut description =
        format!("Purchase {} ({} {})", item.name, purchase.quantity, purchase.unit);
    if let Some(supplier) = purchase.supplier.as_deref().filter(|s| !s.is_empty()) {
        description.push_str(" - ");
        description.push_str(supplier);
    }
    let entry =
        LedgerEntry::new(purchase.date, purchase.category, description, purchase.total_cost);

    info!(
        item = %item.name,
        quantity = item.quantity,
        average_cost = item.average_cost,
        "stock received"
    );
    Ok((item, entry))
}

/// Take `quantity` out of stock. Usage books nothing: it was paid on purchase.
pub fn use_stock(item: &StockItem, quantity: f64) -> Result<StockItem, BookkeepingError> {
    positive("quantity", quantity)?;
    if quantity > item.quantity {
        return Err(BookkeepingError::InsufficientStock {
            item: item.name.clone(),
            available: item.quantity,
            requested: quantity,
            unit: item.unit.clone(),
        });
    }
    let mut updated = item.clone();
    updated.quantity -= quantity;
    info!(item = %item.name, left = updated.quantity, "stock used");
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dairyman_core::{AnimalId, AnimalStatus, HealthKind};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 15).unwrap()
    }

    fn purchase(item: &str, quantity: f64, total_cost: f64) -> StockPurchase {
        StockPurchase {
            item: item.to_string(),
            quantity,
            unit: "kg".to_string(),
            total_cost,
            category: Category::Feed,
            supplier: Some("Coop".to_string()),
            date: today(),
        }
    }

    #[test]
    fn test_treatment_cost_becomes_veterinary_expense() {
        let record = HealthRecord::new(today(), HealthKind::Antibiotic, "Mastitis tube", 45.0)
            .for_animal(AnimalId::new("105"));
        let entry = health_expense(&record).unwrap();
        assert_eq!(entry.category, Category::Veterinary);
        assert_eq!(entry.amount, 45.0);
        assert_eq!(entry.description, "antibiotic - Mastitis tube");
        assert_eq!(entry.animal_id, Some(AnimalId::new("105")));

        let herd_wide = HealthRecord::new(today(), HealthKind::Vaccine, "", 300.0);
        assert_eq!(health_expense(&herd_wide).unwrap().animal_id, None);

        let free = HealthRecord::new(today(), HealthKind::HoofTrimming, "", 0.0);
        assert!(health_expense(&free).is_none());
    }

    #[test]
    fn test_sale_books_revenue_for_the_animal() {
        let cow = Animal::new("404", "Velha", AnimalStatus::Dry);
        let entry = sale_entry(&cow, 3200.0, today(), "culled").unwrap();
        assert_eq!(entry.category, Category::AnimalSale);
        assert!(!entry.category.is_expense());
        assert_eq!(entry.animal_id, Some(AnimalId::new("404")));
        assert_eq!(entry.description, "Sale 404 Velha (dry) - culled");
        assert!(sale_entry(&cow, -1.0, today(), "").is_err());
    }

    #[test]
    fn test_purchase_entry_only_when_paid() {
        let calf = Animal::new("950", "Bought", AnimalStatus::Calf);
        let entry = purchase_entry(&calf, 800.0, today()).unwrap();
        assert_eq!(entry.category, Category::AnimalPurchase);
        assert!(purchase_entry(&calf, 0.0, today()).is_none());
    }

    #[test]
    fn test_receive_stock_weights_average_cost() {
        let (item, entry) = receive_stock(None, &purchase("Corn", 100.0, 200.0)).unwrap();
        assert_eq!(item.quantity, 100.0);
        assert_eq!(item.average_cost, 2.0);
        assert_eq!(entry.amount, 200.0);
        assert_eq!(entry.description, "Purchase Corn (100 kg) - Coop");

        let (item, _) = receive_stock(Some(&item), &purchase("corn", 100.0, 400.0)).unwrap();
        assert_eq!(item.name, "Corn");
        assert_eq!(item.quantity, 200.0);
        assert_eq!(item.average_cost, 3.0);
    }

    #[test]
    fn test_receive_stock_rejects_bad_invoices() {
        assert!(receive_stock(None, &purchase("Corn", 0.0, 200.0)).is_err());
        assert!(receive_stock(None, &purchase("Corn", 10.0, 0.0)).is_err());
        let mut revenue = purchase("Corn", 10.0, 20.0);
        revenue.category = Category::MilkSale;
        assert_eq!(
            receive_stock(None, &revenue).unwrap_err(),
            BookkeepingError::NotAnExpense(Category::MilkSale)
        );
    }

    #[test]
    fn test_use_stock() {
        let (item, _) = receive_stock(None, &purchase("Salt", 25.0, 50.0)).unwrap();
        let left = use_stock(&item, 10.0).unwrap();
        assert_eq!(left.quantity, 15.0);
        assert_eq!(left.average_cost, 2.0);

        let err = use_stock(&left, 20.0).unwrap_err();
        assert!(matches!(
            err,
            BookkeepingError::InsufficientStock { available, .. } if available == 15.0
        ));
        assert!(use_stock(&left, -1.0).is_err());
    }
}
