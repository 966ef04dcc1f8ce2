//! Production and finance summaries.

use chrono::NaiveDate;
use dairyman_core::{AnimalId, Category, FinanceConfig, LedgerEntry, MilkingRecord};
use serde::Serialize;

/// Cash position from the whole ledger.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct CashBalance {
    /// Revenue minus expenses
    pub balance: f64,
    /// Sum of revenue entries
    pub revenue: f64,
    /// Sum of expense entries
    pub expenses: f64,
}

/// Sum every ledger entry into a cash balance.
pub fn cash_balance(entries: &[LedgerEntry]) -> CashBalance {
    let (revenue, expenses) = entries.iter().fold((0.0, 0.0), |(rev, exp), e| {
        if e.category.is_expense() {
            (rev, exp + e.amount)
        } else {
            (rev + e.amount, exp)
        }
    });
    CashBalance {
        balance: revenue - expenses,
        revenue,
        expenses,
    }
}

/// Key figures for a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PeriodSummary {
    /// First day
    pub from: NaiveDate,
    /// Last day
    pub to: NaiveDate,
    /// Milk produced, in liters
    pub production_liters: f64,
    /// Concentrate fed, in kg
    pub feed_kg: f64,
    /// Milk revenue (linked payments, or estimated)
    pub milk_revenue: f64,
    /// Whether `milk_revenue` comes from the default price
    pub estimated_revenue: bool,
    /// Concentrate at the configured price
    pub feed_cost: f64,
    /// Ledger expenses booked in the range
    pub other_expenses: f64,
    /// Feed cost plus other expenses
    pub total_cost: f64,
    /// Revenue minus total cost
    pub profit: f64,
    /// Revenue per liter
    pub average_price: f64,
    /// Total cost per liter
    pub cost_per_liter: f64,
}

fn within(date: NaiveDate, from: NaiveDate, to: NaiveDate) -> bool {
    date >= from && date <= to
}

/// Summarize production and money for `[from, to]`.
///
/// Milk payments count when the period they pay for starts in the range, or,
/// without a reference period, when they are booked in the range. Returns
/// `None` when nothing was milked in the range.
pub fn period_summary(
    milkings: &[MilkingRecord],
    entries: &[LedgerEntry],
    from: NaiveDate,
    to: NaiveDate,
    finance: &FinanceConfig,
) -> Option<PeriodSummary> {
    let in_range: Vec<_> = milkings.iter().filter(|m| within(m.date, from, to)).collect();
    if in_range.is_empty() {
        return None;
    }

    let production_liters: f64 = in_range.iter().map(|m| m.liters).sum();
    let feed_kg: f64 = in_range.iter().map(|m| m.feed_kg).sum();

    let linked_revenue: f64 = entries
        .iter()
        .filter(|e| e.category == Category::MilkSale)
        .filter(|e| match e.reference_period {
            Some(period) => within(period.start, from, to),
            None => within(e.date, from, to),
        })
        .map(|e| e.amount)
        .sum();

    let other_expenses: f64 = entries
        .iter()
        .filter(|e| e.category.is_expense() && within(e.date, from, to))
        .map(|e| e.amount)
        .sum();

    let feed_cost = feed_kg * finance.feed_price_per_kg;
    let total_cost = feed_cost + other_expenses;

    let estimated_revenue = linked_revenue <= 0.0;
    let milk_revenue = if estimated_revenue {
        production_liters * finance.default_milk_price
    } else {
        linked_revenue
    };

    let per_liter = |amount: f64| {
        if production_liters > 0.0 {
            amount / production_liters
        } else {
            0.0
        }
    };

    Some(PeriodSummary {
        from,
        to,
        production_liters,
        feed_kg,
        milk_revenue,
        estimated_revenue,
        feed_cost,
        other_expenses,
        total_cost,
        profit: milk_revenue - total_cost,
        average_price: per_liter(milk_revenue),
        cost_per_liter: per_liter(total_cost),
    })
}

/// Price per liter for valuing one cow's milk over `[from, to]`.
///
/// The herd's realized average when milk payments are linked to the range,
/// otherwise the configured default.
pub fn reference_price(
    milkings: &[MilkingRecord],
    entries: &[LedgerEntry],
    from: NaiveDate,
    to: NaiveDate,
    finance: &FinanceConfig,
) -> f64 {
    period_summary(milkings, entries, from, to, finance)
        .filter(|summary| !summary.estimated_revenue)
        .map_or(finance.default_milk_price, |summary| summary.average_price)
}

/// Figures for one cow over a date range.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnimalSummary {
    /// Cow
    pub animal_id: AnimalId,
    /// Milk produced, in liters
    pub liters: f64,
    /// Concentrate fed, in kg
    pub feed_kg: f64,
    /// Mean concentrate per milking, in kg
    pub average_feed_kg: f64,
    /// Liters at the reference price
    pub revenue: f64,
    /// Concentrate at the configured price
    pub feed_cost: f64,
    /// Expenses attributed to the cow
    pub direct_expenses: f64,
    /// Revenue minus feed cost and direct expenses
    pub margin: f64,
}

/// Summarize one cow; `price_per_liter` values her milk.
pub fn animal_summary(
    animal_id: &AnimalId,
    milkings: &[MilkingRecord],
    entries: &[LedgerEntry],
    from: NaiveDate,
    to: NaiveDate,
    price_per_liter: f64,
    finance: &FinanceConfig,
) -> Option<AnimalSummary> {
    let records: Vec<_> = milkings
        .iter()
        .filter(|m| &m.animal_id == animal_id && within(m.date, from, to))
        .collect();
    if records.is_empty() {
        return None;
    }

    let liters: f64 = records.iter().map(|m| m.liters).sum();
    let feed_kg: f64 = records.iter().map(|m| m.feed_kg).sum();
    let direct_expenses: f64 = entries
        .iter()
        .filter(|e| e.category.is_expense() && within(e.date, from, to))
        .filter(|e| e.animal_id.as_ref() == Some(animal_id))
        .map(|e| e.amount)
        .sum();

    let revenue = liters * price_per_liter;
    let feed_cost = feed_kg * finance.feed_price_per_kg;

    Some(AnimalSummary {
        animal_id: animal_id.clone(),
        liters,
        feed_kg,
        average_feed_kg: feed_kg / records.len() as f64,
        revenue,
        feed_cost,
        direct_expenses,
        margin: revenue - feed_cost - direct_expenses,
    })
}

/// Liters milked from one cow on one day.
pub fn daily_yield(
    milkings: &[MilkingRecord],
    animal_id: &AnimalId,
    date: NaiveDate,
) -> Option<f64> {
    let mut found = false;
    let liters: f64 = milkings
        .iter()
        .filter(|m| &m.animal_id == animal_id && m.date == date)
        .inspect(|_| found = true)
        .map(|m| m.liters)
        .sum();
    found.then_some(liters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 5, d).unwrap()
    }

    fn milking(d: u32, id: &str, liters: f64, feed: f64) -> MilkingRecord {
        MilkingRecord::new(day(d), 1, AnimalId::new(id), liters, feed)
    }

    #[test]
    fn test_cash_balance() {
        let entries = vec![
            LedgerEntry::new(day(1), Category::MilkSale, "May milk", 1000.0),
            LedgerEntry::new(day(2), Category::Veterinary, "Vaccines", 150.0),
            LedgerEntry::new(day(3), Category::Energy, "Power", 50.0),
        ];
        let cash = cash_balance(&entries);
        assert_eq!(cash.revenue, 1000.0);
        assert_eq!(cash.expenses, 200.0);
        assert_eq!(cash.balance, 800.0);
        assert_eq!(cash_balance(&[]), CashBalance::default());
    }

    #[test]
    fn test_period_summary_with_linked_payment() {
        let milkings = vec![
            milking(2, "105", 300.0, 50.0),
            milking(3, "202", 100.0, 25.0),
            milking(20, "105", 999.0, 0.0),
        ];
        let june_10 = NaiveDate::from_ymd_opt(2025, 6, 10).unwrap();
        let entries = vec![
            // Paid in June for May 1-10
            LedgerEntry::new(june_10, Category::MilkSale, "", 800.0).referring_to(day(1), day(10)),
            // Paid for April production
            LedgerEntry::new(day(5), Category::MilkSale, "", 500.0).referring_to(
                NaiveDate::from_ymd_opt(2025, 4, 1).unwrap(),
                NaiveDate::from_ymd_opt(2025, 4, 30).unwrap(),
            ),
            LedgerEntry::new(day(4), Category::Labor, "", 100.0),
            LedgerEntry::new(day(15), Category::Labor, "", 100.0),
        ];

        let finance = FinanceConfig::default();
        let summary = period_summary(&milkings, &entries, day(1), day(10), &finance).unwrap();
        assert_eq!(summary.production_liters, 400.0);
        assert_eq!(summary.feed_kg, 75.0);
        assert_eq!(summary.milk_revenue, 800.0);
        assert!(!summary.estimated_revenue);
        assert_eq!(summary.feed_cost, 150.0);
        assert_eq!(summary.other_expenses, 100.0);
        assert_eq!(summary.total_cost, 250.0);
        assert_eq!(summary.profit, 550.0);
        assert_eq!(summary.average_price, 2.0);
        assert_eq!(summary.cost_per_liter, 0.625);
    }

    #[test]
    fn test_period_summary_estimates_without_payment() {
        let milkings = vec![milking(2, "105", 100.0, 10.0)];
        let finance = FinanceConfig::default();
        let summary = period_summary(&milkings, &[], day(1), day(10), &finance).unwrap();
        assert!(summary.estimated_revenue);
        assert_eq!(summary.milk_revenue, 250.0);
        assert_eq!(summary.average_price, 2.5);
        assert_eq!(summary.profit, 230.0);
    }

    #[test]
    fn test_period_summary_none_without_production() {
        let milkings = vec![milking(20, "105", 100.0, 10.0)];
        let finance = FinanceConfig::default();
        assert!(period_summary(&milkings, &[], day(1), day(10), &finance).is_none());
    }

    #[test]
    fn test_animal_summary() {
        let milkings = vec![
            milking(2, "105", 20.0, 4.0),
            milking(3, "105", 22.0, 6.0),
            milking(3, "202", 50.0, 5.0),
        ];
        let entries = vec![
            LedgerEntry::new(day(3), Category::Veterinary, "Mastitis", 30.0)
                .for_animal(AnimalId::new("105")),
            LedgerEntry::new(day(3), Category::Veterinary, "Herd", 90.0),
        ];
        let id = AnimalId::new("105");
        let finance = FinanceConfig::default();
        let summary =
            animal_summary(&id, &milkings, &entries, day(1), day(10), 2.0, &finance).unwrap();
        assert_eq!(summary.liters, 42.0);
        assert_eq!(summary.average_feed_kg, 5.0);
        assert_eq!(summary.direct_expenses, 30.0);
        assert_eq!(summary.margin, 84.0 - 20.0 - 30.0);
        let stranger = AnimalId::new("999");
        assert!(
            animal_summary(&stranger, &milkings, &entries, day(1), day(10), 2.0, &finance)
                .is_none()
        );
    }

    #[test]
    fn test_reference_price_prefers_realized_average() {
        let milkings = vec![milking(2, "105", 300.0, 0.0), milking(3, "202", 100.0, 0.0)];
        let paid = vec![
            LedgerEntry::new(day(12), Category::MilkSale, "", 800.0).referring_to(day(1), day(10)),
        ];
        let finance = FinanceConfig::default();
        assert_eq!(reference_price(&milkings, &paid, day(1), day(10), &finance), 2.0);
        // No linked payment, no production: fall back to the default price
        assert_eq!(reference_price(&milkings, &[], day(1), day(10), &finance), 2.5);
        assert_eq!(reference_price(&[], &paid, day(1), day(10), &finance), 2.5);
    }

    #[test]
    fn test_daily_yield() {
        let milkings = vec![
            milking(2, "105", 20.0, 4.0),
            milking(2, "105", 12.5, 3.0),
            milking(3, "105", 1.0, 0.0),
        ];
        let id = AnimalId::new("105");
        assert_eq!(daily_yield(&milkings, &id, day(2)), Some(32.5));
        assert_eq!(daily_yield(&milkings, &id, day(4)), None);
    }
}
