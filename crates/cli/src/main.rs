//! Dairyman CLI - herd alerts, concentrate rations and the farm calendar.

mod ops;

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{Local, NaiveDate, Timelike};
use clap::{Parser, Subcommand, ValueEnum};
use dairyman_core::{
    Animal, AnimalId, AnimalStatus, Category, FarmConfig, HealthKind, HealthRecord, LedgerEntry,
    Sex,
};
use dairyman_engine::{
    animal_summary, as_of, cash_balance, compute_alerts, compute_ration, detect_shift,
    forecast_events, period_summary, ration_sheet, reference_price, resolve, BirthRecord, Ration,
    RecordWarning, Resolution, StockPurchase,
};
use dairyman_storage::{JsonStorage, Storage};
use tracing::warn;
use tracing_subscriber::EnvFilter;

use crate::ops::require;

#[derive(Parser)]
#[command(name = "dairyman")]
#[command(about = "Dairy herd alerts, rations and calendar", long_about = None)]
struct Cli {
    /// Data directory
    #[arg(long, global = true, default_value = ".dairyman")]
    data_dir: PathBuf,

    /// Farm configuration (defaults to <data-dir>/farm.json)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate as of this day instead of the local date (YYYY-MM-DD)
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show actionable alerts for the herd
    Alerts {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show projected reproductive events
    Forecast {
        /// Days ahead (defaults to the configured window)
        #[arg(long)]
        days: Option<u32>,
        /// Show every projected event, past ones included
        #[arg(long)]
        all: bool,
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Suggest concentrate for one cow at this milking
    Ration {
        /// Ear tag
        id: String,
        /// Milking shift (defaults to the current hour's shift)
        #[arg(long)]
        shift: Option<u32>,
    },
    /// Ration sheet for every lactating cow
    Rations {
        /// Milking shift (defaults to the current hour's shift)
        #[arg(long)]
        shift: Option<u32>,
    },
    /// Record what was done about an alert
    Resolve {
        /// Ear tag
        id: String,
        /// What was done
        #[arg(value_enum)]
        resolution: ResolutionArg,
        /// Destination lot (weaning)
        #[arg(long)]
        lot: Option<String>,
    },
    /// Record a calving
    Birth {
        /// Mother's ear tag
        mother: String,
        /// Calf ear tag
        calf_id: String,
        /// Calf name
        calf_name: String,
        /// Calf sex (female/male)
        #[arg(long)]
        sex: Sex,
        /// Day of birth (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Milkings per day for the fresh cow
        #[arg(long, default_value = "2")]
        feedings: u32,
    },
    /// Register an animal
    AddAnimal {
        /// Ear tag
        id: String,
        /// Name
        name: String,
        /// Category
        #[arg(long, default_value = "lactating")]
        status: AnimalStatus,
        /// Sex (female/male)
        #[arg(long)]
        sex: Option<Sex>,
        /// Management lot
        #[arg(long)]
        lot: Option<String>,
        /// Milkings per day
        #[arg(long, default_value = "0")]
        feedings: u32,
        /// Last calving
        #[arg(long)]
        calving: Option<NaiveDate>,
        /// Last insemination
        #[arg(long)]
        insemination: Option<NaiveDate>,
        /// Birth date
        #[arg(long)]
        born: Option<NaiveDate>,
        /// Purchase price, booked as an expense when bought in
        #[arg(long, default_value = "0")]
        price: f64,
    },
    /// List the herd
    Herd,
    /// Sell an animal and remove it from the herd
    Sell {
        /// Ear tag
        id: String,
        /// Sale price
        price: f64,
        /// Reason (culled, surplus calf, ...)
        #[arg(long, default_value = "")]
        reason: String,
    },
    /// Record a milking from the bucket weight
    Milk {
        /// Ear tag
        id: String,
        /// Bucket weight in kg
        bucket_kg: f64,
        /// Concentrate fed at this milking, in kg
        #[arg(long, default_value = "0")]
        feed: f64,
        /// Milking shift (defaults to the current hour's shift)
        #[arg(long)]
        shift: Option<u32>,
    },
    /// Open the day: carry yesterday's yields over and reset feed counters
    NewDay,
    /// Treatments
    Health {
        #[command(subcommand)]
        command: HealthCommand,
    },
    /// Feed, medicine and supply stock
    Stock {
        #[command(subcommand)]
        command: StockCommand,
    },
    /// Book a ledger entry
    Ledger {
        /// Category (milk_sale, feed, veterinary, ...)
        category: Category,
        /// Amount (positive)
        amount: f64,
        /// Description
        description: String,
        /// Booking day (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Animal the entry is about
        #[arg(long)]
        animal: Option<String>,
        /// First day the payment refers to
        #[arg(long, requires = "period_end")]
        period_start: Option<NaiveDate>,
        /// Last day the payment refers to
        #[arg(long, requires = "period_start")]
        period_end: Option<NaiveDate>,
    },
    /// Show the cash balance
    Balance,
    /// Production and finance summary for a date range
    Report {
        /// First day
        #[arg(long)]
        from: NaiveDate,
        /// Last day
        #[arg(long)]
        to: NaiveDate,
        /// Restrict to one cow
        #[arg(long)]
        animal: Option<String>,
        /// Milk price per liter for the cow summary
        /// (defaults to the period's realized price)
        #[arg(long)]
        price: Option<f64>,
    },
}

#[derive(Subcommand)]
enum HealthCommand {
    /// Record a treatment; its cost is booked as a veterinary expense
    Add {
        /// vaccine, dewormer, antibiotic, hormone, hoof_trimming or other
        kind: HealthKind,
        /// Product used
        #[arg(default_value = "")]
        product: String,
        /// Treated animal (omit for the whole herd)
        #[arg(long)]
        animal: Option<String>,
        /// Total cost
        #[arg(long, default_value = "0")]
        cost: f64,
        /// Notes
        #[arg(long, default_value = "")]
        notes: String,
        /// Day of the treatment (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Treatment history
    List {
        /// Only this animal's treatments (herd-wide ones included)
        #[arg(long)]
        animal: Option<String>,
    },
}

#[derive(Subcommand)]
enum StockCommand {
    /// Stock on hand
    List,
    /// Receive a purchase and book the invoice
    Buy {
        /// Product name
        item: String,
        /// Quantity bought
        quantity: f64,
        /// Unit (kg, L, dose, ...)
        unit: String,
        /// Invoice total
        total_cost: f64,
        /// Expense category
        #[arg(long, default_value = "feed")]
        category: Category,
        /// Supplier
        #[arg(long)]
        supplier: Option<String>,
        /// Invoice date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
    },
    /// Take a quantity out of stock
    Use {
        /// Product name
        item: String,
        /// Quantity used
        quantity: f64,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ResolutionArg {
    Inseminated,
    Pregnant,
    Empty,
    DriedOff,
    Colostrum,
    Weaned,
}

impl ResolutionArg {
    fn into_resolution(self, lot: Option<String>) -> Resolution {
        match self {
            ResolutionArg::Inseminated => Resolution::Inseminated,
            ResolutionArg::Pregnant => Resolution::Pregnant,
            ResolutionArg::Empty => Resolution::Empty,
            ResolutionArg::DriedOff => Resolution::DriedOff,
            ResolutionArg::Colostrum => Resolution::ColostrumGiven,
            ResolutionArg::Weaned => Resolution::Weaned { lot },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| cli.data_dir.join("farm.json"));
    let config = FarmConfig::load(&config_path)
        .with_context(|| format!("loading {}", config_path.display()))?;
    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    let mut storage = JsonStorage::new(&cli.data_dir).await?;

    match cli.command {
        Commands::Alerts { json } => {
            let herd = storage.snapshot().await?;
            let report = compute_alerts(&herd, today, &config.reproduction);
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
                return Ok(());
            }

            println!("Alerts for {} ({})", today, report.alerts.len());
            for alert in &report.alerts {
                println!(
                    "  [{}] {} | {} - {}",
                    alert.severity.as_str().to_uppercase(),
                    alert.subject_id,
                    alert.message,
                    alert.detail,
                );
            }
            print_warnings(&report.warnings);
        }
        Commands::Forecast { days, all, json } => {
            let herd = storage.snapshot().await?;
            let forecast = forecast_events(&herd, today, &config.reproduction, &config.forecast);
            if json {
                println!("{}", serde_json::to_string_pretty(&forecast)?);
                return Ok(());
            }

            let events = if all {
                let mut events: Vec<_> = forecast.events.iter().collect();
                events.sort_by(|a, b| {
                    a.date.cmp(&b.date).then_with(|| a.animal_id.cmp(&b.animal_id))
                });
                events
            } else {
                forecast.upcoming(today, days.unwrap_or(config.forecast.upcoming_days))
            };

            println!("Calendar ({} events)", events.len());
            for event in events {
                println!(
                    "  {} | {:<8} | {} {} - {}",
                    event.date,
                    event.severity.as_str(),
                    event.animal_id,
                    event.animal_name,
                    event.kind.as_str(),
                );
            }
            print_warnings(&forecast.warnings);
        }
        Commands::Ration { id, shift } => {
            let id = AnimalId::new(id);
            let milkings = storage.list_milkings().await?;
            let animal = as_of(&require(&storage, &id).await?, &milkings, today);
            let shift = shift.unwrap_or_else(current_shift);
            let ration = compute_ration(&animal, shift, &config.ration);
            println!("{} {} (shift {})", animal.id, animal.name, shift);
            print_ration(&ration);
        }
        Commands::Rations { shift } => {
            let herd = ops::herd_as_of(&storage, today).await?;
            let shift = shift.unwrap_or_else(current_shift);
            println!("Ration sheet, shift {}", shift);
            for (id, ration) in ration_sheet(&herd, shift, &config.ration) {
                println!(
                    "  {} | {:.2} kg{} | {:.2} kg left today",
                    id,
                    ration.suggested_kg,
                    if ration.capped { " (capped)" } else { "" },
                    ration.remaining_budget_kg,
                );
            }
        }
        Commands::Resolve { id, resolution, lot } => {
            let id = AnimalId::new(id);
            let animal = require(&storage, &id).await?;
            let resolution = resolution.into_resolution(lot);
            let patch = resolve(&animal, &resolution, today)?;
            let updated = storage.update_animal(&id, &patch).await?;
            println!(
                "{} {}: {} recorded, now {}",
                updated.id,
                updated.name,
                resolution.action().as_str(),
                updated.status,
            );
        }
        Commands::Birth { mother, calf_id, calf_name, sex, date, feedings } => {
            let mother = require(&storage, &AnimalId::new(mother)).await?;
            let birth = BirthRecord {
                calf_id: AnimalId::new(calf_id),
                calf_name,
                sex,
                date: date.unwrap_or(today),
                feedings_per_day: feedings,
            };
            let calf = ops::register_birth(&mut storage, &mother, &birth).await?;
            println!("Calf {} {} born to {} on {}", calf.id, calf.name, mother.id, birth.date);
        }
        Commands::AddAnimal {
            id,
            name,
            status,
            sex,
            lot,
            feedings,
            calving,
            insemination,
            born,
            price,
        } => {
            let mut animal = Animal::new(id, name, status);
            animal.feedings_per_day = feedings;
            animal.sex = sex;
            animal.lot = lot;
            if let Some(date) = calving {
                animal = animal.with_calving(date);
            }
            if let Some(date) = insemination {
                animal = animal.with_insemination(date);
            }
            if let Some(date) = born {
                animal = animal.with_birth(date);
            }
            let purchase = ops::add_animal(&mut storage, &animal, price, today).await?;
            println!("Added {} {} ({})", animal.id, animal.name, animal.status);
            if let Some(entry) = purchase {
                println!("Booked purchase {:.2}", entry.amount);
            }
        }
        Commands::Herd => {
            let animals = storage.list_animals().await?;
            println!("Herd ({})", animals.len());
            for animal in animals {
                println!(
                    "  {} | {:<9} | {} | {:.1} L yesterday",
                    animal.id,
                    animal.status.as_str(),
                    animal.name,
                    animal.milk_yield_yesterday,
                );
            }
        }
        Commands::Sell { id, price, reason } => {
            let entry = ops::sell_animal(&mut storage, &AnimalId::new(id), price, today, &reason)
                .await?;
            println!("{} booked {:.2}", entry.description, entry.amount);
        }
        Commands::Milk { id, bucket_kg, feed, shift } => {
            let shift = shift.unwrap_or_else(current_shift);
            let record = ops::record_milking(
                &mut storage,
                &AnimalId::new(id),
                bucket_kg,
                feed,
                shift,
                today,
                config.milk_density,
            )
            .await?;
            println!(
                "{} shift {}: {:.2} L, {:.2} kg fed",
                record.animal_id, record.shift, record.liters, record.feed_kg
            );
        }
        Commands::NewDay => {
            let opened = ops::close_day(&mut storage, today).await?;
            println!("Started {}; counters reset for {} cows", today, opened);
        }
        Commands::Health { command } => match command {
            HealthCommand::Add { kind, product, animal, cost, notes, date } => {
                let mut record = HealthRecord::new(date.unwrap_or(today), kind, product, cost)
                    .with_notes(notes);
                if let Some(animal) = animal {
                    record = record.for_animal(AnimalId::new(animal));
                }
                let expense = ops::record_treatment(&mut storage, &record).await?;
                let target = record
                    .animal_id
                    .as_ref()
                    .map_or_else(|| "whole herd".to_string(), |id| id.to_string());
                println!("Recorded {} for {}", record.kind, target);
                if let Some(entry) = expense {
                    println!("Booked {} {:.2}", entry.category, entry.amount);
                }
            }
            HealthCommand::List { animal } => {
                let animal = animal.map(AnimalId::new);
                let records = storage.list_health_records().await?;
                for record in records.iter().filter(|r| {
                    animal.is_none() || r.is_herd_wide() || r.animal_id == animal
                }) {
                    println!(
                        "  {} | {:<13} | {} | {} | {:.2}",
                        record.date,
                        record.kind.as_str(),
                        record.animal_id.as_ref().map_or("herd", |id| id.as_str()),
                        record.product,
                        record.cost,
                    );
                }
            }
        },
        Commands::Stock { command } => match command {
            StockCommand::List => {
                let items = storage.list_stock().await?;
                let total: f64 = items.iter().map(|item| item.value()).sum();
                println!("Stock ({} items, worth {:.2})", items.len(), total);
                for item in items {
                    println!(
                        "  {} | {:.2} {} | {:.2} each",
                        item.name, item.quantity, item.unit, item.average_cost
                    );
                }
            }
            StockCommand::Buy { item, quantity, unit, total_cost, category, supplier, date } => {
                let purchase = StockPurchase {
                    item,
                    quantity,
                    unit,
                    total_cost,
                    category,
                    supplier,
                    date: date.unwrap_or(today),
                };
                let item = ops::buy_stock(&mut storage, &purchase).await?;
                println!(
                    "{}: {:.2} {} on hand, {:.2} average cost",
                    item.name, item.quantity, item.unit, item.average_cost
                );
            }
            StockCommand::Use { item, quantity } => {
                let item = ops::consume_stock(&mut storage, &item, quantity).await?;
                println!("{}: {:.2} {} left", item.name, item.quantity, item.unit);
            }
        },
        Commands::Ledger {
            category,
            amount,
            description,
            date,
            animal,
            period_start,
            period_end,
        } => {
            if amount <= 0.0 {
                bail!("amount must be positive");
            }
            let mut entry = LedgerEntry::new(date.unwrap_or(today), category, description, amount);
            if let Some(animal) = animal {
                entry = entry.for_animal(AnimalId::new(animal));
            }
            if let (Some(start), Some(end)) = (period_start, period_end) {
                if end < start {
                    bail!("reference period ends before it starts");
                }
                entry = entry.referring_to(start, end);
            }
            storage.add_entry(&entry).await?;
            println!("Booked {} {:.2} on {}", entry.category, entry.amount, entry.date);
        }
        Commands::Balance => {
            let cash = cash_balance(&storage.list_entries().await?);
            println!("Revenue:  {:>12.2}", cash.revenue);
            println!("Expenses: {:>12.2}", cash.expenses);
            println!("Balance:  {:>12.2}", cash.balance);
        }
        Commands::Report { from, to, animal, price } => {
            if to < from {
                bail!("--to is before --from");
            }
            let milkings = storage.list_milkings().await?;
            let entries = storage.list_entries().await?;

            if let Some(animal) = animal {
                let id = AnimalId::new(animal);
                let price = price.unwrap_or_else(|| {
                    reference_price(&milkings, &entries, from, to, &config.finance)
                });
                let Some(summary) =
                    animal_summary(&id, &milkings, &entries, from, to, price, &config.finance)
                else {
                    println!("No milkings for {} between {} and {}", id, from, to);
                    return Ok(());
                };
                println!("{} from {} to {} at {:.3} per liter", id, from, to, price);
                println!("  Milk:     {:.1} L", summary.liters);
                println!(
                    "  Feed:     {:.1} kg ({:.2} kg per milking)",
                    summary.feed_kg, summary.average_feed_kg
                );
                println!("  Revenue:  {:.2}", summary.revenue);
                println!("  Feed:     {:.2}", summary.feed_cost);
                println!("  Direct:   {:.2}", summary.direct_expenses);
                println!("  Margin:   {:.2}", summary.margin);
                return Ok(());
            }

            let Some(summary) = period_summary(&milkings, &entries, from, to, &config.finance)
            else {
                println!("No milkings between {} and {}", from, to);
                return Ok(());
            };
            println!("Summary {} to {}", summary.from, summary.to);
            println!("  Production: {:.1} L", summary.production_liters);
            println!(
                "  Revenue:    {:.2}{}",
                summary.milk_revenue,
                if summary.estimated_revenue { " (estimated)" } else { "" }
            );
            println!("  Feed cost:  {:.2}", summary.feed_cost);
            println!("  Expenses:   {:.2}", summary.other_expenses);
            println!("  Profit:     {:.2}", summary.profit);
            println!("  Price/L:    {:.3}", summary.average_price);
            println!("  Cost/L:     {:.3}", summary.cost_per_liter);
        }
    }

    Ok(())
}

fn current_shift() -> u32 {
    detect_shift(Local::now().hour())
}

fn print_ration(ration: &Ration) {
    println!(
        "  Suggested: {:.2} kg{}",
        ration.suggested_kg,
        if ration.capped { " (capped)" } else { "" }
    );
    println!("  Daily target: {:.2} kg", ration.daily_target_kg);
    println!(
        "  Left today: {:.2} kg over {} feedings",
        ration.remaining_budget_kg, ration.remaining_opportunities
    );
}

fn print_warnings(warnings: &[RecordWarning]) {
    for w in warnings {
        warn!(animal = %w.animal(), "{}", w);
    }
    if !warnings.is_empty() {
        println!("{} record(s) need attention, see log", warnings.len());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_global_options() {
        let cli = Cli::try_parse_from([
            "dairyman", "--today", "2025-06-15", "--data-dir", "/tmp/farm", "alerts", "--json",
        ])
        .unwrap();
        assert_eq!(cli.today, NaiveDate::from_ymd_opt(2025, 6, 15));
        assert_eq!(cli.data_dir, PathBuf::from("/tmp/farm"));
        assert!(matches!(cli.command, Commands::Alerts { json: true }));
    }

    #[test]
    fn test_parse_resolution() {
        let cli = Cli::try_parse_from(["dairyman", "resolve", "105", "dried-off"]).unwrap();
        let Commands::Resolve { resolution, lot, .. } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(resolution.into_resolution(lot), Resolution::DriedOff);

        let cli = Cli::try_parse_from(["dairyman", "resolve", "900", "weaned", "--lot", "lot2"])
            .unwrap();
        let Commands::Resolve { resolution, lot, .. } = cli.command else {
            panic!("expected resolve");
        };
        assert_eq!(
            resolution.into_resolution(lot),
            Resolution::Weaned { lot: Some("lot2".to_string()) }
        );
    }

    #[test]
    fn test_parse_ledger_entry() {
        let cli = Cli::try_parse_from([
            "dairyman", "ledger", "milk_sale", "800", "May milk",
            "--period-start", "2025-05-01", "--period-end", "2025-05-31",
        ])
        .unwrap();
        let Commands::Ledger { category, amount, period_start, .. } = cli.command else {
            panic!("expected ledger");
        };
        assert_eq!(category, Category::MilkSale);
        assert_eq!(amount, 800.0);
        assert_eq!(period_start, NaiveDate::from_ymd_opt(2025, 5, 1));

        // A period needs both ends
        assert!(Cli::try_parse_from([
            "dairyman", "ledger", "milk_sale", "800", "x", "--period-start", "2025-05-01",
        ])
        .is_err());
    }

    #[test]
    fn test_parse_add_animal_from_owned_tag() {
        let cli = Cli::try_parse_from([
            "dairyman", "add-animal", "105", "Mimosa", "--feedings", "3", "--price", "4500",
        ])
        .unwrap();
        let Commands::AddAnimal { id, name, status, feedings, price, .. } = cli.command else {
            panic!("expected add-animal");
        };
        let animal = Animal::new(id, name, status);
        assert_eq!(animal.id, AnimalId::new("105"));
        assert_eq!(animal.status, AnimalStatus::Lactating);
        assert_eq!(feedings, 3);
        assert_eq!(price, 4500.0);
    }

    #[test]
    fn test_parse_health_and_stock() {
        let cli = Cli::try_parse_from([
            "dairyman", "health", "add", "vaccine", "Aftosa", "--cost", "300",
        ])
        .unwrap();
        let Commands::Health { command: HealthCommand::Add { kind, animal, cost, .. } } =
            cli.command
        else {
            panic!("expected health add");
        };
        assert_eq!(kind, HealthKind::Vaccine);
        assert_eq!(animal, None);
        assert_eq!(cost, 300.0);

        let cli = Cli::try_parse_from([
            "dairyman", "stock", "buy", "Corn", "100", "kg", "200", "--category", "feed",
        ])
        .unwrap();
        assert!(matches!(
            cli.command,
            Commands::Stock { command: StockCommand::Buy { category: Category::Feed, .. } }
        ));
    }

    #[test]
    fn test_rejects_bad_date() {
        assert!(Cli::try_parse_from(["dairyman", "--today", "15/06/2025", "alerts"]).is_err());
    }
}
