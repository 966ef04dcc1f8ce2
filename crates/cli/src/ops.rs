//! Workflows that read and write the store for one command.

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use dairyman_core::{
    Animal, AnimalId, AnimalPatch, AnimalStatus, HealthRecord, HerdSnapshot, LedgerEntry,
    MilkingRecord, StockItem,
};
use dairyman_engine::{
    as_of, bucket_to_liters, health_expense, purchase_entry, receive_stock, record_birth,
    sale_entry, start_day, use_stock, BirthRecord, StockPurchase,
};
use dairyman_storage::Storage;
use tracing::info;

/// Load an animal or fail with its tag.
pub async fn require<S: Storage>(storage: &S, id: &AnimalId) -> Result<Animal> {
    storage
        .load_animal(id)
        .await?
        .with_context(|| format!("animal {} not found", id))
}

/// Register an animal, booking its purchase price when it was bought in.
pub async fn add_animal<S: Storage>(
    storage: &mut S,
    animal: &Animal,
    price: f64,
    today: NaiveDate,
) -> Result<Option<LedgerEntry>> {
    if price < 0.0 {
        bail!("purchase price cannot be negative");
    }
    storage.add_animal(animal).await?;
    let entry = purchase_entry(animal, price, today);
    if let Some(entry) = &entry {
        storage.add_entry(entry).await?;
    }
    Ok(entry)
}

/// Herd with every cow's counters rolled over to `today`, without writing.
pub async fn herd_as_of<S: Storage>(storage: &S, today: NaiveDate) -> Result<HerdSnapshot> {
    let milkings = storage.list_milkings().await?;
    let animals = storage
        .list_animals()
        .await?
        .iter()
        .map(|animal| as_of(animal, &milkings, today))
        .collect();
    Ok(HerdSnapshot::new(animals))
}

/// Open `today` for every cow that has not been touched yet today.
///
/// Returns how many cows were rolled over.
pub async fn close_day<S: Storage>(storage: &mut S, today: NaiveDate) -> Result<usize> {
    let milkings = storage.list_milkings().await?;
    let mut opened = 0;
    for animal in storage.list_animals().await? {
        if let Some(patch) = start_day(&animal, &milkings, today) {
            storage.update_animal(&animal.id, &patch).await?;
            opened += 1;
        }
    }
    info!(day = %today, opened, "new day started");
    Ok(opened)
}

/// Record a milking weighed in the bucket, adding the feed to today's total.
pub async fn record_milking<S: Storage>(
    storage: &mut S,
    id: &AnimalId,
    bucket_kg: f64,
    feed_kg: f64,
    shift: u32,
    today: NaiveDate,
    density: f64,
) -> Result<MilkingRecord> {
    if bucket_kg.is_nan() || bucket_kg <= 0.0 {
        bail!("bucket weight must be positive, got {bucket_kg}");
    }
    if feed_kg.is_nan() || feed_kg < 0.0 {
        bail!("feed cannot be negative, got {feed_kg}");
    }
    let shift = u8::try_from(shift).context("shift out of range")?;

    let mut animal = require(storage, id).await?;
    if animal.status != AnimalStatus::Lactating {
        bail!("{} is {}, not in milk", animal.id, animal.status);
    }
    if let Some(patch) = start_day(&animal, &storage.list_milkings().await?, today) {
        animal = storage.update_animal(id, &patch).await?;
    }

    let record = MilkingRecord::new(
        today,
        shift,
        id.clone(),
        bucket_to_liters(bucket_kg, density),
        feed_kg,
    );
    storage.add_milking(&record).await?;
    let patch = AnimalPatch {
        feed_given_today: Some(animal.feed_given_today + feed_kg),
        feed_day: Some(today),
        ..Default::default()
    };
    storage.update_animal(id, &patch).await?;
    Ok(record)
}

/// Store a calving: the calf joins the herd and the dam's record is updated.
///
/// The calf is removed again if the dam cannot be updated.
pub async fn register_birth<S: Storage>(
    storage: &mut S,
    mother: &Animal,
    birth: &BirthRecord,
) -> Result<Animal> {
    let outcome = record_birth(mother, birth)?;
    storage.add_animal(&outcome.calf).await?;
    if let Err(e) = storage.update_animal(&mother.id, &outcome.mother_patch).await {
        storage.delete_animal(&outcome.calf.id).await?;
        return Err(e).context(format!("updating {} after the birth", mother.id));
    }
    Ok(outcome.calf)
}

/// Sell an animal: book the revenue and remove her from the herd.
pub async fn sell_animal<S: Storage>(
    storage: &mut S,
    id: &AnimalId,
    price: f64,
    today: NaiveDate,
    reason: &str,
) -> Result<LedgerEntry> {
    let animal = require(storage, id).await?;
    let entry = sale_entry(&animal, price, today, reason)?;
    storage.add_entry(&entry).await?;
    storage.delete_animal(id).await?;
    Ok(entry)
}

/// Store a treatment and book its cost.
pub async fn record_treatment<S: Storage>(
    storage: &mut S,
    record: &HealthRecord,
) -> Result<Option<LedgerEntry>> {
    if record.cost.is_nan() || record.cost < 0.0 {
        bail!("treatment cost cannot be negative");
    }
    if let Some(id) = &record.animal_id {
        require(storage, id).await?;
    }
    storage.add_health_record(record).await?;
    let entry = health_expense(record);
    if let Some(entry) = &entry {
        storage.add_entry(entry).await?;
    }
    Ok(entry)
}

/// Receive a purchase into stock and book the invoice.
pub async fn buy_stock<S: Storage>(storage: &mut S, purchase: &StockPurchase) -> Result<StockItem> {
    let current = storage.find_stock(&purchase.item).await?;
    let (item, entry) = receive_stock(current.as_ref(), purchase)?;
    storage.save_stock(&item).await?;
    storage.add_entry(&entry).await?;
    Ok(item)
}

/// Take a quantity out of stock.
pub async fn consume_stock<S: Storage>(
    storage: &mut S,
    name: &str,
    quantity: f64,
) -> Result<StockItem> {
    let item = storage
        .find_stock(name)
        .await?
        .with_context(|| format!("no stock item named {name}"))?;
    let item = use_stock(&item, quantity)?;
    storage.save_stock(&item).await?;
    Ok(item)
}
