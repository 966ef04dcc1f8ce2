//! JSON file storage implementation.
//!
//! Stores each record as a JSON file under a data directory and keeps small
//! per-object meta markers (version + updated_at). A file that can no longer
//! be read is skipped with a warning so one bad record never hides the rest
//! of the herd.

use std::path::{Path, PathBuf};
use dairyman_core::{
    Animal, AnimalId, AnimalPatch, HealthRecord, LedgerEntry, MilkingRecord, StockItem,
};
use super::{Storage, StorageError, Result};
use tokio::fs;
use tracing::{debug, warn};

const ANIMALS: &str = "animals";
const MILKINGS: &str = "milkings";
const LEDGER: &str = "ledger";
const HEALTH: &str = "health";
const STOCK: &str = "stock";

/// File-based JSON storage backend.
pub struct JsonStorage {
    root: PathBuf,
}

impl JsonStorage {
    /// Create storage. This will create the subdirectories needed for data
    /// and meta markers.
    pub async fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();

        for kind in [ANIMALS, MILKINGS, LEDGER, HEALTH, STOCK] {
            fs::create_dir_all(root.join(kind)).await?;
            fs::create_dir_all(root.join("meta").join(kind)).await?;
        }

        debug!(root = %root.display(), "json storage opened");
        Ok(Self { root })
    }

    /// Data directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn animal_path(&self, id: &AnimalId) -> Result<PathBuf> {
        let tag = id.as_str();
        let usable = !tag.is_empty()
            && tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !usable {
            return Err(StorageError::InvalidId(tag.to_string()));
        }
        Ok(self.root.join(ANIMALS).join(format!("{}.json", tag)))
    }

    fn record_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join(kind).join(format!("{}.json", id))
    }

    fn meta_path(&self, kind: &str, id: &str) -> PathBuf {
        self.root.join("meta").join(kind).join(format!("{}.meta.json", id))
    }

    /// Read and increment per-object version, return new version.
    async fn bump_version(&self, kind: &str, id: &str) -> Result<u64> {
        let path = self.meta_path(kind, id);
        let mut version = 0u64;
        if let Ok(s) = fs::read_to_string(&path).await {
            if let Ok(json) = serde_json::from_str::<serde_json::Value>(&s) {
                if let Some(v) = json.get("version").and_then(|v| v.as_u64()) {
                    version = v;
                }
            }
        }
        version += 1;
        let meta = serde_json::json!({"version": version, "updated_at": chrono::Utc::now()});
        fs::write(&path, serde_json::to_string_pretty(&meta)?.as_bytes()).await?;
        Ok(version)
    }

    async fn write_animal(&self, path: &Path, animal: &Animal) -> Result<()> {
        let json = serde_json::to_string_pretty(animal)?;
        fs::write(path, json.as_bytes()).await?;
        let version = self.bump_version(ANIMALS, animal.id.as_str()).await?;
        debug!(animal = %animal.id, version, "animal saved");
        Ok(())
    }
}

#[async_trait::async_trait]
impl Storage for JsonStorage {
    async fn add_animal(&mut self, animal: &Animal) -> Result<()> {
        let path = self.animal_path(&animal.id)?;
        if fs::try_exists(&path).await? {
            return Err(StorageError::AlreadyExists(animal.id.to_string()));
        }
        self.write_animal(&path, animal).await
    }

    async fn save_animal(&mut self, animal: &Animal) -> Result<()> {
        let path = self.animal_path(&animal.id)?;
        self.write_animal(&path, animal).await
    }

    async fn load_animal(&self, id: &AnimalId) -> Result<Option<Animal>> {
        read_json(&self.animal_path(id)?).await
    }

    async fn list_animals(&self) -> Result<Vec<Animal>> {
        let mut animals = list_dir(&self.root.join(ANIMALS)).await?;
        animals.sort_by(|a: &Animal, b| a.id.cmp(&b.id));
        Ok(animals)
    }

    async fn update_animal(&mut self, id: &AnimalId, patch: &AnimalPatch) -> Result<Animal> {
        let path = self.animal_path(id)?;
        let mut animal: Animal = read_json(&path)
            .await?
            .ok_or_else(|| StorageError::NotFound(id.to_string()))?;
        animal.apply(patch);
        self.write_animal(&path, &animal).await?;
        Ok(animal)
    }

    async fn delete_animal(&mut self, id: &AnimalId) -> Result<()> {
        fs::remove_file(self.animal_path(id)?).await.or_else(|e| {
            if e.kind() == std::io::ErrorKind::NotFound { Ok(()) } else { Err(e) }
        })?;
        debug!(animal = %id, "animal deleted");
        Ok(())
    }

    async fn add_milking(&mut self, record: &MilkingRecord) -> Result<()> {
        let id = record.id.to_string();
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(MILKINGS, &id), json.as_bytes()).await?;
        self.bump_version(MILKINGS, &id).await?;
        Ok(())
    }

    async fn list_milkings(&self) -> Result<Vec<MilkingRecord>> {
        let mut records = list_dir(&self.root.join(MILKINGS)).await?;
        records.sort_by(|a: &MilkingRecord, b| (a.date, a.shift).cmp(&(b.date, b.shift)));
        Ok(records)
    }

    async fn add_entry(&mut self, entry: &LedgerEntry) -> Result<()> {
        let id = entry.id.to_string();
        let json = serde_json::to_string_pretty(entry)?;
        fs::write(self.record_path(LEDGER, &id), json.as_bytes()).await?;
        self.bump_version(LEDGER, &id).await?;
        Ok(())
    }

    async fn list_entries(&self) -> Result<Vec<LedgerEntry>> {
        let mut entries = list_dir(&self.root.join(LEDGER)).await?;
        entries.sort_by(|a: &LedgerEntry, b| a.date.cmp(&b.date));
        Ok(entries)
    }

    async fn add_health_record(&mut self, record: &HealthRecord) -> Result<()> {
        let id = record.id.to_string();
        let json = serde_json::to_string_pretty(record)?;
        fs::write(self.record_path(HEALTH, &id), json.as_bytes()).await?;
        self.bump_version(HEALTH, &id).await?;
        Ok(())
    }

    async fn list_health_records(&self) -> Result<Vec<HealthRecord>> {
        let mut records = list_dir(&self.root.join(HEALTH)).await?;
        records.sort_by(|a: &HealthRecord, b| a.date.cmp(&b.date));
        Ok(records)
    }

    async fn save_stock(&mut self, item: &StockItem) -> Result<()> {
        let id = item.id.to_string();
        let json = serde_json::to_string_pretty(item)?;
        fs::write(self.record_path(STOCK, &id), json.as_bytes()).await?;
        let version = self.bump_version(STOCK, &id).await?;
        debug!(item = %item.name, version, "stock saved");
        Ok(())
    }

    async fn list_stock(&self) -> Result<Vec<StockItem>> {
        let mut items = list_dir(&self.root.join(STOCK)).await?;
        items.sort_by_key(|item: &StockItem| item.name.to_lowercase());
        Ok(items)
    }
}

async fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    match fs::read_to_string(path).await {
        Ok(json) => {
            let value = serde_json::from_str(&json)?;
            Ok(Some(value))
        }
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn list_dir<T: serde::de::DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let mut items = Vec::new();
    let mut rd = fs::read_dir(dir).await?;
    while let Some(entry) = rd.next_entry().await? {
        let path = entry.path();
        if path.extension().and_then(|s| s.to_str()) != Some("json") {
            continue;
        }
        match read_json(&path).await {
            Ok(Some(item)) => items.push(item),
            Ok(None) => {}
            Err(e) => warn!(path = %path.display(), error = %e, "skipping unreadable record"),
        }
    }
    Ok(items)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use dairyman_core::{AnimalStatus, Category, DateField, HealthKind, Pregnancy};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[tokio::test]
    async fn test_animal_lifecycle() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let cow = Animal::new("105", "Mimosa", AnimalStatus::Lactating).with_production(35.0, 3);
        storage.add_animal(&cow).await.unwrap();
        assert!(matches!(
            storage.add_animal(&cow).await,
            Err(StorageError::AlreadyExists(_))
        ));

        let loaded = storage.load_animal(&cow.id).await.unwrap().unwrap();
        assert_eq!(loaded, cow);

        let updated = storage
            .update_animal(&cow.id, &AnimalPatch {
                insemination_date: Some(Some(date(2025, 3, 1))),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(updated.insemination_date, DateField::Valid(date(2025, 3, 1)));
        assert_eq!(updated.pregnancy, Pregnancy::Unknown);

        storage.delete_animal(&cow.id).await.unwrap();
        assert!(storage.load_animal(&cow.id).await.unwrap().is_none());
        // Deleting twice is fine
        storage.delete_animal(&cow.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_missing_animal() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let err = storage
            .update_animal(&AnimalId::new("404"), &AnimalPatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_rejects_path_like_tags() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();
        let sneaky = Animal::new("../escape", "x", AnimalStatus::Bull);
        assert!(matches!(
            storage.add_animal(&sneaky).await,
            Err(StorageError::InvalidId(_))
        ));
    }

    #[tokio::test]
    async fn test_snapshot_survives_bad_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        storage.add_animal(&Animal::new("202", "Estrela", AnimalStatus::Lactating)).await.unwrap();
        storage.add_animal(&Animal::new("105", "Mimosa", AnimalStatus::Lactating)).await.unwrap();

        // Corrupted date inside an otherwise valid record
        fs::write(
            dir.path().join(ANIMALS).join("300.json"),
            r#"{"id": "300", "name": "Fujona", "status": "lactating", "calving_date": "12/31/2024"}"#,
        )
        .await
        .unwrap();
        // Not a record at all
        fs::write(dir.path().join(ANIMALS).join("garbage.json"), "{ nope").await.unwrap();

        let herd = storage.snapshot().await.unwrap();
        let ids: Vec<_> = herd.animals().iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, vec!["105", "202", "300"]);
        let fujona = herd.get(&AnimalId::new("300")).unwrap();
        assert_eq!(fujona.calving_date, DateField::Malformed("12/31/2024".to_string()));
    }

    #[tokio::test]
    async fn test_milkings_and_ledger() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let late = MilkingRecord::new(date(2025, 5, 2), 1, AnimalId::new("105"), 12.0, 3.0);
        let early = MilkingRecord::new(date(2025, 5, 1), 2, AnimalId::new("105"), 10.0, 2.5);
        storage.add_milking(&late).await.unwrap();
        storage.add_milking(&early).await.unwrap();
        let milkings = storage.list_milkings().await.unwrap();
        assert_eq!(milkings, vec![early, late]);

        let entry = LedgerEntry::new(date(2025, 5, 3), Category::Feed, "Corn", 400.0);
        storage.add_entry(&entry).await.unwrap();
        assert_eq!(storage.list_entries().await.unwrap(), vec![entry]);
    }

    #[tokio::test]
    async fn test_health_records() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let later = HealthRecord::new(date(2025, 6, 2), HealthKind::Vaccine, "Brucellosis", 80.0);
        let earlier = HealthRecord::new(date(2025, 6, 1), HealthKind::Antibiotic, "Tube", 45.0)
            .for_animal(AnimalId::new("105"));
        storage.add_health_record(&later).await.unwrap();
        storage.add_health_record(&earlier).await.unwrap();
        assert_eq!(storage.list_health_records().await.unwrap(), vec![earlier, later]);
    }

    #[tokio::test]
    async fn test_stock_lookup_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let mut storage = JsonStorage::new(dir.path()).await.unwrap();

        let mut salt = StockItem::new("Mineral Salt", "kg");
        salt.quantity = 25.0;
        storage.save_stock(&salt).await.unwrap();
        storage.save_stock(&StockItem::new("corn", "kg")).await.unwrap();

        let names: Vec<_> =
            storage.list_stock().await.unwrap().into_iter().map(|i| i.name).collect();
        assert_eq!(names, vec!["corn", "Mineral Salt"]);

        let found = storage.find_stock("mineral salt").await.unwrap().unwrap();
        assert_eq!(found.id, salt.id);

        salt.quantity = 10.0;
        storage.save_stock(&salt).await.unwrap();
        assert_eq!(storage.find_stock("MINERAL SALT").await.unwrap().unwrap().quantity, 10.0);
        assert!(storage.find_stock("urea").await.unwrap().is_none());
    }
}
