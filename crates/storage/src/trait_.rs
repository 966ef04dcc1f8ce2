//! Storage trait abstraction.

use async_trait::async_trait;
use dairyman_core::{
    Animal, AnimalId, AnimalPatch, HealthRecord, HerdSnapshot, LedgerEntry, MilkingRecord,
    StockItem,
};

/// Error type for storage operations.
pub type Result<T> = std::result::Result<T, StorageError>;

/// Errors that can occur during storage operations.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Item not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Item already exists
    #[error("Already exists: {0}")]
    AlreadyExists(String),

    /// Identifier not usable as a record key
    #[error("Invalid id: {0:?}")]
    InvalidId(String),

    /// Other error
    #[error("{0}")]
    Other(String),
}

/// Storage abstraction for Dairyman records.
///
/// This trait allows different storage backends to be plugged in.
#[async_trait]
pub trait Storage: Send + Sync {
    // === Animal operations ===

    /// Register a new animal. Fails if the ear tag is taken.
    async fn add_animal(&mut self, animal: &Animal) -> Result<()>;

    /// Save an animal (create or replace).
    async fn save_animal(&mut self, animal: &Animal) -> Result<()>;

    /// Load an animal by ear tag.
    async fn load_animal(&self, id: &AnimalId) -> Result<Option<Animal>>;

    /// List all animals, ordered by ear tag.
    async fn list_animals(&self) -> Result<Vec<Animal>>;

    /// Apply a partial update and return the updated record.
    async fn update_animal(&mut self, id: &AnimalId, patch: &AnimalPatch) -> Result<Animal>;

    /// Delete an animal.
    async fn delete_animal(&mut self, id: &AnimalId) -> Result<()>;

    // === Production operations ===

    /// Record a milking.
    async fn add_milking(&mut self, record: &MilkingRecord) -> Result<()>;

    /// List all milkings, oldest first.
    async fn list_milkings(&self) -> Result<Vec<MilkingRecord>>;

    // === Ledger operations ===

    /// Book a ledger entry.
    async fn add_entry(&mut self, entry: &LedgerEntry) -> Result<()>;

    /// List all ledger entries, oldest first.
    async fn list_entries(&self) -> Result<Vec<LedgerEntry>>;

    // === Health operations ===

    /// Record a treatment.
    async fn add_health_record(&mut self, record: &HealthRecord) -> Result<()>;

    /// List all treatments, oldest first.
    async fn list_health_records(&self) -> Result<Vec<HealthRecord>>;

    // === Inventory operations ===

    /// Save a stock item (create or replace).
    async fn save_stock(&mut self, item: &StockItem) -> Result<()>;

    /// List stock items by name.
    async fn list_stock(&self) -> Result<Vec<StockItem>>;

    /// Find a stock item by name, ignoring case.
    async fn find_stock(&self, name: &str) -> Result<Option<StockItem>> {
        Ok(self.list_stock().await?.into_iter().find(|item| item.matches(name)))
    }

    // === Snapshot ===

    /// Current herd as an engine snapshot.
    async fn snapshot(&self) -> Result<HerdSnapshot> {
        Ok(HerdSnapshot::new(self.list_animals().await?))
    }
}
