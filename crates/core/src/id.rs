//! Identifiers for Dairyman records.

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Ear tag of an animal. Assigned by the farmer, stable for the animal's lifetime.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnimalId(pub String);

impl AnimalId {
    /// Create a new animal ID.
    pub fn new(tag: impl Into<String>) -> Self {
        Self(tag.into())
    }

    /// Borrow the raw tag.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AnimalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AnimalId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for AnimalId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Unique identifier for a milking record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MilkingId(Ulid);

impl MilkingId {
    /// Generate a new MilkingId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for MilkingId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for MilkingId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for MilkingId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a ledger entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntryId(Ulid);

impl EntryId {
    /// Generate a new EntryId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for EntryId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntryId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for EntryId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a health record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthId(Ulid);

impl HealthId {
    /// Generate a new HealthId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for HealthId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for HealthId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for HealthId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}

/// Unique identifier for a stock item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StockId(Ulid);

impl StockId {
    /// Generate a new StockId
    pub fn new() -> Self {
        Self(Ulid::new())
    }
}

impl Default for StockId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for StockId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for StockId {
    type Err = ulid::DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(s.parse()?))
    }
}
