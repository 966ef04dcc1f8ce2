//! Persisted calendar dates.
//!
//! Animal dates are stored as `YYYY-MM-DD` text. A value that no longer
//! parses must not make the whole record unreadable, so it is kept as
//! [`DateField::Malformed`] and reported by whoever needs the date.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Storage format of every date field.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A date field as found in a stored record.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DateField {
    /// No value recorded.
    #[default]
    Missing,
    /// A well-formed date.
    Valid(NaiveDate),
    /// Raw text that could not be read as a date.
    Malformed(String),
}

/// A stored date value that could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed date: {raw:?}")]
pub struct MalformedDate {
    /// The raw persisted value
    pub raw: String,
}

impl DateField {
    /// Decode persisted text. Blank text counts as missing.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return DateField::Missing;
        }
        match NaiveDate::parse_from_str(trimmed, DATE_FORMAT) {
            Ok(date) => DateField::Valid(date),
            Err(_) => DateField::Malformed(raw.to_string()),
        }
    }

    /// The date, if one is recorded and readable.
    pub fn resolve(&self) -> Result<Option<NaiveDate>, MalformedDate> {
        match self {
            DateField::Missing => Ok(None),
            DateField::Valid(date) => Ok(Some(*date)),
            DateField::Malformed(raw) => Err(MalformedDate { raw: raw.clone() }),
        }
    }

    /// True when nothing is recorded. A malformed value is not missing.
    pub fn is_missing(&self) -> bool {
        matches!(self, DateField::Missing)
    }

    /// The date when valid, `None` for missing or malformed values.
    pub fn valid(&self) -> Option<NaiveDate> {
        match self {
            DateField::Valid(date) => Some(*date),
            _ => None,
        }
    }
}

impl From<NaiveDate> for DateField {
    fn from(date: NaiveDate) -> Self {
        DateField::Valid(date)
    }
}

impl From<Option<NaiveDate>> for DateField {
    fn from(date: Option<NaiveDate>) -> Self {
        date.map_or(DateField::Missing, DateField::Valid)
    }
}

impl std::fmt::Display for DateField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DateField::Missing => f.write_str("-"),
            DateField::Valid(date) => write!(f, "{}", date.format(DATE_FORMAT)),
            DateField::Malformed(raw) => write!(f, "{raw}?"),
        }
    }
}

impl Serialize for DateField {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            DateField::Missing => serializer.serialize_none(),
            DateField::Valid(date) => {
                serializer.serialize_str(&date.format(DATE_FORMAT).to_string())
            }
            // Written back untouched so the farmer can still see what was there
            DateField::Malformed(raw) => serializer.serialize_str(raw),
        }
    }
}

impl<'de> Deserialize<'de> for DateField {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<serde_json::Value>::deserialize(deserializer)?;
        Ok(match value {
            None | Some(serde_json::Value::Null) => DateField::Missing,
            Some(serde_json::Value::String(s)) => DateField::parse(&s),
            Some(other) => DateField::Malformed(other.to_string()),
        })
    }
}
