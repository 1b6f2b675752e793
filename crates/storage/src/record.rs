use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use textstat_core::{SortDirection, TextMetrics};
use time::OffsetDateTime;
use uuid::Uuid;

/// A stored text submission and its (possibly pending) statistics.
///
/// A record is created pending (`done == false`, metrics zeroed) and
/// completed exactly once by a metrics update. `text` never changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextRecord {
    pub id: Uuid,
    pub text: String,
    pub done: bool,
    #[serde(flatten)]
    pub metrics: TextMetrics,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl TextRecord {
    /// A fresh pending record stamped with `now`.
    pub fn pending(id: Uuid, text: String, now: OffsetDateTime) -> Self {
        Self {
            id,
            text,
            done: false,
            metrics: TextMetrics::default(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Record filter for count and find queries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextFilter {
    /// `None` matches every record.
    pub done: Option<bool>,
}

impl TextFilter {
    pub fn all() -> Self {
        Self { done: None }
    }

    pub fn done(done: bool) -> Self {
        Self { done: Some(done) }
    }

    pub fn matches(&self, record: &TextRecord) -> bool {
        self.done.map_or(true, |done| record.done == done)
    }
}

/// Fields a listing may be ordered by.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum SortField {
    #[default]
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// All sortable fields, by their wire names.
    pub const NAMES: [&'static str; 2] = ["createdAt", "updatedAt"];

    pub fn as_str(self) -> &'static str {
        match self {
            SortField::CreatedAt => "createdAt",
            SortField::UpdatedAt => "updatedAt",
        }
    }

    pub(crate) fn key(self, record: &TextRecord) -> OffsetDateTime {
        match self {
            SortField::CreatedAt => record.created_at,
            SortField::UpdatedAt => record.updated_at,
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "createdAt" => Ok(SortField::CreatedAt),
            "updatedAt" => Ok(SortField::UpdatedAt),
            other => Err(format!("unknown sort field '{other}'")),
        }
    }
}

/// Single-key ordering for a find query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: SortField, direction: SortDirection) -> Self {
        Self { field, direction }
    }
}
