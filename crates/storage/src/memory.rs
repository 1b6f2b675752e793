//! In-process `TextStore` backend.

use std::collections::HashMap;

use async_trait::async_trait;
use textstat_core::{SortDirection, TextMetrics};
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::StorageError;
use crate::record::{SortSpec, TextFilter, TextRecord};
use crate::traits::TextStore;

#[derive(Default)]
struct Inner {
    /// Records in insertion order.
    records: Vec<TextRecord>,
    /// Position of each record in `records`.
    positions: HashMap<Uuid, usize>,
}

/// A `TextStore` held entirely in memory behind a single `RwLock`.
///
/// Every write takes the write lock, so each update is atomic for its
/// record. Contents are lost when the process exits.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Inner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records, regardless of state.
    pub async fn len(&self) -> usize {
        self.inner.read().await.records.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl TextStore for MemoryStore {
    async fn insert(&self, text: String) -> Result<TextRecord, StorageError> {
        let mut inner = self.inner.write().await;
        let mut id = Uuid::new_v4();
        while inner.positions.contains_key(&id) {
            id = Uuid::new_v4();
        }
        let record = TextRecord::pending(id, text, OffsetDateTime::now_utc());
        let position = inner.records.len();
        inner.positions.insert(id, position);
        inner.records.push(record.clone());
        Ok(record)
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<TextRecord>, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner
            .positions
            .get(&id)
            .map(|&position| inner.records[position].clone()))
    }

    async fn count(&self, filter: &TextFilter) -> Result<u64, StorageError> {
        let inner = self.inner.read().await;
        Ok(inner.records.iter().filter(|r| filter.matches(r)).count() as u64)
    }

    async fn find(
        &self,
        filter: &TextFilter,
        sort: &SortSpec,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TextRecord>, StorageError> {
        let inner = self.inner.read().await;
        let mut matching: Vec<(usize, &TextRecord)> = inner
            .records
            .iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .collect();

        // Insertion position breaks ties, so descending is the exact reverse
        // of ascending.
        matching.sort_by_key(|&(position, record)| (sort.field.key(record), position));
        if sort.direction == SortDirection::Desc {
            matching.reverse();
        }

        let offset = usize::try_from(offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(matching
            .into_iter()
            .skip(offset)
            .take(limit)
            .map(|(_, record)| record.clone())
            .collect())
    }

    async fn update_by_id(
        &self,
        id: Uuid,
        metrics: TextMetrics,
    ) -> Result<Option<TextRecord>, StorageError> {
        let mut inner = self.inner.write().await;
        let Some(&position) = inner.positions.get(&id) else {
            return Ok(None);
        };
        let record = &mut inner.records[position];
        record.metrics = metrics;
        record.done = true;
        record.updated_at = OffsetDateTime::now_utc().max(record.created_at);
        Ok(Some(record.clone()))
    }
}
