use async_trait::async_trait;
use textstat_core::TextMetrics;
use uuid::Uuid;

use crate::error::StorageError;
use crate::record::{SortSpec, TextFilter, TextRecord};

/// The storage trait for textstat backends.
///
/// ## Record lifecycle
///
/// 1. `insert` creates a pending record (`done == false`, zeroed metrics)
///    and assigns its id.
/// 2. `update_by_id` writes the computed metrics and sets `done == true`
///    in a single atomic write. Nothing else mutates a record; `text` is
///    never rewritten.
///
/// Records are never deleted through this trait.
///
/// ## Ordering
///
/// `find` orders by one key. Records with equal keys are ordered by
/// insertion, and descending order is the exact reverse of ascending, so
/// paging through a listing is stable.
///
/// ## Thread Safety
///
/// Implementations must be `Send + Sync + 'static` to be shared through
/// axum application state and across spawned analysis tasks.
#[async_trait]
pub trait TextStore: Send + Sync + 'static {
    /// Persist a new pending record for `text` and return it.
    async fn insert(&self, text: String) -> Result<TextRecord, StorageError>;

    /// Point lookup by id.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<TextRecord>, StorageError>;

    /// Number of records matching `filter`.
    async fn count(&self, filter: &TextFilter) -> Result<u64, StorageError>;

    /// One page of records matching `filter`, ordered by `sort`.
    async fn find(
        &self,
        filter: &TextFilter,
        sort: &SortSpec,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<TextRecord>, StorageError>;

    /// Store `metrics`, mark the record done and bump `updated_at`.
    ///
    /// Returns the updated record, or `None` if `id` is unknown.
    async fn update_by_id(
        &self,
        id: Uuid,
        metrics: TextMetrics,
    ) -> Result<Option<TextRecord>, StorageError>;
}
