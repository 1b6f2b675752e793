//! textstat-storage: persistence seam for text records.
//!
//! The service only needs five capabilities from a backend: insert,
//! point lookup, count, sorted paging and a single-document metrics update.
//! They are captured by [`TextStore`]. [`MemoryStore`] is the in-process
//! backend used by the server and by tests; [`conformance`] checks any
//! backend against the expected semantics.

pub mod conformance;
mod error;
mod memory;
mod record;
mod traits;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use record::{SortField, SortSpec, TextFilter, TextRecord};
pub use traits::TextStore;
