//! textstat-analyze: background computation of text statistics.
//!
//! Request handlers persist a pending record and hand `(id, text)` to an
//! [`AnalysisWorker`], which returns at once. A pool of consumer tasks
//! drains an unbounded channel, computes [`textstat_core::TextMetrics`] and
//! writes them back through the [`textstat_storage::TextStore`], marking the
//! record done.
//!
//! Processing is at-most-once. A failed write-back is logged and dropped;
//! the record stays pending. After [`AnalysisWorker::shutdown`] no new
//! notification is accepted and no further write is attempted.

mod state;
mod worker;

pub use state::{WorkerPhase, WorkerState};
pub use worker::{AnalysisJob, AnalysisWorker, DEFAULT_CONSUMERS};
