use std::sync::{Arc, Mutex};

use textstat_core::TextMetrics;
use textstat_storage::{StorageError, TextStore};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::state::{WorkerPhase, WorkerState};

/// Consumer tasks started when the caller has no preference.
pub const DEFAULT_CONSUMERS: usize = 4;

/// A "text created" notification: the record to analyze and its text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisJob {
    pub id: Uuid,
    pub text: String,
}

/// What happened to one job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Outcome {
    Completed,
    /// Shutdown was observed before the write-back.
    Skipped,
    /// The write-back failed and was dropped.
    Failed,
}

type SharedReceiver = Arc<tokio::sync::Mutex<UnboundedReceiver<AnalysisJob>>>;

/// Fire-and-forget analysis pipeline in front of a [`TextStore`].
///
/// Notifications go onto an unbounded channel, so [`notify_created`]
/// never waits. A fixed pool of consumer tasks drains the channel; jobs for
/// different records run concurrently and in no particular order.
///
/// [`notify_created`]: AnalysisWorker::notify_created
pub struct AnalysisWorker {
    state: WorkerState,
    sender: UnboundedSender<AnalysisJob>,
    consumers: Mutex<Vec<JoinHandle<()>>>,
}

impl AnalysisWorker {
    /// Spawn `consumers` tasks (at least one) on the current tokio runtime.
    pub fn start(store: Arc<dyn TextStore>, consumers: usize) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let receiver: SharedReceiver = Arc::new(tokio::sync::Mutex::new(receiver));
        let state = WorkerState::new();

        let handles = (0..consumers.max(1))
            .map(|index| {
                tokio::spawn(consume(
                    index,
                    Arc::clone(&receiver),
                    Arc::clone(&store),
                    state.clone(),
                ))
            })
            .collect();

        tracing::info!(consumers = consumers.max(1), "analysis worker started");
        Self {
            state,
            sender,
            consumers: Mutex::new(handles),
        }
    }

    /// Schedule analysis of a newly created record and return immediately.
    ///
    /// Once shutdown has begun the notification is dropped, not queued.
    /// Returns whether the job was accepted.
    pub fn notify_created(&self, id: Uuid, text: String) -> bool {
        if !self.state.is_running() {
            tracing::debug!(%id, "worker shutting down; notification dropped");
            return false;
        }
        match self.sender.send(AnalysisJob { id, text }) {
            Ok(()) => true,
            Err(_) => {
                tracing::warn!(%id, "no analysis consumers left; notification dropped");
                false
            }
        }
    }

    pub fn phase(&self) -> WorkerPhase {
        self.state.phase()
    }

    /// A handle on the worker's shutdown flag.
    pub fn state(&self) -> WorkerState {
        self.state.clone()
    }

    /// Stop accepting notifications and abandon every write-back that has
    /// not yet passed its final check. Idempotent; does not wait.
    pub fn shutdown(&self) {
        if self.state.is_running() {
            tracing::info!("shutting down analysis worker");
        }
        self.state.shut_down();
    }

    /// Shut down, then wait for every consumer task to exit.
    pub async fn join(&self) {
        self.shutdown();
        let handles = std::mem::take(&mut *self.lock_consumers());
        for handle in handles {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "analysis consumer panicked");
            }
        }
        tracing::info!("analysis worker stopped");
    }

    fn lock_consumers(&self) -> std::sync::MutexGuard<'_, Vec<JoinHandle<()>>> {
        // A poisoned list of handles is still a valid list of handles.
        self.consumers
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for AnalysisWorker {
    fn drop(&mut self) {
        self.state.shut_down();
    }
}

/// Consumer loop: take one job at a time until shutdown or channel close.
async fn consume(
    index: usize,
    receiver: SharedReceiver,
    store: Arc<dyn TextStore>,
    state: WorkerState,
) {
    loop {
        let job = {
            let mut receiver = receiver.lock().await;
            tokio::select! {
                biased;
                _ = state.shutting_down() => None,
                job = receiver.recv() => job,
            }
        };
        let Some(job) = job else {
            break;
        };
        process(store.as_ref(), &state, job).await;
    }
    tracing::debug!(consumer = index, "analysis consumer exiting");
}

/// Compute every metric for `job` and write them back in one update.
///
/// The shutdown flag is checked before computing and again right before the
/// write; a job that sees shutdown at either point writes nothing. Store
/// errors are logged and swallowed.
pub(crate) async fn process(
    store: &dyn TextStore,
    state: &WorkerState,
    job: AnalysisJob,
) -> Outcome {
    let AnalysisJob { id, text } = job;

    if !state.is_running() {
        tracing::info!(%id, "skipping text analysis due to shutdown");
        return Outcome::Skipped;
    }

    tracing::info!(%id, "processing text analysis");
    let metrics = TextMetrics::compute(&text);

    if !state.is_running() {
        tracing::info!(%id, "shutdown during text analysis; result discarded");
        return Outcome::Skipped;
    }

    match store.update_by_id(id, metrics).await {
        Ok(Some(_)) => {
            tracing::info!(%id, "text analysis completed");
            Outcome::Completed
        }
        Ok(None) => {
            let error = StorageError::NotFound { id };
            tracing::error!(%id, %error, "text analysis write-back failed");
            Outcome::Failed
        }
        Err(error) => {
            tracing::error!(%id, %error, "text analysis write-back failed");
            Outcome::Failed
        }
    }
}
