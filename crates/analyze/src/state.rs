use std::fmt;

use tokio_util::sync::CancellationToken;

/// Lifecycle phase of an [`crate::AnalysisWorker`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkerPhase {
    /// Accepting notifications and writing results.
    Running,
    /// Terminal. No notification is accepted and no write is attempted.
    ShuttingDown,
}

impl fmt::Display for WorkerPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WorkerPhase::Running => write!(f, "running"),
            WorkerPhase::ShuttingDown => write!(f, "shutting down"),
        }
    }
}

/// Shared shutdown flag.
///
/// Cloning yields another handle on the same flag. The transition from
/// `Running` to `ShuttingDown` happens once and is never undone.
#[derive(Debug, Clone, Default)]
pub struct WorkerState {
    token: CancellationToken,
}

impl WorkerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> WorkerPhase {
        if self.token.is_cancelled() {
            WorkerPhase::ShuttingDown
        } else {
            WorkerPhase::Running
        }
    }

    pub fn is_running(&self) -> bool {
        !self.token.is_cancelled()
    }

    /// Enter `ShuttingDown`. Idempotent.
    pub fn shut_down(&self) {
        self.token.cancel();
    }

    /// Resolves once shutdown has begun.
    pub async fn shutting_down(&self) {
        self.token.cancelled().await;
    }
}
