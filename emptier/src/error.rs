use thiserror::Error;

use crate::deletion::DeletionOutcome;
use crate::orchestrator::RunState;

/// Transport failure reported by an [`ArchiveStore`](crate::store::ArchiveStore).
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("{operation} failed: {message}")]
pub struct StoreError {
    pub operation: &'static str,
    pub message: String,
}

impl StoreError {
    pub fn new(operation: &'static str, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
        }
    }
}

/// Run-level failures. Any of these stops the run before (or while) deleting.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("unable to list jobs: {0}")]
    ListJobsFailed(#[source] StoreError),

    #[error("there is a running inventory job with JobId {job_id}")]
    JobInProgress { job_id: String },

    #[error("unable to find a completed inventory job")]
    NoCompletedJob,

    #[error("error getting output of job {job_id}: {source}")]
    OutputFetchFailed {
        job_id: String,
        #[source]
        source: StoreError,
    },

    #[error("error decoding inventory: {0}")]
    InventoryParseFailed(#[from] serde_json::Error),

    #[error("run cancelled while {state}; {} deletion(s) already recorded", .outcomes.len())]
    Cancelled {
        state: RunState,
        outcomes: Vec<DeletionOutcome>,
    },
}
