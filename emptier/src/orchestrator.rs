use std::fmt;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

use crate::config::RunConfig;
use crate::deletion::{self, DeletionObserver, DeletionOutcome};
use crate::error::RunError;
use crate::inventory;
use crate::jobs;
use crate::store::ArchiveStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Idle,
    JobsListed,
    JobSelected,
    InventoryFetched,
    Deleting,
    Done,
    Failed,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::JobsListed => "jobs listed",
            RunState::JobSelected => "job selected",
            RunState::InventoryFetched => "inventory fetched",
            RunState::Deleting => "deleting",
            RunState::Done => "done",
            RunState::Failed => "failed",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailedDeletion {
    pub archive_id: String,
    pub error: String,
}

/// Totals for a run that reached [`RunState::Done`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Summary {
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub failures: Vec<FailedDeletion>,
}

impl Summary {
    pub fn from_outcomes(outcomes: &[DeletionOutcome]) -> Self {
        let failures: Vec<FailedDeletion> = outcomes
            .iter()
            .filter(|o| !o.succeeded)
            .map(|o| FailedDeletion {
                archive_id: o.archive_id.clone(),
                error: o.error.clone().unwrap_or_default(),
            })
            .collect();
        Self {
            total: outcomes.len(),
            succeeded: outcomes.len() - failures.len(),
            failed: failures.len(),
            failures,
        }
    }

    pub fn failed_ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.archive_id.as_str()).collect()
    }
}

/// Drives one run against one vault: list jobs, select, fetch, delete.
pub struct Orchestrator<S> {
    store: S,
    config: RunConfig,
    state: RunState,
}

impl<S: ArchiveStore> Orchestrator<S> {
    pub fn new(store: S, config: RunConfig) -> Self {
        Self {
            store,
            config,
            state: RunState::Idle,
        }
    }

    pub fn state(&self) -> RunState {
        self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Per-archive deletion failures are folded into the summary; every other
    /// failure, including cancellation, ends the run in [`RunState::Failed`].
    pub async fn run(
        &mut self,
        observer: &dyn DeletionObserver,
        cancel: &CancellationToken,
    ) -> Result<Summary, RunError> {
        let result = self.drive(observer, cancel).await;
        if result.is_err() {
            self.transition(RunState::Failed);
        }
        result
    }

    async fn drive(
        &mut self,
        observer: &dyn DeletionObserver,
        cancel: &CancellationToken,
    ) -> Result<Summary, RunError> {
        let vault = self.config.vault.clone();

        let jobs = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(self.cancelled(Vec::new())),
            r = self.store.list_jobs(&vault) => r.map_err(RunError::ListJobsFailed)?,
        };
        debug!(count = jobs.len(), "listed jobs");
        self.transition(RunState::JobsListed);

        let job = jobs::select(&jobs)?;
        info!(job_id = %job.id, completed_at = ?job.completed_at, "selected inventory job");
        self.transition(RunState::JobSelected);

        let inventory = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(self.cancelled(Vec::new())),
            r = inventory::fetch_inventory(&self.store, &vault, job) => r?,
        };
        self.transition(RunState::InventoryFetched);

        self.transition(RunState::Deleting);
        let outcomes =
            deletion::delete_all(&self.store, &vault, &inventory.archives, observer, cancel).await;
        if outcomes.len() < inventory.archives.len() {
            return Err(self.cancelled(outcomes));
        }

        let summary = Summary::from_outcomes(&outcomes);
        self.transition(RunState::Done);
        info!(
            vault = %vault,
            total = summary.total,
            succeeded = summary.succeeded,
            failed = summary.failed,
            "vault emptying finished"
        );
        Ok(summary)
    }

    fn transition(&mut self, next: RunState) {
        debug!(from = %self.state, to = %next, "run state");
        self.state = next;
    }

    fn cancelled(&self, outcomes: Vec<DeletionOutcome>) -> RunError {
        RunError::Cancelled {
            state: self.state,
            outcomes,
        }
    }
}
