use chrono::{DateTime, Utc};

use crate::error::RunError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobAction {
    InventoryRetrieval,
    ArchiveRetrieval,
    Other,
}

/// A vault job as observed from the job listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: String,
    pub action: JobAction,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

/// Pick the inventory job whose output should be trusted.
///
/// Any unfinished inventory job fails the selection outright. Otherwise the
/// completed inventory job with the latest completion time wins; on an exact
/// tie the one listed first is kept. A missing completion time sorts before
/// every present one.
pub fn select(jobs: &[Job]) -> Result<&Job, RunError> {
    let inventory: Vec<&Job> = jobs
        .iter()
        .filter(|j| j.action == JobAction::InventoryRetrieval)
        .collect();

    if let Some(running) = inventory.iter().find(|j| !j.completed) {
        return Err(RunError::JobInProgress {
            job_id: running.id.clone(),
        });
    }

    inventory
        .into_iter()
        .reduce(|latest, job| {
            if job.completed_at > latest.completed_at {
                job
            } else {
                latest
            }
        })
        .ok_or(RunError::NoCompletedJob)
}
