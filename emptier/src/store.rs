use async_trait::async_trait;

use crate::error::StoreError;
use crate::jobs::Job;

/// The three archival-store calls a run needs.
#[async_trait]
pub trait ArchiveStore: Send + Sync {
    async fn list_jobs(&self, vault: &str) -> Result<Vec<Job>, StoreError>;

    /// Full output body of a finished job.
    async fn get_job_output(&self, vault: &str, job_id: &str) -> Result<Vec<u8>, StoreError>;

    async fn delete_archive(&self, vault: &str, archive_id: &str) -> Result<(), StoreError>;
}
