use async_trait::async_trait;
use aws_sdk_glacier::Client;
use aws_sdk_glacier::error::DisplayErrorContext;
use aws_sdk_glacier::types::{ActionCode, GlacierJobDescription};
use chrono::{DateTime, Utc};
use tracing::{debug, warn};

use crate::error::StoreError;
use crate::jobs::{Job, JobAction};
use crate::store::ArchiveStore;

/// Account id meaning "the account that owns the credentials".
const OWN_ACCOUNT: &str = "-";

/// [`ArchiveStore`] backed by Amazon S3 Glacier.
#[derive(Debug, Clone)]
pub struct GlacierStore {
    client: Client,
}

impl GlacierStore {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

fn transport_error<E>(operation: &'static str, err: E) -> StoreError
where
    E: std::error::Error,
{
    StoreError::new(operation, DisplayErrorContext(err).to_string())
}

pub(crate) fn job_from_description(desc: &GlacierJobDescription) -> Job {
    let action = match desc.action() {
        Some(ActionCode::InventoryRetrieval) => JobAction::InventoryRetrieval,
        Some(ActionCode::ArchiveRetrieval) => JobAction::ArchiveRetrieval,
        _ => JobAction::Other,
    };
    let id = desc.job_id().unwrap_or_default().to_string();

    let completed_at = desc.completion_date().and_then(|raw| {
        match DateTime::parse_from_rfc3339(raw) {
            Ok(ts) => Some(ts.with_timezone(&Utc)),
            Err(e) => {
                warn!(job_id = %id, completion_date = raw, "unparseable completion date: {e}");
                None
            }
        }
    });

    Job {
        id,
        action,
        completed: desc.completed(),
        completed_at,
    }
}

#[async_trait]
impl ArchiveStore for GlacierStore {
    async fn list_jobs(&self, vault: &str) -> Result<Vec<Job>, StoreError> {
        let mut jobs = Vec::new();
        let mut marker: Option<String> = None;

        loop {
            let out = self
                .client
                .list_jobs()
                .account_id(OWN_ACCOUNT)
                .vault_name(vault)
                .set_marker(marker.take())
                .send()
                .await
                .map_err(|e| transport_error("ListJobs", e))?;

            jobs.extend(out.job_list().iter().map(job_from_description));

            match out.marker() {
                Some(next) if !next.is_empty() => marker = Some(next.to_string()),
                _ => break,
            }
        }

        debug!(vault, count = jobs.len(), "ListJobs");
        Ok(jobs)
    }

    async fn get_job_output(&self, vault: &str, job_id: &str) -> Result<Vec<u8>, StoreError> {
        let out = self
            .client
            .get_job_output()
            .account_id(OWN_ACCOUNT)
            .vault_name(vault)
            .job_id(job_id)
            .send()
            .await
            .map_err(|e| transport_error("GetJobOutput", e))?;

        let body = out
            .body
            .collect()
            .await
            .map_err(|e| transport_error("reading job output body", e))?;
        Ok(body.into_bytes().to_vec())
    }

    async fn delete_archive(&self, vault: &str, archive_id: &str) -> Result<(), StoreError> {
        self.client
            .delete_archive()
            .account_id(OWN_ACCOUNT)
            .vault_name(vault)
            .archive_id(archive_id)
            .send()
            .await
            .map_err(|e| transport_error("DeleteArchive", e))?;
        Ok(())
    }
}
