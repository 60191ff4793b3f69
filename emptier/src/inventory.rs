use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use tracing::info;

use crate::error::RunError;
use crate::jobs::Job;
use crate::store::ArchiveStore;

/// Decoded output of an inventory-retrieval job.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Inventory {
    #[serde(rename = "VaultARN", default, deserialize_with = "null_as_default")]
    pub vault_arn: String,
    #[serde(default)]
    pub inventory_date: Option<DateTime<Utc>>,
    #[serde(rename = "ArchiveList")]
    pub archives: Vec<InventoryRecord>,
}

/// One archive as listed in the inventory. Sizes and hashes are carried
/// through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InventoryRecord {
    #[serde(rename = "ArchiveId")]
    pub archive_id: String,
    #[serde(rename = "ArchiveDescription", default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(rename = "CreationDate", default)]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "Size", default, deserialize_with = "null_as_default")]
    pub size_bytes: u64,
    #[serde(rename = "SHA256TreeHash", default, deserialize_with = "null_as_default")]
    pub content_hash: String,
}

/// Absent and `null` both decode to the field's zero value.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}

pub fn parse_inventory(body: &[u8]) -> Result<Inventory, RunError> {
    Ok(serde_json::from_slice(body)?)
}

/// Download the job's output and decode it. Fails as a whole if any record
/// is malformed.
pub async fn fetch_inventory<S>(store: &S, vault: &str, job: &Job) -> Result<Inventory, RunError>
where
    S: ArchiveStore + ?Sized,
{
    let body = store
        .get_job_output(vault, &job.id)
        .await
        .map_err(|source| RunError::OutputFetchFailed {
            job_id: job.id.clone(),
            source,
        })?;

    let inventory = parse_inventory(&body)?;
    info!(
        job_id = %job.id,
        vault_arn = %inventory.vault_arn,
        inventory_date = ?inventory.inventory_date,
        archives = inventory.archives.len(),
        "read inventory"
    );
    Ok(inventory)
}
