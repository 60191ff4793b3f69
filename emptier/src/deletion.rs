use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::inventory::InventoryRecord;
use crate::store::ArchiveStore;

/// Result of one delete request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionOutcome {
    pub archive_id: String,
    pub succeeded: bool,
    pub error: Option<String>,
}

/// Receives per-archive results as they happen.
pub trait DeletionObserver: Send + Sync {
    fn on_deleted(&self, archive_id: &str);
    fn on_failed(&self, archive_id: &str, error: &str);
}

/// Writes one log line per archive.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl DeletionObserver for TracingObserver {
    fn on_deleted(&self, archive_id: &str) {
        info!("deleted archive {archive_id}");
    }

    fn on_failed(&self, archive_id: &str, error: &str) {
        warn!("failed to delete archive {archive_id}: {error}");
    }
}

/// Delete every record, one request at a time and in order. Failures are
/// recorded and reported, never propagated. Returns one outcome per record
/// unless `cancel` fires, in which case the request in flight is dropped and
/// only the outcomes recorded so far are returned.
pub async fn delete_all<S>(
    store: &S,
    vault: &str,
    records: &[InventoryRecord],
    observer: &dyn DeletionObserver,
    cancel: &CancellationToken,
) -> Vec<DeletionOutcome>
where
    S: ArchiveStore + ?Sized,
{
    let mut outcomes = Vec::with_capacity(records.len());

    for record in records {
        let id = record.archive_id.as_str();
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            r = store.delete_archive(vault, id) => r,
        };

        let outcome = match result {
            Ok(()) => {
                observer.on_deleted(id);
                DeletionOutcome {
                    archive_id: id.to_owned(),
                    succeeded: true,
                    error: None,
                }
            }
            Err(e) => {
                let detail = e.to_string();
                observer.on_failed(id, &detail);
                DeletionOutcome {
                    archive_id: id.to_owned(),
                    succeeded: false,
                    error: Some(detail),
                }
            }
        };
        outcomes.push(outcome);
    }

    outcomes
}

#[cfg(test)]
pub(crate) mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::store::fake::FakeStore;

    /// Collects observer callbacks as `("deleted"|"failed", id)` pairs.
    #[derive(Default)]
    pub(crate) struct RecordingObserver {
        pub events: Mutex<Vec<(&'static str, String)>>,
    }

    impl DeletionObserver for RecordingObserver {
        fn on_deleted(&self, archive_id: &str) {
            self.events.lock().unwrap().push(("deleted", archive_id.into()));
        }

        fn on_failed(&self, archive_id: &str, _error: &str) {
            self.events.lock().unwrap().push(("failed", archive_id.into()));
        }
    }

    fn records(ids: &[&str]) -> Vec<InventoryRecord> {
        ids.iter()
            .map(|id| InventoryRecord {
                archive_id: (*id).into(),
                description: String::new(),
                created_at: None,
                size_bytes: 0,
                content_hash: String::new(),
            })
            .collect()
    }

    #[tokio::test]
    async fn deletes_each_record_in_order() {
        let store = FakeStore::default();
        let observer = RecordingObserver::default();
        let recs = records(&["a", "b", "c"]);

        let outcomes =
            delete_all(&store, "v1", &recs, &observer, &CancellationToken::new()).await;

        assert_eq!(store.delete_calls(), ["a", "b", "c"]);
        assert_eq!(outcomes.len(), 3);
        assert!(outcomes.iter().all(|o| o.succeeded && o.error.is_none()));
        let ids: Vec<_> = outcomes.iter().map(|o| o.archive_id.as_str()).collect();
        assert_eq!(ids, ["a", "b", "c"]);
    }

    #[tokio::test]
    async fn failure_does_not_stop_later_deletions() {
        let store = FakeStore::default().failing("b");
        let observer = RecordingObserver::default();
        let recs = records(&["a", "b", "c", "d"]);

        let outcomes =
            delete_all(&store, "v1", &recs, &observer, &CancellationToken::new()).await;

        assert_eq!(store.delete_calls(), ["a", "b", "c", "d"]);
        let failed: Vec<_> = outcomes.iter().filter(|o| !o.succeeded).collect();
        assert_eq!(failed.len(), 1);
        assert_eq!(failed[0].archive_id, "b");
        assert!(failed[0].error.as_deref().unwrap().contains("ServiceUnavailable"));
        assert_eq!(
            *observer.events.lock().unwrap(),
            vec![
                ("deleted", "a".to_string()),
                ("failed", "b".to_string()),
                ("deleted", "c".to_string()),
                ("deleted", "d".to_string()),
            ]
        );
    }

    #[tokio::test]
    async fn every_deletion_failing_still_returns_all_outcomes() {
        let store = FakeStore::default().failing("a").failing("b");
        let outcomes = delete_all(
            &store,
            "v1",
            &records(&["a", "b"]),
            &TracingObserver,
            &CancellationToken::new(),
        )
        .await;
        assert_eq!(outcomes.len(), 2);
        assert!(outcomes.iter().all(|o| !o.succeeded));
    }

    #[tokio::test]
    async fn second_pass_records_not_found_as_failures() {
        let store = FakeStore::default();
        let recs = records(&["a", "b"]);
        let cancel = CancellationToken::new();

        let first = delete_all(&store, "v1", &recs, &TracingObserver, &cancel).await;
        let second = delete_all(&store, "v1", &recs, &TracingObserver, &cancel).await;

        assert!(first.iter().all(|o| o.succeeded));
        assert_eq!(second.len(), 2);
        assert!(second.iter().all(|o| {
            !o.succeeded && o.error.as_deref().unwrap().contains("ResourceNotFound")
        }));
    }

    #[tokio::test]
    async fn cancelled_token_stops_before_next_request() {
        let store = FakeStore::default();
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcomes =
            delete_all(&store, "v1", &records(&["a", "b"]), &TracingObserver, &cancel).await;

        assert!(outcomes.is_empty());
        assert!(store.delete_calls().is_empty());
    }
}
