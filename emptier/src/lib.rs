//! Empty a Glacier vault: pick the newest finished inventory job, read its
//! archive list, and delete every archive it names.

pub mod cli;
pub mod config;
pub mod deletion;
pub mod error;
pub mod glacier;
pub mod inventory;
pub mod jobs;
pub mod logging;
pub mod orchestrator;
pub mod store;

pub use crate::config::RunConfig;
pub use crate::deletion::{DeletionObserver, DeletionOutcome, TracingObserver};
pub use crate::error::{RunError, StoreError};
pub use crate::inventory::{Inventory, InventoryRecord};
pub use crate::jobs::{Job, JobAction};
pub use crate::orchestrator::{FailedDeletion, Orchestrator, RunState, Summary};
pub use crate::store::ArchiveStore;
