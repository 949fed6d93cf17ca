/// Sync run tracking
///
/// Replaces a single global progress object with one job per sync run:
/// - Domain: job entities, progress snapshots and the store trait
/// - Infrastructure: DashMap-backed in-memory store
/// - Tracker: run slot guard, progress updates, retention and eviction
pub mod domain;
pub mod infrastructure;
pub mod tracker;

// Re-exports for easy access
pub use domain::{
    entities::{JobStatus, SyncJob, SyncProgress, SyncProgressUpdate},
    repository::JobStore,
};
pub use infrastructure::InMemoryJobStore;
pub use tracker::{SyncJobTracker, SyncRun};
