/// Storage interface for sync jobs
///
/// Jobs are short-lived, so the only implementation keeps them in memory.
/// Every getter returns an owned clone.
use crate::modules::jobs::domain::entities::SyncJob;
use chrono::{DateTime, Utc};
use uuid::Uuid;

pub trait JobStore: Send + Sync {
    /// Insert or replace a job
    fn save(&self, job: SyncJob);

    fn get(&self, id: Uuid) -> Option<SyncJob>;

    /// The job currently marked running, if any
    fn running(&self) -> Option<SyncJob>;

    /// Most recently finished job
    fn latest_finished(&self) -> Option<SyncJob>;

    /// Drop finished jobs that finished before `cutoff`; returns how many were removed
    fn remove_finished_before(&self, cutoff: DateTime<Utc>) -> usize;

    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
