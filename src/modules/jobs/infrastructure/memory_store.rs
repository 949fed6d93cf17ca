use crate::modules::jobs::domain::entities::{JobStatus, SyncJob};
use crate::modules::jobs::domain::repository::JobStore;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use uuid::Uuid;

/// Lock-free job store for concurrent pollers
#[derive(Default)]
pub struct InMemoryJobStore {
    jobs: DashMap<Uuid, SyncJob>,
}

impl InMemoryJobStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl JobStore for InMemoryJobStore {
    fn save(&self, job: SyncJob) {
        self.jobs.insert(job.id, job);
    }

    fn get(&self, id: Uuid) -> Option<SyncJob> {
        self.jobs.get(&id).map(|entry| entry.value().clone())
    }

    fn running(&self) -> Option<SyncJob> {
        self.jobs
            .iter()
            .find(|entry| entry.status == JobStatus::Running)
            .map(|entry| entry.value().clone())
    }

    fn latest_finished(&self) -> Option<SyncJob> {
        self.jobs
            .iter()
            .filter(|entry| entry.status.is_finished())
            .max_by_key(|entry| entry.finished_at)
            .map(|entry| entry.value().clone())
    }

    fn remove_finished_before(&self, cutoff: DateTime<Utc>) -> usize {
        let before = self.jobs.len();
        self.jobs
            .retain(|_, job| job.finished_at.map_or(true, |finished| finished >= cutoff));
        before.saturating_sub(self.jobs.len())
    }

    fn len(&self) -> usize {
        self.jobs.len()
    }
}
