/// Sync run tracker
///
/// Owns the single sync slot and the per-run progress records. Only one run
/// may hold the slot at a time; a finished run stays visible to
/// `get_sync_progress` for the retention window, then the view reads idle.
/// Expired history is evicted lazily on start and on read.
///
/// `start_sync` hands out a `SyncRun` guard. A guard dropped without
/// `finish_sync` (cancelled future, panic) fails its run and frees the slot.
use crate::modules::alumni_sync::domain::SyncStats;
use crate::modules::jobs::domain::entities::{JobStatus, SyncJob, SyncProgress, SyncProgressUpdate};
use crate::modules::jobs::domain::repository::JobStore;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info, log_warn};
use chrono::Utc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

/// Holds the sync slot for one run until finished or dropped
#[must_use = "dropping the run marks it failed"]
pub struct SyncRun<'a> {
    tracker: &'a SyncJobTracker,
    run_id: Uuid,
    closed: bool,
}

impl SyncRun<'_> {
    pub fn id(&self) -> Uuid {
        self.run_id
    }
}

impl std::fmt::Debug for SyncRun<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SyncRun").field("run_id", &self.run_id).finish()
    }
}

impl Drop for SyncRun<'_> {
    fn drop(&mut self) {
        if !self.closed {
            self.tracker.abandon(self.run_id);
        }
    }
}

pub struct SyncJobTracker {
    store: Arc<dyn JobStore>,
    slot_taken: AtomicBool,
    retention: Duration,
    history_ttl: Duration,
}

impl SyncJobTracker {
    pub fn new(store: Arc<dyn JobStore>, retention: Duration, history_ttl: Duration) -> Self {
        Self {
            store,
            slot_taken: AtomicBool::new(false),
            retention,
            history_ttl,
        }
    }

    /// Claim the sync slot and open a new run
    pub fn start_sync(&self) -> AppResult<SyncRun<'_>> {
        if self
            .slot_taken
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            let running = self.store.running().map(|job| job.id.to_string());
            log_warn!(
                "Sync trigger rejected, run {} still in progress",
                running.as_deref().unwrap_or("?")
            );
            return Err(AppError::Conflict(
                "Alumni sync is already running".to_string(),
            ));
        }

        self.evict_expired();

        let job = SyncJob::start();
        let run_id = job.id;
        self.store.save(job);

        log_info!("Sync run {} started", run_id);
        Ok(SyncRun {
            tracker: self,
            run_id,
            closed: false,
        })
    }

    pub fn update_sync_progress(&self, run_id: Uuid, update: SyncProgressUpdate) -> AppResult<()> {
        let mut job = self
            .store
            .get(run_id)
            .ok_or_else(|| AppError::NotFound(format!("Sync run {} not found", run_id)))?;

        if job.status != JobStatus::Running {
            log_warn!("Ignoring progress update for finished run {}", run_id);
            return Ok(());
        }

        job.apply(update);
        self.store.save(job);
        Ok(())
    }

    /// Close the run and release the slot
    pub fn finish_sync(&self, mut run: SyncRun<'_>, outcome: Result<&SyncStats, &AppError>) -> AppResult<()> {
        run.closed = true;
        let result = self.close_run(run.run_id, outcome);
        self.slot_taken.store(false, Ordering::Release);
        result
    }

    fn close_run(&self, run_id: Uuid, outcome: Result<&SyncStats, &AppError>) -> AppResult<()> {
        let mut job = self
            .store
            .get(run_id)
            .ok_or_else(|| AppError::NotFound(format!("Sync run {} not found", run_id)))?;

        if job.status != JobStatus::Running {
            return Err(AppError::InvalidInput(format!(
                "Sync run {} is already {}",
                run_id, job.status
            )));
        }

        match outcome {
            Ok(stats) => {
                job.status = JobStatus::Completed;
                job.current_step = format!("Completed: {}/{} synced", stats.synced, stats.total);
                job.total = Some(stats.total);
                job.processed = stats.total;
                job.errors = stats.errors;
            }
            Err(error) => {
                job.status = JobStatus::Failed;
                job.current_step = "Failed".to_string();
                job.error = Some(error.to_string());
            }
        }
        job.finished_at = Some(Utc::now());

        log_info!("Sync run {} {}", run_id, job.status);
        self.store.save(job);
        Ok(())
    }

    fn abandon(&self, run_id: Uuid) {
        if let Some(mut job) = self.store.get(run_id) {
            if job.status == JobStatus::Running {
                log_warn!("Sync run {} dropped before finishing, marking failed", run_id);
                job.status = JobStatus::Failed;
                job.current_step = "Failed".to_string();
                job.error = Some("Sync run was interrupted".to_string());
                job.finished_at = Some(Utc::now());
                self.store.save(job);
            }
        }
        self.slot_taken.store(false, Ordering::Release);
    }

    /// Running run, else a recently finished one, else idle
    pub fn get_sync_progress(&self) -> SyncProgress {
        self.evict_expired();

        if let Some(running) = self.store.running() {
            return running.snapshot();
        }

        self.store
            .latest_finished()
            .filter(|job| self.within_retention(job))
            .map(|job| job.snapshot())
            .unwrap_or_else(SyncProgress::idle)
    }

    pub fn get_run(&self, run_id: Uuid) -> Option<SyncProgress> {
        self.evict_expired();
        self.store.get(run_id).map(|job| job.snapshot())
    }

    pub fn is_running(&self) -> bool {
        self.slot_taken.load(Ordering::Acquire)
    }

    fn within_retention(&self, job: &SyncJob) -> bool {
        let Some(finished_at) = job.finished_at else {
            return false;
        };
        let elapsed = (Utc::now() - finished_at).to_std().unwrap_or_default();
        elapsed < self.retention
    }

    fn evict_expired(&self) {
        let Ok(ttl) = chrono::Duration::from_std(self.history_ttl) else {
            return;
        };
        let removed = self.store.remove_finished_before(Utc::now() - ttl);
        if removed > 0 {
            log_debug!("Evicted {} expired sync runs", removed);
        }
    }
}
