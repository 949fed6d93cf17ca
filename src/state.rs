use std::sync::Arc;

use crate::modules::alumni::{AlumniDirectoryService, AlumniRepository};
use crate::modules::alumni_sync::AlumniSyncService;
use crate::modules::jobs::{InMemoryJobStore, SyncJobTracker};
use crate::modules::sheets::SpreadsheetSource;
use crate::shared::errors::AppResult;
use crate::shared::{AppConfig, Database};

/// Services shared by every request handler
pub struct AppState {
    pub config: AppConfig,
    /// Absent only in tests that run against in-memory repositories
    pub database: Option<Arc<Database>>,
    pub directory_service: Arc<AlumniDirectoryService>,
    pub sync_service: Arc<AlumniSyncService>,
    pub job_tracker: Arc<SyncJobTracker>,
}

impl AppState {
    pub fn new(
        config: AppConfig,
        database: Option<Arc<Database>>,
        repository: Arc<dyn AlumniRepository>,
        source: Arc<dyn SpreadsheetSource>,
    ) -> AppResult<Arc<Self>> {
        let job_tracker = Arc::new(SyncJobTracker::new(
            Arc::new(InMemoryJobStore::new()),
            config.progress_retention,
            config.history_ttl,
        ));

        let directory_service = Arc::new(AlumniDirectoryService::new(Arc::clone(&repository)));
        let sync_service = Arc::new(AlumniSyncService::new(
            source,
            repository,
            Arc::clone(&job_tracker),
            config.base_year,
        )?);

        Ok(Arc::new(Self {
            config,
            database,
            directory_service,
            sync_service,
            job_tracker,
        }))
    }
}
