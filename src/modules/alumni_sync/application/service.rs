use crate::modules::alumni::domain::AlumniRepository;
use crate::modules::alumni_sync::domain::{
    detect, ConnectionReport, DuplicateReport, IncomingAlumni, RecordNormalizer, SyncStats,
};
use crate::modules::jobs::{SyncJobTracker, SyncProgressUpdate};
use crate::modules::sheets::SpreadsheetSource;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::utils::logger::{LogContext, TimedOperation};
use crate::{log_error, log_info, log_warn};
use std::sync::Arc;
use uuid::Uuid;

/// Duplicate groups beyond this are counted but not logged
const MAX_LOGGED_DUPLICATES: usize = 20;

/// Reconciles the alumni spreadsheet into the directory.
///
/// Records are keyed by mobile number: absent ones are inserted, present ones
/// are left untouched. A run never updates or deletes, so re-running after a
/// crash is safe.
pub struct AlumniSyncService {
    source: Arc<dyn SpreadsheetSource>,
    repository: Arc<dyn AlumniRepository>,
    tracker: Arc<SyncJobTracker>,
    normalizer: RecordNormalizer,
}

impl AlumniSyncService {
    pub fn new(
        source: Arc<dyn SpreadsheetSource>,
        repository: Arc<dyn AlumniRepository>,
        tracker: Arc<SyncJobTracker>,
        base_year: i32,
    ) -> AppResult<Self> {
        Ok(Self {
            source,
            repository,
            tracker,
            normalizer: RecordNormalizer::new(base_year)?,
        })
    }

    pub fn tracker(&self) -> &Arc<SyncJobTracker> {
        &self.tracker
    }

    /// Run one sync; fails with `Conflict` while another run holds the slot.
    ///
    /// If this future is dropped mid-run the run is marked failed and the
    /// slot is released.
    pub async fn sync(&self) -> AppResult<SyncStats> {
        let run = self.tracker.start_sync()?;
        let run_id = run.id();

        let outcome = self.run_sync(run_id).await;

        if let Err(e) = self.tracker.finish_sync(run, outcome.as_ref()) {
            log_error!("Failed to close sync run {}: {}", run_id, e);
        }

        outcome
    }

    async fn run_sync(&self, run_id: Uuid) -> AppResult<SyncStats> {
        let timer = TimedOperation::new("alumni_sync");

        self.progress(run_id, SyncProgressUpdate::step("Checking spreadsheet connection"));
        if let Err(e) = self.source.check_connection().await {
            log_warn!("Spreadsheet unavailable, nothing synced: {}", e);
            return Ok(SyncStats::default());
        }

        self.progress(run_id, SyncProgressUpdate::step("Fetching alumni rows"));
        let rows = match self.source.fetch_rows().await {
            Ok(rows) => rows,
            Err(e) => {
                log_warn!("Failed to fetch alumni rows, nothing synced: {}", e);
                return Ok(SyncStats::default());
            }
        };

        self.progress(run_id, SyncProgressUpdate::step("Validating rows"));
        let normalized = self.normalizer.normalize(&rows);
        log_duplicate_report(&detect(&normalized.records));

        let (records, missing_mobile): (Vec<IncomingAlumni>, Vec<IncomingAlumni>) = normalized
            .records
            .into_iter()
            .partition(|record| record.mobile.is_some());

        for record in &missing_mobile {
            log_warn!(
                "Row {}: {} has no mobile number, skipped",
                record.row_number,
                record.label()
            );
        }

        let mut stats = SyncStats {
            total: records.len(),
            errors: missing_mobile.len(),
            missing_mobile: missing_mobile.len(),
            ..Default::default()
        };

        self.progress(
            run_id,
            SyncProgressUpdate::step("Saving records")
                .with_total(stats.total)
                .with_counts(0, stats.errors),
        );

        let baseline = self.repository.count().await?;

        for (index, record) in records.iter().enumerate() {
            LogContext::sync_progress(index + 1, stats.total, &record.name, &record.generation);

            match self.reconcile(record).await {
                Ok(true) => stats.synced += 1,
                Ok(false) => stats.existing += 1,
                Err(e) => {
                    stats.errors += 1;
                    log_error!("Failed to save {} (row {}): {}", record.label(), record.row_number, e);
                }
            }

            self.progress(
                run_id,
                SyncProgressUpdate::step(format!("Saving records: {}", record.name))
                    .with_counts(index + 1, stats.errors),
            );
        }

        match self.repository.count().await {
            Ok(persisted) => log_info!(
                "Alumni directory holds {} records ({} before, {} fetched, delta {})",
                persisted,
                baseline,
                stats.total,
                stats.total as i64 - persisted
            ),
            Err(e) => log_warn!("Could not read final record count: {}", e),
        }

        timer.finish_with_info(&format!(
            "total {}, synced {}, existing {}, errors {}",
            stats.total, stats.synced, stats.existing, stats.errors
        ));

        Ok(stats)
    }

    /// Insert the record unless its mobile is already persisted; true if inserted
    async fn reconcile(&self, record: &IncomingAlumni) -> AppResult<bool> {
        let mobile = record
            .mobile
            .as_deref()
            .ok_or_else(|| AppError::ValidationError(format!("{} has no mobile", record.label())))?;

        if self.repository.find_by_mobile(mobile).await?.is_some() {
            return Ok(false);
        }

        self.repository.insert(record.to_new_record()).await?;
        Ok(true)
    }

    fn progress(&self, run_id: Uuid, update: SyncProgressUpdate) {
        if let Err(e) = self.tracker.update_sync_progress(run_id, update) {
            log_warn!("Progress update for run {} failed: {}", run_id, e);
        }
    }

    /// Probe the spreadsheet and count the rows that would validate
    pub async fn test_connection(&self) -> ConnectionReport {
        let title = match self.source.check_connection().await {
            Ok(title) => title,
            Err(e) => return ConnectionReport::failed(format!("Spreadsheet unavailable: {}", e)),
        };

        match self.source.fetch_rows().await {
            Ok(rows) => {
                let outcome = self.normalizer.normalize(&rows);
                ConnectionReport::connected(&title, outcome.records.len())
            }
            Err(e) => ConnectionReport::failed(format!("Connected to '{}' but reading rows failed: {}", title, e)),
        }
    }

    /// Duplicate report for the current sheet, without writing anything
    pub async fn preview_duplicates(&self) -> AppResult<DuplicateReport> {
        let rows = self.source.fetch_rows().await?;
        let outcome = self.normalizer.normalize(&rows);
        let report = detect(&outcome.records);

        log_duplicate_report(&report);
        Ok(report)
    }
}

fn log_duplicate_report(report: &DuplicateReport) {
    if report.is_empty() {
        return;
    }

    for group in report.mobile_duplicates.iter().take(MAX_LOGGED_DUPLICATES) {
        log_warn!(
            "Duplicate {} on rows {:?}; only the first will be saved",
            group.key,
            group.row_numbers
        );
    }
    for group in report.name_duplicates.iter().take(MAX_LOGGED_DUPLICATES) {
        log_info!("Same name and generation: {} on rows {:?}", group.key, group.row_numbers);
    }

    log_info!(
        "Duplicate check: {} shared mobiles, {} shared name+generation",
        report.mobile_duplicates.len(),
        report.name_duplicates.len()
    );
}
