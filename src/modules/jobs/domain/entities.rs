/// Domain entities for sync run tracking
///
/// Each sync trigger creates one `SyncJob`. Readers only ever receive
/// `SyncProgress` snapshots, which are owned copies.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Idle,
    Running,
    Completed,
    Failed,
}

impl JobStatus {
    pub fn is_finished(self) -> bool {
        matches!(self, JobStatus::Completed | JobStatus::Failed)
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobStatus::Idle => write!(f, "idle"),
            JobStatus::Running => write!(f, "running"),
            JobStatus::Completed => write!(f, "completed"),
            JobStatus::Failed => write!(f, "failed"),
        }
    }
}

impl std::str::FromStr for JobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "idle" => Ok(JobStatus::Idle),
            "running" => Ok(JobStatus::Running),
            "completed" => Ok(JobStatus::Completed),
            "failed" => Ok(JobStatus::Failed),
            _ => Err(format!("Invalid job status: {}", s)),
        }
    }
}

/// One sync run
#[derive(Debug, Clone, PartialEq)]
pub struct SyncJob {
    pub id: Uuid,
    pub status: JobStatus,
    pub current_step: String,
    pub processed: usize,
    /// Unknown until the sheet has been fetched and validated
    pub total: Option<usize>,
    pub errors: usize,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub error: Option<String>,
}

impl SyncJob {
    pub fn start() -> Self {
        Self {
            id: Uuid::new_v4(),
            status: JobStatus::Running,
            current_step: "Starting".to_string(),
            processed: 0,
            total: None,
            errors: 0,
            started_at: Utc::now(),
            finished_at: None,
            error: None,
        }
    }

    /// Apply a partial update; processed never exceeds a known total
    pub fn apply(&mut self, update: SyncProgressUpdate) {
        self.current_step = update.step;
        if let Some(total) = update.total {
            self.total = Some(total);
        }
        if let Some(processed) = update.processed {
            self.processed = processed;
        }
        if let Some(errors) = update.errors {
            self.errors = errors;
        }
        if let Some(total) = self.total {
            self.processed = self.processed.min(total);
        }
    }

    pub fn snapshot(&self) -> SyncProgress {
        SyncProgress {
            run_id: Some(self.id),
            status: self.status,
            is_running: self.status == JobStatus::Running,
            current_step: self.current_step.clone(),
            processed: self.processed,
            total: self.total.unwrap_or(0),
            errors: self.errors,
            start_time: Some(self.started_at.timestamp_millis()),
            finished_at: self.finished_at.map(|t| t.timestamp_millis()),
            error: self.error.clone(),
        }
    }
}

/// Partial progress patch; `None` fields are left unchanged
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncProgressUpdate {
    pub step: String,
    pub processed: Option<usize>,
    pub total: Option<usize>,
    pub errors: Option<usize>,
}

impl SyncProgressUpdate {
    pub fn step(step: impl Into<String>) -> Self {
        Self {
            step: step.into(),
            ..Default::default()
        }
    }

    pub fn with_total(mut self, total: usize) -> Self {
        self.total = Some(total);
        self
    }

    pub fn with_counts(mut self, processed: usize, errors: usize) -> Self {
        self.processed = Some(processed);
        self.errors = Some(errors);
        self
    }
}

/// Progress view returned to pollers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncProgress {
    pub run_id: Option<Uuid>,
    pub status: JobStatus,
    pub is_running: bool,
    pub current_step: String,
    pub processed: usize,
    pub total: usize,
    pub errors: usize,
    /// Epoch milliseconds
    pub start_time: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SyncProgress {
    pub fn idle() -> Self {
        Self {
            run_id: None,
            status: JobStatus::Idle,
            is_running: false,
            current_step: String::new(),
            processed: 0,
            total: 0,
            errors: 0,
            start_time: None,
            finished_at: None,
            error: None,
        }
    }
}
