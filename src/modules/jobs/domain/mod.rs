pub mod entities;
pub mod repository;

pub use entities::{JobStatus, SyncJob, SyncProgress, SyncProgressUpdate};
pub use repository::JobStore;
