/// Spreadsheet to directory reconciliation
///
/// - Domain: validated rows, header-based normalization, duplicate detection
/// - Application: the sync run, connection check and duplicate preview
pub mod application;
pub mod domain;
pub mod routes;

pub use application::AlumniSyncService;
pub use domain::{ConnectionReport, DuplicateReport, IncomingAlumni, SyncStats};
