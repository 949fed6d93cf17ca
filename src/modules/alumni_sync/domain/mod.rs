pub mod duplicate_detector;
pub mod entities;
pub mod normalizer;

pub use duplicate_detector::{detect, DedupKey, DuplicateGroup, DuplicateReport};
pub use entities::{ConnectionReport, IncomingAlumni, SyncStats};
pub use normalizer::{AlumniField, ColumnMap, NormalizationOutcome, RecordNormalizer};
