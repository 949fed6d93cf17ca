/// Persisted alumni directory
///
/// - Domain: record entities and the repository trait
/// - Infrastructure: Diesel repository over `alumni_records`
/// - Application: directory lookups and user linking
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod routes;

// Re-exports for easy external access
pub use application::AlumniDirectoryService;
pub use domain::{AlumniRecord, AlumniRepository, NewAlumniRecord};
pub use infrastructure::AlumniRepositoryImpl;
