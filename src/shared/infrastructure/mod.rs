/// Shared infrastructure concerns
///
/// Infrastructure used by more than one module: the PostgreSQL pool and
/// embedded migrations.
pub mod database;

// Re-exports for convenience
pub use database::{Database, DbConnection, DbPool, PoolStatus};
