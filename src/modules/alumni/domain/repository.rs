/// Repository trait for persisted alumni records
///
/// The sync only needs insert and lookup-by-mobile; the directory adds name
/// lookups and user linking. Nothing here deletes records.
use crate::modules::alumni::domain::entities::{AlumniRecord, NewAlumniRecord};
use crate::shared::errors::AppResult;
use async_trait::async_trait;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AlumniRepository: Send + Sync {
    /// Insert a new record
    async fn insert(&self, record: NewAlumniRecord) -> AppResult<AlumniRecord>;

    /// Exact match on the mobile number (the natural key)
    async fn find_by_mobile(&self, mobile: &str) -> AppResult<Option<AlumniRecord>>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<AlumniRecord>>;

    /// Exact match on name
    async fn find_by_name(&self, name: &str) -> AppResult<Vec<AlumniRecord>>;

    /// Records whose name contains `fragment`, or is contained in it
    async fn find_by_partial_name(&self, fragment: &str) -> AppResult<Vec<AlumniRecord>>;

    /// Total number of persisted records
    async fn count(&self) -> AppResult<i64>;

    /// Link a record to a portal user. Returns None if the record does not exist.
    async fn mark_matched(&self, id: i32, user_id: i32) -> AppResult<Option<AlumniRecord>>;
}
