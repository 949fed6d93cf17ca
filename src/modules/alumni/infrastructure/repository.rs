/// Diesel-based implementation of AlumniRepository
///
/// Diesel is synchronous, so every call runs on the blocking pool.
use crate::modules::alumni::domain::entities::{AlumniRecord, NewAlumniRecord};
use crate::modules::alumni::domain::repository::AlumniRepository;
use crate::modules::alumni::infrastructure::models::{AlumniRecordModel, NewAlumniRecordModel};
use crate::schema::alumni_records;
use crate::shared::errors::{AppError, AppResult};
use crate::shared::infrastructure::database::Database;
use crate::shared::utils::logger::LogContext;
use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use std::sync::Arc;
use tokio::task;

pub struct AlumniRepositoryImpl {
    db: Arc<Database>,
}

impl AlumniRepositoryImpl {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    /// Run a Diesel closure on the blocking pool with a pooled connection
    async fn with_conn<T, F>(&self, operation: &'static str, f: F) -> AppResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut PgConnection) -> QueryResult<T> + Send + 'static,
    {
        let db = Arc::clone(&self.db);
        let start = std::time::Instant::now();

        let result = task::spawn_blocking(move || -> AppResult<T> {
            let mut conn = db.get_connection()?;
            f(&mut conn).map_err(|e| AppError::DatabaseError(format!("{}: {}", operation, e)))
        })
        .await??;

        LogContext::db_operation(
            operation,
            "alumni_records",
            start.elapsed().as_millis() as u64,
        );
        Ok(result)
    }
}

#[async_trait]
impl AlumniRepository for AlumniRepositoryImpl {
    async fn insert(&self, record: NewAlumniRecord) -> AppResult<AlumniRecord> {
        let new_record = NewAlumniRecordModel::from(record);

        let inserted = self
            .with_conn("insert alumni record", move |conn| {
                diesel::insert_into(alumni_records::table)
                    .values(&new_record)
                    .returning(AlumniRecordModel::as_returning())
                    .get_result(conn)
            })
            .await?;

        Ok(inserted.into_entity())
    }

    async fn find_by_mobile(&self, mobile: &str) -> AppResult<Option<AlumniRecord>> {
        let mobile = mobile.to_string();

        let found = self
            .with_conn("find alumni by mobile", move |conn| {
                alumni_records::table
                    .filter(alumni_records::mobile.eq(mobile))
                    .select(AlumniRecordModel::as_select())
                    .first(conn)
                    .optional()
            })
            .await?;

        Ok(found.map(AlumniRecordModel::into_entity))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<AlumniRecord>> {
        let found = self
            .with_conn("find alumni by id", move |conn| {
                alumni_records::table
                    .find(id)
                    .select(AlumniRecordModel::as_select())
                    .first(conn)
                    .optional()
            })
            .await?;

        Ok(found.map(AlumniRecordModel::into_entity))
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<AlumniRecord>> {
        let name = name.to_string();

        let rows = self
            .with_conn("find alumni by name", move |conn| {
                alumni_records::table
                    .filter(alumni_records::name.eq(name))
                    .order((alumni_records::generation.asc(), alumni_records::id.asc()))
                    .select(AlumniRecordModel::as_select())
                    .load(conn)
            })
            .await?;

        Ok(rows.into_iter().map(AlumniRecordModel::into_entity).collect())
    }

    async fn find_by_partial_name(&self, fragment: &str) -> AppResult<Vec<AlumniRecord>> {
        let fragment = fragment.to_string();

        // Containment in either direction, matching how names are typed into the login form
        let rows: Vec<AlumniRecordModel> = self
            .with_conn("find alumni by partial name", move |conn| {
                diesel::sql_query(
                    "SELECT * FROM alumni_records
                     WHERE strpos(name, $1) > 0 OR strpos($1, name) > 0
                     ORDER BY id ASC",
                )
                .bind::<diesel::sql_types::Text, _>(fragment)
                .load(conn)
            })
            .await?;

        Ok(rows.into_iter().map(AlumniRecordModel::into_entity).collect())
    }

    async fn count(&self) -> AppResult<i64> {
        self.with_conn("count alumni records", |conn| {
            alumni_records::table.count().get_result::<i64>(conn)
        })
        .await
    }

    async fn mark_matched(&self, id: i32, user_id: i32) -> AppResult<Option<AlumniRecord>> {
        let updated = self
            .with_conn("link alumni record to user", move |conn| {
                diesel::update(alumni_records::table.find(id))
                    .set((
                        alumni_records::is_matched.eq(true),
                        alumni_records::matched_user_id.eq(Some(user_id)),
                        alumni_records::updated_at.eq(Utc::now()),
                    ))
                    .returning(AlumniRecordModel::as_returning())
                    .get_result(conn)
                    .optional()
            })
            .await?;

        Ok(updated.map(AlumniRecordModel::into_entity))
    }
}
