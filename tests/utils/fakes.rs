/// In-memory stand-ins for the spreadsheet and the alumni table
use alumni_lib::modules::alumni::{AlumniRecord, AlumniRepository, NewAlumniRecord};
use alumni_lib::modules::sheets::{SheetRow, SpreadsheetSource};
use alumni_lib::shared::errors::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

#[derive(Default)]
pub struct InMemoryAlumniRepository {
    records: Mutex<Vec<AlumniRecord>>,
    failing_mobiles: Mutex<HashSet<String>>,
    fail_count: AtomicBool,
    inserts: AtomicUsize,
}

impl InMemoryAlumniRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts for this mobile fail with a database error
    pub fn fail_insert_for(&self, mobile: &str) {
        self.failing_mobiles.lock().unwrap().insert(mobile.to_string());
    }

    pub fn fail_count(&self) {
        self.fail_count.store(true, Ordering::SeqCst);
    }

    pub fn insert_calls(&self) -> usize {
        self.inserts.load(Ordering::SeqCst)
    }

    pub fn all(&self) -> Vec<AlumniRecord> {
        self.records.lock().unwrap().clone()
    }

    pub fn seed(&self, record: NewAlumniRecord) -> AlumniRecord {
        let mut records = self.records.lock().unwrap();
        let stored = AlumniRecord {
            id: records.len() as i32 + 1,
            department: record.department,
            generation: record.generation,
            name: record.name,
            admission_date: record.admission_date,
            graduation_date: record.graduation_date,
            graduation_year: record.graduation_year,
            address: record.address,
            mobile: record.mobile,
            phone: record.phone,
            group: record.group,
            status: record.status,
            alumni_position: record.alumni_position,
            memo: record.memo,
            is_matched: false,
            matched_user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };
        records.push(stored.clone());
        stored
    }
}

#[async_trait]
impl AlumniRepository for InMemoryAlumniRepository {
    async fn insert(&self, record: NewAlumniRecord) -> AppResult<AlumniRecord> {
        self.inserts.fetch_add(1, Ordering::SeqCst);

        if let Some(mobile) = &record.mobile {
            if self.failing_mobiles.lock().unwrap().contains(mobile) {
                return Err(AppError::DatabaseError(format!("insert failed for {}", mobile)));
            }
        }

        Ok(self.seed(record))
    }

    async fn find_by_mobile(&self, mobile: &str) -> AppResult<Option<AlumniRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.mobile.as_deref() == Some(mobile))
            .cloned())
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<AlumniRecord>> {
        Ok(self.records.lock().unwrap().iter().find(|r| r.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> AppResult<Vec<AlumniRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name == name)
            .cloned()
            .collect())
    }

    async fn find_by_partial_name(&self, fragment: &str) -> AppResult<Vec<AlumniRecord>> {
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.name.contains(fragment) || fragment.contains(r.name.as_str()))
            .cloned()
            .collect())
    }

    async fn count(&self) -> AppResult<i64> {
        if self.fail_count.load(Ordering::SeqCst) {
            return Err(AppError::DatabaseError("connection refused".to_string()));
        }
        Ok(self.records.lock().unwrap().len() as i64)
    }

    async fn mark_matched(&self, id: i32, user_id: i32) -> AppResult<Option<AlumniRecord>> {
        let mut records = self.records.lock().unwrap();
        Ok(records.iter_mut().find(|r| r.id == id).map(|r| {
            r.is_matched = true;
            r.matched_user_id = Some(user_id);
            r.updated_at = Utc::now();
            r.clone()
        }))
    }
}

/// Spreadsheet with fixed content that can be switched offline
pub struct StaticSheet {
    rows: Mutex<Vec<SheetRow>>,
    available: AtomicBool,
    gate: Option<Arc<Notify>>,
}

impl StaticSheet {
    pub fn new(rows: Vec<SheetRow>) -> Self {
        Self {
            rows: Mutex::new(rows),
            available: AtomicBool::new(true),
            gate: None,
        }
    }

    pub fn offline() -> Self {
        let sheet = Self::new(Vec::new());
        sheet.available.store(false, Ordering::SeqCst);
        sheet
    }

    /// `fetch_rows` waits until the gate is notified
    pub fn gated(rows: Vec<SheetRow>, gate: Arc<Notify>) -> Self {
        Self {
            gate: Some(gate),
            ..Self::new(rows)
        }
    }

    pub fn set_rows(&self, rows: Vec<SheetRow>) {
        *self.rows.lock().unwrap() = rows;
    }
}

#[async_trait]
impl SpreadsheetSource for StaticSheet {
    async fn check_connection(&self) -> AppResult<String> {
        if self.available.load(Ordering::SeqCst) {
            Ok("동문 명부".to_string())
        } else {
            Err(AppError::SourceUnavailable("spreadsheet offline".to_string()))
        }
    }

    async fn fetch_rows(&self) -> AppResult<Vec<SheetRow>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }

        if !self.available.load(Ordering::SeqCst) {
            return Err(AppError::SourceUnavailable("spreadsheet offline".to_string()));
        }
        Ok(self.rows.lock().unwrap().clone())
    }
}
