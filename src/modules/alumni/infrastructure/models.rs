/// Diesel models for the alumni_records table
use crate::modules::alumni::domain::entities::{AlumniRecord, NewAlumniRecord};
use crate::schema::alumni_records;
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Diesel model for querying existing records
#[derive(Queryable, Selectable, QueryableByName, Debug, Clone)]
#[diesel(table_name = alumni_records)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct AlumniRecordModel {
    pub id: i32,
    pub department: String,
    pub generation: String,
    pub name: String,
    pub admission_date: Option<String>,
    pub graduation_date: Option<String>,
    pub graduation_year: Option<i32>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub phone: Option<String>,
    pub group_name: Option<String>,
    pub status: Option<String>,
    pub alumni_position: Option<String>,
    pub memo: Option<String>,
    pub is_matched: bool,
    pub matched_user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlumniRecordModel {
    /// Convert to domain AlumniRecord
    pub fn into_entity(self) -> AlumniRecord {
        AlumniRecord {
            id: self.id,
            department: self.department,
            generation: self.generation,
            name: self.name,
            admission_date: self.admission_date,
            graduation_date: self.graduation_date,
            graduation_year: self.graduation_year,
            address: self.address,
            mobile: self.mobile,
            phone: self.phone,
            group: self.group_name,
            status: self.status,
            alumni_position: self.alumni_position,
            memo: self.memo,
            is_matched: self.is_matched,
            matched_user_id: self.matched_user_id,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

/// Diesel model for inserting new records
#[derive(Insertable, Debug)]
#[diesel(table_name = alumni_records)]
pub struct NewAlumniRecordModel {
    pub department: String,
    pub generation: String,
    pub name: String,
    pub admission_date: Option<String>,
    pub graduation_date: Option<String>,
    pub graduation_year: Option<i32>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub phone: Option<String>,
    pub group_name: Option<String>,
    pub status: Option<String>,
    pub alumni_position: Option<String>,
    pub memo: Option<String>,
    pub is_matched: bool,
    pub matched_user_id: Option<i32>,
}

impl From<NewAlumniRecord> for NewAlumniRecordModel {
    fn from(record: NewAlumniRecord) -> Self {
        Self {
            department: record.department,
            generation: record.generation,
            name: record.name,
            admission_date: record.admission_date,
            graduation_date: record.graduation_date,
            graduation_year: record.graduation_year,
            address: record.address,
            mobile: record.mobile,
            phone: record.phone,
            group_name: record.group,
            status: record.status,
            alumni_position: record.alumni_position,
            memo: record.memo,
            is_matched: false,
            matched_user_id: None,
        }
    }
}
