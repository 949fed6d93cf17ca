/// Domain entities for the persisted alumni directory
///
/// Records are created by the spreadsheet sync and mutated only when a portal
/// user account is linked to them.
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Persisted alumni record
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlumniRecord {
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
    pub group: Option<String>,
    pub status: Option<String>,
    pub alumni_position: Option<String>,
    pub memo: Option<String>,
    pub is_matched: bool,
    pub matched_user_id: Option<i32>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AlumniRecord {
    /// Display label used in logs, e.g. `홍길동 (12기, 경영학과)`
    pub fn label(&self) -> String {
        format!("{} ({}기, {})", self.name, self.generation, self.department)
    }
}

/// Alumni record before insertion; always starts unmatched
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewAlumniRecord {
    pub department: String,
    pub generation: String,
    pub name: String,
    pub admission_date: Option<String>,
    pub graduation_date: Option<String>,
    pub graduation_year: Option<i32>,
    pub address: Option<String>,
    pub mobile: Option<String>,
    pub phone: Option<String>,
    pub group: Option<String>,
    pub status: Option<String>,
    pub alumni_position: Option<String>,
    pub memo: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_serializes_camel_case() {
        let record = AlumniRecord {
            id: 7,
            department: "경영학과".to_string(),
            generation: "12".to_string(),
            name: "홍길동".to_string(),
            admission_date: None,
            graduation_date: None,
            graduation_year: Some(1996),
            address: None,
            mobile: Some("010-1234-5678".to_string()),
            phone: None,
            group: None,
            status: None,
            alumni_position: None,
            memo: None,
            is_matched: false,
            matched_user_id: None,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        };

        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["graduationYear"], 1996);
        assert_eq!(json["isMatched"], false);
        assert!(json["matchedUserId"].is_null());
        assert_eq!(record.label(), "홍길동 (12기, 경영학과)");
    }
}
