/// Entities produced while reconciling the spreadsheet with the directory
use crate::modules::alumni::domain::NewAlumniRecord;
use serde::{Deserialize, Serialize};

/// A spreadsheet row that passed validation
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncomingAlumni {
    /// 1-based row number in the sheet, header included
    pub row_number: usize,
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

impl IncomingAlumni {
    pub fn label(&self) -> String {
        format!("{} ({}기, {})", self.name, self.generation, self.department)
    }

    pub fn to_new_record(&self) -> NewAlumniRecord {
        NewAlumniRecord {
            department: self.department.clone(),
            generation: self.generation.clone(),
            name: self.name.clone(),
            admission_date: self.admission_date.clone(),
            graduation_date: self.graduation_date.clone(),
            graduation_year: self.graduation_year,
            address: self.address.clone(),
            mobile: self.mobile.clone(),
            phone: self.phone.clone(),
            group: self.group.clone(),
            status: self.status.clone(),
            alumni_position: self.alumni_position.clone(),
            memo: self.memo.clone(),
        }
    }
}

/// Counters reported by one sync run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    /// Validated records that carry a mobile number
    pub total: usize,
    /// Newly inserted
    pub synced: usize,
    /// Missing mobile plus per-record storage failures
    pub errors: usize,
    /// Already persisted, left untouched
    pub existing: usize,
    pub missing_mobile: usize,
}

/// Result of a connectivity check
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionReport {
    pub connected: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sample_count: Option<usize>,
}

impl ConnectionReport {
    pub fn connected(title: &str, sample_count: usize) -> Self {
        Self {
            connected: true,
            message: format!(
                "Connected to '{}': {} valid alumni rows",
                title, sample_count
            ),
            sample_count: Some(sample_count),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            connected: false,
            message: message.into(),
            sample_count: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_serialize_camel_case() {
        let stats = SyncStats {
            total: 10,
            synced: 7,
            errors: 1,
            existing: 3,
            missing_mobile: 1,
        };

        let json = serde_json::to_value(stats).unwrap();
        assert_eq!(json["missingMobile"], 1);
        assert_eq!(json["synced"], 7);
    }

    #[test]
    fn test_failed_report_omits_sample_count() {
        let json = serde_json::to_value(ConnectionReport::failed("offline")).unwrap();
        assert_eq!(json["connected"], false);
        assert!(json.get("sampleCount").is_none());
    }

    #[test]
    fn test_new_record_copies_fields() {
        let incoming = IncomingAlumni {
            row_number: 4,
            department: "법학과".to_string(),
            generation: "3".to_string(),
            name: "최수정".to_string(),
            mobile: Some("010-2222-3333".to_string()),
            graduation_year: Some(1987),
            ..Default::default()
        };

        let record = incoming.to_new_record();
        assert_eq!(record.name, "최수정");
        assert_eq!(record.mobile.as_deref(), Some("010-2222-3333"));
        assert_eq!(record.graduation_year, Some(1987));
    }
}
