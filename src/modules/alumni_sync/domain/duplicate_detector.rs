/// Duplicate detection over validated spreadsheet rows
///
/// Two independent checks:
/// - rows sharing a mobile number, which breaks the natural key
/// - rows sharing name and generation, reported for review only
use super::entities::IncomingAlumni;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Identity used to compare rows.
///
/// Mobile is preferred. Name plus generation is the fallback when a row has
/// no mobile, and is not unique: two different people can share it.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DedupKey {
    Mobile { mobile: String },
    NameGeneration { name: String, generation: String },
}

impl DedupKey {
    pub fn for_record(record: &IncomingAlumni) -> Self {
        match record.mobile.as_deref().map(str::trim).filter(|m| !m.is_empty()) {
            Some(mobile) => DedupKey::Mobile {
                mobile: mobile.to_string(),
            },
            None => Self::name_generation(record),
        }
    }

    pub fn name_generation(record: &IncomingAlumni) -> Self {
        DedupKey::NameGeneration {
            name: record.name.trim().to_string(),
            generation: record.generation.trim().to_string(),
        }
    }

    pub fn is_unique(&self) -> bool {
        matches!(self, DedupKey::Mobile { .. })
    }
}

impl fmt::Display for DedupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DedupKey::Mobile { mobile } => write!(f, "mobile {}", mobile),
            DedupKey::NameGeneration { name, generation } => {
                write!(f, "{} ({}기)", name, generation)
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateGroup {
    pub key: DedupKey,
    pub count: usize,
    pub row_numbers: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DuplicateReport {
    pub mobile_duplicates: Vec<DuplicateGroup>,
    pub name_duplicates: Vec<DuplicateGroup>,
}

impl DuplicateReport {
    /// Only shared mobiles are integrity problems
    pub fn has_integrity_issues(&self) -> bool {
        !self.mobile_duplicates.is_empty()
    }

    pub fn is_empty(&self) -> bool {
        self.mobile_duplicates.is_empty() && self.name_duplicates.is_empty()
    }
}

pub fn detect(records: &[IncomingAlumni]) -> DuplicateReport {
    let by_mobile = group_by(
        records
            .iter()
            .map(|r| (DedupKey::for_record(r), r.row_number))
            .filter(|(key, _)| key.is_unique()),
    );

    let by_name = group_by(
        records
            .iter()
            .map(|r| (DedupKey::name_generation(r), r.row_number)),
    );

    DuplicateReport {
        mobile_duplicates: by_mobile,
        name_duplicates: by_name,
    }
}

fn group_by(entries: impl Iterator<Item = (DedupKey, usize)>) -> Vec<DuplicateGroup> {
    let mut groups: BTreeMap<DedupKey, Vec<usize>> = BTreeMap::new();
    for (key, row_number) in entries {
        groups.entry(key).or_default().push(row_number);
    }

    groups
        .into_iter()
        .filter(|(_, rows)| rows.len() > 1)
        .map(|(key, row_numbers)| DuplicateGroup {
            key,
            count: row_numbers.len(),
            row_numbers,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alumni(row_number: usize, name: &str, generation: &str, mobile: Option<&str>) -> IncomingAlumni {
        IncomingAlumni {
            row_number,
            department: "경영학과".to_string(),
            generation: generation.to_string(),
            name: name.to_string(),
            mobile: mobile.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn test_shared_mobile_is_integrity_issue() {
        let records = vec![
            alumni(2, "홍길동", "12", Some("010-1111-2222")),
            alumni(3, "홍길순", "14", Some("010-1111-2222")),
            alumni(4, "김철수", "12", Some("010-3333-4444")),
        ];

        let report = detect(&records);

        assert!(report.has_integrity_issues());
        assert_eq!(report.mobile_duplicates.len(), 1);
        assert_eq!(report.mobile_duplicates[0].count, 2);
        assert_eq!(report.mobile_duplicates[0].row_numbers, vec![2, 3]);
        assert!(report.name_duplicates.is_empty());
    }

    #[test]
    fn test_same_name_and_generation_is_informational() {
        let records = vec![
            alumni(2, "이영희", "7", Some("010-1000-0001")),
            alumni(5, "이영희", "7", Some("010-1000-0002")),
        ];

        let report = detect(&records);

        assert!(!report.has_integrity_issues());
        assert_eq!(report.name_duplicates.len(), 1);
        assert_eq!(
            report.name_duplicates[0].key,
            DedupKey::NameGeneration {
                name: "이영희".to_string(),
                generation: "7".to_string()
            }
        );
    }

    #[test]
    fn test_key_falls_back_to_name_generation_without_mobile() {
        let with_mobile = alumni(2, "홍길동", "12", Some(" 010-1111-2222 "));
        let without_mobile = alumni(3, "홍길동", "12", Some("  "));

        let key = DedupKey::for_record(&with_mobile);
        assert!(key.is_unique());
        assert_eq!(key.to_string(), "mobile 010-1111-2222");

        let fallback = DedupKey::for_record(&without_mobile);
        assert!(!fallback.is_unique());
        assert_eq!(fallback.to_string(), "홍길동 (12기)");
    }

    #[test]
    fn test_rows_without_mobile_never_form_mobile_groups() {
        let records = vec![
            alumni(2, "박지성", "21", None),
            alumni(3, "박지성", "21", None),
        ];

        let report = detect(&records);

        assert!(report.mobile_duplicates.is_empty());
        assert_eq!(report.name_duplicates[0].row_numbers, vec![2, 3]);
    }

    #[test]
    fn test_groups_are_sorted_by_key() {
        let records = vec![
            alumni(2, "하", "1", Some("010-9")),
            alumni(3, "하", "1", Some("010-9")),
            alumni(4, "가", "1", Some("010-1")),
            alumni(5, "가", "1", Some("010-1")),
        ];

        let report = detect(&records);
        let mobiles: Vec<String> = report
            .mobile_duplicates
            .iter()
            .map(|g| g.key.to_string())
            .collect();

        assert_eq!(mobiles, vec!["mobile 010-1", "mobile 010-9"]);
        assert_eq!(report.name_duplicates[0].key.to_string(), "가 (1기)");
    }
}
