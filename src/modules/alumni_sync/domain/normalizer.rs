/// Spreadsheet row validation and normalization
///
/// Columns are resolved from the header row by label, so reordering columns
/// in the sheet does not shift fields. When the header cannot be read the
/// fixed column order below is assumed.
use super::entities::IncomingAlumni;
use crate::modules::sheets::SheetRow;
use crate::shared::errors::{AppError, AppResult};
use crate::{log_debug, log_info, log_warn};
use regex::Regex;

/// Skipped rows beyond this are counted but not logged individually
const MAX_LOGGED_SKIPS: usize = 10;
/// Generations above this are treated as typos, not cohorts
const MAX_GENERATION: i32 = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlumniField {
    Department,
    Generation,
    Name,
    AdmissionDate,
    GraduationDate,
    Address,
    Mobile,
    Phone,
    Group,
    Status,
    AlumniPosition,
    Memo,
}

impl AlumniField {
    /// Positional column order of the association's sheet
    pub const ALL: [AlumniField; 12] = [
        AlumniField::Department,
        AlumniField::Generation,
        AlumniField::Name,
        AlumniField::AdmissionDate,
        AlumniField::GraduationDate,
        AlumniField::Address,
        AlumniField::Mobile,
        AlumniField::Phone,
        AlumniField::Group,
        AlumniField::Status,
        AlumniField::AlumniPosition,
        AlumniField::Memo,
    ];

    fn index(self) -> usize {
        self as usize
    }

    /// Header labels, already folded by `fold_label`
    fn aliases(self) -> &'static [&'static str] {
        match self {
            AlumniField::Department => &["학과", "department", "dept", "major"],
            AlumniField::Generation => &["기수", "generation", "cohort"],
            AlumniField::Name => &["성명", "이름", "name"],
            AlumniField::AdmissionDate => &["입학일자", "입학일", "admissiondate"],
            AlumniField::GraduationDate => &["졸업일자", "졸업일", "graduationdate"],
            AlumniField::Address => &["주소", "address"],
            AlumniField::Mobile => &["핸드폰번호", "휴대폰번호", "휴대전화", "핸드폰", "mobile", "mobilephone", "cellphone"],
            AlumniField::Phone => &["전화번호", "phone", "telephone", "tel"],
            AlumniField::Group => &["그룹", "group"],
            AlumniField::Status => &["상태", "status"],
            AlumniField::AlumniPosition => &["동문회직책", "직책", "alumniposition", "position"],
            AlumniField::Memo => &["메모", "비고", "memo", "note", "notes"],
        }
    }

    pub fn matches_label(self, label: &str) -> bool {
        let folded = fold_label(label);
        !folded.is_empty() && self.aliases().contains(&folded.as_str())
    }
}

fn fold_label(label: &str) -> String {
    label
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

/// Column index per field, resolved once per fetch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnMap {
    indices: [Option<usize>; 12],
    header: Vec<String>,
    positional: bool,
}

impl ColumnMap {
    pub fn positional(header: &[String]) -> Self {
        let mut indices = [None; 12];
        for (position, slot) in indices.iter_mut().enumerate() {
            *slot = Some(position);
        }

        Self {
            indices,
            header: header.iter().map(|h| h.trim().to_string()).collect(),
            positional: true,
        }
    }

    /// Resolve columns by label, falling back to positions if a required column is missing
    pub fn from_header(header: &[String]) -> Self {
        let mut indices = [None; 12];

        for (column, label) in header.iter().enumerate() {
            if let Some(field) = AlumniField::ALL.iter().find(|f| f.matches_label(label)) {
                // First matching column wins
                let slot = &mut indices[field.index()];
                if slot.is_none() {
                    *slot = Some(column);
                }
            }
        }

        let required = [AlumniField::Department, AlumniField::Generation, AlumniField::Name];
        if required.iter().any(|f| indices[f.index()].is_none()) {
            log_warn!(
                "Header row {:?} lacks department/generation/name labels; using fixed column order",
                header
            );
            return Self::positional(header);
        }

        Self {
            indices,
            header: header.iter().map(|h| h.trim().to_string()).collect(),
            positional: false,
        }
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn column_of(&self, field: AlumniField) -> Option<usize> {
        self.indices[field.index()]
    }

    /// Trimmed cell text; ragged rows read as empty
    fn cell<'a>(&self, row: &'a [String], field: AlumniField) -> &'a str {
        self.column_of(field)
            .and_then(|column| row.get(column))
            .map(|value| value.trim())
            .unwrap_or("")
    }

    fn optional(&self, row: &[String], field: AlumniField) -> Option<String> {
        let value = self.cell(row, field);
        (!value.is_empty()).then(|| value.to_string())
    }

    fn header_text(&self, field: AlumniField) -> Option<&str> {
        self.column_of(field)
            .and_then(|column| self.header.get(column))
            .map(String::as_str)
            .filter(|text| !text.is_empty())
    }

    /// A repeated header row inside the data
    fn is_stray_header(&self, row: &[String]) -> bool {
        [AlumniField::Department, AlumniField::Name]
            .iter()
            .any(|&field| {
                let value = self.cell(row, field);
                !value.is_empty()
                    && (self.header_text(field) == Some(value) || field.matches_label(value))
            })
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct NormalizationOutcome {
    pub records: Vec<IncomingAlumni>,
    /// Rows missing department, generation or name
    pub skipped: usize,
    pub stray_headers: usize,
    /// Data rows seen, header excluded
    pub raw_rows: usize,
}

pub struct RecordNormalizer {
    base_year: i32,
    year_pattern: Regex,
}

impl RecordNormalizer {
    pub fn new(base_year: i32) -> AppResult<Self> {
        let year_pattern = Regex::new(r"\d{4}")
            .map_err(|e| AppError::InternalError(format!("Invalid year pattern: {}", e)))?;

        Ok(Self {
            base_year,
            year_pattern,
        })
    }

    pub fn normalize(&self, rows: &[SheetRow]) -> NormalizationOutcome {
        let Some((header, data)) = rows.split_first() else {
            return NormalizationOutcome::default();
        };

        let columns = ColumnMap::from_header(header);
        log_debug!(
            "Columns resolved by {}",
            if columns.is_positional() { "fixed order" } else { "header labels" }
        );
        let mut outcome = NormalizationOutcome {
            raw_rows: data.len(),
            ..Default::default()
        };

        for (offset, row) in data.iter().enumerate() {
            // Sheet rows are 1-based and the header is row 1
            let row_number = offset + 2;

            if columns.is_stray_header(row) {
                log_debug!("Row {}: repeated header row skipped", row_number);
                outcome.stray_headers += 1;
                continue;
            }

            match self.normalize_row(&columns, row, row_number) {
                Some(record) => outcome.records.push(record),
                None => {
                    outcome.skipped += 1;
                    if outcome.skipped <= MAX_LOGGED_SKIPS {
                        log_warn!(
                            "Row {} skipped: department/generation/name required (학과='{}', 기수='{}', 성명='{}')",
                            row_number,
                            columns.cell(row, AlumniField::Department),
                            columns.cell(row, AlumniField::Generation),
                            columns.cell(row, AlumniField::Name)
                        );
                    }
                }
            }
        }

        if outcome.skipped > MAX_LOGGED_SKIPS {
            log_warn!(
                "{} more invalid rows not logged",
                outcome.skipped - MAX_LOGGED_SKIPS
            );
        }

        log_info!(
            "Normalized {} of {} rows ({} invalid, {} repeated headers)",
            outcome.records.len(),
            outcome.raw_rows,
            outcome.skipped,
            outcome.stray_headers
        );

        outcome
    }

    fn normalize_row(
        &self,
        columns: &ColumnMap,
        row: &[String],
        row_number: usize,
    ) -> Option<IncomingAlumni> {
        let department = columns.cell(row, AlumniField::Department);
        let generation = columns.cell(row, AlumniField::Generation);
        let name = columns.cell(row, AlumniField::Name);

        if department.is_empty() || generation.is_empty() || name.is_empty() {
            return None;
        }

        let graduation_date = columns.optional(row, AlumniField::GraduationDate);
        let graduation_year = self.graduation_year(graduation_date.as_deref(), generation);

        Some(IncomingAlumni {
            row_number,
            department: department.to_string(),
            generation: generation.to_string(),
            name: name.to_string(),
            admission_date: columns.optional(row, AlumniField::AdmissionDate),
            graduation_date,
            graduation_year,
            address: columns.optional(row, AlumniField::Address),
            mobile: columns.optional(row, AlumniField::Mobile),
            phone: columns.optional(row, AlumniField::Phone),
            group: columns.optional(row, AlumniField::Group),
            status: columns.optional(row, AlumniField::Status),
            alumni_position: columns.optional(row, AlumniField::AlumniPosition),
            memo: columns.optional(row, AlumniField::Memo),
        })
    }

    /// Year from the graduation date, else derived from a numeric generation
    pub fn graduation_year(&self, graduation_date: Option<&str>, generation: &str) -> Option<i32> {
        let from_date = graduation_date
            .and_then(|date| self.year_pattern.find(date))
            .and_then(|m| m.as_str().parse::<i32>().ok());

        from_date.or_else(|| {
            generation
                .trim()
                .trim_end_matches('기')
                .trim()
                .parse::<i32>()
                .ok()
                .filter(|n| (1..=MAX_GENERATION).contains(n))
                .and_then(|n| self.base_year.checked_add(n))
        })
    }
}
