/// Test data factories using builder pattern
///
/// Builds spreadsheet rows the way the Sheets API returns them: a header row
/// followed by ragged data rows.
use alumni_lib::modules::alumni::NewAlumniRecord;
use alumni_lib::modules::sheets::SheetRow;

pub const HEADER: [&str; 12] = [
    "학과", "기수", "성명", "입학일자", "졸업일자", "주소", "핸드폰번호", "전화번호", "그룹",
    "상태", "동문회직책", "메모",
];

pub fn row(cells: &[&str]) -> SheetRow {
    cells.iter().map(|c| c.to_string()).collect()
}

pub fn mobile_for(index: usize) -> String {
    format!("010-{:04}-{:04}", index / 10_000, index % 10_000)
}

pub struct AlumniRowFactory {
    department: String,
    generation: String,
    name: String,
    graduation_date: String,
    mobile: String,
    memo: String,
}

impl AlumniRowFactory {
    pub fn new(index: usize) -> Self {
        Self {
            department: "경영학과".to_string(),
            generation: format!("{}", index % 40 + 1),
            name: format!("동문{}", index),
            graduation_date: String::new(),
            mobile: mobile_for(index),
            memo: String::new(),
        }
    }

    pub fn department(mut self, department: &str) -> Self {
        self.department = department.to_string();
        self
    }

    pub fn generation(mut self, generation: &str) -> Self {
        self.generation = generation.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn graduation_date(mut self, date: &str) -> Self {
        self.graduation_date = date.to_string();
        self
    }

    pub fn mobile(mut self, mobile: &str) -> Self {
        self.mobile = mobile.to_string();
        self
    }

    pub fn memo(mut self, memo: &str) -> Self {
        self.memo = memo.to_string();
        self
    }

    /// Cells in the standard column order; trailing blanks are dropped like the API does
    pub fn build(self) -> SheetRow {
        let mut cells = vec![
            self.department,
            self.generation,
            self.name,
            String::new(),
            self.graduation_date,
            String::new(),
            self.mobile,
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            self.memo,
        ];
        while cells.last().is_some_and(|c| c.is_empty()) {
            cells.pop();
        }
        cells
    }
}

/// Header plus `count` valid rows with distinct mobiles
pub fn sheet_with(count: usize) -> Vec<SheetRow> {
    let mut rows = vec![row(&HEADER)];
    rows.extend((0..count).map(|i| AlumniRowFactory::new(i).build()));
    rows
}

pub fn new_record(name: &str, generation: &str, mobile: Option<&str>) -> NewAlumniRecord {
    NewAlumniRecord {
        department: "경영학과".to_string(),
        generation: generation.to_string(),
        name: name.to_string(),
        mobile: mobile.map(str::to_string),
        ..Default::default()
    }
}
