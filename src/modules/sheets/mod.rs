/// Spreadsheet fetcher
///
/// - Domain: the `SpreadsheetSource` trait
/// - Infrastructure: Google Sheets v4 REST client with rate limiting and retries,
///   authenticated by service account, bearer token or API key
pub mod domain;
pub mod infrastructure;

pub use domain::{SheetRow, SpreadsheetSource};
pub use infrastructure::GoogleSheetsClient;
