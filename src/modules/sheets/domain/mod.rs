/// Spreadsheet source abstraction
///
/// A source yields the raw rows of one rectangular range. Rows are ordered
/// lists of cell text; short rows are allowed (trailing empty cells are
/// omitted by the Sheets API).
use crate::shared::errors::AppResult;
use async_trait::async_trait;

pub type SheetRow = Vec<String>;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SpreadsheetSource: Send + Sync {
    /// Verify the spreadsheet is reachable; returns its title.
    ///
    /// Fails with `AppError::SourceUnavailable` when unconfigured or unreachable.
    async fn check_connection(&self) -> AppResult<String>;

    /// Fetch every row of the configured range, header row included
    async fn fetch_rows(&self) -> AppResult<Vec<SheetRow>>;
}
