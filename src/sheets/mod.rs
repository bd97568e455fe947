//! Spreadsheet API seam.
//!
//! `SheetsApi` covers the five calls the service needs: sheet metadata,
//! adding a sheet, writing a row at the top of a sheet, appending a row and
//! reading every row. `GoogleSheetsClient` talks to the real API and
//! `MemorySheets` keeps a workbook in process.

pub mod auth;
pub mod client;
pub mod memory;

pub use auth::{normalize_private_key, ServiceAccount};
pub use client::GoogleSheetsClient;
pub use memory::MemorySheets;

use async_trait::async_trait;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API returned {status}: {body}")]
    Api { status: u16, body: String },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid service account credentials: {0}")]
    Credentials(String),

    #[error("invalid API URL: {0}")]
    Url(String),

    #[error("sheet not found: {0}")]
    SheetNotFound(String),

    #[error("sheet already exists: {0}")]
    SheetExists(String),
}

#[async_trait]
pub trait SheetsApi: Send + Sync {
    /// Titles of every sheet in the spreadsheet, in tab order
    async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError>;

    /// Add an empty sheet
    async fn add_sheet(&self, title: &str) -> Result<(), SheetsError>;

    /// Overwrite the first row of a sheet
    async fn write_header(&self, title: &str, row: &[String]) -> Result<(), SheetsError>;

    /// Append a row after the last non-empty row
    async fn append_row(&self, title: &str, row: &[String]) -> Result<(), SheetsError>;

    /// Every row of a sheet, header included; trailing empty cells may be omitted
    async fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, SheetsError>;
}

/// Create `title` with `header` as its first row if the sheet is missing
///
/// Returns `true` when this call added the sheet. Another writer may add the
/// same sheet between the metadata read and `add_sheet`; that counts as
/// present, and the header is written only if row 0 is still empty.
pub async fn ensure_sheet(
    sheets: &dyn SheetsApi,
    title: &str,
    header: &[&str],
) -> Result<bool, SheetsError> {
    let titles = sheets.sheet_titles().await?;
    if titles.iter().any(|t| t == title) {
        return Ok(false);
    }

    let header: Vec<String> = header.iter().map(|h| h.to_string()).collect();

    tracing::info!("Creating sheet '{}'", title);
    match sheets.add_sheet(title).await {
        Ok(()) => {
            sheets.write_header(title, &header).await?;
            Ok(true)
        }
        Err(SheetsError::SheetExists(_)) => {
            tracing::debug!("Sheet '{}' was created concurrently", title);
            let rows = sheets.read_rows(title).await?;
            let has_header = rows
                .first()
                .is_some_and(|first| first.iter().any(|cell| !cell.is_empty()));
            if !has_header {
                sheets.write_header(title, &header).await?;
            }
            Ok(false)
        }
        Err(e) => Err(e),
    }
}
