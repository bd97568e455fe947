use async_trait::async_trait;
use std::sync::{Mutex, MutexGuard, PoisonError};

use super::{SheetsApi, SheetsError};

/// In-process workbook for local development and tests
#[derive(Debug, Default)]
pub struct MemorySheets {
    sheets: Mutex<Vec<(String, Vec<Vec<String>>)>>,
}

impl MemorySheets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add (or replace) a sheet with the given rows
    pub fn insert_sheet(&self, title: &str, rows: Vec<Vec<String>>) {
        let mut sheets = self.lock();
        match sheets.iter_mut().find(|(t, _)| t == title) {
            Some((_, existing)) => *existing = rows,
            None => sheets.push((title.to_string(), rows)),
        }
    }

    /// Snapshot of a sheet's rows, or `None` if it does not exist
    pub fn rows(&self, title: &str) -> Option<Vec<Vec<String>>> {
        self.lock()
            .iter()
            .find(|(t, _)| t == title)
            .map(|(_, rows)| rows.clone())
    }

    fn lock(&self) -> MutexGuard<'_, Vec<(String, Vec<Vec<String>>)>> {
        self.sheets.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl SheetsApi for MemorySheets {
    async fn sheet_titles(&self) -> Result<Vec<String>, SheetsError> {
        Ok(self.lock().iter().map(|(t, _)| t.clone()).collect())
    }

    async fn add_sheet(&self, title: &str) -> Result<(), SheetsError> {
        let mut sheets = self.lock();
        if sheets.iter().any(|(t, _)| t == title) {
            return Err(SheetsError::SheetExists(title.to_string()));
        }
        sheets.push((title.to_string(), Vec::new()));
        Ok(())
    }

    async fn write_header(&self, title: &str, row: &[String]) -> Result<(), SheetsError> {
        let mut sheets = self.lock();
        let (_, rows) = sheets
            .iter_mut()
            .find(|(t, _)| t == title)
            .ok_or_else(|| SheetsError::SheetNotFound(title.to_string()))?;
        match rows.first_mut() {
            Some(first) => *first = row.to_vec(),
            None => rows.push(row.to_vec()),
        }
        Ok(())
    }

    async fn append_row(&self, title: &str, row: &[String]) -> Result<(), SheetsError> {
        let mut sheets = self.lock();
        let (_, rows) = sheets
            .iter_mut()
            .find(|(t, _)| t == title)
            .ok_or_else(|| SheetsError::SheetNotFound(title.to_string()))?;
        rows.push(row.to_vec());
        Ok(())
    }

    async fn read_rows(&self, title: &str) -> Result<Vec<Vec<String>>, SheetsError> {
        self.rows(title)
            .ok_or_else(|| SheetsError::SheetNotFound(title.to_string()))
    }
}
