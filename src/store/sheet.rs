use async_trait::async_trait;
use std::sync::Arc;

use super::{is_duplicate, AppendOutcome, CategoryLocks, RecordStore};
use crate::error::Result;
use crate::models::{Category, Record};
use crate::sheets::{ensure_sheet, SheetsApi};

/// Record store keeping one sheet per category in a spreadsheet
///
/// Row 0 of every sheet is the header from `Category::header`.
pub struct SheetStore {
    sheets: Arc<dyn SheetsApi>,
    locks: CategoryLocks,
}

impl SheetStore {
    pub fn new(sheets: Arc<dyn SheetsApi>) -> Self {
        Self {
            sheets,
            locks: CategoryLocks::default(),
        }
    }

    async fn has_sheet(&self, category: Category) -> Result<bool> {
        let titles = self.sheets.sheet_titles().await?;
        Ok(titles.iter().any(|t| t == category.sheet_name()))
    }

    async fn read_records(&self, category: Category) -> Result<Vec<Record>> {
        let rows = self.sheets.read_rows(category.sheet_name()).await?;
        Ok(rows
            .iter()
            .skip(1)
            .filter_map(|row| Record::from_row(category, row))
            .collect())
    }
}

#[async_trait]
impl RecordStore for SheetStore {
    fn backend(&self) -> &'static str {
        "sheets"
    }

    async fn insert(&self, record: Record) -> Result<AppendOutcome> {
        let category = record.category();
        let _guard = self.locks.get(category).write().await;

        ensure_sheet(self.sheets.as_ref(), category.sheet_name(), category.header()).await?;

        if category == Category::Waitlist {
            let existing = self.read_records(category).await?;
            if is_duplicate(&existing, &record) {
                return Ok(AppendOutcome::Duplicate);
            }
        }

        self.sheets
            .append_row(category.sheet_name(), &record.to_row())
            .await?;
        Ok(AppendOutcome::Appended(record))
    }

    async fn list_all(&self, category: Category) -> Result<Vec<Record>> {
        let _guard = self.locks.get(category).read().await;
        if !self.has_sheet(category).await? {
            return Ok(Vec::new());
        }
        self.read_records(category).await
    }

    async fn table_exists(&self, category: Category) -> Result<bool> {
        self.has_sheet(category).await
    }

    async fn ping(&self) -> Result<()> {
        self.sheets.sheet_titles().await?;
        Ok(())
    }
}
