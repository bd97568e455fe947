//! Reconciliation of catch-all sheets into the typed Waitlist and Feedback sheets.
//!
//! Best effort and non-transactional: source rows are copied, never removed,
//! and the destination is not checked for rows moved by an earlier run.
//! Running it twice over the same source duplicates those rows.

use serde::Serialize;

use crate::error::Result;
use crate::models::{classify_row, is_blank, is_test_row, timestamp_now, Category, Classified, Record};
use crate::sheets::{ensure_sheet, SheetsApi};

/// A row (or whole sheet, when `row_index` is `None`) that could not be moved
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    pub sheet: String,
    pub row_index: Option<usize>,
    pub message: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReport {
    pub waitlist_moved: usize,
    pub feedback_moved: usize,
    pub errors: Vec<RowError>,
}

/// Sheets that hold typed records and are never used as a source
fn is_canonical(title: &str) -> bool {
    Category::ALL.iter().any(|c| c.sheet_name() == title)
}

/// Ensure the canonical sheets exist, then move every stray row into them
pub async fn organize(sheets: &dyn SheetsApi) -> Result<SyncReport> {
    for category in [Category::Waitlist, Category::Feedback] {
        ensure_sheet(sheets, category.sheet_name(), category.header()).await?;
    }

    let sources: Vec<String> = sheets
        .sheet_titles()
        .await?
        .into_iter()
        .filter(|t| !is_canonical(t))
        .collect();

    let mut report = SyncReport::default();
    let now = timestamp_now();

    for title in sources {
        let rows = match sheets.read_rows(&title).await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("Failed to read sheet '{}': {}", title, e);
                report.errors.push(RowError {
                    sheet: title.clone(),
                    row_index: None,
                    message: e.to_string(),
                });
                continue;
            }
        };

        tracing::info!("Organizing {} rows from sheet '{}'", rows.len(), title);

        for (index, row) in rows.iter().enumerate().skip(1) {
            if is_blank(row) || is_test_row(row) {
                continue;
            }

            let record = match classify_row(row, &now) {
                Ok(Classified::Waitlist(entry)) => Record::Waitlist(entry),
                Ok(Classified::Feedback(entry)) => Record::Feedback(entry),
                Err(message) => {
                    report.errors.push(RowError {
                        sheet: title.clone(),
                        row_index: Some(index),
                        message,
                    });
                    continue;
                }
            };

            let category = record.category();
            match sheets.append_row(category.sheet_name(), &record.to_row()).await {
                Ok(()) => match category {
                    Category::Waitlist => report.waitlist_moved += 1,
                    _ => report.feedback_moved += 1,
                },
                Err(e) => {
                    tracing::warn!("Failed to move row {} of '{}': {}", index, title, e);
                    report.errors.push(RowError {
                        sheet: title.clone(),
                        row_index: Some(index),
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    tracing::info!(
        "Sheet organization complete: {} waitlist, {} feedback, {} errors",
        report.waitlist_moved,
        report.feedback_moved,
        report.errors.len()
    );

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WaitlistEntry;
    use crate::sheets::{MemorySheets, SheetsError};
    use crate::store::{AppendOutcome, RecordStore, SheetStore};
    use async_trait::async_trait;
    use std::sync::Arc;
    use std::time::Duration;

    /// Workbook whose metadata reads lag, so concurrent callers see the same stale titles
    #[derive(Default)]
    struct SlowMetadata {
        inner: MemorySheets,
    }

    #[async_trait]
    impl SheetsApi for SlowMetadata {
        async fn sheet_titles(&self) -> std::result::Result<Vec<String>, SheetsError> {
            let titles = self.inner.sheet_titles().await;
            tokio::time::sleep(Duration::from_millis(50)).await;
            titles
        }

        async fn add_sheet(&self, title: &str) -> std::result::Result<(), SheetsError> {
            self.inner.add_sheet(title).await
        }

        async fn write_header(
            &self,
            title: &str,
            row: &[String],
        ) -> std::result::Result<(), SheetsError> {
            self.inner.write_header(title, row).await
        }

        async fn append_row(
            &self,
            title: &str,
            row: &[String],
        ) -> std::result::Result<(), SheetsError> {
            self.inner.append_row(title, row).await
        }

        async fn read_rows(&self, title: &str) -> std::result::Result<Vec<Vec<String>>, SheetsError> {
            self.inner.read_rows(title).await
        }
    }

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    fn seeded() -> MemorySheets {
        let sheets = MemorySheets::new();
        sheets.insert_sheet(
            "Sheet1",
            vec![
                row(&["Email", "Type", "Data"]),
                row(&["TEST", "connectivity"]),
                row(&["a@b.com", "2024-01-01T00:00:00.000Z"]),
                row(&["c@d.com", "Very helpful", "2024-01-02T00:00:00.000Z"]),
                row(&["e@f.com", "waitlist", "2024-01-03T00:00:00.000Z"]),
                row(&["g@h.com", "feedback", "Kind staff", "2024-01-04T00:00:00.000Z"]),
                row(&["", "orphan"]),
                row(&[]),
            ],
        );
        sheets
    }

    #[tokio::test]
    async fn test_creates_canonical_sheets() {
        let sheets = MemorySheets::new();
        let report = organize(&sheets).await.unwrap();

        assert_eq!(report, SyncReport::default());
        assert_eq!(sheets.rows("Waitlist").unwrap(), vec![row(&["Email", "Timestamp"])]);
        assert_eq!(
            sheets.rows("Feedback").unwrap(),
            vec![row(&["Email", "Feedback", "Timestamp"])]
        );
    }

    #[tokio::test]
    async fn test_moves_and_classifies_rows() {
        let sheets = seeded();
        let report = organize(&sheets).await.unwrap();

        assert_eq!(report.waitlist_moved, 2);
        assert_eq!(report.feedback_moved, 2);
        assert_eq!(
            report.errors,
            vec![RowError {
                sheet: "Sheet1".to_string(),
                row_index: Some(6),
                message: "missing email in first column".to_string(),
            }]
        );

        let waitlist = sheets.rows("Waitlist").unwrap();
        assert_eq!(waitlist[1], row(&["a@b.com", "2024-01-01T00:00:00.000Z"]));
        assert_eq!(waitlist[2], row(&["e@f.com", "2024-01-03T00:00:00.000Z"]));

        let feedback = sheets.rows("Feedback").unwrap();
        assert_eq!(feedback[1], row(&["c@d.com", "Very helpful", "2024-01-02T00:00:00.000Z"]));
        assert_eq!(feedback[2], row(&["g@h.com", "Kind staff", "2024-01-04T00:00:00.000Z"]));

        // Source rows are left in place
        assert_eq!(sheets.rows("Sheet1").unwrap().len(), 8);
    }

    #[tokio::test]
    async fn test_second_run_duplicates_moved_rows() {
        let sheets = seeded();

        let first = organize(&sheets).await.unwrap();
        let second = organize(&sheets).await.unwrap();

        assert_eq!(second.waitlist_moved, first.waitlist_moved);
        assert_eq!(second.feedback_moved, first.feedback_moved);

        // Header plus every moved row, twice over
        let waitlist = sheets.rows("Waitlist").unwrap();
        assert_eq!(waitlist.len(), 1 + 2 * first.waitlist_moved);
        assert_eq!(waitlist[1], waitlist[3]);
        assert_eq!(
            sheets.rows("Feedback").unwrap().len(),
            1 + 2 * first.feedback_moved
        );
    }

    #[tokio::test]
    async fn test_canonical_sheets_are_not_sources() {
        let sheets = MemorySheets::new();
        sheets.insert_sheet(
            "Waitlist",
            vec![row(&["Email", "Timestamp"]), row(&["a@b.com", "2024"])],
        );
        sheets.insert_sheet(
            "Onboarding",
            vec![row(&["First Name"]), row(&["Ada", "Lovelace", "ada@example.com"])],
        );

        let report = organize(&sheets).await.unwrap();
        assert_eq!(report.waitlist_moved, 0);
        assert_eq!(report.feedback_moved, 0);
        assert_eq!(sheets.rows("Waitlist").unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_concurrent_runs_both_create_sheets() {
        let sheets = SlowMetadata::default();

        let (a, b) = tokio::join!(organize(&sheets), organize(&sheets));
        assert_eq!(a.unwrap(), SyncReport::default());
        assert_eq!(b.unwrap(), SyncReport::default());

        assert_eq!(
            sheets.inner.rows("Waitlist").unwrap(),
            vec![row(&["Email", "Timestamp"])]
        );
        assert_eq!(
            sheets.inner.rows("Feedback").unwrap(),
            vec![row(&["Email", "Feedback", "Timestamp"])]
        );
    }

    #[tokio::test]
    async fn test_run_alongside_first_submission() {
        let sheets = Arc::new(SlowMetadata::default());
        let store = SheetStore::new(sheets.clone());
        let entry = Record::Waitlist(WaitlistEntry {
            email: "a@b.com".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        });

        let (report, outcome) = tokio::join!(organize(sheets.as_ref()), store.insert(entry.clone()));
        assert_eq!(report.unwrap(), SyncReport::default());
        assert_eq!(outcome.unwrap(), AppendOutcome::Appended(entry));

        assert_eq!(
            sheets.inner.rows("Waitlist").unwrap(),
            vec![
                row(&["Email", "Timestamp"]),
                row(&["a@b.com", "2024-01-01T00:00:00.000Z"]),
            ]
        );
    }

    #[test]
    fn test_report_serializes_camel_case() {
        let report = SyncReport {
            waitlist_moved: 1,
            feedback_moved: 2,
            errors: vec![RowError {
                sheet: "Sheet1".to_string(),
                row_index: Some(3),
                message: "missing feedback text".to_string(),
            }],
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["waitlistMoved"], 1);
        assert_eq!(json["feedbackMoved"], 2);
        assert_eq!(json["errors"][0]["rowIndex"], 3);
    }
}
