//! Append-only record persistence.
//!
//! `RecordStore` is implemented by `FileStore` (one JSON file per category)
//! and `SheetStore` (one sheet per category). Both guard each category with a
//! read/write lock: appends hold it exclusively across the whole
//! read-check-write, listings share it.

pub mod file;
pub mod sheet;

pub use file::FileStore;
pub use sheet::SheetStore;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::Result;
use crate::models::{timestamp_now, Category, Record, Submission};

/// Result of an append that did not fail outright
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    Appended(Record),
    /// The waitlist already holds this email; nothing was written
    Duplicate,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Short backend name for logs and stats
    fn backend(&self) -> &'static str;

    /// Append a validated, timestamped record, creating its table on first use
    async fn insert(&self, record: Record) -> Result<AppendOutcome>;

    /// Every record of a category; empty when the table does not exist yet
    async fn list_all(&self, category: Category) -> Result<Vec<Record>>;

    async fn table_exists(&self, category: Category) -> Result<bool>;

    /// Cheap check that the backing storage is reachable
    async fn ping(&self) -> Result<()>;
}

/// Validate a submission, assign its timestamp and append it
pub async fn append(store: &dyn RecordStore, submission: Submission) -> Result<AppendOutcome> {
    let category = submission.category();
    let record = submission.into_record(timestamp_now())?;

    let outcome = store.insert(record).await?;
    match &outcome {
        AppendOutcome::Appended(record) => {
            tracing::info!("Appended {} record for {}", category, record.email())
        }
        AppendOutcome::Duplicate => {
            tracing::info!("Rejected duplicate {} submission", category)
        }
    }
    Ok(outcome)
}

/// Whether `record` collides with an existing row
///
/// Only the waitlist is unique, by exact email equality.
pub fn is_duplicate(existing: &[Record], record: &Record) -> bool {
    record.category() == Category::Waitlist
        && existing
            .iter()
            .any(|r| r.category() == Category::Waitlist && r.email() == record.email())
}

/// One read/write lock per category
#[derive(Debug, Default)]
pub struct CategoryLocks {
    locks: [RwLock<()>; 3],
}

impl CategoryLocks {
    pub fn get(&self, category: Category) -> &RwLock<()> {
        &self.locks[category.index()]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FeedbackEntry, WaitlistEntry};

    fn waitlist(email: &str) -> Record {
        Record::Waitlist(WaitlistEntry {
            email: email.to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        })
    }

    #[test]
    fn test_is_duplicate_waitlist_only() {
        let existing = vec![waitlist("a@b.com")];
        assert!(is_duplicate(&existing, &waitlist("a@b.com")));
        assert!(!is_duplicate(&existing, &waitlist("c@d.com")));

        let feedback = Record::Feedback(FeedbackEntry {
            email: "a@b.com".to_string(),
            feedback: "Again!".to_string(),
            timestamp: "2024-01-01T00:00:00.000Z".to_string(),
        });
        assert!(!is_duplicate(&[feedback.clone()], &feedback));
    }

    #[test]
    fn test_is_duplicate_is_exact_match() {
        let existing = vec![waitlist("a@b.com")];
        assert!(!is_duplicate(&existing, &waitlist("A@b.com")));
    }
}
