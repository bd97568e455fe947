use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::{is_duplicate, AppendOutcome, CategoryLocks, RecordStore};
use crate::error::Result;
use crate::models::{Category, Record};

/// Record store keeping one pretty-printed JSON array per category
///
/// Tables live at `<dir>/<category>.json`. A write replaces the whole file
/// through a temporary sibling and a rename.
#[derive(Debug)]
pub struct FileStore {
    dir: PathBuf,
    locks: CategoryLocks,
}

impl FileStore {
    /// Open a store rooted at `dir`, creating the directory if needed
    pub async fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        tracing::info!("Opening file store at: {:?}", dir);
        tokio::fs::create_dir_all(&dir).await?;

        Ok(Self {
            dir,
            locks: CategoryLocks::default(),
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn table_path(&self, category: Category) -> PathBuf {
        self.dir.join(category.file_name())
    }

    /// Read a table without locking; `None` when the file does not exist
    async fn read_table(&self, category: Category) -> Result<Option<Vec<Record>>> {
        let contents = match tokio::fs::read_to_string(self.table_path(category)).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(Some(Vec::new()));
        }
        Ok(Some(Record::parse_table(category, &contents)?))
    }

    async fn write_table(&self, category: Category, records: &[Record]) -> Result<()> {
        let path = self.table_path(category);
        let tmp = path.with_extension("json.tmp");

        let json = serde_json::to_string_pretty(records)?;
        tokio::fs::write(&tmp, json).await?;
        tokio::fs::rename(&tmp, &path).await?;
        Ok(())
    }
}

#[async_trait]
impl RecordStore for FileStore {
    fn backend(&self) -> &'static str {
        "file"
    }

    async fn insert(&self, record: Record) -> Result<AppendOutcome> {
        let category = record.category();
        let _guard = self.locks.get(category).write().await;

        let mut records = self.read_table(category).await?.unwrap_or_default();
        if is_duplicate(&records, &record) {
            return Ok(AppendOutcome::Duplicate);
        }

        records.push(record.clone());
        self.write_table(category, &records).await?;
        Ok(AppendOutcome::Appended(record))
    }

    async fn list_all(&self, category: Category) -> Result<Vec<Record>> {
        let _guard = self.locks.get(category).read().await;
        Ok(self.read_table(category).await?.unwrap_or_default())
    }

    async fn table_exists(&self, category: Category) -> Result<bool> {
        let _guard = self.locks.get(category).read().await;
        Ok(tokio::fs::try_exists(self.table_path(category)).await?)
    }

    async fn ping(&self) -> Result<()> {
        tokio::fs::create_dir_all(&self.dir).await?;
        Ok(())
    }
}
