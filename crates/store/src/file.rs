use crate::{Result, StoreError, TableId, TableStore};
use async_trait::async_trait;
use cleansheet_core::Table;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// File-backed table store: one JSON file per table under a data directory.
///
/// `replace` writes the new value to a temporary file and renames it over
/// the old one, so readers never observe a partially written table.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    /// Create a store rooted at `dir`. The directory is created lazily on
    /// the first write.
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        FileStore {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    fn table_path(&self, id: &TableId) -> PathBuf {
        self.dir.join(format!("{id}.json"))
    }

    async fn write_table(&self, id: &TableId, table: &Table) -> Result<()> {
        let bytes = serde_json::to_vec(table)?;
        let tmp = self.dir.join(format!("{id}.json.tmp"));
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, self.table_path(id)).await?;
        Ok(())
    }
}

#[async_trait]
impl TableStore for FileStore {
    async fn create(&self, table: Table) -> Result<TableId> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let id = TableId::generate();
        self.write_table(&id, &table).await?;
        Ok(id)
    }

    async fn read(&self, id: &TableId) -> Result<Table> {
        let bytes = match tokio::fs::read(self.table_path(id)).await {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(StoreError::NotFound { id: id.clone() });
            }
            Err(err) => return Err(err.into()),
        };
        Ok(serde_json::from_slice(&bytes)?)
    }

    async fn replace(&self, id: &TableId, table: Table) -> Result<()> {
        if !tokio::fs::try_exists(self.table_path(id)).await? {
            return Err(StoreError::NotFound { id: id.clone() });
        }
        self.write_table(id, &table).await
    }
}
