//! Cleaning service for cleansheet.
//!
//! Orchestrates the table store and the command pipeline: load a table by
//! id, run the commands, write the result back, return a preview. The
//! store is injected as a [`TableStore`] capability so tests can swap in
//! doubles.

use cleansheet_core::{Row, Table};
use cleansheet_pipeline::{apply, CommandOutcome, CommandSpec};
use cleansheet_store::{StoreError, TableId, TableStore};
use serde::Serialize;
use thiserror::Error;

/// Number of rows returned as a preview to callers.
pub const PREVIEW_ROWS: usize = 5;

/// Errors surfaced by the cleaning service
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Store(#[from] StoreError),
}

pub type Result<T> = std::result::Result<T, ServiceError>;

impl ServiceError {
    /// Check whether this is a missing-table condition
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ServiceError::Store(StoreError::NotFound { .. }))
    }
}

/// Output of a clean request: the preview rows plus the full per-command
/// outcome list for diagnostics.
#[derive(Debug, Clone, Serialize)]
pub struct CleanOutput {
    pub preview: Vec<Row>,
    pub outcomes: Vec<CommandOutcome>,
}

/// Orchestrates uploads, cleaning runs, and downloads against a store.
pub struct CleaningService<S> {
    store: S,
}

impl<S: TableStore> CleaningService<S> {
    /// Create a service over the given store
    pub fn new(store: S) -> Self {
        CleaningService { store }
    }

    /// Persist an uploaded table, returning its id and a preview.
    pub async fn upload(&self, table: Table) -> Result<(TableId, Vec<Row>)> {
        let preview = table.preview(PREVIEW_ROWS);
        let rows = table.row_count();
        let id = self.store.create(table).await?;
        tracing::info!("stored uploaded table {id} ({rows} rows)");
        Ok((id, preview))
    }

    /// Run a command sequence against a stored table.
    ///
    /// Reads the table, applies every command in order, replaces the
    /// stored value with the result, and returns the first
    /// [`PREVIEW_ROWS`] rows plus the outcome list. A missing id fails the
    /// whole request; individual command failures do not. The replace
    /// completes before this returns, so a subsequent read sees the
    /// cleaned table.
    pub async fn clean(&self, id: &TableId, commands: &[CommandSpec]) -> Result<CleanOutput> {
        let table = self.store.read(id).await?;
        let result = apply(table, commands);

        let failed = result.failed_count();
        if failed > 0 {
            tracing::warn!(
                "{failed} of {} commands failed for table {id}",
                result.outcomes.len()
            );
        }

        let preview = result.table.preview(PREVIEW_ROWS);
        self.store.replace(id, result.table).await?;

        Ok(CleanOutput {
            preview,
            outcomes: result.outcomes,
        })
    }

    /// Load the full table for download.
    pub async fn fetch(&self, id: &TableId) -> Result<Table> {
        Ok(self.store.read(id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use cleansheet_core::CellValue;
    use cleansheet_store::MemoryStore;

    fn sample() -> Table {
        Table::from_data(vec![
            vec!["name", "age"],
            vec!["  Bob ", "30"],
            vec!["", ""],
            vec!["bob", "30"],
        ])
    }

    #[tokio::test]
    async fn test_upload_returns_preview() {
        let service = CleaningService::new(MemoryStore::new());
        let big = Table::from_data(vec![vec!["r"]; 20]);

        let (id, preview) = service.upload(big).await.unwrap();
        assert_eq!(preview.len(), PREVIEW_ROWS);
        assert_eq!(service.fetch(&id).await.unwrap().row_count(), 20);
    }

    #[tokio::test]
    async fn test_clean_persists_result() {
        let service = CleaningService::new(MemoryStore::new());
        let (id, _) = service.upload(sample()).await.unwrap();

        let commands = vec![
            CommandSpec::new("trim").with_param("column", 0),
            CommandSpec::new("removeEmptyRows"),
        ];
        let output = service.clean(&id, &commands).await.unwrap();

        assert!(output.outcomes.iter().all(|o| o.is_ok()));
        assert_eq!(output.preview.len(), 3);
        assert_eq!(output.preview[1][0], CellValue::String("Bob".to_string()));

        // a later read sees the cleaned table, not the original
        let stored = service.fetch(&id).await.unwrap();
        assert_eq!(stored.row_count(), 3);
    }

    #[tokio::test]
    async fn test_clean_missing_table() {
        let service = CleaningService::new(MemoryStore::new());
        let err = service
            .clean(&TableId::from("missing"), &[])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    /// Store double whose table vanishes between read and replace,
    /// simulating the race the replace contract treats as a consistency
    /// fault.
    struct VanishingStore;

    #[async_trait]
    impl TableStore for VanishingStore {
        async fn create(&self, _table: Table) -> cleansheet_store::Result<TableId> {
            Ok(TableId::from("ghost"))
        }

        async fn read(&self, _id: &TableId) -> cleansheet_store::Result<Table> {
            Ok(sample())
        }

        async fn replace(&self, id: &TableId, _table: Table) -> cleansheet_store::Result<()> {
            Err(StoreError::NotFound { id: id.clone() })
        }
    }

    #[tokio::test]
    async fn test_replace_race_propagates_not_found() {
        let service = CleaningService::new(VanishingStore);
        let err = service
            .clean(&TableId::from("ghost"), &[CommandSpec::new("removeEmptyRows")])
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }
}
