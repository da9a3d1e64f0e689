//! Table persistence for cleansheet.
//!
//! A [`TableStore`] maps opaque [`TableId`]s to whole tables. Writes are
//! whole-value: `replace` atomically overwrites the stored table, so a
//! concurrent reader sees either the old table or the new one, never a
//! partial write. Ids are minted by the store at create time and never
//! reused.
//!
//! Two implementations are provided: [`MemoryStore`] for the default
//! in-process mode and [`FileStore`] for one-JSON-file-per-table
//! persistence.

mod file;
mod memory;

pub use file::FileStore;
pub use memory::MemoryStore;

use async_trait::async_trait;
use cleansheet_core::Table;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// Opaque handle identifying a persisted table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableId(String);

impl TableId {
    /// Mint a fresh unique id. Only stores create ids.
    pub(crate) fn generate() -> Self {
        TableId(Uuid::new_v4().to_string())
    }

    /// Get the id as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TableId {
    fn from(s: String) -> Self {
        TableId(s)
    }
}

impl From<&str> for TableId {
    fn from(s: &str) -> Self {
        TableId(s.to_string())
    }
}

/// Errors that can occur during store operations
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("table not found: {id}")]
    NotFound { id: TableId },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, StoreError>;

/// Key-value persistence for tables.
///
/// The cleaning service holds this as its storage capability; tests swap
/// in doubles.
#[async_trait]
pub trait TableStore: Send + Sync {
    /// Persist a new table and return its fresh id.
    async fn create(&self, table: Table) -> Result<TableId>;

    /// Load the table stored for `id`.
    ///
    /// Fails with [`StoreError::NotFound`] for unknown ids.
    async fn read(&self, id: &TableId) -> Result<Table>;

    /// Atomically overwrite the table stored for `id`.
    ///
    /// Fails with [`StoreError::NotFound`] if `id` was never created; the
    /// store is left unchanged in that case.
    async fn replace(&self, id: &TableId, table: Table) -> Result<()>;
}
