use crate::{Result, StoreError, TableId, TableStore};
use async_trait::async_trait;
use cleansheet_core::Table;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// In-memory table store backed by a `HashMap`.
///
/// The write lock makes `replace` atomic per id; readers block until the
/// whole value is swapped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<TableId, Table>>,
}

impl MemoryStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        MemoryStore {
            tables: RwLock::new(HashMap::new()),
        }
    }
}

#[async_trait]
impl TableStore for MemoryStore {
    async fn create(&self, table: Table) -> Result<TableId> {
        let id = TableId::generate();
        self.tables.write().await.insert(id.clone(), table);
        Ok(id)
    }

    async fn read(&self, id: &TableId) -> Result<Table> {
        self.tables
            .read()
            .await
            .get(id)
            .cloned()
            .ok_or_else(|| StoreError::NotFound { id: id.clone() })
    }

    async fn replace(&self, id: &TableId, table: Table) -> Result<()> {
        let mut tables = self.tables.write().await;
        match tables.get_mut(id) {
            Some(slot) => {
                *slot = table;
                Ok(())
            }
            None => Err(StoreError::NotFound { id: id.clone() }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::from_data(vec![vec!["a", "b"], vec!["1", "2"]])
    }

    #[tokio::test]
    async fn test_create_then_read() {
        let store = MemoryStore::new();
        let id = store.create(sample()).await.unwrap();
        let table = store.read(&id).await.unwrap();
        assert_eq!(table, sample());
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let store = MemoryStore::new();
        let a = store.create(sample()).await.unwrap();
        let b = store.create(sample()).await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_read_missing() {
        let store = MemoryStore::new();
        let err = store.read(&TableId::from("nope")).await.unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_replace_overwrites_whole_value() {
        let store = MemoryStore::new();
        let id = store.create(sample()).await.unwrap();

        let replacement = Table::from_data(vec![vec!["x"]]);
        store.replace(&id, replacement.clone()).await.unwrap();
        assert_eq!(store.read(&id).await.unwrap(), replacement);
    }

    #[tokio::test]
    async fn test_replace_missing_leaves_store_unchanged() {
        let store = MemoryStore::new();
        let id = store.create(sample()).await.unwrap();

        let err = store
            .replace(&TableId::from("nope"), Table::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { .. }));

        // an unrelated existing table is untouched
        assert_eq!(store.read(&id).await.unwrap(), sample());
    }
}
