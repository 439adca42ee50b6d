//! Pure-Rust redb storage backend.
//!
//! An alternative to `RocksDB` when a C++ toolchain is not available.
//! Feature-gated behind `redb-backend`. Every write is its own committed
//! transaction, so a note and its password record are never written
//! together.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use redb::{Database, TableDefinition};

use crate::{StorageBackend, StorageError};

/// The single table holding notes and password records side by side.
const NOTES_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("notes");

/// A storage backend backed by a single redb file.
///
/// # Examples
///
/// ```no_run
/// # use notekv_storage::RedbBackend;
/// let backend = RedbBackend::open("/var/lib/notekv/notes.redb").unwrap();
/// ```
#[derive(Clone)]
pub struct RedbBackend {
    db: Arc<Database>,
    path: PathBuf,
}

impl std::fmt::Debug for RedbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RedbBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

fn txn_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::Transaction {
        reason: e.to_string(),
    }
}

fn table_err(e: impl std::fmt::Display) -> StorageError {
    StorageError::MissingTable {
        name: format!("notes: {e}"),
    }
}

impl RedbBackend {
    /// Open or create a redb database file at the given path.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if redb fails to open or create the
    /// file, or a transaction error if the notes table cannot be created.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let db = Database::create(path).map_err(|e| StorageError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        // Opening the table inside a write transaction creates it.
        let txn = db.begin_write().map_err(txn_err)?;
        {
            let _table = txn.open_table(NOTES_TABLE).map_err(table_err)?;
        }
        txn.commit().map_err(txn_err)?;
        tracing::debug!(path = %path.display(), "opened redb storage");

        Ok(Self {
            db: Arc::new(db),
            path: path.to_path_buf(),
        })
    }

    /// Return the filesystem path of this database.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait::async_trait]
impl StorageBackend for RedbBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_read().map_err(txn_err)?;
            let table = txn.open_table(NOTES_TABLE).map_err(table_err)?;
            let value = table
                .get(owned.as_str())
                .map_err(|e| StorageError::Read {
                    key: owned.clone(),
                    reason: e.to_string(),
                })?
                .map(|v| v.value().to_vec());
            Ok(value)
        })
        .await
        .map_err(|e| StorageError::Read {
            key: key.to_owned(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_write().map_err(txn_err)?;
            {
                let mut table = txn.open_table(NOTES_TABLE).map_err(table_err)?;
                table
                    .insert(owned.as_str(), value.as_slice())
                    .map_err(|e| StorageError::Write {
                        key: owned.clone(),
                        reason: e.to_string(),
                    })?;
            }
            txn.commit().map_err(txn_err)
        })
        .await
        .map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        tokio::task::spawn_blocking(move || {
            let txn = db.begin_write().map_err(txn_err)?;
            {
                let mut table = txn.open_table(NOTES_TABLE).map_err(table_err)?;
                // Ok(None) when the key was never there.
                table
                    .remove(owned.as_str())
                    .map_err(|e| StorageError::Delete {
                        key: owned.clone(),
                        reason: e.to_string(),
                    })?;
            }
            txn.commit().map_err(txn_err)
        })
        .await
        .map_err(|e| StorageError::Delete {
            key: key.to_owned(),
            reason: format!("blocking task panicked: {e}"),
        })?
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("notes.redb");

        {
            let backend = RedbBackend::open(&path).unwrap();
            backend.put("todo", b"buy milk").await.unwrap();
            backend.put("todo_password", b"digest").await.unwrap();
            backend.delete("todo_password").await.unwrap();
        }

        let backend = RedbBackend::open(&path).unwrap();
        assert_eq!(backend.get("todo").await.unwrap(), Some(b"buy milk".to_vec()));
        assert!(!backend.exists("todo_password").await.unwrap());
    }

    #[tokio::test]
    async fn delete_missing_key_is_noop() {
        let dir = tempfile::tempdir().unwrap();
        let backend = RedbBackend::open(dir.path().join("notes.redb")).unwrap();
        backend.delete("nope").await.unwrap();
        assert_eq!(backend.get("nope").await.unwrap(), None);
    }
}
