//! `RocksDB` storage backend, the persistent default.
//!
//! Every call is pushed onto the Tokio blocking pool with
//! [`tokio::task::spawn_blocking`] since `RocksDB` is a synchronous C++
//! library. Keys and values are stored as-is.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rocksdb::{DBWithThreadMode, MultiThreaded, Options};
use tokio::task::JoinError;

use crate::{StorageBackend, StorageError};

type Db = DBWithThreadMode<MultiThreaded>;

/// A storage backend backed by `RocksDB`.
///
/// # Examples
///
/// ```no_run
/// # use notekv_storage::RocksDbBackend;
/// let backend = RocksDbBackend::open("/var/lib/notekv/data").unwrap();
/// ```
#[derive(Clone)]
pub struct RocksDbBackend {
    db: Arc<Db>,
    path: PathBuf,
}

impl std::fmt::Debug for RocksDbBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RocksDbBackend")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

impl RocksDbBackend {
    /// Open a `RocksDB` database at the given path, creating it if missing.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::Open`] if `RocksDB` fails to open or create the
    /// database at the specified path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StorageError> {
        let path = path.as_ref();
        let mut opts = Options::default();
        opts.create_if_missing(true);

        let db = Db::open(&opts, path).map_err(|e| StorageError::Open {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        tracing::debug!(path = %path.display(), "opened RocksDB storage");

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

fn panicked(e: &JoinError) -> String {
    format!("blocking task panicked: {e}")
}

#[async_trait::async_trait]
impl StorageBackend for RocksDbBackend {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        tokio::task::spawn_blocking(move || {
            db.get(owned.as_bytes()).map_err(|e| StorageError::Read {
                key: owned,
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| StorageError::Read {
            key: key.to_owned(),
            reason: panicked(&e),
        })?
    }

    async fn put(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        let value = value.to_vec();
        tokio::task::spawn_blocking(move || {
            db.put(owned.as_bytes(), &value)
                .map_err(|e| StorageError::Write {
                    key: owned,
                    reason: e.to_string(),
                })
        })
        .await
        .map_err(|e| StorageError::Write {
            key: key.to_owned(),
            reason: panicked(&e),
        })?
    }

    async fn delete(&self, key: &str) -> Result<(), StorageError> {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        tokio::task::spawn_blocking(move || {
            db.delete(owned.as_bytes()).map_err(|e| StorageError::Delete {
                key: owned,
                reason: e.to_string(),
            })
        })
        .await
        .map_err(|e| StorageError::Delete {
            key: key.to_owned(),
            reason: panicked(&e),
        })?
    }

    async fn exists(&self, key: &str) -> Result<bool, StorageError> {
        let db = Arc::clone(&self.db);
        let owned = key.to_owned();
        tokio::task::spawn_blocking(move || {
            db.get_pinned(owned.as_bytes())
                .map(|v| v.is_some())
                .map_err(|e| StorageError::Read {
                    key: owned,
                    reason: e.to_string(),
                })
        })
        .await
        .map_err(|e| StorageError::Read {
            key: key.to_owned(),
            reason: panicked(&e),
        })?
    }
}
