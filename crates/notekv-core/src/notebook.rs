//! Note content storage.
//!
//! Content is escaped on the way into storage and unescaped on the way out,
//! so callers always deal in the text the user typed.

use std::sync::Arc;

use notekv_storage::StorageBackend;
use tracing::debug;

use crate::error::NoteError;
use crate::escape::{escape, unescape};
use crate::name::NoteName;

/// Reads and writes note content.
pub struct Notebook {
    storage: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for Notebook {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notebook").finish_non_exhaustive()
    }
}

impl Notebook {
    /// Create a notebook over the given storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Read a note. A note that was never written reads as empty.
    ///
    /// # Errors
    ///
    /// - [`NoteError::Storage`] if the backend fails.
    /// - [`NoteError::Corrupt`] if the stored bytes are not UTF-8.
    pub async fn read(&self, name: &NoteName) -> Result<String, NoteError> {
        let Some(bytes) = self.storage.get(name.as_str()).await? else {
            return Ok(String::new());
        };
        let stored = String::from_utf8(bytes).map_err(|_| NoteError::Corrupt {
            key: name.as_str().to_owned(),
        })?;
        Ok(unescape(&stored))
    }

    /// Overwrite a note with `content`.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Storage`] if the backend fails.
    pub async fn write(&self, name: &NoteName, content: &str) -> Result<(), NoteError> {
        let stored = escape(content);
        self.storage.put(name.as_str(), stored.as_bytes()).await?;
        debug!(note = %name, bytes = stored.len(), "note saved");
        Ok(())
    }
}
