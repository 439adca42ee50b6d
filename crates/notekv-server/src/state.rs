//! Shared application state for the `NoteKV` server.
//!
//! A single [`AppState`] is constructed at startup and shared across all
//! Axum handlers via `Arc`. Handlers keep no state of their own between
//! requests; everything durable lives behind the storage backend.

use std::sync::Arc;

use notekv_core::access::DocumentAccess;
use notekv_storage::StorageBackend;

/// Shared application state passed to all HTTP handlers.
pub struct AppState {
    /// Note reads, writes and password management.
    pub access: DocumentAccess,
    /// Note served at `/`.
    pub default_note: String,
}

impl AppState {
    /// Build the state over a storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>, default_note: impl Into<String>) -> Self {
        Self {
            access: DocumentAccess::new(storage),
            default_note: default_note.into(),
        }
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("default_note", &self.default_note)
            .finish_non_exhaustive()
    }
}
