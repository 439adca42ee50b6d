//! Password guard.
//!
//! A note is protected iff its `<name>_password` record exists. The record
//! holds the lowercase hex SHA-256 digest of the secret; the secret itself is
//! never stored.

use std::sync::Arc;

use notekv_storage::StorageBackend;
use sha2::{Digest, Sha256};
use subtle::ConstantTimeEq;
use tracing::info;

use crate::error::NoteError;
use crate::name::NoteName;

/// Lowercase hex SHA-256 of a secret.
#[must_use]
pub fn digest(secret: &str) -> String {
    hex::encode(Sha256::digest(secret.as_bytes()))
}

/// Decides whether a note needs a password and checks supplied ones.
pub struct PasswordGuard {
    storage: Arc<dyn StorageBackend>,
}

impl std::fmt::Debug for PasswordGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordGuard").finish_non_exhaustive()
    }
}

impl PasswordGuard {
    /// Create a guard over the given storage backend.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self { storage }
    }

    /// Whether a password record exists for `name`.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Storage`] if the backend fails.
    pub async fn is_protected(&self, name: &NoteName) -> Result<bool, NoteError> {
        Ok(self.storage.exists(&name.password_key()).await?)
    }

    /// Store the digest of `secret`, replacing any existing record.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Storage`] if the backend fails.
    pub async fn set_secret(&self, name: &NoteName, secret: &str) -> Result<(), NoteError> {
        self.storage
            .put(&name.password_key(), digest(secret).as_bytes())
            .await?;
        info!(note = %name, "password record written");
        Ok(())
    }

    /// Remove the password record. No-op if the note is unprotected.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Storage`] if the backend fails.
    pub async fn clear_secret(&self, name: &NoteName) -> Result<(), NoteError> {
        self.storage.delete(&name.password_key()).await?;
        info!(note = %name, "password record cleared");
        Ok(())
    }

    /// Check `candidate` against the stored digest.
    ///
    /// Returns `false` when the note has no password record.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Storage`] if the backend fails.
    pub async fn verify(&self, name: &NoteName, candidate: &str) -> Result<bool, NoteError> {
        let Some(stored) = self.storage.get(&name.password_key()).await? else {
            return Ok(false);
        };
        let computed = digest(candidate);
        Ok(computed.as_bytes().ct_eq(stored.as_slice()).into())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use notekv_storage::MemoryBackend;

    fn make_guard() -> (PasswordGuard, MemoryBackend) {
        let storage = MemoryBackend::new();
        (PasswordGuard::new(Arc::new(storage.clone())), storage)
    }

    fn name(n: &str) -> NoteName {
        NoteName::new(n).unwrap()
    }

    #[test]
    fn digest_is_lowercase_hex_sha256() {
        assert_eq!(
            digest("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(digest("").len(), 64);
    }

    #[tokio::test]
    async fn fresh_note_is_unprotected() {
        let (guard, _) = make_guard();
        assert!(!guard.is_protected(&name("foo")).await.unwrap());
        assert!(!guard.verify(&name("foo"), "anything").await.unwrap());
    }

    #[tokio::test]
    async fn set_then_verify() {
        let (guard, _) = make_guard();
        let foo = name("foo");
        guard.set_secret(&foo, "abc123").await.unwrap();

        assert!(guard.is_protected(&foo).await.unwrap());
        assert!(guard.verify(&foo, "abc123").await.unwrap());
        assert!(!guard.verify(&foo, "abc123x").await.unwrap());
        assert!(!guard.verify(&foo, "").await.unwrap());
    }

    #[tokio::test]
    async fn stores_digest_not_secret() {
        let (guard, storage) = make_guard();
        guard.set_secret(&name("foo"), "abc123").await.unwrap();
        let stored = storage.get("foo_password").await.unwrap().unwrap();
        assert_eq!(stored, digest("abc123").into_bytes());
    }

    #[tokio::test]
    async fn set_overwrites_previous_secret() {
        let (guard, _) = make_guard();
        let foo = name("foo");
        guard.set_secret(&foo, "first").await.unwrap();
        guard.set_secret(&foo, "second").await.unwrap();
        assert!(!guard.verify(&foo, "first").await.unwrap());
        assert!(guard.verify(&foo, "second").await.unwrap());
    }

    #[tokio::test]
    async fn clear_unprotects() {
        let (guard, _) = make_guard();
        let foo = name("foo");
        guard.set_secret(&foo, "abc123").await.unwrap();
        guard.clear_secret(&foo).await.unwrap();
        assert!(!guard.is_protected(&foo).await.unwrap());
        assert!(!guard.verify(&foo, "abc123").await.unwrap());
    }

    #[tokio::test]
    async fn clear_without_record_is_noop() {
        let (guard, _) = make_guard();
        guard.clear_secret(&name("foo")).await.unwrap();
    }

    #[tokio::test]
    async fn records_are_per_note() {
        let (guard, _) = make_guard();
        guard.set_secret(&name("foo"), "abc123").await.unwrap();
        assert!(!guard.is_protected(&name("bar")).await.unwrap());
    }
}
