//! Document access handler.
//!
//! Every request is resolved in two steps. First the facts are gathered
//! (is the note protected, does the supplied credential check out) and fed
//! to a pure decision table that yields a [`Decision`]. Then the decision is
//! executed against the notebook and the password guard, producing an
//! [`Outcome`] for the transport layer to render.
//!
//! | Request | Protection | Credential | Decision |
//! |---|---|---|---|
//! | read | none | any | [`Decision::ShowUnprotected`] |
//! | read | record | absent | [`Decision::Prompt`] |
//! | read | record | verifies | [`Decision::ShowProtected`] |
//! | read | record | malformed or wrong | [`Decision::Reprompt`] |
//! | write, action absent or `save` | - | - | [`Decision::Save`] |
//! | write, `setPassword`/`updatePassword`, non-empty secret | - | - | [`Decision::SetSecret`] |
//! | write, `setPassword`/`updatePassword`, empty secret | - | - | [`Decision::ClearSecret`] |
//! | write, other action | - | - | [`Decision::UnknownAction`] |
//! | anything else | - | - | [`Decision::MethodNotAllowed`] |
//!
//! Writes are not gated: anyone who can reach a note can save it or change
//! its password.

use std::sync::Arc;

use notekv_storage::StorageBackend;
use tracing::{debug, info, warn};

use crate::credential;
use crate::error::NoteError;
use crate::guard::PasswordGuard;
use crate::name::NoteName;
use crate::notebook::Notebook;

/// Form action that saves content.
pub const ACTION_SAVE: &str = "save";
/// Form action that sets a password on an unprotected note.
pub const ACTION_SET_PASSWORD: &str = "setPassword";
/// Form action that replaces or clears an existing password.
pub const ACTION_UPDATE_PASSWORD: &str = "updatePassword";

/// Fields of a write request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteForm {
    /// New note text. Absent is treated as empty.
    pub content: Option<String>,
    /// One of the `ACTION_*` constants, or absent for a save.
    pub action: Option<String>,
    /// New password for the password actions. Empty or absent clears it.
    pub new_password: Option<String>,
}

/// A request against a single note.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AccessRequest {
    /// Fetch the note, optionally with an encoded credential.
    Read { credential: Option<String> },
    /// Save content or manage the password.
    Write(WriteForm),
    /// Any other method.
    Unsupported { method: String },
}

/// What a supplied credential amounted to on a protected note.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialCheck {
    /// No credential, or an empty one.
    Absent,
    /// The credential did not decode.
    Malformed,
    /// The credential decoded but does not match the stored digest.
    Rejected,
    /// The credential matches.
    Accepted,
}

/// Protection state of a note as seen by a read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gate {
    /// No password record.
    Open,
    /// A password record exists.
    Locked(CredentialCheck),
}

/// Which password action set a secret.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecretChange {
    Set,
    Update,
}

/// One row of the decision table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decision {
    ShowUnprotected,
    Prompt,
    ShowProtected,
    Reprompt,
    Save { content: String },
    SetSecret { secret: String, change: SecretChange },
    ClearSecret,
    UnknownAction { action: String },
    MethodNotAllowed { method: String },
}

impl Decision {
    /// Decision for a read, given the note's gate.
    #[must_use]
    pub fn for_read(gate: Gate) -> Self {
        match gate {
            Gate::Open => Self::ShowUnprotected,
            Gate::Locked(CredentialCheck::Absent) => Self::Prompt,
            Gate::Locked(CredentialCheck::Accepted) => Self::ShowProtected,
            Gate::Locked(CredentialCheck::Malformed | CredentialCheck::Rejected) => Self::Reprompt,
        }
    }

    /// Decision for a write form.
    #[must_use]
    pub fn for_write(form: WriteForm) -> Self {
        let WriteForm {
            content,
            action,
            new_password,
        } = form;
        let secret = new_password.filter(|p| !p.is_empty());

        match action.as_deref() {
            None | Some("" | ACTION_SAVE) => Self::Save {
                content: content.unwrap_or_default(),
            },
            Some(kind @ (ACTION_SET_PASSWORD | ACTION_UPDATE_PASSWORD)) => {
                let change = if kind == ACTION_SET_PASSWORD {
                    SecretChange::Set
                } else {
                    SecretChange::Update
                };
                match secret {
                    Some(secret) => Self::SetSecret { secret, change },
                    None => Self::ClearSecret,
                }
            }
            Some(other) => Self::UnknownAction {
                action: other.to_owned(),
            },
        }
    }
}

/// Result of handling a request, ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Show the editor with the note content.
    Editor { content: String, protected: bool },
    /// Ask for the password. No content is disclosed.
    Prompt,
    /// Send the client back to the note URL without the credential.
    Redirect,
    /// Content was stored.
    Saved,
    /// A password was set on the note.
    SecretSet,
    /// The note's password was replaced.
    SecretUpdated,
    /// The note's password was removed.
    SecretCleared,
    /// The write named an action that does not exist. Nothing was stored.
    UnknownAction { action: String },
    /// The method is not supported.
    MethodNotAllowed,
}

/// Serves reads and writes of notes, composing the notebook and the guard.
#[derive(Debug)]
pub struct DocumentAccess {
    notebook: Notebook,
    guard: PasswordGuard,
}

impl DocumentAccess {
    /// Create a handler where both notes and password records live in
    /// `storage`.
    #[must_use]
    pub fn new(storage: Arc<dyn StorageBackend>) -> Self {
        Self {
            notebook: Notebook::new(Arc::clone(&storage)),
            guard: PasswordGuard::new(storage),
        }
    }

    /// The underlying password guard.
    #[must_use]
    pub fn guard(&self) -> &PasswordGuard {
        &self.guard
    }

    /// The underlying notebook.
    #[must_use]
    pub fn notebook(&self) -> &Notebook {
        &self.notebook
    }

    /// Handle one request against `name`.
    ///
    /// # Errors
    ///
    /// Returns a [`NoteError`] only when storage fails. Bad credentials,
    /// unknown actions and unsupported methods are outcomes, not errors.
    pub async fn handle(
        &self,
        name: &NoteName,
        request: AccessRequest,
    ) -> Result<Outcome, NoteError> {
        let decision = self.decide(name, request).await?;
        debug!(note = %name, decision = decision_label(&decision), "access decided");
        self.execute(name, decision).await
    }

    /// Gather the facts for `request` and look up its decision.
    ///
    /// # Errors
    ///
    /// Returns [`NoteError::Storage`] if the guard cannot read the password
    /// record.
    pub async fn decide(
        &self,
        name: &NoteName,
        request: AccessRequest,
    ) -> Result<Decision, NoteError> {
        Ok(match request {
            AccessRequest::Read { credential } => {
                Decision::for_read(self.gate(name, credential.as_deref()).await?)
            }
            AccessRequest::Write(form) => Decision::for_write(form),
            AccessRequest::Unsupported { method } => Decision::MethodNotAllowed { method },
        })
    }

    async fn gate(&self, name: &NoteName, credential: Option<&str>) -> Result<Gate, NoteError> {
        if !self.guard.is_protected(name).await? {
            return Ok(Gate::Open);
        }

        let check = match credential.filter(|c| !c.is_empty()) {
            None => CredentialCheck::Absent,
            Some(encoded) => match credential::decode(encoded) {
                Err(e) => {
                    warn!(note = %name, error = %e, "malformed credential");
                    CredentialCheck::Malformed
                }
                Ok(secret) => {
                    if self.guard.verify(name, &secret).await? {
                        CredentialCheck::Accepted
                    } else {
                        warn!(note = %name, "credential rejected");
                        CredentialCheck::Rejected
                    }
                }
            },
        };
        Ok(Gate::Locked(check))
    }

    async fn execute(&self, name: &NoteName, decision: Decision) -> Result<Outcome, NoteError> {
        match decision {
            Decision::ShowUnprotected => Ok(Outcome::Editor {
                content: self.notebook.read(name).await?,
                protected: false,
            }),
            Decision::ShowProtected => Ok(Outcome::Editor {
                content: self.notebook.read(name).await?,
                protected: true,
            }),
            Decision::Prompt => Ok(Outcome::Prompt),
            Decision::Reprompt => Ok(Outcome::Redirect),
            Decision::Save { content } => {
                self.notebook.write(name, &content).await?;
                Ok(Outcome::Saved)
            }
            Decision::SetSecret { secret, change } => {
                self.guard.set_secret(name, &secret).await?;
                Ok(match change {
                    SecretChange::Set => Outcome::SecretSet,
                    SecretChange::Update => Outcome::SecretUpdated,
                })
            }
            Decision::ClearSecret => {
                self.guard.clear_secret(name).await?;
                Ok(Outcome::SecretCleared)
            }
            Decision::UnknownAction { action } => {
                info!(note = %name, action = %action, "unknown write action");
                Ok(Outcome::UnknownAction { action })
            }
            Decision::MethodNotAllowed { method } => {
                debug!(note = %name, method = %method, "method not allowed");
                Ok(Outcome::MethodNotAllowed)
            }
        }
    }
}

/// Log label for a decision. Never includes content or secrets.
fn decision_label(decision: &Decision) -> &'static str {
    match decision {
        Decision::ShowUnprotected => "show_unprotected",
        Decision::Prompt => "prompt",
        Decision::ShowProtected => "show_protected",
        Decision::Reprompt => "reprompt",
        Decision::Save { .. } => "save",
        Decision::SetSecret { .. } => "set_secret",
        Decision::ClearSecret => "clear_secret",
        Decision::UnknownAction { .. } => "unknown_action",
        Decision::MethodNotAllowed { .. } => "method_not_allowed",
    }
}
