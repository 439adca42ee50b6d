//! Core library for `NoteKV`.
//!
//! Contains the HTML escaping codec, the credential transport encoding, note
//! naming rules, the password guard, the notebook document store, and the
//! document access decision table. This crate depends on `notekv-storage`
//! for the storage backend trait and knows nothing about HTTP.

pub mod access;
pub mod credential;
pub mod error;
pub mod escape;
pub mod guard;
pub mod name;
pub mod notebook;
