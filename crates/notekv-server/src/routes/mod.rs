//! HTTP route handlers for `NoteKV`.
//!
//! - `notes`: the catch-all note route (read, write, everything else)
//! - `views`: HTML for the editor and the password prompt

pub mod notes;
pub mod views;
