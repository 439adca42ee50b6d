//! Note names and the storage keys derived from them.

use std::fmt;

use crate::error::NameError;

/// Suffix appended to a note name to form its password-record key.
pub const PASSWORD_SUFFIX: &str = "_password";

/// Name used when the URL path is just `/`.
pub const DEFAULT_NOTE: &str = "default";

/// Longest accepted note name, in bytes.
pub const MAX_NAME_LEN: usize = 512;

/// A validated note name.
///
/// The name doubles as the storage key of the note's content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NoteName(String);

impl NoteName {
    /// Derive a note name from a URL path.
    ///
    /// The leading `/` is dropped and percent-escapes are decoded. An empty
    /// remainder yields `fallback`. Paths whose escapes do not decode to
    /// UTF-8 are used verbatim.
    ///
    /// # Errors
    ///
    /// Returns a [`NameError`] if the resulting name is too long, contains a
    /// control character, or ends with [`PASSWORD_SUFFIX`].
    pub fn from_path(path: &str, fallback: &str) -> Result<Self, NameError> {
        let raw = path.strip_prefix('/').unwrap_or(path);
        let decoded = urlencoding::decode(raw).map_or_else(|_| raw.to_owned(), |d| d.into_owned());
        if decoded.is_empty() {
            Self::new(fallback)
        } else {
            Self::new(decoded)
        }
    }

    /// Validate a name.
    ///
    /// # Errors
    ///
    /// See [`NoteName::from_path`].
    pub fn new(name: impl Into<String>) -> Result<Self, NameError> {
        let name = name.into();
        if name.len() > MAX_NAME_LEN {
            return Err(NameError::TooLong {
                len: name.len(),
                max: MAX_NAME_LEN,
            });
        }
        if name.chars().any(char::is_control) {
            return Err(NameError::ControlCharacter);
        }
        if name.ends_with(PASSWORD_SUFFIX) {
            return Err(NameError::ReservedSuffix {
                name,
                suffix: PASSWORD_SUFFIX,
            });
        }
        Ok(Self(name))
    }

    /// The name as a string slice. Also the content key.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Storage key of this note's password record.
    #[must_use]
    pub fn password_key(&self) -> String {
        format!("{}{PASSWORD_SUFFIX}", self.0)
    }
}

impl fmt::Display for NoteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NoteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn root_path_uses_fallback() {
        assert_eq!(NoteName::from_path("/", DEFAULT_NOTE).unwrap().as_str(), "default");
        assert_eq!(NoteName::from_path("", "scratch").unwrap().as_str(), "scratch");
    }

    #[test]
    fn strips_leading_slash_only() {
        assert_eq!(NoteName::from_path("/foo", DEFAULT_NOTE).unwrap().as_str(), "foo");
        assert_eq!(
            NoteName::from_path("/work/todo/", DEFAULT_NOTE).unwrap().as_str(),
            "work/todo/"
        );
    }

    #[test]
    fn decodes_percent_escapes() {
        let name = NoteName::from_path("/caf%C3%A9%20list", DEFAULT_NOTE).unwrap();
        assert_eq!(name.as_str(), "café list");
    }

    #[test]
    fn undecodable_escapes_are_kept_verbatim() {
        let name = NoteName::from_path("/bad%FFname", DEFAULT_NOTE).unwrap();
        assert_eq!(name.as_str(), "bad%FFname");
    }

    #[test]
    fn password_key_appends_suffix() {
        let name = NoteName::new("foo").unwrap();
        assert_eq!(name.password_key(), "foo_password");
    }

    #[test]
    fn rejects_reserved_suffix() {
        let err = NoteName::from_path("/foo_password", DEFAULT_NOTE).unwrap_err();
        assert!(matches!(err, NameError::ReservedSuffix { .. }));
    }

    #[test]
    fn rejects_control_characters() {
        let err = NoteName::from_path("/a%0Ab", DEFAULT_NOTE).unwrap_err();
        assert!(matches!(err, NameError::ControlCharacter));
    }

    #[test]
    fn rejects_overlong_names() {
        let long = "x".repeat(MAX_NAME_LEN + 1);
        let err = NoteName::new(long).unwrap_err();
        assert!(matches!(err, NameError::TooLong { len: 513, max: 512 }));
        assert!(NoteName::new("x".repeat(MAX_NAME_LEN)).is_ok());
    }
}
