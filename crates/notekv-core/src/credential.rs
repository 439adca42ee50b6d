//! Credential transport encoding for the `q` query parameter.
//!
//! A password travels in the URL as standard base64 with the trailing `=`
//! padding stripped. This is obfuscation, not encryption: anyone who sees
//! the URL can recover the password.

use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use base64::Engine;

use crate::error::CredentialError;

/// Encode a secret for the `q` query parameter.
#[must_use]
pub fn encode(secret: &str) -> String {
    STANDARD_NO_PAD.encode(secret.as_bytes())
}

/// Decode a `q` query parameter back into the secret.
///
/// The value is re-padded with `=` to a multiple of four characters and then
/// decoded as standard base64.
///
/// # Errors
///
/// - [`CredentialError::Base64`] if the padded value is not valid base64.
/// - [`CredentialError::NotUtf8`] if the decoded bytes are not UTF-8.
pub fn decode(param: &str) -> Result<String, CredentialError> {
    let pad = (4 - param.len() % 4) % 4;
    let mut padded = String::with_capacity(param.len().saturating_add(pad));
    padded.push_str(param);
    padded.extend(std::iter::repeat_n('=', pad));

    let bytes = STANDARD
        .decode(padded.as_bytes())
        .map_err(|e| CredentialError::Base64 {
            reason: e.to_string(),
        })?;

    String::from_utf8(bytes).map_err(|_| CredentialError::NotUtf8)
}
