//! Credential decoding.
//!
//! Second stage of the gate: base64-decodes the payload extracted from the
//! header and splits it into a username/password pair.

use std::fmt;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use zeroize::ZeroizeOnDrop;

use crate::mask::mask;
use crate::RejectReason;

/// A decoded username/password pair.
///
/// Lives for a single request: the password is zeroized when the pair is
/// dropped, and the `Debug` rendering masks it. The username is guaranteed
/// non-blank; the password may be empty (empty-password accounts are a
/// legal, distinct case from malformed input).
#[derive(ZeroizeOnDrop)]
pub struct CredentialPair {
    username: String,
    password: String,
}

impl CredentialPair {
    /// The username in front of the `:` separator. Never blank.
    pub fn username(&self) -> &str {
        &self.username
    }

    /// The password behind the `:` separator. May be empty.
    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("username", &self.username)
            .field("password", &mask(&self.password))
            .finish()
    }
}

/// A decoder rejection, together with a log-safe diagnostic.
///
/// `detail` is already masked per the masking rule and may go straight into
/// a log record.
#[derive(Debug)]
pub struct DecodeError {
    /// Which validation step failed.
    pub reason: RejectReason,
    /// Pre-masked diagnostic for the audit log.
    pub detail: String,
}

/// Decodes a base64 credentials payload into a [`CredentialPair`].
///
/// The payload must be standard (non-URL-safe) base64 with padding. The
/// decoded bytes are read as UTF-8 text (lossily, matching the historical
/// behavior of this filter) and split once on the first `:`.
pub fn decode_credentials(payload: &str) -> Result<CredentialPair, DecodeError> {
    let bytes = STANDARD.decode(payload).map_err(|e| DecodeError {
        reason: RejectReason::InvalidBase64(e.to_string()),
        // The encoded token carries no plaintext secret; safe in clear.
        detail: format!("encoded [{payload}]: {e}"),
    })?;
    let text = String::from_utf8_lossy(&bytes);

    let mut parts = text.splitn(2, ':');
    let username = parts.next().unwrap_or_default();
    let password = match parts.next() {
        Some(password) => password,
        None => {
            // No separator: field positions are unknown, mask everything.
            return Err(DecodeError {
                reason: RejectReason::MissingSeparator,
                detail: format!("decoded [{}]", mask(&text)),
            });
        }
    };

    if username.trim().is_empty() {
        return Err(DecodeError {
            reason: RejectReason::BlankUsername,
            detail: format!("username [{}], password [{}]", username, mask(password)),
        });
    }

    Ok(CredentialPair {
        username: username.to_string(),
        password: password.to_string(),
    })
}
