//! `Authorization` header extraction.
//!
//! First stage of the gate: validates the coarse shape of the header and
//! hands the opaque base64 payload to the credential decoder.

use crate::RejectReason;

/// The only scheme this gate speaks.
pub const BASIC: &str = "Basic";

/// Extracts the base64 credentials payload from a raw `Authorization` value.
///
/// The value is split on whitespace runs and must yield exactly two tokens:
/// the literal scheme `Basic` (case-sensitive) and the payload. Absent and
/// blank headers, extra tokens, and any other scheme are rejections.
pub fn extract_payload(header: Option<&str>) -> Result<&str, RejectReason> {
    let value = match header {
        Some(value) if !value.trim().is_empty() => value,
        _ => return Err(RejectReason::MissingHeader),
    };

    let mut tokens = value.split_whitespace();
    let scheme = tokens.next().ok_or(RejectReason::MalformedHeader)?;
    let payload = tokens.next().ok_or(RejectReason::MalformedHeader)?;
    if tokens.next().is_some() {
        return Err(RejectReason::MalformedHeader);
    }

    if scheme != BASIC {
        return Err(RejectReason::UnsupportedScheme);
    }

    Ok(payload)
}
