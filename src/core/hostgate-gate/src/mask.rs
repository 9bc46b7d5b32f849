//! Masking of sensitive fields before they reach a log record.
//!
//! Only the scheme token and the username may ever be rendered in clear.
//! Every other decoded field (notably the password, and the whole decoded
//! text when field positions are ambiguous) is replaced by mask characters
//! of the same length as the original value.

const MASK_CHAR: char = '*';

/// Replaces every character of `value` with the mask character.
///
/// The output has the same character length as the input, so log readers
/// can still judge the shape of the offending value.
pub fn mask(value: &str) -> String {
    MASK_CHAR.to_string().repeat(value.chars().count())
}
