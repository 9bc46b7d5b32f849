//! Gate error types.

use thiserror::Error;

/// Fatal errors raised while bringing the gate up.
///
/// These surface as startup failures: a gate that returns one of these was
/// never constructed and will never service a request.
#[derive(Debug, Error)]
pub enum GateError {
    /// A configuration field was empty or whitespace-only.
    #[error("please provide a non-blank '{0}'")]
    BlankField(&'static str),
}

/// Why a request was turned away.
///
/// Every variant maps to the same client-visible outcome (a `401` with the
/// realm challenge); the distinction exists only for the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RejectReason {
    /// No `Authorization` header, or a blank one.
    #[error("missing or blank authorization header")]
    MissingHeader,

    /// The header did not split into exactly a scheme and a payload.
    #[error("malformed authorization header")]
    MalformedHeader,

    /// The scheme token was not the literal `Basic`.
    #[error("unsupported or malformed scheme")]
    UnsupportedScheme,

    /// The credentials payload was not valid standard base64.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(String),

    /// The decoded payload carried no `:` separator.
    #[error("missing ':' separator in credentials")]
    MissingSeparator,

    /// The username in front of the separator was blank.
    #[error("blank username in credentials")]
    BlankUsername,

    /// The backend looked at the credentials and said no.
    #[error("credentials rejected by backend")]
    BackendRejected,

    /// The backend could not be reached; the gate fails closed.
    #[error("verification backend unavailable")]
    BackendUnavailable,
}
