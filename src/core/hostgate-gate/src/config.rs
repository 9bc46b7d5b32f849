//! Gate configuration.

use crate::GateError;

/// Immutable gate configuration, validated once at initialization.
#[derive(Debug, Clone)]
pub struct GateConfig {
    realm: String,
    service: String,
}

impl GateConfig {
    /// Creates a configuration from a realm and a backend service name.
    ///
    /// Both values must be non-blank (whitespace-only counts as blank);
    /// construction fails otherwise. The realm is echoed verbatim into the
    /// `WWW-Authenticate` challenge, so callers must supply one free of
    /// characters that would break the header syntax (no embedded quotes).
    pub fn new(realm: impl Into<String>, service: impl Into<String>) -> Result<Self, GateError> {
        let realm = check_not_blank(realm.into(), "realm")?;
        let service = check_not_blank(service.into(), "service")?;
        Ok(Self { realm, service })
    }

    /// The protection-space label presented to clients in the challenge.
    pub fn realm(&self) -> &str {
        &self.realm
    }

    /// The backend service (verification policy/namespace) to authenticate against.
    pub fn service(&self) -> &str {
        &self.service
    }

    /// The full `WWW-Authenticate` challenge value for this realm.
    pub fn challenge(&self) -> String {
        format!("Basic realm=\"{}\"", self.realm)
    }
}

fn check_not_blank(value: String, name: &'static str) -> Result<String, GateError> {
    if value.trim().is_empty() {
        return Err(GateError::BlankField(name));
    }
    Ok(value)
}
