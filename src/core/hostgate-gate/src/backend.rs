//! Verification backend trait.
//!
//! The gate never talks to a concrete credential store; it holds a single,
//! exclusively-owned handle to something implementing [`VerifyBackend`]
//! (a PAM stack, a local users file, a test double).

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identity attributes reported by the backend on success.
///
/// Used for logging and audit trails only, never for authorization
/// decisions in this component.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserIdentity {
    /// The verified account name.
    pub username: String,
    /// Numeric user identifier, if the backend knows one.
    pub uid: Option<u32>,
    /// Numeric primary group identifier, if the backend knows one.
    pub gid: Option<u32>,
    /// Group memberships, if the backend reports them.
    #[serde(default)]
    pub groups: Vec<String>,
}

impl UserIdentity {
    /// An identity carrying only the account name.
    pub fn named(username: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            uid: None,
            gid: None,
            groups: Vec::new(),
        }
    }
}

/// Errors reported by a verification backend.
///
/// The failure messages may be logged; implementations must never put the
/// presented password into them.
#[derive(Debug, Error)]
pub enum BackendError {
    /// The backend examined the credentials and refused them (no such
    /// user, bad password, account locked, and so on).
    #[error("credentials rejected: {0}")]
    Rejected(String),

    /// The verification capability itself could not be used. The gate
    /// fails closed on this.
    #[error("backend unavailable: {0}")]
    Unavailable(String),
}

/// Trait for credential-verification backends.
///
/// Implementations are not required to be safe for concurrent calls: the
/// gate serializes access by taking `&mut self` behind a lock held for the
/// duration of the call.
#[async_trait]
pub trait VerifyBackend: Send + Sync {
    /// Verifies a username/password pair under the given service
    /// (verification policy/namespace).
    ///
    /// # Returns
    ///
    /// * `Ok(UserIdentity)` - If the credentials verify
    /// * `Err(BackendError)` - If they are rejected, or the backend failed
    async fn verify(
        &mut self,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<UserIdentity, BackendError>;

    /// Releases any resources held by the backend.
    ///
    /// The gate calls this exactly once, at shutdown.
    async fn dispose(&mut self) {}

    /// Returns the name of this backend for logging/debugging.
    fn name(&self) -> &'static str;
}
