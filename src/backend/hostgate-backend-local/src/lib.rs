//! # Hostgate Backend - Local Users
//!
//! A [`VerifyBackend`] backed by a JSON users file, for hosts that do not
//! want to (or cannot) wire the gate to the system's own credential store.
//! Passwords are stored as Argon2id PHC hashes, namespaced by service so
//! one file can carry distinct verification policies.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::collections::HashMap;
use std::path::Path;

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use hostgate_gate::{BackendError, UserIdentity, VerifyBackend};

/// One account in the users file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserEntry {
    /// Argon2id hash of the account's password, in PHC string format.
    pub password_hash: String,
    /// Numeric user identifier, reported in audit logs.
    #[serde(default)]
    pub uid: Option<u32>,
    /// Numeric primary group identifier, reported in audit logs.
    #[serde(default)]
    pub gid: Option<u32>,
    /// Group memberships, reported in audit logs.
    #[serde(default)]
    pub groups: Vec<String>,
}

/// Service name → username → account entry.
pub type ServiceUsers = HashMap<String, HashMap<String, UserEntry>>;

/// Errors raised while loading the users file.
///
/// These are startup failures: a backend that returns one of these never
/// reaches the gate.
#[derive(Debug, Error)]
pub enum LocalBackendError {
    /// The users file could not be read.
    #[error("failed to read users file: {0}")]
    Io(#[from] std::io::Error),

    /// The users file is not valid JSON of the expected shape.
    #[error("failed to parse users file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Verification backend over an in-memory table loaded from a users file.
pub struct LocalUsersBackend {
    services: ServiceUsers,
}

impl LocalUsersBackend {
    /// Loads the users file at `path`.
    ///
    /// The file is a JSON object mapping service names to objects mapping
    /// usernames to [`UserEntry`] values.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LocalBackendError> {
        let path = path.as_ref();
        debug!(path = %path.display(), "loading users file");

        let raw = std::fs::read_to_string(path)?;
        let services: ServiceUsers = serde_json::from_str(&raw)?;

        info!(
            path = %path.display(),
            services = services.len(),
            "local users backend ready"
        );
        Ok(Self { services })
    }

    /// Builds a backend from an already-assembled table.
    pub fn from_services(services: ServiceUsers) -> Self {
        Self { services }
    }
}

#[async_trait]
impl VerifyBackend for LocalUsersBackend {
    async fn verify(
        &mut self,
        service: &str,
        username: &str,
        password: &str,
    ) -> Result<UserIdentity, BackendError> {
        // An unknown service is a configuration problem, not a bad login.
        let users = self.services.get(service).ok_or_else(|| {
            BackendError::Unavailable(format!("no such service '{service}' in users file"))
        })?;

        let entry = users
            .get(username)
            .ok_or_else(|| BackendError::Rejected(format!("unknown user '{username}'")))?;

        let parsed_hash = PasswordHash::new(&entry.password_hash).map_err(|_| {
            BackendError::Unavailable(format!("invalid password hash for user '{username}'"))
        })?;

        Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .map_err(|_| BackendError::Rejected("password verification failed".into()))?;

        Ok(UserIdentity {
            username: username.to_string(),
            uid: entry.uid,
            gid: entry.gid,
            groups: entry.groups.clone(),
        })
    }

    async fn dispose(&mut self) {
        self.services.clear();
        debug!("local users backend disposed");
    }

    fn name(&self) -> &'static str {
        "local-users"
    }
}
