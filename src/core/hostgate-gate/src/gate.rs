//! The authentication gate.
//!
//! Orchestrates the three stages (header extraction, credential decoding,
//! backend verification) and owns the backend handle for its lifetime.

use std::net::SocketAddr;

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::backend::{BackendError, UserIdentity, VerifyBackend};
use crate::config::GateConfig;
use crate::credentials::decode_credentials;
use crate::error::{GateError, RejectReason};
use crate::header::extract_payload;

/// The outcome of one authentication check.
///
/// Whatever the [`RejectReason`], the client-visible response is the same
/// uniform `401` challenge; the reason goes to the audit log only.
#[derive(Debug)]
pub enum Decision {
    /// Credentials verified; the request proceeds with this identity.
    Pass(UserIdentity),
    /// The request is turned away with the realm challenge.
    Reject(RejectReason),
}

/// An initialized authentication gate.
///
/// Holds immutable configuration and the exclusively-owned backend handle.
/// A value of this type is always servable: failed initialization never
/// constructs one, and [`Gate::dispose`] is the only way out of service
/// (after which checks fail closed instead of panicking).
pub struct Gate {
    config: GateConfig,
    backend: Mutex<Option<Box<dyn VerifyBackend>>>,
}

impl Gate {
    /// Initializes the gate with a realm, a backend service name, and a
    /// live backend handle.
    ///
    /// Both strings are validated non-blank; acquiring the handle itself is
    /// the (fallible) job of the backend's constructor, so a gate never
    /// reaches service without one.
    pub fn initialize(
        realm: impl Into<String>,
        service: impl Into<String>,
        backend: Box<dyn VerifyBackend>,
    ) -> Result<Self, GateError> {
        let config = GateConfig::new(realm, service)?;
        info!(
            realm = %config.realm(),
            service = %config.service(),
            backend = backend.name(),
            "authentication gate ready"
        );
        Ok(Self {
            config,
            backend: Mutex::new(Some(backend)),
        })
    }

    /// The gate's configuration.
    pub fn config(&self) -> &GateConfig {
        &self.config
    }

    /// Runs one request through the gate.
    ///
    /// `header` is the raw `Authorization` value (absent if the client sent
    /// none); `client` is the caller's socket address, recorded with every
    /// log line to support intrusion detection.
    pub async fn authenticate(&self, header: Option<&str>, client: SocketAddr) -> Decision {
        let payload = match extract_payload(header) {
            Ok(payload) => payload,
            Err(reason) => {
                warn!(
                    header = header.unwrap_or(""),
                    client = %client,
                    "rejected request: {reason}"
                );
                return Decision::Reject(reason);
            }
        };

        let pair = match decode_credentials(payload) {
            Ok(pair) => pair,
            Err(err) => {
                // err.detail is pre-masked; safe to log.
                warn!(client = %client, detail = %err.detail, "rejected request: {}", err.reason);
                return Decision::Reject(err.reason);
            }
        };

        let mut slot = self.backend.lock().await;
        let backend = match slot.as_mut() {
            Some(backend) => backend,
            None => {
                error!(client = %client, "gate already disposed, failing closed");
                return Decision::Reject(RejectReason::BackendUnavailable);
            }
        };

        match backend
            .verify(self.config.service(), pair.username(), pair.password())
            .await
        {
            Ok(identity) => {
                info!(
                    username = %identity.username,
                    client = %client,
                    uid = ?identity.uid,
                    gid = ?identity.gid,
                    groups = ?identity.groups,
                    "authentication succeeded"
                );
                Decision::Pass(identity)
            }
            Err(BackendError::Rejected(message)) => {
                warn!(
                    username = pair.username(),
                    client = %client,
                    "authentication failed: {message}"
                );
                Decision::Reject(RejectReason::BackendRejected)
            }
            Err(BackendError::Unavailable(message)) => {
                // Never authenticate on backend failure.
                error!(
                    username = pair.username(),
                    client = %client,
                    "verification backend unavailable, failing closed: {message}"
                );
                Decision::Reject(RejectReason::BackendUnavailable)
            }
        }
    }

    /// Releases the backend handle.
    ///
    /// The backend's `dispose` is invoked exactly once; calling this again
    /// is a no-op, and authentication checks after it fail closed.
    pub async fn dispose(&self) {
        let mut slot = self.backend.lock().await;
        match slot.take() {
            Some(mut backend) => {
                backend.dispose().await;
                info!(backend = backend.name(), "authentication gate disposed");
            }
            None => debug!("gate already disposed"),
        }
    }
}
