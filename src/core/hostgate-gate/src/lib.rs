//! # Hostgate Gate
//!
//! The authentication gate at the front of an HTTP request pipeline.
//!
//! Requests carrying an `Authorization: Basic <base64(username:password)>`
//! header are checked against a pluggable, host-level verification backend
//! (a PAM-style credential store behind the [`VerifyBackend`] trait).
//! Requests that verify pass through; everything else is answered with a
//! uniform `401` challenge carrying the configured realm.
//!
//! This crate is framework-agnostic: it decides, it does not serve. The
//! axum glue lives in `hostgate-http`.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod backend;
pub mod config;
pub mod credentials;
pub mod error;
pub mod gate;
pub mod header;
pub mod mask;

pub use backend::{BackendError, UserIdentity, VerifyBackend};
pub use config::GateConfig;
pub use credentials::CredentialPair;
pub use error::{GateError, RejectReason};
pub use gate::{Decision, Gate};
