//! # Hostgate HTTP
//!
//! The axum adapter around [`hostgate_gate::Gate`].
//!
//! Wire it into a router with [`axum::middleware::from_fn_with_state`]:
//!
//! ```ignore
//! let gate = Arc::new(Gate::initialize(realm, service, backend)?);
//! let app = Router::new()
//!     .route("/", get(handler))
//!     .layer(middleware::from_fn_with_state(gate, require_basic_auth));
//! ```
//!
//! Authenticated requests proceed with an [`AuthenticatedUser`] extension;
//! everything else receives a uniform `401` carrying the realm challenge.
//! The specific rejection reason never reaches the client, only the log.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    extract::{ConnectInfo, Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};

use hostgate_gate::{Decision, Gate, GateConfig, UserIdentity};

/// The verified identity of the caller, attached as a request extension on
/// successful authentication. Audit/diagnostic use only.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub UserIdentity);

/// Middleware that runs every request through the gate.
///
/// The raw `Authorization` value (absent if the client sent none, or sent
/// one that is not valid header text) and the caller's socket address are
/// handed to the gate; the decision maps to pass-through or a challenge.
pub async fn require_basic_auth(
    State(gate): State<Arc<Gate>>,
    ConnectInfo(client): ConnectInfo<SocketAddr>,
    mut request: Request,
    next: Next,
) -> Response {
    let header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned);

    match gate.authenticate(header.as_deref(), client).await {
        Decision::Pass(identity) => {
            request.extensions_mut().insert(AuthenticatedUser(identity));
            next.run(request).await
        }
        Decision::Reject(_) => challenge(gate.config()),
    }
}

/// The uniform rejection response: `401` plus the realm challenge.
fn challenge(config: &GateConfig) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        [(header::WWW_AUTHENTICATE, config.challenge())],
    )
        .into_response()
}
