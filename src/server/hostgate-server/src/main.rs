//! Hostgate Server - Main entry point.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use axum::{extract::Extension, middleware, routing::get, Json, Router};
use clap::Parser;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use hostgate_backend_local::LocalUsersBackend;
use hostgate_gate::Gate;
use hostgate_http::{require_basic_auth, AuthenticatedUser};

#[derive(Parser)]
#[command(name = "hostgate-server")]
#[command(about = "Hostgate - HTTP Basic Auth gate over a host-level backend")]
#[command(version)]
struct Cli {
    /// Server bind address
    #[arg(long, default_value = "0.0.0.0:8300", env = "HOSTGATE_BIND_ADDRESS")]
    bind: String,

    /// Realm presented to clients in the 401 challenge
    #[arg(long, env = "HOSTGATE_REALM")]
    realm: String,

    /// Backend service (verification policy/namespace) to authenticate against
    #[arg(long, default_value = "login", env = "HOSTGATE_SERVICE")]
    service: String,

    /// Path to the users file for the local backend
    #[arg(long, env = "HOSTGATE_USERS")]
    users: PathBuf,
}

async fn health() -> &'static str {
    "ok"
}

async fn whoami(Extension(user): Extension<AuthenticatedUser>) -> Json<hostgate_gate::UserIdentity> {
    Json(user.0)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    tracing::info!("Starting Hostgate server...");
    tracing::info!("Bind address: {}", cli.bind);

    let backend = LocalUsersBackend::open(&cli.users)
        .with_context(|| format!("failed to load users file {}", cli.users.display()))?;
    let gate = Arc::new(
        Gate::initialize(cli.realm, cli.service, Box::new(backend))
            .context("failed to initialize authentication gate")?,
    );

    let app = Router::new()
        .route("/", get(health))
        .route("/whoami", get(whoami))
        .layer(middleware::from_fn_with_state(
            gate.clone(),
            require_basic_auth,
        ))
        .layer(TraceLayer::new_for_http());

    let listener = tokio::net::TcpListener::bind(&cli.bind)
        .await
        .with_context(|| format!("failed to bind {}", cli.bind))?;

    tracing::info!("Hostgate server started successfully");

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    tracing::info!("Shutting down...");
    gate.dispose().await;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to listen for ctrl-c: {e}");
    }
}
