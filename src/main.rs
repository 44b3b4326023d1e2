//! Clubscreen server — pre-release game preview admission for clubs.
//!
//! Main entry point that wires all crates together and starts the server.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use clubscreen_auth::credential::{CredentialStore, SecretHasher};
use clubscreen_auth::directory::{AllotmentDirectory, PgAllotmentDirectory};
use clubscreen_auth::identity::IdentityCodec;
use clubscreen_auth::lease::{LeaseRegistry, PgLeaseRegistry};
use clubscreen_auth::session::{
    HeartbeatService, LeaseReaper, PlaybackGate, SessionAdmission,
};
use clubscreen_auth::token::SessionTokenIssuer;
use clubscreen_core::config::AppConfig;
use clubscreen_core::error::AppError;
use clubscreen_database::connection::DatabasePool;
use clubscreen_database::repositories::{AllotmentRepository, LeaseRepository};
use clubscreen_worker::ReaperScheduler;

#[tokio::main]
async fn main() {
    let env = std::env::var("CLUBSCREEN_ENV").unwrap_or_else(|_| "development".to_string());

    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting clubscreen v{}", env!("CARGO_PKG_VERSION"));

    // ── Database connection + migrations ─────────────────────────
    let db = DatabasePool::connect(&config.database).await?;
    clubscreen_database::migration::run_migrations(db.pool()).await?;

    // ── Repositories ─────────────────────────────────────────────
    let allotment_repo = Arc::new(AllotmentRepository::new(db.pool().clone()));
    let lease_repo = Arc::new(LeaseRepository::new(db.pool().clone()));

    // ── Directory and lease registry ─────────────────────────────
    // Both the occupancy count and the admission insert live in the shared
    // Postgres store; in-process state is never authoritative.
    let directory: Arc<dyn AllotmentDirectory> =
        Arc::new(PgAllotmentDirectory::new(Arc::clone(&allotment_repo)));
    let registry: Arc<dyn LeaseRegistry> = Arc::new(PgLeaseRegistry::new(
        Arc::clone(&lease_repo),
        config.lease.clone(),
    ));

    // ── Services ─────────────────────────────────────────────────
    let credential_store = Arc::new(CredentialStore::new(
        Arc::clone(&directory),
        SecretHasher::new(),
    ));
    let identity = Arc::new(IdentityCodec::new(&config.auth));
    let admission = Arc::new(SessionAdmission::new(
        Arc::clone(&credential_store),
        Arc::clone(&directory),
        Arc::clone(&identity),
        Arc::clone(&registry),
        SessionTokenIssuer::new(),
    ));
    let heartbeat = Arc::new(HeartbeatService::new(Arc::clone(&registry)));
    let playback = Arc::new(PlaybackGate::new(
        Arc::clone(&registry),
        Arc::clone(&directory),
        config.lease.clone(),
    ));

    // ── Reaper scheduler ─────────────────────────────────────────
    let scheduler = if config.lease.reaper.enabled {
        let reaper = Arc::new(LeaseReaper::new(
            Arc::clone(&registry),
            config.lease.clone(),
        ));
        let scheduler = ReaperScheduler::new(reaper).await?;
        scheduler
            .register_lease_sweep(&config.lease.reaper.schedule)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Reaper disabled");
        None
    };

    // ── HTTP server ──────────────────────────────────────────────
    let app_state = clubscreen_api::state::AppState {
        config: Arc::new(config.clone()),
        credential_store,
        identity,
        admission,
        heartbeat,
        playback,
    };

    let app = clubscreen_api::router::build_router(app_state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind {addr}: {e}")))?;

    tracing::info!("clubscreen server listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| AppError::internal(format!("Server error: {e}")))?;

    if let Some(scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    db.close().await;

    tracing::info!("clubscreen server stopped");
    Ok(())
}

/// Wait for SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown...");
}
