pub mod bracket;
pub mod bracket_commands;
pub mod config;
pub mod error;
pub mod qualification;
pub mod roster;
pub mod tournament;
pub mod types;

use config::*;
use error::{BracketError, Result};
use roster::load_roster;
use tournament::Tournament;
use types::*;

use axum::{
    routing::{get, post},
    Router,
};
use std::{
    fs,
    path::PathBuf,
    sync::{Arc, Mutex},
};
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

// ── Router ─────────────────────────────────────────────────────────────

pub fn build_router(shared: SharedTournament, static_dir: Option<PathBuf>) -> Router {
    let router = Router::new()
        .route("/state.json", get(bracket_commands::bracket_state))
        .route(
            "/api/groups/:index/options/:position",
            get(bracket_commands::qualifier_options),
        )
        .route("/api/qualifier", post(bracket_commands::select_qualifier))
        .route("/api/winner", post(bracket_commands::select_winner))
        .route("/api/final-winner", post(bracket_commands::select_final_winner))
        .route("/api/reset", post(bracket_commands::reset_bracket));

    let router = match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    };
    router.with_state(shared)
}

async fn start_server(shared: SharedTournament, static_dir: Option<PathBuf>, addr: &str) -> Result<()> {
    let app = build_router(shared, static_dir);
    let listener = TcpListener::bind(addr).await.map_err(|e| {
        error!("bracket server failed to bind {addr}: {e}");
        BracketError::Server(format!("bind {addr}: {e}"))
    })?;
    info!("bracket server listening at http://{addr}/");
    axum::serve(listener, app).await.map_err(|e| {
        error!("bracket server error: {e}");
        BracketError::Server(e.to_string())
    })
}

// ── Entry point ────────────────────────────────────────────────────────

pub fn run() -> Result<()> {
    let env_applied = load_env_file();

    // Initialize tracing with a daily rolling log file
    let logs_dir = logs_dir();
    fs::create_dir_all(&logs_dir).ok();
    let file_appender = tracing_appender::rolling::daily(&logs_dir, LOG_FILE_NAME);
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(non_blocking)
        .with_ansi(false)
        .init();
    info!(env_applied, "Knockout bracket starting");

    let config = load_config_inner()?;
    log_config_warnings(&config);

    let roster_path = roster_path_from_config(&config);
    let roster = load_roster(roster_path.as_deref())?;
    match &roster_path {
        Some(path) => info!("loaded roster {} from {}", roster.event.name, path.display()),
        None => info!("using built-in roster {}", roster.event.name),
    }

    let shared: SharedTournament = Arc::new(Mutex::new(Tournament::new(roster)?));
    let static_dir = static_dir_from_config(&config).filter(|dir| dir.is_dir());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| BracketError::Server(format!("start runtime: {e}")))?;
    runtime.block_on(start_server(shared, static_dir, &config.bind_addr))
}
