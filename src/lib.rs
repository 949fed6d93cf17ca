pub mod modules;
pub mod schema;
pub mod shared;
pub mod state;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{header::CONTENT_TYPE, Method},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::{net::TcpListener, signal, task};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use modules::{
    alumni::{self, AlumniRepository, AlumniRepositoryImpl},
    alumni_sync,
    sheets::{GoogleSheetsClient, SpreadsheetSource},
};
use shared::infrastructure::PoolStatus;
use shared::utils::init_logger;
use shared::{AppConfig, Database};
use state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: Option<PoolStatus>,
}

/// Full HTTP surface, shared by `run` and the router tests
pub fn build_router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(health))
        .nest("/api/admin", alumni_sync::routes::router())
        .nest("/api/alumni", alumni::routes::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database = state.database.as_ref().map(|db| db.pool_status());
    let status = if database.is_some() { "ok" } else { "degraded" };

    Json(HealthResponse { status, database })
}

pub async fn run() -> anyhow::Result<()> {
    init_logger();

    let config = AppConfig::from_env()?;

    log::info!("Connecting to database...");
    let database = Arc::new(Database::new(config.database_url.as_deref())?);

    let migration_db = Arc::clone(&database);
    let applied = task::spawn_blocking(move || migration_db.run_migrations()).await??;
    log::info!("Database migrations completed ({} applied)", applied);

    if !config.sheets.is_configured() {
        log::warn!(
            "ALUMNI_SPREADSHEET_ID or Google credentials missing; sync will report an unavailable source"
        );
    }

    let repository: Arc<dyn AlumniRepository> =
        Arc::new(AlumniRepositoryImpl::new(Arc::clone(&database)));
    let source: Arc<dyn SpreadsheetSource> =
        Arc::new(GoogleSheetsClient::new(config.sheets.clone())?);

    let state = AppState::new(config, Some(database), repository, source)?;
    let app = build_router(Arc::clone(&state));

    let address = format!("0.0.0.0:{}", state.config.port);
    let listener = TcpListener::bind(&address).await?;
    log::info!("Server running on {address}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    log::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => log::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                log::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                log::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                log::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
