use crate::modules::alumni_sync::domain::{ConnectionReport, DuplicateReport, SyncStats};
use crate::modules::jobs::SyncProgress;
use crate::shared::errors::{AppError, AppResult};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Debug, Serialize)]
pub struct SyncResponse {
    pub message: String,
    pub stats: SyncStats,
}

/// Admin routes, nested under `/api/admin`
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/sync-alumni", post(sync_alumni))
        .route("/sync-progress", get(sync_progress))
        .route("/sync-progress/:run_id", get(sync_run))
        .route("/test-connection", get(test_connection))
        .route("/alumni-duplicates", get(alumni_duplicates))
}

/// The run is spawned so a client disconnect does not cancel it
async fn sync_alumni(State(state): State<Arc<AppState>>) -> AppResult<Json<SyncResponse>> {
    let service = state.sync_service.clone();
    let stats = tokio::spawn(async move { service.sync().await }).await??;

    Ok(Json(SyncResponse {
        message: format!(
            "Google Sheets 동기화 완료: {}/{}건 업데이트",
            stats.synced, stats.total
        ),
        stats,
    }))
}

async fn sync_progress(State(state): State<Arc<AppState>>) -> Json<SyncProgress> {
    Json(state.job_tracker.get_sync_progress())
}

async fn sync_run(
    State(state): State<Arc<AppState>>,
    Path(run_id): Path<Uuid>,
) -> AppResult<Json<SyncProgress>> {
    state
        .job_tracker
        .get_run(run_id)
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Sync run {} not found", run_id)))
}

async fn test_connection(State(state): State<Arc<AppState>>) -> Json<ConnectionReport> {
    Json(state.sync_service.test_connection().await)
}

async fn alumni_duplicates(
    State(state): State<Arc<AppState>>,
) -> AppResult<Json<DuplicateReport>> {
    let report = state.sync_service.preview_duplicates().await?;
    Ok(Json(report))
}
