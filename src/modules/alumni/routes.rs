use crate::modules::alumni::domain::AlumniRecord;
use crate::shared::errors::{AppError, AppResult};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    routing::{get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
pub struct NameQuery {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct MatchQuery {
    pub name: String,
    pub generation: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkUserRequest {
    pub user_id: i32,
}

/// Directory routes, nested under `/api/alumni`
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(search_alumni))
        .route("/match", get(find_exact_match))
        .route("/:id/match", post(link_user))
}

async fn search_alumni(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NameQuery>,
) -> AppResult<Json<Vec<AlumniRecord>>> {
    let records = state.directory_service.search_by_name(&query.name).await?;
    Ok(Json(records))
}

async fn find_exact_match(
    State(state): State<Arc<AppState>>,
    Query(query): Query<MatchQuery>,
) -> AppResult<Json<AlumniRecord>> {
    state
        .directory_service
        .find_exact_match(&query.name, query.generation.as_deref())
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No alumni named '{}'", query.name.trim())))
}

async fn link_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(request): Json<LinkUserRequest>,
) -> AppResult<Json<AlumniRecord>> {
    let record = state
        .directory_service
        .link_user(id, request.user_id)
        .await?;
    Ok(Json(record))
}
