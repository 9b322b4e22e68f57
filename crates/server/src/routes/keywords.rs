//! Keyword route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};
use serde::Deserialize;

use trailmark_core::KeywordId;

use crate::error::AppError;
use crate::models::Keyword;
use crate::state::AppState;

/// Name-bearing payload for keyword requests.
#[derive(Debug, Deserialize)]
pub struct KeywordPayload {
    pub name: String,
}

/// Build the keywords router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/keywords", get(get_all).post(create))
        .route("/keywords/id/{id}", get(get_by_id))
        .route("/keywords/name/{name}", get(get_by_name))
        .route("/keywords/{id}", put(update).delete(soft_delete))
}

async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Keyword>>, AppError> {
    Ok(Json(state.keywords().get_all().await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<KeywordId>,
) -> Result<Json<Keyword>, AppError> {
    Ok(Json(state.keywords().get_by_id(id).await?))
}

async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Keyword>, AppError> {
    Ok(Json(state.keywords().get_by_name(&name).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<KeywordPayload>,
) -> Result<Json<Keyword>, AppError> {
    Ok(Json(state.keywords().create(&payload.name).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<KeywordId>,
    Json(payload): Json<KeywordPayload>,
) -> Result<Json<Keyword>, AppError> {
    Ok(Json(state.keywords().update(id, &payload.name).await?))
}

async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<KeywordId>,
) -> Result<Json<Keyword>, AppError> {
    Ok(Json(state.keywords().soft_delete(id).await?))
}
