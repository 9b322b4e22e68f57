//! Tag route handlers, including the keyword attachment endpoints.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{delete, get, put},
};
use serde::Deserialize;

use trailmark_core::TagId;

use crate::error::AppError;
use crate::models::Tag;
use crate::state::AppState;

use super::keywords::KeywordPayload;

/// Name-bearing payload for tag requests.
#[derive(Debug, Deserialize)]
pub struct TagPayload {
    pub name: String,
}

/// Build the tags router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/tags", get(get_all).post(create))
        .route("/tags/id/{id}", get(get_by_id))
        .route("/tags/name/{name}", get(get_by_name))
        .route("/tags/{id}", put(update).delete(soft_delete))
        .route("/tags/keywords/{id}", put(add_keywords))
        .route("/tags/keywords/{id}/{name}", delete(remove_keyword))
}

async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Tag>>, AppError> {
    Ok(Json(state.tags().get_all().await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(state.tags().get_by_id(id).await?))
}

async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(state.tags().get_by_name(&name).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(payload): Json<TagPayload>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(state.tags().create(&payload.name).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
    Json(payload): Json<TagPayload>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(state.tags().update(id, &payload.name).await?))
}

async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(state.tags().soft_delete(id).await?))
}

async fn add_keywords(
    State(state): State<AppState>,
    Path(id): Path<TagId>,
    Json(payload): Json<Vec<KeywordPayload>>,
) -> Result<Json<Tag>, AppError> {
    let names: Vec<String> = payload.into_iter().map(|k| k.name).collect();
    Ok(Json(state.tags().add_keywords(id, &names).await?))
}

async fn remove_keyword(
    State(state): State<AppState>,
    Path((id, name)): Path<(TagId, String)>,
) -> Result<Json<Tag>, AppError> {
    Ok(Json(state.tags().remove_keyword(id, &name).await?))
}
