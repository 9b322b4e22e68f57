//! Spot route handlers, including search, pagination and the category/tag
//! attachment endpoints.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    routing::{delete, get, post, put},
};
use serde::Deserialize;

use trailmark_core::SpotId;

use crate::error::AppError;
use crate::models::{Spot, SpotDraft};
use crate::services::SpotQuery;
use crate::state::AppState;

use super::tags::TagPayload;

/// Name-bearing payload for category attachment requests.
#[derive(Debug, Deserialize)]
pub struct CategoryPayload {
    pub name: String,
}

/// Page/limit query parameters; the window arithmetic lives here, not in the
/// service.
#[derive(Debug, Deserialize)]
pub struct PaginationParams {
    #[serde(default)]
    pub page: Option<i64>,
    #[serde(default)]
    pub limit: Option<i64>,
}

/// Build the spots router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/spots", get(get_all).post(create))
        .route("/spots/request", post(search))
        .route("/spots/pagination", get(paginate))
        .route("/spots/id/{id}", get(get_by_id))
        .route("/spots/name/{name}", get(get_by_name))
        .route("/spots/{id}", put(update).delete(soft_delete))
        .route("/spots/categories/{id}", put(add_categories))
        .route("/spots/categories/{id}/{name}", delete(remove_category))
        .route("/spots/tags/{id}", put(add_tags))
        .route("/spots/tags/{id}/{name}", delete(remove_tag))
}

async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Spot>>, AppError> {
    Ok(Json(state.spots().get_all().await?))
}

async fn search(
    State(state): State<AppState>,
    Json(query): Json<SpotQuery>,
) -> Result<Json<Vec<Spot>>, AppError> {
    Ok(Json(state.spots().search(query).await?))
}

async fn paginate(
    State(state): State<AppState>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<Vec<Spot>>, AppError> {
    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    let offset = (page - 1) * limit;

    Ok(Json(state.spots().paginate(offset, limit).await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<SpotId>,
) -> Result<Json<Spot>, AppError> {
    Ok(Json(state.spots().get_by_id(id).await?))
}

async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Spot>, AppError> {
    Ok(Json(state.spots().get_by_name(&name).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(draft): Json<SpotDraft>,
) -> Result<Json<Spot>, AppError> {
    Ok(Json(state.spots().create(draft).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<SpotId>,
    Json(draft): Json<SpotDraft>,
) -> Result<Json<Spot>, AppError> {
    Ok(Json(state.spots().update(id, draft).await?))
}

async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<SpotId>,
) -> Result<Json<Spot>, AppError> {
    Ok(Json(state.spots().soft_delete(id).await?))
}

async fn add_categories(
    State(state): State<AppState>,
    Path(id): Path<SpotId>,
    Json(payload): Json<Vec<CategoryPayload>>,
) -> Result<Json<Spot>, AppError> {
    let names: Vec<String> = payload.into_iter().map(|c| c.name).collect();
    Ok(Json(state.spots().add_categories(id, &names).await?))
}

async fn remove_category(
    State(state): State<AppState>,
    Path((id, name)): Path<(SpotId, String)>,
) -> Result<Json<Spot>, AppError> {
    Ok(Json(state.spots().remove_category(id, &name).await?))
}

async fn add_tags(
    State(state): State<AppState>,
    Path(id): Path<SpotId>,
    Json(payload): Json<Vec<TagPayload>>,
) -> Result<Json<Spot>, AppError> {
    let names: Vec<String> = payload.into_iter().map(|t| t.name).collect();
    Ok(Json(state.spots().add_tags(id, &names).await?))
}

async fn remove_tag(
    State(state): State<AppState>,
    Path((id, name)): Path<(SpotId, String)>,
) -> Result<Json<Spot>, AppError> {
    Ok(Json(state.spots().remove_tag(id, &name).await?))
}
