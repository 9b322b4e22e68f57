//! Plan route handlers.

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::{get, put},
};

use trailmark_core::PlanId;

use crate::error::AppError;
use crate::models::{Plan, PlanDraft};
use crate::state::AppState;

/// Build the plans router.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/plans", get(get_all).post(create))
        .route("/plans/id/{id}", get(get_by_id))
        .route("/plans/name/{name}", get(get_by_name))
        .route("/plans/{id}", put(update).delete(soft_delete))
}

async fn get_all(State(state): State<AppState>) -> Result<Json<Vec<Plan>>, AppError> {
    Ok(Json(state.plans().get_all().await?))
}

async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<PlanId>,
) -> Result<Json<Plan>, AppError> {
    Ok(Json(state.plans().get_by_id(id).await?))
}

async fn get_by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Plan>, AppError> {
    Ok(Json(state.plans().get_by_name(&name).await?))
}

async fn create(
    State(state): State<AppState>,
    Json(draft): Json<PlanDraft>,
) -> Result<Json<Plan>, AppError> {
    Ok(Json(state.plans().create(draft).await?))
}

async fn update(
    State(state): State<AppState>,
    Path(id): Path<PlanId>,
    Json(draft): Json<PlanDraft>,
) -> Result<Json<Plan>, AppError> {
    Ok(Json(state.plans().update(id, draft).await?))
}

async fn soft_delete(
    State(state): State<AppState>,
    Path(id): Path<PlanId>,
) -> Result<Json<Plan>, AppError> {
    Ok(Json(state.plans().soft_delete(id).await?))
}
