use axum::{
    extract::State,
    http::StatusCode,
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Json, Router,
};
use rail_shared::{Train, TrainRequest};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::extract::{ApiJson, ApiPath, ApiQuery};
use crate::middleware::{enforce_role, Role, RoleGuard};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RouteQuery {
    pub source: String,
    pub destination: String,
}

pub fn routes(state: &AppState) -> Router<AppState> {
    let admin = from_fn_with_state(RoleGuard::new(&state.auth, Role::Admin), enforce_role);

    Router::new()
        .route(
            "/api/trains",
            get(list_trains).merge(post(create_train).route_layer(admin.clone())),
        )
        .route("/api/trains/search", get(search_trains))
        .route(
            "/api/trains/{id}",
            get(get_train).merge(put(update_train).delete(delete_train).route_layer(admin)),
        )
}

/// GET /api/trains
async fn list_trains(State(state): State<AppState>) -> Result<Json<Vec<Train>>, AppError> {
    Ok(Json(state.catalog.all_trains().await?))
}

/// GET /api/trains/{id}
async fn get_train(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<Json<Train>, AppError> {
    state
        .catalog
        .train_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Train not found with id: {}", id)))
}

/// GET /api/trains/search?source=&destination=
async fn search_trains(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<RouteQuery>,
) -> Result<Json<Vec<Train>>, AppError> {
    Ok(Json(state.catalog.trains_by_route(&query.source, &query.destination).await?))
}

/// POST /api/trains (admin)
async fn create_train(
    State(state): State<AppState>,
    ApiJson(req): ApiJson<TrainRequest>,
) -> Result<Json<Train>, AppError> {
    Ok(Json(state.catalog.add_train(req).await?))
}

/// PUT /api/trains/{id} (admin)
async fn update_train(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
    ApiJson(req): ApiJson<TrainRequest>,
) -> Result<Json<Train>, AppError> {
    Ok(Json(state.catalog.update_train(id, req).await?))
}

/// DELETE /api/trains/{id} (admin)
async fn delete_train(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<Uuid>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_train(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
