use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{errors::ApiError, services::warehouses::WarehouseInput, AppState};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

async fn list_warehouses(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let warehouses = state
        .services
        .warehouses
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(warehouses))
}

async fn create_warehouse(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<WarehouseInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .warehouses
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(serde_json::json!({
        "message": "Warehouse created successfully"
    })))
}

async fn update_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<WarehouseInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .warehouses
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Warehouse updated successfully"
    })))
}

async fn delete_warehouse(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .warehouses
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_warehouses))
        .route("/", post(create_warehouse))
        .route("/:id", put(update_warehouse))
        .route("/:id", delete(delete_warehouse))
}
