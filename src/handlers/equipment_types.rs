use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{errors::ApiError, services::equipment_types::EquipmentTypeInput, AppState};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

async fn list_equipment_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let types = state
        .services
        .equipment_types
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(types))
}

async fn create_equipment_type(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<EquipmentTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .equipment_types
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(serde_json::json!({
        "message": "Equipment type created successfully"
    })))
}

async fn update_equipment_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<EquipmentTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .equipment_types
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Equipment type updated successfully"
    })))
}

async fn delete_equipment_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .equipment_types
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_equipment_types))
        .route("/", post(create_equipment_type))
        .route("/:id", put(update_equipment_type))
        .route("/:id", delete(delete_equipment_type))
}
