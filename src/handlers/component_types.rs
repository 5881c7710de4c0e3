use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{errors::ApiError, services::component_types::ComponentTypeInput, AppState};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

async fn list_component_types(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let types = state
        .services
        .component_types
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(types))
}

async fn create_component_type(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ComponentTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .component_types
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(serde_json::json!({
        "message": "Component type created successfully"
    })))
}

async fn update_component_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ComponentTypeInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .component_types
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Component type updated successfully"
    })))
}

async fn delete_component_type(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .component_types
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_component_types))
        .route("/", post(create_component_type))
        .route("/:id", put(update_component_type))
        .route("/:id", delete(delete_component_type))
}
