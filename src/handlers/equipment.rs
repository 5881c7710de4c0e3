use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{
    auth::AuthenticatedUser,
    errors::ApiError,
    services::equipment::{AssembleEquipmentRequest, EditEquipmentRequest, EditProductionRequest},
    AppState,
};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

/// List equipment with consumed component names collected per instance.
async fn list_equipment(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let equipment = state
        .services
        .equipment
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(equipment))
}

/// Components offerable on the assembly form (in stock only).
async fn eligible_components(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let components = state
        .services
        .equipment
        .eligible_components()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(components))
}

/// Assemble a new equipment instance from selected components.
async fn assemble_equipment(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<AssembleEquipmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .equipment
        .assemble(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(serde_json::json!({
        "message": "Equipment assembled successfully"
    })))
}

async fn update_equipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<EditEquipmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .equipment
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Equipment updated successfully"
    })))
}

async fn update_production(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<EditProductionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .equipment
        .update_production(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Production record updated successfully"
    })))
}

async fn delete_equipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .equipment
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

/// Place an order for an equipment instance on behalf of the
/// authenticated user.
async fn order_equipment(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    user: AuthenticatedUser,
) -> Result<impl IntoResponse, ApiError> {
    let placed = state
        .services
        .orders
        .place(id, user.user_id)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(placed))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_equipment))
        .route("/", post(assemble_equipment))
        .route("/components/eligible", get(eligible_components))
        .route("/:id", put(update_equipment))
        .route("/:id", delete(delete_equipment))
        .route("/:id/production", put(update_production))
        .route("/:id/order", post(order_equipment))
}
