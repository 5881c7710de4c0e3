use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, services::shipping_guides::ShippingGuideInput, AppState};
use axum::{
    extract::{Json, Path, State},
    response::IntoResponse,
    routing::{get, put},
    Router,
};
use std::sync::Arc;

async fn list_shipping_guides(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let guides = state
        .services
        .shipping_guides
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(guides))
}

async fn update_shipping_guide(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ShippingGuideInput>,
) -> Result<impl IntoResponse, ApiError> {
    state
        .services
        .shipping_guides
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Shipping guide updated successfully"
    })))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_shipping_guides))
        .route("/:id", put(update_shipping_guide))
}
