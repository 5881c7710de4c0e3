use super::common::{map_service_error, success_response};
use crate::{errors::ApiError, outbox, AppState};
use axum::{
    extract::{Path, State},
    response::IntoResponse,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use uuid::Uuid;

/// Sales documents staged but not yet delivered to the document store.
async fn pending_deliveries(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = outbox::pending_rows(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// Deliveries that exhausted their retry budget.
async fn failed_deliveries(
    State(state): State<Arc<AppState>>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = outbox::failed_rows(&state.db)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

/// Requeue a failed delivery with a fresh attempt budget.
async fn retry_delivery(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    outbox::requeue(&state.db, id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(serde_json::json!({
        "message": "Delivery requeued"
    })))
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/pending", get(pending_deliveries))
        .route("/failed", get(failed_deliveries))
        .route("/:id/retry", post(retry_delivery))
}
