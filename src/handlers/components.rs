use super::common::{
    created_response, map_service_error, no_content_response, success_response, validate_input,
};
use crate::{errors::ApiError, services::components::ComponentInput, AppState};
use axum::{
    extract::{Json, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;

const EXPORT_FILENAME: &str = "components.json";

/// List in-stock components merged into batch groups.
async fn list_components(State(state): State<Arc<AppState>>) -> Result<impl IntoResponse, ApiError> {
    let components = state
        .services
        .components
        .list()
        .await
        .map_err(map_service_error)?;
    Ok(success_response(components))
}

/// Per-row breakdown of one batch group.
async fn component_detail(
    State(state): State<Arc<AppState>>,
    Path((name, component_type_id)): Path<(String, i32)>,
) -> Result<impl IntoResponse, ApiError> {
    let rows = state
        .services
        .components
        .detail(&name, component_type_id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(rows))
}

async fn create_component(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<ComponentInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    state
        .services
        .components
        .create(payload)
        .await
        .map_err(map_service_error)?;
    Ok(created_response(serde_json::json!({
        "message": "Component created successfully"
    })))
}

/// Update a component. The response carries the view the client should
/// navigate to, decided from what remains of the batch after the commit.
async fn update_component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
    Json(payload): Json<ComponentInput>,
) -> Result<impl IntoResponse, ApiError> {
    validate_input(&payload)?;
    let redirect = state
        .services
        .components
        .update(id, payload)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(redirect))
}

async fn delete_component(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<impl IntoResponse, ApiError> {
    let redirect = state
        .services
        .components
        .delete(id)
        .await
        .map_err(map_service_error)?;
    Ok(success_response(redirect))
}

/// Download the full component inventory as a JSON attachment.
async fn export_components(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let document = state
        .services
        .components
        .export()
        .await
        .map_err(map_service_error)?
        .ok_or_else(|| ApiError::NotFound("no component data to export".to_string()))?;

    let body = serde_json::to_vec(&document)
        .map_err(|e| ApiError::ServiceError(e.into()))?;
    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "application/json".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", EXPORT_FILENAME),
            ),
        ],
        body,
    )
        .into_response())
}

/// Restore component inventory from an uploaded JSON file. Only
/// `application/json` parts are accepted.
async fn import_components(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    let field = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {}", e)))?
        .ok_or_else(|| ApiError::BadRequest("missing file field".to_string()))?;

    match field.content_type() {
        Some("application/json") => {}
        other => {
            return Err(ApiError::BadRequest(format!(
                "expected an application/json file, got {}",
                other.unwrap_or("no content type")
            )))
        }
    }

    let bytes = field
        .bytes()
        .await
        .map_err(|e| ApiError::BadRequest(format!("could not read upload: {}", e)))?;
    let document: serde_json::Value = serde_json::from_slice(&bytes)
        .map_err(|e| ApiError::BadRequest(format!("file is not valid JSON: {}", e)))?;

    state
        .services
        .components
        .import(&document)
        .await
        .map_err(map_service_error)?;
    Ok(no_content_response())
}

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(list_components))
        .route("/", post(create_component))
        .route("/detail/:name/:component_type_id", get(component_detail))
        .route("/export", get(export_components))
        .route("/import", post(import_components))
        .route("/:id", put(update_component))
        .route("/:id", delete(delete_component))
}
