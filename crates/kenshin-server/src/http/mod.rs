pub mod analyze;
pub mod auth;
pub mod data;
pub mod file;
pub mod health;
pub mod logs;
pub mod settings;

use crate::AppState;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kenshin_api::ApiError;
use kenshin_store::{HealthStore, StoreError};
use serde_json::json;
use std::sync::Arc;

/// Map an [`ApiError`] to its response: status from the error code, body
/// carrying both the flat `message` the UI banners show and the structured
/// envelope.
pub(crate) fn api_error_response(err: ApiError) -> Response {
    let status = StatusCode::from_u16(err.http_status())
        .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = Json(json!({"message": err.message.clone(), "error": err}));
    (status, body).into_response()
}

/// Run one blocking store operation on the worker pool. rusqlite is
/// synchronous; handlers must not block the async runtime with it.
pub(crate) async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, StoreError>
where
    F: FnOnce(&dyn HealthStore) -> Result<T, StoreError> + Send + 'static,
    T: Send + 'static,
{
    let store = Arc::clone(&state.store);
    match tokio::task::spawn_blocking(move || op(store.as_ref())).await {
        Ok(result) => result,
        Err(e) => Err(StoreError::Db(format!("store worker failed: {e}"))),
    }
}

/// Store failures surface as a generic 500; the cause goes to the log, not
/// the client.
pub(crate) fn store_error_response(request_id: &str, route: &str, err: &StoreError) -> Response {
    tracing::error!(request_id = %request_id, route = %route, error = %err, "store operation failed");
    api_error_response(ApiError::store_failure())
}
