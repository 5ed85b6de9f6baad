use super::{api_error_response, store_error_response, with_store};
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kenshin_api::{messages, ApiError, LogWriteRequest, MessageResponse};
use tracing::info;

const ROUTE: &str = "/api/log/write";

/// POST /api/log/write: append one operational log line.
pub(crate) async fn log_write_handler(
    State(state): State<AppState>,
    Json(req): Json<LogWriteRequest>,
) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = ROUTE, "request start");

    let Some(level) = req.level else {
        return api_error_response(ApiError::missing_field("level"));
    };
    let Some(message) = req.message else {
        return api_error_response(ApiError::missing_field("message"));
    };
    match with_store(&state, move |store| store.append_log(&level, &message)).await {
        Ok(()) => Json(MessageResponse::new(messages::LOG_WRITE_OK)).into_response(),
        Err(e) => store_error_response(&request_id, ROUTE, &e),
    }
}
