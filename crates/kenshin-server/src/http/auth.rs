use super::{api_error_response, store_error_response, with_store};
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kenshin_api::{messages, ApiError, LoginRequest, MessageResponse};
use tracing::info;

const ROUTE: &str = "/api/auth/login";

/// POST /api/auth/login: check credentials against the users table.
/// Comparison is plaintext, preserved from the source system; see the store
/// docs for the flag.
pub(crate) async fn login_handler(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = ROUTE, "request start");

    let Some(username) = req.username else {
        return api_error_response(ApiError::missing_field("username"));
    };
    let Some(password) = req.password else {
        return api_error_response(ApiError::missing_field("password"));
    };
    match with_store(&state, move |store| store.verify_user(&username, &password)).await {
        Ok(true) => Json(MessageResponse::new(messages::LOGIN_OK)).into_response(),
        Ok(false) => api_error_response(ApiError::unauthenticated()),
        Err(e) => store_error_response(&request_id, ROUTE, &e),
    }
}
