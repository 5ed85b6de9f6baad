use super::{api_error_response, store_error_response, with_store};
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kenshin_api::{
    coerce_string, messages, ApiError, ConfigUpdateRequest, MessageResponse,
    ScoringRuleSaveRequest,
};
use kenshin_model::{scoring_rule_key, SCORING_RULE_PREFIX};
use serde_json::Value;
use tracing::info;

const ROUTE_RULE_SAVE: &str = "/api/scoring-rule/save";
const ROUTE_RULE_RESULT: &str = "/api/scoring-rule/result";
const ROUTE_CONFIG: &str = "/api/config/update";

/// POST|PUT /api/scoring-rule/save: persist the whole request body as the
/// rule document under `scoring_rule:{id}`. Only `id` is mandatory; the
/// rule's completeness is checked when the scorer loads it, not here.
pub(crate) async fn scoring_rule_save_handler(
    State(state): State<AppState>,
    Json(body): Json<Value>,
) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = ROUTE_RULE_SAVE, "request start");

    let req: ScoringRuleSaveRequest = match serde_json::from_value(body.clone()) {
        Ok(req) => req,
        Err(e) => return api_error_response(ApiError::invalid_body(&e.to_string())),
    };
    let Some(rule_id) = req.id.as_ref().and_then(coerce_string) else {
        return api_error_response(ApiError::missing_field("id"));
    };
    let key = scoring_rule_key(&rule_id);
    match with_store(&state, move |store| store.upsert_setting(&key, &body)).await {
        Ok(()) => Json(MessageResponse::new(messages::RULE_SAVE_OK)).into_response(),
        Err(e) => store_error_response(&request_id, ROUTE_RULE_SAVE, &e),
    }
}

/// GET /api/scoring-rule/result: all stored rule documents, empty array
/// when none exist.
pub(crate) async fn scoring_rule_result_handler(State(state): State<AppState>) -> Response {
    let request_id = state.next_request_id();
    match with_store(&state, |store| {
        store.list_settings_with_prefix(SCORING_RULE_PREFIX)
    })
    .await
    {
        Ok(settings) => {
            let rules: Vec<Value> = settings.into_iter().map(|s| s.value).collect();
            Json(rules).into_response()
        }
        Err(e) => store_error_response(&request_id, ROUTE_RULE_RESULT, &e),
    }
}

/// PUT /api/config/update: upsert one settings key. A missing value is
/// stored as JSON null.
pub(crate) async fn config_update_handler(
    State(state): State<AppState>,
    Json(req): Json<ConfigUpdateRequest>,
) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = ROUTE_CONFIG, "request start");

    let Some(key) = req.key else {
        return api_error_response(ApiError::missing_field("key"));
    };
    let value = req.value.unwrap_or(Value::Null);
    match with_store(&state, move |store| store.upsert_setting(&key, &value)).await {
        Ok(()) => Json(MessageResponse::new(messages::CONFIG_UPDATE_OK)).into_response(),
        Err(e) => store_error_response(&request_id, ROUTE_CONFIG, &e),
    }
}
