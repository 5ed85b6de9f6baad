use super::{api_error_response, store_error_response, with_store};
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kenshin_api::{coerce_f64, messages, ApiError, ExtractRequest, MessageResponse};
use kenshin_model::EXTRACT_PERCENTAGE_KEY;
use kenshin_query::{aggregate_scores, fraction_from_percentage, plan_extraction};
use serde_json::{json, Value};
use tracing::info;

const ROUTE_AGGREGATE: &str = "/api/analyze/aggregate";
const ROUTE_EXTRACT: &str = "/api/analyze/extract";

/// GET /api/analyze/aggregate: five-bucket total-score histogram.
///
/// The projection read is strict: one stored score that does not decode as a
/// number fails the whole request. Zero records is a valid empty histogram.
pub(crate) async fn aggregate_handler(State(state): State<AppState>) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = ROUTE_AGGREGATE, "request start");
    match with_store(&state, |store| store.query_total_scores()).await {
        Ok(scores) => Json(aggregate_scores(&scores).buckets()).into_response(),
        Err(e) => store_error_response(&request_id, ROUTE_AGGREGATE, &e),
    }
}

/// Percentage precedence: request body first, stored setting second. A
/// request that names no percentage anywhere is a client error.
fn requested_percentage(body: &str) -> Result<Option<Value>, ApiError> {
    if body.trim().is_empty() {
        return Ok(None);
    }
    let req: ExtractRequest = serde_json::from_str(body)
        .map_err(|e| ApiError::invalid_body(&e.to_string()))?;
    Ok(req.percentage)
}

/// POST /api/analyze/extract: replace the extracted set with the top
/// fraction of records by total score. The fraction is validated before any
/// store mutation; with zero candidates nothing is deleted or inserted.
pub(crate) async fn extract_handler(State(state): State<AppState>, body: String) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = ROUTE_EXTRACT, "request start");

    let from_body = match requested_percentage(&body) {
        Ok(value) => value,
        Err(err) => return api_error_response(err),
    };
    let raw = match from_body {
        Some(value) => Some(value),
        None => {
            match with_store(&state, |store| store.get_setting(EXTRACT_PERCENTAGE_KEY)).await {
                Ok(setting) => setting.map(|s| s.value),
                Err(e) => return store_error_response(&request_id, ROUTE_EXTRACT, &e),
            }
        }
    };
    let Some(raw) = raw else {
        return api_error_response(ApiError::invalid_percentage(Value::Null));
    };
    let Some(percentage) = coerce_f64(&raw) else {
        return api_error_response(ApiError::invalid_percentage(raw));
    };
    let fraction = match fraction_from_percentage(percentage) {
        Ok(fraction) => fraction,
        Err(_) => return api_error_response(ApiError::invalid_percentage(json!(percentage))),
    };

    let records = match with_store(&state, |store| store.query_all_scored()).await {
        Ok(records) => records,
        Err(e) => return store_error_response(&request_id, ROUTE_EXTRACT, &e),
    };
    let plan = match plan_extraction(&records, fraction) {
        Ok(plan) => plan,
        Err(_) => return api_error_response(ApiError::invalid_percentage(json!(percentage))),
    };
    if plan.is_empty() {
        return Json(MessageResponse::new(messages::EXTRACT_NO_CANDIDATES)).into_response();
    }

    // Two independent round-trips; a failure after the delete leaves the
    // extracted set empty. Accepted gap, see DESIGN notes.
    if let Err(e) = with_store(&state, |store| store.delete_all_extracted()).await {
        return store_error_response(&request_id, ROUTE_EXTRACT, &e);
    }
    let entries = plan.clone();
    match with_store(&state, move |store| store.insert_extracted(&entries)).await {
        Ok(()) => {
            info!(request_id = %request_id, route = ROUTE_EXTRACT, extracted = plan.len(), "extraction replaced");
            Json(MessageResponse::new(messages::EXTRACT_OK)).into_response()
        }
        Err(e) => store_error_response(&request_id, ROUTE_EXTRACT, &e),
    }
}

/// GET /api/analyze/extract/result: the current extracted set.
pub(crate) async fn extract_result_handler(State(state): State<AppState>) -> Response {
    let request_id = state.next_request_id();
    match with_store(&state, |store| store.list_extracted()).await {
        Ok(entries) => Json(entries).into_response(),
        Err(e) => store_error_response(&request_id, "/api/analyze/extract/result", &e),
    }
}
