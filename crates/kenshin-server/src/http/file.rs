use super::api_error_response;
use crate::AppState;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use kenshin_api::{messages, ApiError, ParseResponse, ValidateResponse};
use kenshin_ingest::{parse_csv, validate_records, IngestError, ParseOutcome};
use serde_json::json;
use tracing::info;

fn parse_error_response(err: &IngestError) -> Response {
    match err {
        IngestError::NoData => api_error_response(ApiError::empty_input()),
        IngestError::HeaderMismatch { missing } => {
            api_error_response(ApiError::header_mismatch(missing))
        }
        IngestError::Csv(msg) => api_error_response(ApiError::parse_failed(msg)),
        _ => api_error_response(ApiError::parse_failed(&err.to_string())),
    }
}

fn issues_json(outcome: &ParseOutcome) -> serde_json::Value {
    json!(outcome.issues)
}

/// POST /api/file/parse: CSV text in, raw records out. A row with the
/// wrong field count fails the request as a parse error; a header missing
/// required columns is a client error.
pub(crate) async fn parse_handler(State(state): State<AppState>, body: String) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = "/api/file/parse", "request start");
    if body.trim().is_empty() {
        return api_error_response(ApiError::empty_input());
    }
    match parse_csv(&body) {
        Ok(outcome) if outcome.issues.is_empty() => Json(ParseResponse {
            message: messages::PARSE_OK.to_string(),
            data: outcome.records,
        })
        .into_response(),
        Ok(outcome) => api_error_response(ApiError::parse_failed(
            &format!("{} row(s) with mismatched field count", outcome.issues.len()),
        )
        .with_details(issues_json(&outcome))),
        Err(err) => parse_error_response(&err),
    }
}

/// POST /api/file/validate: CSV text in, field-level findings out.
/// Structural row problems short-circuit with 400 before validation runs.
pub(crate) async fn validate_handler(State(state): State<AppState>, body: String) -> Response {
    let request_id = state.next_request_id();
    info!(request_id = %request_id, route = "/api/file/validate", "request start");
    if body.trim().is_empty() {
        return api_error_response(ApiError::empty_input());
    }
    match parse_csv(&body) {
        Ok(outcome) if outcome.issues.is_empty() => {
            let validation = validate_records(&outcome.records);
            Json(ValidateResponse {
                message: messages::VALIDATE_OK.to_string(),
                outcome: validation,
            })
            .into_response()
        }
        Ok(outcome) => api_error_response(ApiError::row_structure(issues_json(&outcome))),
        Err(err) => parse_error_response(&err),
    }
}
