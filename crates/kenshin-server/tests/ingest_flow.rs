mod support;

use axum::http::StatusCode;
use serde_json::json;
use support::{send_text, test_app, CSV_HEADER};

#[tokio::test]
async fn parse_returns_every_row_of_a_clean_upload() {
    let app = test_app();
    let csv = format!(
        "{CSV_HEADER}\n1234,22,120,80,90,5.5,100,150,20,20,30\n5678,25,130,85,95,6.0,120,180,25,30,40\n"
    );
    let (status, body) = send_text(&app.router, "POST", "/api/file/parse", &csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "ファイルを解析しました。");
    assert_eq!(body["data"].as_array().map(Vec::len), Some(2));
    assert_eq!(body["data"][0]["subject_id"], "1234");
}

#[tokio::test]
async fn parse_rejects_an_empty_body() {
    let app = test_app();
    let (status, _) = send_text(&app.router, "POST", "/api/file/parse", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send_text(&app.router, "POST", "/api/file/parse", "  \n ").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn parse_rejects_a_header_missing_required_columns() {
    let app = test_app();
    let csv = "ID,BMI,sBP,dBP,BS,HbA1c,LDL,TG,AST,ALT\n1234,22,120,80,90,5.5,100,150,20,20\n";
    let (status, body) = send_text(&app.router, "POST", "/api/file/parse", csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["details"]["missing"][0], "GTP");
}

#[tokio::test]
async fn parse_fails_on_a_row_with_mismatched_field_count() {
    let app = test_app();
    let csv = format!(
        "{CSV_HEADER}\n1234,22,120,80,90,5.5,100,150,20,20,30\n5678,25,130,85,95,6.0,120,180,25,30\n"
    );
    let (status, _) = send_text(&app.router, "POST", "/api/file/parse", &csv).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn validate_reports_a_clean_upload_as_valid() {
    let app = test_app();
    let csv = format!("{CSV_HEADER}\n1234,22,120,80,90,5.5,100,150,20,20,30");
    let (status, body) = send_text(&app.router, "POST", "/api/file/validate", &csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], true);
    assert_eq!(body["rowCount"], 1);
    assert_eq!(body["errors"], json!([]));
}

#[tokio::test]
async fn validate_collects_field_level_findings_without_failing() {
    let app = test_app();
    // BMI out of range, sBP not numeric, bad id: three findings on one row.
    let csv = format!("{CSV_HEADER}\n12,60,abc,80,90,5.5,100,150,20,20,30");
    let (status, body) = send_text(&app.router, "POST", "/api/file/validate", &csv).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isValid"], false);
    let errors = body["errors"].as_array().expect("errors array");
    assert_eq!(errors.len(), 3);
    assert_eq!(errors[0]["column"], "BMI");
    assert_eq!(errors[0]["reason"], "out-of-range");
    assert_eq!(errors[1]["column"], "sBP");
    assert_eq!(errors[1]["reason"], "not-a-number");
    assert_eq!(errors[2]["column"], "ID");
    assert_eq!(errors[2]["reason"], "bad-id-format");
}

#[tokio::test]
async fn validate_short_circuits_structural_row_problems() {
    let app = test_app();
    let csv = format!("{CSV_HEADER}\n1234,22,120,80,90,5.5,100,150,20,20");
    let (status, body) = send_text(&app.router, "POST", "/api/file/validate", &csv).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "row_structure");
}

#[tokio::test]
async fn validate_rejects_empty_and_header_only_uploads() {
    let app = test_app();
    let (status, _) = send_text(&app.router, "POST", "/api/file/validate", "").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let (status, _) = send_text(&app.router, "POST", "/api/file/validate", CSV_HEADER).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
