#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use kenshin_server::{build_router, AppState};
use kenshin_store::{HealthStore, SqliteStore};
use serde_json::{json, Value};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

pub const CSV_HEADER: &str = "ID,BMI,sBP,dBP,BS,HbA1c,LDL,TG,AST,ALT,GTP";

pub struct TestApp {
    pub router: Router,
    pub store: SqliteStore,
    _tmp: TempDir,
}

pub fn test_app() -> TestApp {
    let tmp = tempfile::tempdir().expect("tempdir");
    let store = SqliteStore::new(tmp.path().join("kenshin.sqlite"));
    store.ensure_schema().expect("schema");
    let state = AppState::new(Arc::new(store.clone()));
    state.mark_ready();
    TestApp {
        router: build_router(state),
        store,
        _tmp: tmp,
    }
}

/// Fixture rule matching the scorer's test rule: healthy bands earn 10
/// points, in-plausible-range fallbacks earn 2.
pub fn fixture_rule(id: &str) -> Value {
    let bands = |healthy_min: f64, healthy_max: f64, full_min: f64, full_max: f64| {
        json!([
            {"min": healthy_min, "max": healthy_max, "points": 10.0},
            {"min": full_min, "max": full_max, "points": 2.0}
        ])
    };
    let cuts = |members: f64| {
        json!({"a_min": members * 10.0, "b_min": members * 6.0, "c_min": members * 3.0})
    };
    json!({
        "id": id,
        "name": "Fixture Rule",
        "categories": {
            "bmi": {
                "measurements": {"BMI": bands(18.5, 24.9, 10.0, 50.0)},
                "cuts": cuts(1.0),
                "weight": 1.0
            },
            "blood_pressure": {
                "measurements": {
                    "sBP": bands(90.0, 129.0, 60.0, 200.0),
                    "dBP": bands(60.0, 84.0, 40.0, 130.0)
                },
                "cuts": cuts(2.0),
                "weight": 1.0
            },
            "blood_sugar": {
                "measurements": {
                    "BS": bands(70.0, 99.0, 50.0, 200.0),
                    "HbA1c": bands(4.0, 5.9, 4.0, 10.0)
                },
                "cuts": cuts(2.0),
                "weight": 1.0
            },
            "lipid": {
                "measurements": {
                    "LDL": bands(30.0, 119.0, 30.0, 300.0),
                    "TG": bands(30.0, 149.0, 30.0, 1000.0)
                },
                "cuts": cuts(2.0),
                "weight": 1.0
            },
            "liver": {
                "measurements": {
                    "AST": bands(10.0, 30.0, 10.0, 200.0),
                    "ALT": bands(10.0, 30.0, 10.0, 200.0),
                    "GTP": bands(10.0, 50.0, 10.0, 500.0)
                },
                "cuts": cuts(3.0),
                "weight": 1.0
            }
        }
    })
}

/// Seed a user plus an active scoring rule so data/save can succeed.
pub fn seed_scoring(app: &TestApp) {
    app.store.upsert_user("u1", "secret").expect("seed user");
    app.store
        .upsert_setting("scoring_rule:1", &fixture_rule("1"))
        .expect("seed rule");
    app.store
        .upsert_setting("active_rule", &json!("1"))
        .expect("seed active rule");
}

pub fn save_body(subject: &str) -> Value {
    json!({
        "userId": "u1",
        "ID": subject,
        "BMI": 22, "sBP": 120, "dBP": 80, "BS": 90, "HbA1c": 5.5,
        "LDL": 100, "TG": 150, "AST": 20, "ALT": 20, "GTP": 30
    })
}

pub async fn send_json(
    router: &Router,
    method: &str,
    path: &str,
    body: &Value,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request");
    dispatch(router, request).await
}

pub async fn send_text(
    router: &Router,
    method: &str,
    path: &str,
    body: &str,
) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::from(body.to_string()))
        .expect("request");
    dispatch(router, request).await
}

pub async fn send_empty(router: &Router, method: &str, path: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(path)
        .body(Body::empty())
        .expect("request");
    dispatch(router, request).await
}

async fn dispatch(router: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = router
        .clone()
        .oneshot(request)
        .await
        .expect("router response");
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("response body");
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}
