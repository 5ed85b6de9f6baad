#![forbid(unsafe_code)]

//! HTTP service wiring: application state, router, and request handlers for
//! the checkup ingestion/scoring/analysis API.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post, put};
use axum::Router;
use kenshin_store::HealthStore;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;

mod config;
pub mod http;

pub use config::{validate_startup_config_contract, ApiConfig};

pub const CRATE_NAME: &str = "kenshin-server";

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn HealthStore>,
    pub api: Arc<ApiConfig>,
    pub ready: Arc<AtomicBool>,
    request_id_seed: Arc<AtomicU64>,
}

impl AppState {
    #[must_use]
    pub fn new(store: Arc<dyn HealthStore>) -> Self {
        Self::with_config(store, ApiConfig::default())
    }

    #[must_use]
    pub fn with_config(store: Arc<dyn HealthStore>, api: ApiConfig) -> Self {
        Self {
            store,
            api: Arc::new(api),
            ready: Arc::new(AtomicBool::new(false)),
            request_id_seed: Arc::new(AtomicU64::new(1)),
        }
    }

    pub(crate) fn next_request_id(&self) -> String {
        let seq = self.request_id_seed.fetch_add(1, Ordering::Relaxed);
        format!("req-{seq:08x}")
    }

    pub fn mark_ready(&self) {
        self.ready.store(true, Ordering::Relaxed);
    }
}

/// Build the full route table. Unknown methods on a known path answer 405
/// via axum's method routing.
#[must_use]
pub fn build_router(state: AppState) -> Router {
    let body_limit = state.api.max_body_bytes;
    Router::new()
        .route("/healthz", get(http::health::healthz_handler))
        .route("/readyz", get(http::health::readyz_handler))
        .route("/api/file/parse", post(http::file::parse_handler))
        .route("/api/file/validate", post(http::file::validate_handler))
        .route("/api/data/save", post(http::data::save_handler))
        .route("/api/data/result", get(http::data::result_handler))
        .route(
            "/api/analyze/aggregate",
            get(http::analyze::aggregate_handler),
        )
        .route("/api/analyze/extract", post(http::analyze::extract_handler))
        .route(
            "/api/analyze/extract/result",
            get(http::analyze::extract_result_handler),
        )
        .route(
            "/api/scoring-rule/save",
            post(http::settings::scoring_rule_save_handler)
                .put(http::settings::scoring_rule_save_handler),
        )
        .route(
            "/api/scoring-rule/result",
            get(http::settings::scoring_rule_result_handler),
        )
        .route("/api/config/update", put(http::settings::config_update_handler))
        .route("/api/log/write", post(http::logs::log_write_handler))
        .route("/api/auth/login", post(http::auth::login_handler))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
