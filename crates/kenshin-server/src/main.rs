#![forbid(unsafe_code)]

use kenshin_server::{build_router, validate_startup_config_contract, ApiConfig, AppState};
use kenshin_store::{HealthStore, SqliteStore};
use std::env;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

fn env_bool(name: &str, default: bool) -> bool {
    env::var(name)
        .ok()
        .and_then(|v| match v.as_str() {
            "1" | "true" | "TRUE" | "yes" | "YES" => Some(true),
            "0" | "false" | "FALSE" | "no" | "NO" => Some(false),
            _ => None,
        })
        .unwrap_or(default)
}

fn env_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .unwrap_or(default)
}

fn init_tracing(log_json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn wait_for_shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};
        let mut sigterm = signal(SignalKind::terminate()).expect("register SIGTERM");
        let mut sigint = signal(SignalKind::interrupt()).expect("register SIGINT");
        tokio::select! {
            _ = sigterm.recv() => {}
            _ = sigint.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}

#[tokio::main]
async fn main() -> Result<(), String> {
    let cfg = ApiConfig {
        bind: env::var("KENSHIN_BIND").unwrap_or_else(|_| "0.0.0.0:8080".to_string()),
        db_path: PathBuf::from(
            env::var("KENSHIN_DB_PATH").unwrap_or_else(|_| "artifacts/kenshin.sqlite".to_string()),
        ),
        max_body_bytes: env_usize("KENSHIN_MAX_BODY_BYTES", 4 * 1024 * 1024),
        log_json: env_bool("KENSHIN_LOG_JSON", true),
    };
    init_tracing(cfg.log_json);
    validate_startup_config_contract(&cfg)?;

    if let Some(dir) = cfg.db_path.parent() {
        if !dir.as_os_str().is_empty() {
            std::fs::create_dir_all(dir).map_err(|e| format!("create db dir failed: {e}"))?;
        }
    }
    let store = SqliteStore::new(&cfg.db_path);
    store
        .ensure_schema()
        .map_err(|e| format!("schema setup failed: {e}"))?;

    // Operator-seeded credentials for the login/auth surface.
    if let (Ok(user), Ok(password)) = (
        env::var("KENSHIN_ADMIN_USER"),
        env::var("KENSHIN_ADMIN_PASSWORD"),
    ) {
        store
            .upsert_user(&user, &password)
            .map_err(|e| format!("admin user setup failed: {e}"))?;
    }

    let bind = cfg.bind.clone();
    let state = AppState::with_config(Arc::new(store), cfg);
    state.mark_ready();
    let app = build_router(state);

    let listener = TcpListener::bind(&bind)
        .await
        .map_err(|e| format!("bind {bind} failed: {e}"))?;
    info!("kenshin-server listening on {bind}");
    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_shutdown_signal())
        .await
        .map_err(|e| format!("server failed: {e}"))
}
