use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub bind: String,
    pub db_path: PathBuf,
    pub max_body_bytes: usize,
    pub log_json: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0:8080".to_string(),
            db_path: PathBuf::from("artifacts/kenshin.sqlite"),
            max_body_bytes: 4 * 1024 * 1024,
            log_json: true,
        }
    }
}

pub fn validate_startup_config_contract(api: &ApiConfig) -> Result<(), String> {
    if api.max_body_bytes == 0 {
        return Err("max body bytes must be > 0".to_string());
    }
    if api.bind.parse::<std::net::SocketAddr>().is_err() {
        return Err(format!("invalid bind addr: {}", api.bind));
    }
    if api.db_path.as_os_str().is_empty() {
        return Err("db path must not be empty".to_string());
    }
    Ok(())
}
