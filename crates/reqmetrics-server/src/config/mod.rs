//! Server config loader (strict parsing).

pub mod schema;

use std::fs;
use std::path::Path;

use reqmetrics_core::error::{Result, ReqMetricsError};

pub use schema::{AppConfig, ExporterSection, HandlerSection, ServerSection};

/// Env var naming the config file.
pub const CONFIG_ENV: &str = "REQMETRICS_CONFIG";
pub const DEFAULT_CONFIG_PATH: &str = "reqmetrics.yaml";

pub fn load_from_file(path: &str) -> Result<AppConfig> {
    let s = fs::read_to_string(path)
        .map_err(|e| ReqMetricsError::Config(format!("read config failed: {e}")))?;
    load_from_str(&s)
}

pub fn load_from_str(s: &str) -> Result<AppConfig> {
    let cfg: AppConfig = serde_yaml::from_str(s)
        .map_err(|e| ReqMetricsError::Config(format!("invalid yaml: {e}")))?;
    cfg.validate()?;
    Ok(cfg)
}

/// Load `path` if it exists, built-in defaults otherwise.
pub fn load_or_default(path: &str) -> Result<AppConfig> {
    if Path::new(path).exists() {
        tracing::info!(%path, "loading config file");
        load_from_file(path)
    } else {
        tracing::info!(%path, "no config file, using defaults");
        Ok(AppConfig::default())
    }
}

/// The project id addresses the backend account; it has no default.
pub fn validate_project_id(project_id: &str) -> Result<()> {
    if project_id.is_empty() {
        return Err(ReqMetricsError::Config("--project_id is required".into()));
    }
    if project_id.chars().any(char::is_whitespace) {
        return Err(ReqMetricsError::Config(
            "--project_id must not contain whitespace".into(),
        ));
    }
    Ok(())
}
