use std::net::SocketAddr;
use std::time::Duration;

use serde::Deserialize;
use reqmetrics_core::error::{Result, ReqMetricsError};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AppConfig {
    pub version: u32,

    #[serde(default)]
    pub server: ServerSection,

    #[serde(default)]
    pub exporter: ExporterSection,

    #[serde(default)]
    pub handler: HandlerSection,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            version: 1,
            server: ServerSection::default(),
            exporter: ExporterSection::default(),
            handler: HandlerSection::default(),
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqMetricsError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }
        self.server.validate()?;
        self.exporter.validate()?;
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl ServerSection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ReqMetricsError::Config(format!("server.listen must be a valid SocketAddr: {e}"))
        })
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExporterSection {
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    #[serde(default = "default_metric_prefix")]
    pub metric_prefix: String,

    /// Backend base URL. Without one, batches go to the log.
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,
}

impl Default for ExporterSection {
    fn default() -> Self {
        Self {
            interval_secs: default_interval_secs(),
            metric_prefix: default_metric_prefix(),
            endpoint: None,
            timeout_ms: default_timeout_ms(),
        }
    }
}

impl ExporterSection {
    pub fn validate(&self) -> Result<()> {
        if !(1..=3600).contains(&self.interval_secs) {
            return Err(ReqMetricsError::Config(
                "exporter.interval_secs must be between 1 and 3600".into(),
            ));
        }
        if !(100..=60000).contains(&self.timeout_ms) {
            return Err(ReqMetricsError::Config(
                "exporter.timeout_ms must be between 100 and 60000".into(),
            ));
        }
        if let Some(ep) = &self.endpoint {
            let url = reqwest::Url::parse(ep).map_err(|e| {
                ReqMetricsError::Config(format!("exporter.endpoint is not a valid URL: {e}"))
            })?;
            if !matches!(url.scheme(), "http" | "https") || url.host_str().is_none() {
                return Err(ReqMetricsError::Config(
                    "exporter.endpoint must be an http(s) URL with a host".into(),
                ));
            }
        }
        Ok(())
    }

    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
pub struct HandlerSection {
    /// Fixed seed for the failure/sleep draws; OS entropy when absent.
    #[serde(default)]
    pub seed: Option<u64>,
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
fn default_interval_secs() -> u64 {
    60
}
fn default_metric_prefix() -> String {
    "opencensus-demo".into()
}
fn default_timeout_ms() -> u64 {
    10000
}
