//! JSON-over-HTTP sink.

use std::time::Duration;

use async_trait::async_trait;

use reqmetrics_core::error::{Result, ReqMetricsError};

use super::sink::{ExportBatch, MetricsSink};

/// POSTs each batch to `{endpoint}/v1/projects/{project_id}/metrics:write`.
pub struct HttpSink {
    client: reqwest::Client,
    url: String,
}

impl HttpSink {
    pub fn new(endpoint: &str, project_id: &str, timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ReqMetricsError::Config(format!("http client build failed: {e}")))?;
        Ok(Self {
            client,
            url: format!(
                "{}/v1/projects/{}/metrics:write",
                endpoint.trim_end_matches('/'),
                project_id
            ),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl MetricsSink for HttpSink {
    fn name(&self) -> &'static str {
        "http"
    }

    async fn export(&self, batch: &ExportBatch) -> Result<()> {
        let resp = self
            .client
            .post(&self.url)
            .json(batch)
            .send()
            .await
            .map_err(|e| ReqMetricsError::Export(format!("send failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ReqMetricsError::Export(format!("backend returned {status}")));
        }
        Ok(())
    }
}
