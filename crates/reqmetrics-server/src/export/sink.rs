//! Export sinks: where a batch of view snapshots ends up.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use reqmetrics_core::error::Result;
use reqmetrics_core::stats::{RowData, ViewSnapshot};

/// One export cycle's payload. Totals are cumulative since `start_time_ms`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBatch {
    pub project_id: String,
    pub metric_prefix: String,
    pub start_time_ms: u64,
    pub exported_at_ms: u64,
    pub metrics: Vec<ViewSnapshot>,
}

impl ExportBatch {
    pub fn metric(&self, name: &str) -> Option<&ViewSnapshot> {
        self.metrics.iter().find(|m| m.name == name)
    }
}

/// Monitoring backend. Failures are retried by the next cycle, never here.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    fn name(&self) -> &'static str;
    async fn export(&self, batch: &ExportBatch) -> Result<()>;
}

/// Writes every view as a structured log event.
#[derive(Default)]
pub struct LogSink;

impl LogSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl MetricsSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn export(&self, batch: &ExportBatch) -> Result<()> {
        for m in &batch.metrics {
            for row in &m.rows {
                match &row.data {
                    RowData::Count { count } => tracing::info!(
                        project_id = %batch.project_id,
                        prefix = %batch.metric_prefix,
                        metric = %m.name,
                        tags = ?row.tags,
                        count,
                        "metric"
                    ),
                    RowData::Distribution {
                        count,
                        sum,
                        mean,
                        bucket_counts,
                    } => tracing::info!(
                        project_id = %batch.project_id,
                        prefix = %batch.metric_prefix,
                        metric = %m.name,
                        tags = ?row.tags,
                        count,
                        sum,
                        mean,
                        buckets = ?bucket_counts,
                        "metric"
                    ),
                }
            }
        }
        Ok(())
    }
}
