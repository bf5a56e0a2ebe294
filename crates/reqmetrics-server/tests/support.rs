//! In-memory sinks shared by the exporter tests.

#![allow(dead_code)]
#![allow(clippy::unwrap_used)]

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use reqmetrics_core::error::{Result, ReqMetricsError};
use reqmetrics_server::export::{ExportBatch, MetricsSink};

/// Keeps every batch it receives.
#[derive(Default)]
pub struct MemorySink {
    batches: Mutex<Vec<ExportBatch>>,
}

impl MemorySink {
    pub fn batches(&self) -> Vec<ExportBatch> {
        self.batches.lock().unwrap().clone()
    }
}

#[async_trait]
impl MetricsSink for MemorySink {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn export(&self, batch: &ExportBatch) -> Result<()> {
        self.batches.lock().unwrap().push(batch.clone());
        Ok(())
    }
}

/// Fails the first `fail_first` exports, then behaves like `MemorySink`.
pub struct FlakySink {
    fail_first: u64,
    attempts: AtomicU64,
    inner: MemorySink,
}

impl FlakySink {
    pub fn new(fail_first: u64) -> Self {
        Self {
            fail_first,
            attempts: AtomicU64::new(0),
            inner: MemorySink::default(),
        }
    }

    /// Always fails.
    pub fn down() -> Self {
        Self::new(u64::MAX)
    }

    pub fn attempts(&self) -> u64 {
        self.attempts.load(Ordering::Relaxed)
    }

    pub fn batches(&self) -> Vec<ExportBatch> {
        self.inner.batches()
    }
}

#[async_trait]
impl MetricsSink for FlakySink {
    fn name(&self) -> &'static str {
        "flaky"
    }

    async fn export(&self, batch: &ExportBatch) -> Result<()> {
        let n = self.attempts.fetch_add(1, Ordering::Relaxed);
        if n < self.fail_first {
            return Err(ReqMetricsError::Export("backend unreachable".into()));
        }
        self.inner.export(batch).await
    }
}
