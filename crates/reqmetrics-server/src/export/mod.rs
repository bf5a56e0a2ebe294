//! Periodic metrics exporter.
//!
//! `start` spawns a background task that, every interval, snapshots all
//! registered views and hands the batch to a [`MetricsSink`]. State is never
//! reset between cycles. A failed cycle is logged and the next tick retries
//! with whatever has accumulated by then. `shutdown` performs the final flush
//! and joins the task.

pub mod http;
pub mod sink;

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Duration, Instant, MissedTickBehavior};

use reqmetrics_core::error::Result;
use reqmetrics_core::stats::{epoch_millis, Registry};

use crate::config::ExporterSection;

pub use http::HttpSink;
pub use sink::{ExportBatch, LogSink, MetricsSink};

#[derive(Debug, Clone)]
pub struct ExporterOptions {
    pub project_id: String,
    pub metric_prefix: String,
}

/// Pick the sink for the configured exporter: HTTP when an endpoint is set.
pub fn build_sink(cfg: &ExporterSection, project_id: &str) -> Result<Arc<dyn MetricsSink>> {
    match &cfg.endpoint {
        Some(endpoint) => Ok(Arc::new(HttpSink::new(endpoint, project_id, cfg.timeout())?)),
        None => Ok(Arc::new(LogSink::new())),
    }
}

struct Shared {
    registry: Arc<Registry>,
    sink: Arc<dyn MetricsSink>,
    options: ExporterOptions,
    cycles: AtomicU64,
    failures: AtomicU64,
}

impl Shared {
    async fn export_once(&self) -> Result<()> {
        let batch = ExportBatch {
            project_id: self.options.project_id.clone(),
            metric_prefix: self.options.metric_prefix.clone(),
            start_time_ms: self.registry.start_time_ms(),
            exported_at_ms: epoch_millis(),
            metrics: self.registry.snapshot(),
        };
        let res = self.sink.export(&batch).await;
        self.cycles.fetch_add(1, Ordering::Relaxed);
        match &res {
            Ok(()) => tracing::debug!(
                sink = self.sink.name(),
                views = batch.metrics.len(),
                "metrics exported"
            ),
            Err(_) => {
                self.failures.fetch_add(1, Ordering::Relaxed);
            }
        }
        res
    }
}

struct Worker {
    stop: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

pub struct Exporter {
    shared: Arc<Shared>,
    worker: Option<Worker>,
}

impl Exporter {
    pub fn new(registry: Arc<Registry>, sink: Arc<dyn MetricsSink>, options: ExporterOptions) -> Self {
        Self {
            shared: Arc::new(Shared {
                registry,
                sink,
                options,
                cycles: AtomicU64::new(0),
                failures: AtomicU64::new(0),
            }),
            worker: None,
        }
    }

    /// Begin exporting every `interval`; the first export is one interval out.
    /// Must be called from within a tokio runtime.
    pub fn start(&mut self, interval: Duration) {
        if self.worker.is_some() {
            tracing::warn!("metrics exporter already running");
            return;
        }
        let (stop, rx) = watch::channel(false);
        let handle = tokio::spawn(run(Arc::clone(&self.shared), interval, rx));
        self.worker = Some(Worker { stop, handle });
    }

    /// Export once, now.
    pub async fn flush(&self) -> Result<()> {
        self.shared.export_once().await
    }

    /// Halt the background cycle and wait for it. No-op when not running.
    pub async fn stop(&mut self) {
        let Some(worker) = self.worker.take() else {
            return;
        };
        if worker.stop.send(true).is_err() {
            tracing::trace!("metrics exporter task already gone");
        }
        if let Err(e) = worker.handle.await {
            tracing::warn!(error = %e, "metrics exporter task ended abnormally");
        }
    }

    /// Final flush, then stop.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.flush().await {
            tracing::warn!(error = %e, class = e.class().as_str(), "final metrics flush failed");
        }
        self.stop().await;
    }

    pub fn is_running(&self) -> bool {
        self.worker.is_some()
    }

    /// Export cycles attempted so far, periodic and manual.
    pub fn cycles(&self) -> u64 {
        self.shared.cycles.load(Ordering::Relaxed)
    }

    pub fn failures(&self) -> u64 {
        self.shared.failures.load(Ordering::Relaxed)
    }
}

async fn run(shared: Arc<Shared>, interval: Duration, mut stop: watch::Receiver<bool>) {
    tracing::info!(
        interval_secs = interval.as_secs(),
        sink = shared.sink.name(),
        "metrics exporter started"
    );

    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick() => {
                if let Err(e) = shared.export_once().await {
                    tracing::warn!(
                        error = %e,
                        class = e.class().as_str(),
                        "metrics export failed, retrying next cycle"
                    );
                }
            }
            changed = stop.changed() => {
                // Err: the Exporter was dropped.
                if changed.is_err() || *stop.borrow() {
                    break;
                }
            }
        }
    }

    tracing::info!("metrics exporter stopped");
}
