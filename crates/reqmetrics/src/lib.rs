//! Top-level facade crate for reqmetrics.
//!
//! Re-exports the metrics core and the server library so users can depend on
//! a single crate. `prelude` pulls in what instrumenting a service needs.

pub mod core {
    pub use reqmetrics_core::*;
}

pub mod server {
    pub use reqmetrics_server::*;
}

pub mod prelude {
    pub use reqmetrics_core::stats::{Aggregation, Measure, Registry, TagSet, View, ViewSnapshot};
    pub use reqmetrics_core::{ErrorClass, ReqMetricsError, Result};
    pub use reqmetrics_server::export::{ExportBatch, Exporter, ExporterOptions, MetricsSink};
    pub use reqmetrics_server::obs::SliMetrics;
}
