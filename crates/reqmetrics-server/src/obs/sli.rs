//! Request count, failure count, and latency measures for the demo service.
//!
//! Metric names cross the process boundary and must stay exactly as they are.
//!
//! The latency boundaries (0..=10000 in steps of 1000) are in the same
//! numeric scale as the recorded samples, which are seconds. Every sample the
//! demo handler produces (well under 1s) lands in bucket 1, `[0, 1000)`.
//! The values are kept for compatibility with existing dashboards; they are
//! most likely milliseconds that were never converted.

use reqmetrics_core::error::Result;
use reqmetrics_core::stats::{Aggregation, Measure, Registry, View};

pub const REQUEST_COUNT: &str = "oc_request_count";
pub const FAILED_REQUEST_COUNT: &str = "oc_failed_request_count";
pub const LATENCY_MEASURE: &str = "oc_latency_distribution";
pub const LATENCY_VIEW: &str = "oc_response_latency";

pub const LATENCY_BOUNDS: [f64; 11] = [
    0.0, 1000.0, 2000.0, 3000.0, 4000.0, 5000.0, 6000.0, 7000.0, 8000.0, 9000.0, 10000.0,
];

/// Measure handles the request handler records into.
#[derive(Debug, Clone)]
pub struct SliMetrics {
    pub request_count: Measure,
    pub failed_request_count: Measure,
    pub response_latency: Measure,
}

impl SliMetrics {
    /// Define the three measures and register their views.
    pub fn register(registry: &Registry) -> Result<Self> {
        let request_count =
            registry.define_counter(REQUEST_COUNT, "total request count", "requests")?;
        let failed_request_count = registry.define_counter(
            FAILED_REQUEST_COUNT,
            "count of failed requests",
            "requests",
        )?;
        let response_latency = registry.define_distribution(
            LATENCY_MEASURE,
            "distribution of response latencies",
            "s",
        )?;

        registry.register_views([
            View::new(
                REQUEST_COUNT,
                "total request count",
                &request_count,
                Aggregation::count(),
            ),
            View::new(
                FAILED_REQUEST_COUNT,
                "count of failed requests",
                &failed_request_count,
                Aggregation::count(),
            ),
            View::new(
                LATENCY_VIEW,
                "The distribution of the latencies",
                &response_latency,
                Aggregation::distribution(LATENCY_BOUNDS),
            ),
        ])?;

        Ok(Self {
            request_count,
            failed_request_count,
            response_latency,
        })
    }
}
