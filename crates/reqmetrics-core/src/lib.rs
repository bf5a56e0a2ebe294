//! reqmetrics core: measures, views, and the in-process aggregation registry.
//!
//! This crate owns the recording side of request metrics. It knows nothing
//! about HTTP, async runtimes, or any monitoring backend: callers record into
//! a [`stats::Registry`] and exporters read cumulative [`stats::ViewSnapshot`]s
//! out of it.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. Recording never
//! fails; registration and definition errors surface as `ReqMetricsError`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod stats;

/// Shared result type.
pub use error::{ErrorClass, Result, ReqMetricsError};
