//! reqmetrics server library entry.
//!
//! Wires the metrics registry, the periodic exporter, and the demo request
//! handler into an axum service. Consumed by the binary (`main.rs`) and by
//! integration tests.

pub mod app_state;
pub mod config;
pub mod export;
pub mod handler;
pub mod obs;
pub mod router;
