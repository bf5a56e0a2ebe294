//! Observability: the request SLI metrics and log setup.

pub mod sli;

pub use sli::SliMetrics;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Logged on SIGTERM; log-based checks of a graceful stop match on it.
pub const TERMINATION_MESSAGE: &str = "terminated signal caught";

pub fn log_termination() {
    tracing::info!("{}", TERMINATION_MESSAGE);
}

/// Install the global fmt subscriber, `RUST_LOG` filter with an `info` default.
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
