//! Demo request handler.
//!
//! Every request is counted. One in ten is a simulated failure; the rest
//! sleep a random 0..1000 ms. Latency is recorded for both branches. The
//! response is always HTTP 200: a simulated failure is a business-level
//! failure, not a transport one.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use rand::Rng;
use tokio::time::{Duration, Instant};

use reqmetrics_core::stats::TagSet;

use crate::app_state::AppState;

/// Percent of requests that take the failure branch.
pub const FAILURE_PERCENT: u32 = 10;
/// Exclusive upper bound of the success-branch sleep.
pub const MAX_DELAY_MS: u64 = 1000;
pub const FAILURE_BODY: &str = "intentional error!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Fail,
    Succeed { delay_ms: u64 },
}

pub fn decide<R: Rng>(rng: &mut R) -> Outcome {
    if rng.random_range(0..100u32) < FAILURE_PERCENT {
        Outcome::Fail
    } else {
        Outcome::Succeed {
            delay_ms: rng.random_range(0..MAX_DELAY_MS),
        }
    }
}

pub fn success_body(delay_ms: u64) -> String {
    format!("Succeeded after {delay_ms} ms")
}

pub async fn handle(State(state): State<AppState>) -> impl IntoResponse {
    let received = Instant::now();
    let tags = TagSet::empty();
    let sli = state.sli();

    state.registry().record(&tags, &sli.request_count, 1.0);

    let body = match state.next_outcome() {
        Outcome::Fail => {
            state.registry().record(&tags, &sli.failed_request_count, 1.0);
            tracing::debug!("simulated failure");
            FAILURE_BODY.to_string()
        }
        Outcome::Succeed { delay_ms } => {
            tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            tracing::trace!(delay_ms, "request succeeded");
            success_body(delay_ms)
        }
    };

    state
        .registry()
        .record(&tags, &sli.response_latency, received.elapsed().as_secs_f64());

    (StatusCode::OK, body)
}
