//! Axum router wiring.
//!
//! A single method-agnostic `/` route served by the demo handler.

use axum::{routing::any, Router};

use crate::{app_state::AppState, handler};

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", any(handler::handle))
        .with_state(state)
}
