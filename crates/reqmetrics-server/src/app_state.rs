//! Shared application state.
//!
//! Holds the registry handle, the SLI measures, and the random source the
//! demo handler draws from. A fixed seed makes the handler deterministic.

use std::sync::{Arc, Mutex, PoisonError};

use rand::rngs::StdRng;
use rand::SeedableRng;

use reqmetrics_core::stats::Registry;

use crate::handler::{self, Outcome};
use crate::obs::SliMetrics;

#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    registry: Arc<Registry>,
    sli: SliMetrics,
    rng: Mutex<StdRng>,
}

impl AppState {
    pub fn new(registry: Arc<Registry>, sli: SliMetrics, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self {
            inner: Arc::new(AppStateInner {
                registry,
                sli,
                rng: Mutex::new(rng),
            }),
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.inner.registry
    }

    pub fn sli(&self) -> &SliMetrics {
        &self.inner.sli
    }

    /// Draw the next request outcome.
    pub fn next_outcome(&self) -> Outcome {
        // A panic while drawing cannot leave the rng in a bad state.
        let mut rng = self.inner.rng.lock().unwrap_or_else(PoisonError::into_inner);
        handler::decide(&mut *rng)
    }
}
