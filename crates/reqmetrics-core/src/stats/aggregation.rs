//! Aggregation rules and their lock-free per-row state.
//!
//! Counts and bucket counts are plain atomics. The running sum of a
//! distribution is an `f64` stored as bits and updated with a CAS loop; a
//! concurrent read may see the sum one sample ahead of or behind the count.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::error::{Result, ReqMetricsError};

use super::snapshot::RowData;

/// How a view folds samples.
#[derive(Debug, Clone, PartialEq)]
pub enum Aggregation {
    /// Number of recorded samples, value ignored.
    Count,
    /// Histogram over explicit ascending boundaries, plus sum and count.
    Distribution { bounds: Vec<f64> },
}

/// Aggregation tag carried in snapshots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationKind {
    Count,
    Distribution,
}

impl Aggregation {
    pub fn count() -> Self {
        Aggregation::Count
    }

    pub fn distribution(bounds: impl Into<Vec<f64>>) -> Self {
        Aggregation::Distribution {
            bounds: bounds.into(),
        }
    }

    pub fn kind(&self) -> AggregationKind {
        match self {
            Aggregation::Count => AggregationKind::Count,
            Aggregation::Distribution { .. } => AggregationKind::Distribution,
        }
    }

    pub fn bounds(&self) -> &[f64] {
        match self {
            Aggregation::Count => &[],
            Aggregation::Distribution { bounds } => bounds,
        }
    }

    /// Boundaries must be finite and strictly ascending.
    pub(crate) fn validate(&self, view: &str) -> Result<()> {
        let bounds = self.bounds();
        if let Some(b) = bounds.iter().find(|b| !b.is_finite()) {
            return Err(ReqMetricsError::InvalidBuckets {
                view: view.to_string(),
                reason: format!("non-finite boundary {b}"),
            });
        }
        if let Some(w) = bounds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(ReqMetricsError::InvalidBuckets {
                view: view.to_string(),
                reason: format!("boundaries not strictly ascending at {} >= {}", w[0], w[1]),
            });
        }
        Ok(())
    }
}

/// Index of the bucket `value` falls into.
///
/// With N boundaries there are N+1 buckets; bucket `i` holds
/// `[bounds[i-1], bounds[i])` with implicit -inf/+inf outer edges.
pub fn bucket_index(bounds: &[f64], value: f64) -> usize {
    bounds.partition_point(|b| *b <= value)
}

pub(crate) enum RowState {
    Count(AtomicU64),
    Distribution(DistributionState),
}

impl RowState {
    pub(crate) fn new(aggregation: &Aggregation) -> Self {
        match aggregation {
            Aggregation::Count => RowState::Count(AtomicU64::new(0)),
            Aggregation::Distribution { bounds } => {
                RowState::Distribution(DistributionState::new(bounds.len() + 1))
            }
        }
    }

    pub(crate) fn add(&self, bounds: &[f64], value: f64) {
        match self {
            RowState::Count(c) => {
                c.fetch_add(1, Ordering::Relaxed);
            }
            RowState::Distribution(d) => d.add(bounds, value),
        }
    }

    pub(crate) fn read(&self) -> RowData {
        match self {
            RowState::Count(c) => RowData::Count {
                count: c.load(Ordering::Relaxed),
            },
            RowState::Distribution(d) => d.read(),
        }
    }
}

pub(crate) struct DistributionState {
    count: AtomicU64,
    sum_bits: AtomicU64,
    buckets: Box<[AtomicU64]>,
}

impl DistributionState {
    fn new(buckets: usize) -> Self {
        Self {
            count: AtomicU64::new(0),
            sum_bits: AtomicU64::new(0f64.to_bits()),
            buckets: (0..buckets).map(|_| AtomicU64::new(0)).collect(),
        }
    }

    fn add(&self, bounds: &[f64], value: f64) {
        let idx = bucket_index(bounds, value);
        if let Some(b) = self.buckets.get(idx) {
            b.fetch_add(1, Ordering::Relaxed);
        }
        // The closure never returns None, so the update always lands.
        let _ = self
            .sum_bits
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some((f64::from_bits(bits) + value).to_bits())
            });
        self.count.fetch_add(1, Ordering::Relaxed);
    }

    fn read(&self) -> RowData {
        let count = self.count.load(Ordering::Relaxed);
        let sum = f64::from_bits(self.sum_bits.load(Ordering::Relaxed));
        let mean = if count > 0 { sum / count as f64 } else { 0.0 };
        RowData::Distribution {
            count,
            sum,
            mean,
            bucket_counts: self
                .buckets
                .iter()
                .map(|b| b.load(Ordering::Relaxed))
                .collect(),
        }
    }
}
