//! Serializable, cumulative reads of view state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::aggregation::AggregationKind;
use super::measure::MeasureKind;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub name: String,
    pub description: String,
    pub measure: String,
    pub measure_kind: MeasureKind,
    pub unit: String,
    pub aggregation: AggregationKind,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub bounds: Vec<f64>,
    pub rows: Vec<RowSnapshot>,
}

impl ViewSnapshot {
    /// Sample count across all rows.
    pub fn total_count(&self) -> u64 {
        self.rows.iter().map(|r| r.data.count()).sum()
    }

    /// Row for the given tags, if any sample was recorded with them.
    pub fn row(&self, tags: &BTreeMap<String, String>) -> Option<&RowSnapshot> {
        self.rows.iter().find(|r| &r.tags == tags)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowSnapshot {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub tags: BTreeMap<String, String>,
    pub data: RowData,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RowData {
    Count {
        count: u64,
    },
    Distribution {
        count: u64,
        sum: f64,
        mean: f64,
        bucket_counts: Vec<u64>,
    },
}

impl RowData {
    pub fn count(&self) -> u64 {
        match self {
            RowData::Count { count } | RowData::Distribution { count, .. } => *count,
        }
    }
}
