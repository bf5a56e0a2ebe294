//! Measures, views, and the aggregation registry.
//!
//! ```text
//! Registry
//!   ├── define_counter() / define_distribution() → Measure
//!   ├── register_views()  ← once, before serving traffic
//!   ├── record()          ← request handlers, any thread
//!   └── snapshot()        → cumulative ViewSnapshots for exporters
//! ```

pub mod aggregation;
pub mod measure;
pub mod registry;
pub mod snapshot;
pub mod tags;
pub mod view;

use std::time::{SystemTime, UNIX_EPOCH};

pub use aggregation::{bucket_index, Aggregation, AggregationKind};
pub use measure::{Measure, MeasureKind};
pub use registry::Registry;
pub use snapshot::{RowData, RowSnapshot, ViewSnapshot};
pub use tags::TagSet;
pub use view::View;

/// Milliseconds since the unix epoch (0 if the clock is before it).
pub fn epoch_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
