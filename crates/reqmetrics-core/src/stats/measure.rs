use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// What a measure records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MeasureKind {
    /// Integer increments.
    Counter,
    /// Real-valued samples.
    Distribution,
}

struct MeasureInner {
    name: String,
    description: String,
    unit: String,
    kind: MeasureKind,
}

/// Handle to a measure defined in a [`Registry`](super::Registry).
///
/// Cloning is cheap. Two handles are equal only if they come from the same
/// definition; a same-named measure from another registry is a different one.
#[derive(Clone)]
pub struct Measure {
    inner: Arc<MeasureInner>,
}

impl Measure {
    pub(crate) fn new(name: String, description: String, unit: String, kind: MeasureKind) -> Self {
        Self {
            inner: Arc::new(MeasureInner {
                name,
                description,
                unit,
                kind,
            }),
        }
    }

    pub fn name(&self) -> &str {
        &self.inner.name
    }

    pub fn description(&self) -> &str {
        &self.inner.description
    }

    pub fn unit(&self) -> &str {
        &self.inner.unit
    }

    pub fn kind(&self) -> MeasureKind {
        self.inner.kind
    }
}

impl PartialEq for Measure {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }
}

impl Eq for Measure {}

impl fmt::Debug for Measure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Measure")
            .field("name", &self.inner.name)
            .field("unit", &self.inner.unit)
            .field("kind", &self.inner.kind)
            .finish()
    }
}
