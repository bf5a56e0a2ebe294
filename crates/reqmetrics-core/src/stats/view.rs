use super::aggregation::Aggregation;
use super::measure::Measure;

/// Binds a measure to an aggregation under an exported name.
#[derive(Debug, Clone)]
pub struct View {
    name: String,
    description: String,
    measure: Measure,
    aggregation: Aggregation,
}

impl View {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        measure: &Measure,
        aggregation: Aggregation,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            measure: measure.clone(),
            aggregation,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn measure(&self) -> &Measure {
        &self.measure
    }

    pub fn aggregation(&self) -> &Aggregation {
        &self.aggregation
    }
}
