//! Process registry of measures and views.
//!
//! One registry is built at startup and shared by handle (`Arc<Registry>`)
//! with request handlers and the exporter. Measures and views are keyed by
//! name in `DashMap`s; every view owns a row per distinct tag set.

use std::collections::{BTreeMap, HashSet};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;

use crate::error::{Result, ReqMetricsError};

use super::aggregation::RowState;
use super::measure::{Measure, MeasureKind};
use super::snapshot::{RowSnapshot, ViewSnapshot};
use super::tags::TagSet;
use super::view::View;

struct ViewState {
    view: View,
    rows: DashMap<TagSet, RowState>,
}

impl ViewState {
    fn new(view: View) -> Self {
        Self {
            view,
            rows: DashMap::new(),
        }
    }

    fn record(&self, tags: &TagSet, value: f64) {
        let bounds = self.view.aggregation().bounds();
        if let Some(row) = self.rows.get(tags) {
            row.add(bounds, value);
            return;
        }
        self.rows
            .entry(tags.clone())
            .or_insert_with(|| RowState::new(self.view.aggregation()))
            .add(bounds, value);
    }

    fn snapshot(&self) -> ViewSnapshot {
        let mut rows: Vec<RowSnapshot> = self
            .rows
            .iter()
            .map(|r| RowSnapshot {
                tags: r
                    .key()
                    .iter()
                    .map(|(k, v)| (k.to_string(), v.to_string()))
                    .collect::<BTreeMap<_, _>>(),
                data: r.value().read(),
            })
            .collect();
        rows.sort_by(|a, b| a.tags.cmp(&b.tags));

        let measure = self.view.measure();
        ViewSnapshot {
            name: self.view.name().to_string(),
            description: self.view.description().to_string(),
            measure: measure.name().to_string(),
            measure_kind: measure.kind(),
            unit: measure.unit().to_string(),
            aggregation: self.view.aggregation().kind(),
            bounds: self.view.aggregation().bounds().to_vec(),
            rows,
        }
    }
}

/// Measures, views, and their aggregation state.
pub struct Registry {
    measures: DashMap<String, Measure>,
    views: DashMap<String, Arc<ViewState>>,
    // measure name -> views bound to it
    bindings: DashMap<String, Vec<Arc<ViewState>>>,
    registration: Mutex<()>,
    recording: AtomicBool,
    start_time_ms: u64,
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl Registry {
    pub fn new() -> Self {
        Self {
            measures: DashMap::new(),
            views: DashMap::new(),
            bindings: DashMap::new(),
            registration: Mutex::new(()),
            recording: AtomicBool::new(false),
            start_time_ms: super::epoch_millis(),
        }
    }

    /// Start of the cumulative window (epoch ms).
    pub fn start_time_ms(&self) -> u64 {
        self.start_time_ms
    }

    /// Define an integer counter measure.
    pub fn define_counter(&self, name: &str, description: &str, unit: &str) -> Result<Measure> {
        self.define(name, description, unit, MeasureKind::Counter)
    }

    /// Define a real-valued distribution measure.
    pub fn define_distribution(
        &self,
        name: &str,
        description: &str,
        unit: &str,
    ) -> Result<Measure> {
        self.define(name, description, unit, MeasureKind::Distribution)
    }

    fn define(&self, name: &str, description: &str, unit: &str, kind: MeasureKind) -> Result<Measure> {
        if name.trim().is_empty() {
            return Err(ReqMetricsError::InvalidName("measure name must not be empty".into()));
        }
        match self.measures.entry(name.to_string()) {
            Entry::Occupied(_) => Err(ReqMetricsError::DuplicateMeasure(name.to_string())),
            Entry::Vacant(slot) => {
                let m = Measure::new(name.to_string(), description.to_string(), unit.to_string(), kind);
                slot.insert(m.clone());
                tracing::debug!(measure = %name, ?kind, "measure defined");
                Ok(m)
            }
        }
    }

    pub fn measure(&self, name: &str) -> Option<Measure> {
        self.measures.get(name).map(|m| m.value().clone())
    }

    /// Register a batch of views.
    ///
    /// All-or-nothing: every view is validated before any is installed.
    pub fn register_views<I>(&self, views: I) -> Result<()>
    where
        I: IntoIterator<Item = View>,
    {
        let views: Vec<View> = views.into_iter().collect();

        let _guard = self
            .registration
            .lock()
            .map_err(|_| ReqMetricsError::Internal("registration lock poisoned".into()))?;

        if self.recording.load(Ordering::Acquire) {
            return Err(ReqMetricsError::RegistryFrozen);
        }

        let mut batch: HashSet<&str> = HashSet::new();
        for v in &views {
            if v.name().trim().is_empty() {
                return Err(ReqMetricsError::InvalidName("view name must not be empty".into()));
            }
            if self.views.contains_key(v.name()) || !batch.insert(v.name()) {
                return Err(ReqMetricsError::DuplicateView(v.name().to_string()));
            }
            let defined = self
                .measures
                .get(v.measure().name())
                .is_some_and(|m| m.value() == v.measure());
            if !defined {
                return Err(ReqMetricsError::UnknownMeasure {
                    view: v.name().to_string(),
                    measure: v.measure().name().to_string(),
                });
            }
            v.aggregation().validate(v.name())?;
        }

        for v in views {
            let name = v.name().to_string();
            let measure = v.measure().name().to_string();
            let state = Arc::new(ViewState::new(v));
            self.bindings.entry(measure.clone()).or_default().push(Arc::clone(&state));
            self.views.insert(name.clone(), state);
            tracing::info!(view = %name, %measure, "view registered");
        }
        Ok(())
    }

    pub fn registered_views(&self) -> Vec<String> {
        let mut names: Vec<String> = self.views.iter().map(|e| e.key().clone()).collect();
        names.sort();
        names
    }

    /// Fold one sample into every view bound to `measure`.
    ///
    /// Never fails: samples for measures with no bound view, for measures
    /// defined elsewhere, and `NaN` samples are dropped.
    pub fn record(&self, tags: &TagSet, measure: &Measure, value: f64) {
        if !self.recording.load(Ordering::Relaxed) {
            self.recording.store(true, Ordering::Release);
        }
        if value.is_nan() {
            tracing::debug!(measure = %measure.name(), "NaN sample dropped");
            return;
        }
        let Some(bound) = self.bindings.get(measure.name()) else {
            tracing::trace!(measure = %measure.name(), "no view bound, sample dropped");
            return;
        };
        for state in bound.iter() {
            if state.view.measure() != measure {
                tracing::trace!(measure = %measure.name(), "foreign measure, sample dropped");
                return;
            }
            state.record(tags, value);
        }
    }

    /// Cumulative read of every registered view, sorted by view name.
    pub fn snapshot(&self) -> Vec<ViewSnapshot> {
        let mut out: Vec<ViewSnapshot> = self.views.iter().map(|e| e.value().snapshot()).collect();
        out.sort_by(|a, b| a.name.cmp(&b.name));
        out
    }

    pub fn view_snapshot(&self, name: &str) -> Option<ViewSnapshot> {
        self.views.get(name).map(|e| e.value().snapshot())
    }
}
