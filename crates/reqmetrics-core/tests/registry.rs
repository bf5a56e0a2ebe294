//! Registry definition, registration, and recording tests.

#![allow(clippy::unwrap_used)]
#![allow(clippy::expect_used)]
#![allow(clippy::panic)]

use std::sync::Arc;
use std::thread;

use reqmetrics_core::stats::{Aggregation, Registry, RowData, TagSet, View};
use reqmetrics_core::{ErrorClass, ReqMetricsError};

fn counter_registry() -> (Registry, reqmetrics_core::stats::Measure) {
    let reg = Registry::new();
    let m = reg.define_counter("requests", "total requests", "requests").unwrap();
    reg.register_views([View::new("requests", "total requests", &m, Aggregation::count())])
        .unwrap();
    (reg, m)
}

#[test]
fn duplicate_measure_rejected() {
    let reg = Registry::new();
    reg.define_counter("a", "", "1").unwrap();
    let err = reg.define_distribution("a", "", "s").expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::DuplicateMeasure(ref n) if n == "a"));
    assert_eq!(err.class(), ErrorClass::StartupConfiguration);
    assert!(err.class().is_fatal());
}

#[test]
fn empty_measure_name_rejected() {
    let reg = Registry::new();
    let err = reg.define_counter("  ", "", "1").expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::InvalidName(_)));
}

#[test]
fn count_view_reflects_every_record() {
    let (reg, m) = counter_registry();
    for _ in 0..37 {
        reg.record(&TagSet::empty(), &m, 1.0);
    }
    let snap = reg.view_snapshot("requests").unwrap();
    assert_eq!(snap.total_count(), 37);
    assert_eq!(snap.rows.len(), 1);
    assert!(snap.rows[0].tags.is_empty());
}

#[test]
fn count_ignores_sample_value() {
    let (reg, m) = counter_registry();
    reg.record(&TagSet::empty(), &m, 5.0);
    reg.record(&TagSet::empty(), &m, 0.0);
    assert_eq!(reg.view_snapshot("requests").unwrap().total_count(), 2);
}

#[test]
fn concurrent_records_are_counted_exactly_once() {
    let (reg, m) = counter_registry();
    let reg = Arc::new(reg);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let reg = Arc::clone(&reg);
            let m = m.clone();
            thread::spawn(move || {
                for _ in 0..1000 {
                    reg.record(&TagSet::empty(), &m, 1.0);
                }
            })
        })
        .collect();
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(reg.view_snapshot("requests").unwrap().total_count(), 8000);
}

#[test]
fn rows_are_split_by_tags() {
    let (reg, m) = counter_registry();
    reg.record(&TagSet::new(&[("route", "/")]), &m, 1.0);
    reg.record(&TagSet::new(&[("route", "/")]), &m, 1.0);
    reg.record(&TagSet::empty(), &m, 1.0);

    let snap = reg.view_snapshot("requests").unwrap();
    assert_eq!(snap.rows.len(), 2);
    assert_eq!(snap.total_count(), 3);

    let tags = [("route".to_string(), "/".to_string())].into_iter().collect();
    assert_eq!(snap.row(&tags).unwrap().data.count(), 2);
}

#[test]
fn record_without_view_is_noop() {
    let (reg, counted) = counter_registry();
    let unbound = reg.define_counter("unbound", "", "1").unwrap();

    reg.record(&TagSet::empty(), &counted, 1.0);
    reg.record(&TagSet::empty(), &unbound, 1.0);

    let snaps = reg.snapshot();
    assert_eq!(snaps.len(), 1);
    assert_eq!(snaps[0].total_count(), 1);
}

#[test]
fn measure_from_other_registry_is_ignored() {
    let (reg, _) = counter_registry();
    let other = Registry::new();
    let foreign = other.define_counter("requests", "", "1").unwrap();

    reg.record(&TagSet::empty(), &foreign, 1.0);
    assert_eq!(reg.view_snapshot("requests").unwrap().total_count(), 0);
}

#[test]
fn overlapping_registration_fails_and_keeps_first() {
    let reg = Registry::new();
    let a = reg.define_counter("a", "", "1").unwrap();
    let b = reg.define_counter("b", "", "1").unwrap();

    reg.register_views([View::new("view_a", "", &a, Aggregation::count())]).unwrap();

    let err = reg
        .register_views([
            View::new("view_b", "", &b, Aggregation::count()),
            View::new("view_a", "", &b, Aggregation::count()),
        ])
        .expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::DuplicateView(ref n) if n == "view_a"));

    // nothing from the failed batch was installed
    assert_eq!(reg.registered_views(), vec!["view_a".to_string()]);
    assert!(reg.view_snapshot("view_b").is_none());

    reg.record(&TagSet::empty(), &a, 1.0);
    reg.record(&TagSet::empty(), &b, 1.0);
    assert_eq!(reg.view_snapshot("view_a").unwrap().total_count(), 1);
}

#[test]
fn duplicate_names_within_one_batch_fail() {
    let reg = Registry::new();
    let a = reg.define_counter("a", "", "1").unwrap();
    let err = reg
        .register_views([
            View::new("v", "", &a, Aggregation::count()),
            View::new("v", "", &a, Aggregation::count()),
        ])
        .expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::DuplicateView(_)));
    assert!(reg.registered_views().is_empty());
}

#[test]
fn view_over_undefined_measure_fails() {
    let reg = Registry::new();
    let other = Registry::new();
    let foreign = other.define_counter("x", "", "1").unwrap();

    let err = reg
        .register_views([View::new("v", "", &foreign, Aggregation::count())])
        .expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::UnknownMeasure { .. }));
}

#[test]
fn unordered_bounds_rejected() {
    let reg = Registry::new();
    let d = reg.define_distribution("lat", "", "s").unwrap();
    let err = reg
        .register_views([View::new("v", "", &d, Aggregation::distribution(vec![1.0, 1.0, 2.0]))])
        .expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::InvalidBuckets { .. }));

    let err = reg
        .register_views([View::new("v", "", &d, Aggregation::distribution(vec![0.0, f64::INFINITY]))])
        .expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::InvalidBuckets { .. }));
}

#[test]
fn registration_after_recording_is_rejected() {
    let (reg, m) = counter_registry();
    let late = reg.define_counter("late", "", "1").unwrap();
    reg.record(&TagSet::empty(), &m, 1.0);

    let err = reg
        .register_views([View::new("late", "", &late, Aggregation::count())])
        .expect_err("must fail");
    assert!(matches!(err, ReqMetricsError::RegistryFrozen));
    assert_eq!(reg.view_snapshot("requests").unwrap().total_count(), 1);
}

#[test]
fn several_views_share_one_measure() {
    let reg = Registry::new();
    let d = reg.define_distribution("lat", "", "s").unwrap();
    reg.register_views([
        View::new("lat_count", "", &d, Aggregation::count()),
        View::new("lat_hist", "", &d, Aggregation::distribution(vec![1.0])),
    ])
    .unwrap();

    reg.record(&TagSet::empty(), &d, 0.5);
    reg.record(&TagSet::empty(), &d, 1.5);

    assert_eq!(reg.view_snapshot("lat_count").unwrap().total_count(), 2);
    match &reg.view_snapshot("lat_hist").unwrap().rows[0].data {
        RowData::Distribution { bucket_counts, .. } => assert_eq!(bucket_counts, &vec![1, 1]),
        other => panic!("unexpected row data: {other:?}"),
    }
}

#[test]
fn snapshot_does_not_reset() {
    let (reg, m) = counter_registry();
    reg.record(&TagSet::empty(), &m, 1.0);
    assert_eq!(reg.snapshot()[0].total_count(), 1);
    reg.record(&TagSet::empty(), &m, 1.0);
    assert_eq!(reg.snapshot()[0].total_count(), 2);
}

#[test]
fn snapshot_serializes_names_verbatim() {
    let (reg, m) = counter_registry();
    reg.record(&TagSet::empty(), &m, 1.0);
    let json = serde_json::to_value(reg.snapshot()).unwrap();
    assert_eq!(json[0]["name"], "requests");
    assert_eq!(json[0]["aggregation"], "count");
    assert_eq!(json[0]["rows"][0]["data"]["type"], "count");
    assert_eq!(json[0]["rows"][0]["data"]["count"], 1);
}
