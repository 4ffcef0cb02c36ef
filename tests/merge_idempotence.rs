//! Master Table Merge Tests
//!
//! Runs whole batches into an `InMemoryMaster` and checks that repeat runs
//! leave the master tables untouched, and that changed results overwrite
//! rows by key instead of duplicating them.

use lateral_zones::config::MergeConfig;
use lateral_zones::{
    EngineConfig, HorizonSample, HorizonSurface, InMemoryMaster, MasterStore, TrajectoryStation,
    WellTrajectory, ZoneEngine,
};

fn flat_horizon(label: &str, elevation: f64) -> HorizonSurface {
    let samples = (-2..=12)
        .map(|i| HorizonSample::new(f64::from(i) * 1000.0, 0.0, elevation))
        .collect();
    HorizonSurface::new(label, samples)
}

fn east_well(id: &str, tvd: impl Fn(f64) -> f64) -> WellTrajectory {
    let stations = (0..=10)
        .map(|i| {
            let md = f64::from(i) * 1000.0;
            TrajectoryStation { md, tvd: tvd(md), x: md, y: 0.0, distance: md }
        })
        .collect();
    WellTrajectory::new(id, stations).expect("valid trajectory")
}

fn field() -> Vec<WellTrajectory> {
    vec![
        east_well("W-1", |_| 75.0),
        east_well("W-2", |md| 90.0 - md / 125.0),
        east_well("W-3", |md| 30.0 + md / 200.0),
        east_well("W-VERT", |md| -md),
    ]
}

fn engine(top: f64, base: f64) -> ZoneEngine {
    ZoneEngine::from_surfaces(
        EngineConfig::default(),
        &[flat_horizon("Top", top), flat_horizon("Base", base)],
    )
}

#[test]
fn rerunning_unchanged_batch_leaves_master_identical() {
    let engine = engine(100.0, 50.0);
    let config = MergeConfig::default();
    let mut master = InMemoryMaster::new();

    let first = engine
        .run_batch(&field(), "set-A", None)
        .merge_into(&mut master, &config)
        .unwrap();
    assert!(first.inserted > 0);
    assert_eq!(first.well_records_replaced, 3);

    let intervals = master.interval_rows();
    let wells = master.well_rows();

    for _ in 0..3 {
        let again = engine
            .run_batch(&field(), "set-A", None)
            .merge_into(&mut master, &config)
            .unwrap();
        assert!(again.is_noop(), "repeat merge changed master: {again:?}");
        assert_eq!(again.unchanged, first.inserted);
    }

    assert_eq!(master.interval_rows(), intervals);
    assert_eq!(master.well_rows(), wells);
}

#[test]
fn zone_sets_do_not_collide() {
    let engine = engine(100.0, 50.0);
    let config = MergeConfig::default();
    let mut master = InMemoryMaster::new();

    engine.run_batch(&field(), "set-A", None).merge_into(&mut master, &config).unwrap();
    let after_a = master.interval_count();
    engine.run_batch(&field(), "set-B", None).merge_into(&mut master, &config).unwrap();

    assert_eq!(master.interval_count(), after_a * 2);
    assert_eq!(master.well_count(), 6);
    assert!(master.get_well_record("W-1", "set-B").unwrap().is_some());
}

#[test]
fn shifted_horizon_updates_rows_and_prunes_when_enabled() {
    let mut master = InMemoryMaster::new();
    let keep = MergeConfig::default();
    let prune = MergeConfig { prune_stale_intervals: true };

    engine(100.0, 50.0)
        .run_batch(&field(), "set-A", None)
        .merge_into(&mut master, &keep)
        .unwrap();
    let baseline = master.interval_count();

    // Base moves down: crossing MDs move, so new keys appear
    let moved = engine(100.0, 40.0).run_batch(&field(), "set-A", None);
    moved.merge_into(&mut master, &keep).unwrap();
    assert!(master.interval_count() > baseline);

    let stats = moved.merge_into(&mut master, &prune).unwrap();
    assert!(stats.pruned > 0);
    let expected: usize = moved.outcomes.iter().map(|o| o.intervals.len()).sum();
    assert_eq!(master.interval_count(), expected);

    // Percentage rows follow the latest run
    let w2 = master.get_well_record("W-2", "set-A").unwrap().unwrap();
    assert_eq!(Some(w2.percentages), moved.outcome("W-2").map(|o| o.percentages.clone()));
}
