//! Zone Computation Pipeline
//!
//! ```text
//! HorizonSurface[] ──build once──► HorizonSet (Arc, read-only)
//!                                      │
//! WellTrajectory ──► LateralExtractor ─┴─► ZoneCrossingDetector
//!                                              │
//!                    LateralPercentageAggregator ◄─┘
//!                                              │
//!                         WellOutcome ──► BatchReport ──► merge_into(MasterStore)
//! ```
//!
//! Wells share no mutable state, so a batch maps them through rayon and only
//! the final merge runs on a single thread. A cancellation flag is checked
//! before each well starts; a well in progress always runs to completion.

mod report;

pub use report::*;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::aggregation::LateralPercentageAggregator;
use crate::config::EngineConfig;
use crate::crossing::ZoneCrossingDetector;
use crate::error::{WellIssue, ZoneError};
use crate::lateral::LateralExtractor;
use crate::surface::HorizonSet;
use crate::types::{HorizonSurface, WellTrajectory};

/// Runs the full zone computation for one well or a batch of wells.
pub struct ZoneEngine {
    config: EngineConfig,
    horizons: Arc<HorizonSet>,
}

impl ZoneEngine {
    pub fn new(config: EngineConfig, horizons: Arc<HorizonSet>) -> Self {
        Self { config, horizons }
    }

    /// Index `surfaces` and build an engine around them.
    pub fn from_surfaces(config: EngineConfig, surfaces: &[HorizonSurface]) -> Self {
        Self::new(config, Arc::new(HorizonSet::build(surfaces)))
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn horizons(&self) -> &Arc<HorizonSet> {
        &self.horizons
    }

    /// Zone a single well. Never fails: problems land in `WellOutcome::issues`.
    pub fn compute_well(&self, trajectory: &WellTrajectory, zone_set: &str) -> WellOutcome {
        let well_id = trajectory.well_id();

        let extractor = LateralExtractor::new(&self.config.lateral, &self.horizons);
        let (section, lookup_issues) = match extractor.extract(trajectory) {
            Ok(extracted) => extracted,
            Err(e) => return self.no_lateral(well_id, zone_set, e),
        };

        let mut outcome = WellOutcome::empty(well_id, zone_set, WellStatus::Zoned);
        outcome.lateral_length = Some(section.total_length);
        outcome.issues = lookup_issues;

        let detector = ZoneCrossingDetector::new(&self.config.crossing, &self.horizons);
        let walk = match detector.detect(&section, zone_set) {
            Ok(walk) => walk,
            Err(e) => return self.no_lateral(well_id, zone_set, e),
        };

        let aggregator = LateralPercentageAggregator::new(&self.config.aggregation);
        outcome.percentages = match aggregator.aggregate(
            well_id,
            zone_set,
            &walk.intervals,
            section.total_length,
        ) {
            Ok(records) => records,
            Err(e) => {
                warn!(well = %well_id, error = %e, "Percentages not computed");
                outcome.issues.push(WellIssue::new(well_id, e));
                aggregator.not_computed(well_id, zone_set, &walk.intervals)
            }
        };

        debug!(
            well = %well_id,
            intervals = walk.intervals.len(),
            crossings = walk.crossings,
            lateral_length = section.total_length,
            issues = outcome.issues.len(),
            "Well zoned"
        );

        outcome.horizon_order = walk.horizon_order;
        outcome.intervals = walk.intervals;
        outcome
    }

    fn no_lateral(&self, well_id: &str, zone_set: &str, error: ZoneError) -> WellOutcome {
        warn!(well = %well_id, error = %error, "Well skipped");
        let mut outcome = WellOutcome::empty(well_id, zone_set, WellStatus::NoLateral);
        outcome.issues.push(WellIssue::new(well_id, error));
        outcome
    }

    /// Zone every well, in parallel unless disabled in `[batch]`.
    ///
    /// Outcomes keep the input order. When `cancel` is set, wells that have
    /// not started yet are reported as `Cancelled`.
    pub fn run_batch(
        &self,
        wells: &[WellTrajectory],
        zone_set: &str,
        cancel: Option<&AtomicBool>,
    ) -> BatchReport {
        let run = |well: &WellTrajectory| {
            if cancel.is_some_and(|c| c.load(Ordering::Relaxed)) {
                WellOutcome::empty(well.well_id(), zone_set, WellStatus::Cancelled)
            } else {
                self.compute_well(well, zone_set)
            }
        };

        let batch = &self.config.batch;
        let outcomes: Vec<WellOutcome> = if !batch.parallel {
            wells.iter().map(run).collect()
        } else if let Some(threads) = batch.worker_threads {
            match rayon::ThreadPoolBuilder::new().num_threads(threads).build() {
                Ok(pool) => pool.install(|| wells.par_iter().map(run).collect()),
                Err(e) => {
                    warn!(threads, error = %e, "Worker pool unavailable, using global pool");
                    wells.par_iter().map(run).collect()
                }
            }
        } else {
            wells.par_iter().map(run).collect()
        };

        let report = BatchReport::new(zone_set, outcomes, self.horizons.issues().to_vec());
        info!(
            zone_set = %zone_set,
            wells = wells.len(),
            zoned = report.wells_zoned,
            without_lateral = report.wells_without_lateral,
            cancelled = report.wells_cancelled,
            issues = report.issues().count(),
            "Batch complete"
        );
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BatchConfig;
    use crate::error::ErrorKind;
    use crate::types::{HorizonSample, TrajectoryStation};

    fn flat(label: &str, z: f64) -> HorizonSurface {
        HorizonSurface::new(
            label,
            vec![
                HorizonSample::new(-1.0e5, -1.0e5, z),
                HorizonSample::new(1.0e5, 1.0e5, z),
            ],
        )
    }

    fn well(id: &str, tvd: impl Fn(f64) -> f64) -> WellTrajectory {
        let stations = (0..=10)
            .map(|i| {
                let md = f64::from(i) * 1000.0;
                TrajectoryStation { md, tvd: tvd(md), x: md, y: 0.0, distance: md }
            })
            .collect();
        WellTrajectory::new(id, stations).unwrap()
    }

    fn engine(batch: BatchConfig) -> ZoneEngine {
        let config = EngineConfig { batch, ..EngineConfig::default() };
        ZoneEngine::from_surfaces(config, &[flat("Top", 100.0), flat("Base", 50.0)])
    }

    #[test]
    fn test_compute_well_flat_lateral() {
        let outcome = engine(BatchConfig::default()).compute_well(&well("W-1", |_| 75.0), "set-A");
        assert_eq!(outcome.status, WellStatus::Zoned);
        assert_eq!(outcome.intervals.len(), 1);
        assert_eq!(outcome.percentages.len(), 1);
        assert!((outcome.percentages[0].percentage.unwrap() - 100.0).abs() < 1e-9);
        assert_eq!(outcome.lateral_length, Some(9000.0));
        assert!(outcome.issues.is_empty());
    }

    #[test]
    fn test_vertical_well_reports_missing_data() {
        let outcome = engine(BatchConfig::default()).compute_well(&well("W-V", |md| -md), "set-A");
        assert_eq!(outcome.status, WellStatus::NoLateral);
        assert!(outcome.intervals.is_empty());
        assert!(outcome.has_issue(ErrorKind::MissingData));
        assert!(outcome.well_record().is_none());
    }

    #[test]
    fn test_single_station_lateral_is_degenerate() {
        // Only the last station is near-horizontal
        let stations = vec![
            TrajectoryStation { md: 0.0, tvd: 0.0, x: 0.0, y: 0.0, distance: 0.0 },
            TrajectoryStation { md: 100.0, tvd: -100.0, x: 0.0, y: 0.0, distance: 100.0 },
            TrajectoryStation { md: 200.0, tvd: -100.0, x: 100.0, y: 0.0, distance: 200.0 },
        ];
        let traj = WellTrajectory::new("W-D", stations).unwrap();
        let outcome = engine(BatchConfig::default()).compute_well(&traj, "set-A");

        assert_eq!(outcome.status, WellStatus::Zoned);
        assert_eq!(outcome.lateral_length, Some(0.0));
        assert!(outcome.has_issue(ErrorKind::DegenerateGeometry));
        assert!(outcome.percentages.iter().all(|p| p.percentage.is_none()));
        assert_eq!(outcome.intervals.len(), 1);
    }

    #[test]
    fn test_batch_keeps_order_across_modes() {
        let wells = vec![
            well("W-1", |_| 75.0),
            well("W-2", |md| 90.0 - md / 125.0),
            well("W-V", |md| -md),
        ];
        let modes = [
            BatchConfig { parallel: false, worker_threads: None },
            BatchConfig { parallel: true, worker_threads: None },
            BatchConfig { parallel: true, worker_threads: Some(2) },
        ];
        let reports: Vec<_> = modes
            .into_iter()
            .map(|b| engine(b).run_batch(&wells, "set-A", None))
            .collect();

        for report in &reports {
            let ids: Vec<_> = report.outcomes.iter().map(|o| o.well_id.as_str()).collect();
            assert_eq!(ids, vec!["W-1", "W-2", "W-V"]);
            assert_eq!(report.wells_zoned, 2);
            assert_eq!(report.wells_without_lateral, 1);
            assert_eq!(report.outcomes[1].intervals, reports[0].outcomes[1].intervals);
        }
    }

    #[test]
    fn test_cancelled_batch_skips_wells() {
        let wells = vec![well("W-1", |_| 75.0), well("W-2", |_| 75.0)];
        let cancel = AtomicBool::new(true);
        let report = engine(BatchConfig::default()).run_batch(&wells, "set-A", Some(&cancel));
        assert_eq!(report.wells_cancelled, 2);
        assert_eq!(report.wells_zoned, 0);
    }

    #[test]
    fn test_empty_horizon_is_batch_issue_not_failure() {
        let config = EngineConfig::default();
        let engine = ZoneEngine::from_surfaces(
            config,
            &[flat("Top", 100.0), HorizonSurface::new("Ghost", Vec::new())],
        );
        let report = engine.run_batch(&[well("W-1", |_| 75.0)], "set-A", None);
        assert_eq!(report.wells_zoned, 1);
        assert_eq!(report.horizon_issues.len(), 1);
        assert!(!report.outcomes[0].horizon_order.contains(&"Ghost".to_string()));
    }
}
