//! Zone Crossing Detector
//!
//! Walks the lateral station by station and splits it into zone intervals
//! wherever the well path crosses a horizon in the (vertical, along-path
//! distance) plane.
//!
//! ## Conventions
//! - Vertical values (station TVD and horizon elevations) share one axis on
//!   which larger means shallower.
//! - Horizons are ordered shallowest first by their mean elevation over the
//!   lateral; ties fall back to the label. The order is recomputed per well.
//! - A band is named after the horizon bounding it from above. The band
//!   above the shallowest horizon is `GridName::AboveAll`.
//!
//! ## Walk
//! 1. Initial band from the first station: the first adjacent pair with
//!    `elev(upper) >= TVD >= elev(lower)` names the band after `upper`.
//! 2. For every station pair and horizon, intersect the well segment with
//!    the horizon segment. At a hit the well enters the band above the
//!    horizon when its slope exceeds the horizon's, otherwise the band
//!    below (named after the horizon itself).
//! 3. The open interval closes at the hit and a new one opens there; the
//!    last interval closes exactly on the last station.

pub mod azimuth;
pub mod geometry;

use tracing::debug;

use crate::config::CrossingConfig;
use crate::error::ZoneError;
use crate::lateral::LateralSection;
use crate::surface::HorizonSet;
use crate::types::{EnrichedStation, GridName, ZoneInterval, ZonePoint, ZoneType};

use geometry::{segment_intersection, Point2};

/// Horizon indices sorted shallowest first by mean elevation over the lateral.
///
/// Horizons without a single elevation value in the window are left out.
pub fn order_horizons(section: &LateralSection, horizons: &HorizonSet) -> Vec<usize> {
    let mut means: Vec<(usize, f64)> = (0..horizons.len())
        .filter_map(|h| {
            let (sum, count) = section
                .stations
                .iter()
                .filter_map(|s| s.elevation(h))
                .fold((0.0, 0usize), |(sum, n), z| (sum + z, n + 1));
            (count > 0).then(|| (h, sum / count as f64))
        })
        .collect();

    means.sort_by(|a, b| {
        b.1.total_cmp(&a.1)
            .then_with(|| horizons.label(a.0).cmp(&horizons.label(b.0)))
            .then_with(|| a.0.cmp(&b.0))
    });

    means.into_iter().map(|(h, _)| h).collect()
}

/// Band containing `station` given the shallowest-first horizon order.
///
/// Boundaries are inclusive: a TVD exactly on a horizon belongs to the band
/// below it. A TVD below every horizon falls into the deepest band.
pub fn initial_grid_name(
    station: &EnrichedStation,
    order: &[usize],
    horizons: &HorizonSet,
) -> GridName {
    let present: Vec<(usize, f64)> = order
        .iter()
        .filter_map(|&h| station.elevation(h).map(|z| (h, z)))
        .collect();

    let tvd = station.station.tvd;
    let (Some(&(_, shallowest)), Some(&(deepest, _))) = (present.first(), present.last()) else {
        return GridName::AboveAll;
    };
    if tvd > shallowest {
        return GridName::AboveAll;
    }

    let upper = present
        .windows(2)
        .find(|w| w[0].1 >= tvd && tvd >= w[1].1)
        .map_or(deepest, |w| w[0].0);

    horizons
        .label(upper)
        .map_or(GridName::AboveAll, GridName::horizon)
}

/// The interval currently being built by the walk.
#[derive(Debug, Clone)]
struct OpenInterval {
    grid_name: GridName,
    top: ZonePoint,
}

/// One well/horizon intersection inside a station pair.
#[derive(Debug, Clone)]
struct Crossing {
    /// Fraction of the way from the previous station to the current one
    t: f64,
    /// Position of the horizon in the shallowest-first order
    rank: usize,
    tvd: f64,
    next: GridName,
}

/// Result of walking one lateral.
#[derive(Debug, Clone)]
pub struct ZoneWalk {
    pub intervals: Vec<ZoneInterval>,
    /// Horizon labels, shallowest first, as used for this well
    pub horizon_order: Vec<String>,
    pub display_angle: f64,
    pub crossings: usize,
}

/// Splits a lateral into zone intervals.
pub struct ZoneCrossingDetector<'a> {
    config: &'a CrossingConfig,
    horizons: &'a HorizonSet,
}

impl<'a> ZoneCrossingDetector<'a> {
    pub fn new(config: &'a CrossingConfig, horizons: &'a HorizonSet) -> Self {
        Self { config, horizons }
    }

    /// Walk the lateral and emit its ordered, MD-contiguous interval list.
    pub fn detect(&self, section: &LateralSection, zone_set: &str) -> Result<ZoneWalk, ZoneError> {
        let (Some(first), Some(last)) = (section.first(), section.last()) else {
            return Err(ZoneError::NoLateralStations {
                well_id: section.well_id.clone(),
            });
        };

        let order = order_horizons(section, self.horizons);
        let angle = azimuth::display_angle(
            (first.station.x, first.station.y),
            (last.station.x, last.station.y),
            self.config.snap_display_angle,
        );

        let mut open = OpenInterval {
            grid_name: initial_grid_name(first, &order, self.horizons),
            top: zone_point(first),
        };
        let mut intervals = Vec::new();
        let mut crossings = 0;

        for pair in section.stations.windows(2) {
            let (prev, curr) = (&pair[0], &pair[1]);
            for hit in self.crossings_between(prev, curr, &order) {
                crossings += 1;
                let at = interpolate(prev, curr, hit.t, hit.tvd);
                let closed = std::mem::replace(
                    &mut open,
                    OpenInterval {
                        grid_name: hit.next,
                        top: at,
                    },
                );
                self.push_interval(&mut intervals, section, zone_set, angle, closed, at, false);
            }
        }

        self.push_interval(&mut intervals, section, zone_set, angle, open, zone_point(last), true);

        debug!(
            well = %section.well_id,
            intervals = intervals.len(),
            crossings,
            "Zoned lateral"
        );

        Ok(ZoneWalk {
            intervals,
            horizon_order: order
                .iter()
                .filter_map(|&h| self.horizons.label(h).map(str::to_string))
                .collect(),
            display_angle: angle,
            crossings,
        })
    }

    /// Every horizon crossing between two stations, ordered along the segment
    /// and then shallowest first.
    fn crossings_between(
        &self,
        prev: &EnrichedStation,
        curr: &EnrichedStation,
        order: &[usize],
    ) -> Vec<Crossing> {
        let (a, b) = (&prev.station, &curr.station);
        let d_dist = b.distance - a.distance;
        if d_dist <= 0.0 {
            // Both segments are vertical at one distance: no single crossing point
            return Vec::new();
        }
        let well_slope = (b.tvd - a.tvd) / d_dist;
        let well0 = Point2::new(a.tvd, a.distance);
        let well1 = Point2::new(b.tvd, b.distance);

        let mut hits: Vec<Crossing> = order
            .iter()
            .enumerate()
            .filter_map(|(rank, &h)| {
                // A horizon missing at either end is skipped for this pair only
                let (z0, z1) = (prev.elevation(h)?, curr.elevation(h)?);
                let hit = segment_intersection(
                    well0,
                    well1,
                    Point2::new(z0, a.distance),
                    Point2::new(z1, b.distance),
                )?;

                let t = ((hit.point.y - a.distance) / d_dist).clamp(0.0, 1.0);

                let next = if well_slope > (z1 - z0) / d_dist {
                    self.band_above(order, rank)
                } else {
                    GridName::horizon(self.horizons.label(h)?)
                };

                Some(Crossing {
                    t,
                    rank,
                    tvd: hit.point.x,
                    next,
                })
            })
            .collect();

        hits.sort_by(|x, y| {
            x.t.total_cmp(&y.t).then_with(|| x.rank.cmp(&y.rank))
        });
        hits
    }

    /// Band directly above the horizon at `rank`.
    fn band_above(&self, order: &[usize], rank: usize) -> GridName {
        rank.checked_sub(1)
            .and_then(|r| order.get(r))
            .and_then(|&h| self.horizons.label(h))
            .map_or(GridName::AboveAll, GridName::horizon)
    }

    #[allow(clippy::too_many_arguments)]
    fn push_interval(
        &self,
        intervals: &mut Vec<ZoneInterval>,
        section: &LateralSection,
        zone_set: &str,
        angle: f64,
        open: OpenInterval,
        base: ZonePoint,
        is_last: bool,
    ) {
        let zero_length = base.md <= open.top.md;
        if zero_length && !self.config.keep_zero_length_intervals && !is_last {
            // Touch point: the neighbouring interval starts at the same MD
            return;
        }

        intervals.push(ZoneInterval {
            well_id: section.well_id.clone(),
            grid_name: open.grid_name,
            zone_set: zone_set.to_string(),
            zone_type: ZoneType::Grid,
            top: open.top,
            base,
            angle_top: angle,
            angle_base: angle,
        });
    }
}

fn zone_point(s: &EnrichedStation) -> ZonePoint {
    ZonePoint {
        md: s.station.md,
        tvd: s.station.tvd,
        x: s.station.x,
        y: s.station.y,
    }
}

fn interpolate(prev: &EnrichedStation, curr: &EnrichedStation, t: f64, tvd: f64) -> ZonePoint {
    let (a, b) = (&prev.station, &curr.station);
    ZonePoint {
        md: a.md + t * (b.md - a.md),
        tvd,
        x: a.x + t * (b.x - a.x),
        y: a.y + t * (b.y - a.y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LateralConfig;
    use crate::lateral::LateralExtractor;
    use crate::types::{HorizonSample, HorizonSurface, TrajectoryStation, WellTrajectory};

    /// Horizon with a constant elevation over a wide area.
    fn flat(label: &str, z: f64) -> HorizonSurface {
        HorizonSurface::new(
            label,
            vec![
                HorizonSample::new(-1.0e5, -1.0e5, z),
                HorizonSample::new(1.0e5, 1.0e5, z),
                HorizonSample::new(-1.0e5, 1.0e5, z),
                HorizonSample::new(1.0e5, -1.0e5, z),
            ],
        )
    }

    /// Lateral along +x with MD == x == distance and TVD from `tvd(md)`.
    fn lateral(stations: usize, step: f64, tvd: impl Fn(f64) -> f64) -> WellTrajectory {
        let s = (0..stations)
            .map(|i| {
                let md = i as f64 * step;
                TrajectoryStation { md, tvd: tvd(md), x: md, y: 0.0, distance: md }
            })
            .collect();
        WellTrajectory::new("W-1", s).unwrap()
    }

    fn zone(traj: &WellTrajectory, horizons: &HorizonSet, config: &CrossingConfig) -> ZoneWalk {
        let lateral_config = LateralConfig::default();
        let (section, _) = LateralExtractor::new(&lateral_config, horizons)
            .extract(traj)
            .unwrap();
        ZoneCrossingDetector::new(config, horizons)
            .detect(&section, "set-A")
            .unwrap()
    }

    fn names(walk: &ZoneWalk) -> Vec<String> {
        walk.intervals.iter().map(|i| i.grid_name.to_string()).collect()
    }

    #[test]
    fn test_order_is_shallowest_first_with_label_ties() {
        let horizons = HorizonSet::build(&[flat("B", 50.0), flat("C", 100.0), flat("A", 50.0)]);
        let traj = lateral(5, 100.0, |_| 75.0);
        let (section, _) = LateralExtractor::new(&LateralConfig::default(), &horizons)
            .extract(&traj)
            .unwrap();
        let order = order_horizons(&section, &horizons);
        let labels: Vec<_> = order.iter().map(|&h| horizons.label(h).unwrap()).collect();
        assert_eq!(labels, vec!["C", "A", "B"]);
        // Stable under repetition
        assert_eq!(order, order_horizons(&section, &horizons));
    }

    #[test]
    fn test_initial_band_inclusive_and_sentinels() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        let order = vec![0, 1];
        let at = |tvd: f64| EnrichedStation {
            station: TrajectoryStation { md: 0.0, tvd, x: 0.0, y: 0.0, distance: 0.0 },
            elevations: vec![Some(100.0), Some(50.0)],
            inclination: None,
        };
        assert_eq!(initial_grid_name(&at(120.0), &order, &horizons), GridName::AboveAll);
        assert_eq!(initial_grid_name(&at(100.0), &order, &horizons), GridName::horizon("Top"));
        assert_eq!(initial_grid_name(&at(75.0), &order, &horizons), GridName::horizon("Top"));
        assert_eq!(initial_grid_name(&at(50.0), &order, &horizons), GridName::horizon("Top"));
        assert_eq!(initial_grid_name(&at(10.0), &order, &horizons), GridName::horizon("Base"));
    }

    #[test]
    fn test_flat_lateral_between_horizons_is_one_interval() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        let traj = lateral(11, 100.0, |_| 75.0);
        let walk = zone(&traj, &horizons, &CrossingConfig::default());

        assert_eq!(names(&walk), vec!["Top"]);
        assert_eq!(walk.crossings, 0);
        let only = &walk.intervals[0];
        assert_eq!(only.top.md, 100.0); // first station has no inclination
        assert_eq!(only.base.md, 1000.0);
        assert_eq!(walk.horizon_order, vec!["Top", "Base"]);
    }

    #[test]
    fn test_descending_through_base_uses_crossed_horizon() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        // 90 -> 10 over MD 0..10000; crosses 50 at MD 5000
        let traj = lateral(11, 1000.0, |md| 90.0 - md / 125.0);
        let walk = zone(&traj, &horizons, &CrossingConfig::default());

        assert_eq!(names(&walk), vec!["Top", "Base"]);
        let split = walk.intervals[0].base;
        assert!((split.md - 5000.0).abs() < 1e-6);
        assert!((split.tvd - 50.0).abs() < 1e-9);
        assert!((split.x - 5000.0).abs() < 1e-6);
        assert_eq!(walk.intervals[1].top, split);
    }

    #[test]
    fn test_climbing_through_horizon_enters_band_above() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        // 30 -> 80 crosses Base going up
        let traj = lateral(11, 1000.0, |md| 30.0 + md / 200.0);
        let walk = zone(&traj, &horizons, &CrossingConfig::default());
        assert_eq!(names(&walk), vec!["Base", "Top"]);
    }

    #[test]
    fn test_climbing_through_shallowest_is_above_all() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0)]);
        let traj = lateral(11, 1000.0, |md| 95.0 + md / 1000.0);
        let walk = zone(&traj, &horizons, &CrossingConfig::default());
        assert_eq!(names(&walk), vec!["Top", "Above All"]);
    }

    #[test]
    fn test_two_crossings_in_one_segment_follow_md() {
        // One long segment from 120 down to 20 crosses Top then Base
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        let stations = vec![
            TrajectoryStation { md: 0.0, tvd: 120.0, x: 0.0, y: 0.0, distance: 0.0 },
            TrajectoryStation { md: 20_000.0, tvd: 120.0, x: 20_000.0, y: 0.0, distance: 20_000.0 },
            TrajectoryStation { md: 40_000.0, tvd: 20.0, x: 40_000.0, y: 0.0, distance: 40_000.0 },
        ];
        let traj = WellTrajectory::new("W-1", stations).unwrap();
        let walk = zone(&traj, &horizons, &CrossingConfig::default());

        assert_eq!(names(&walk), vec!["Above All", "Top", "Base"]);
        for w in walk.intervals.windows(2) {
            assert_eq!(w[0].base.md, w[1].top.md);
            assert!(w[0].base.md >= w[0].top.md);
        }
    }

    #[test]
    fn test_touch_at_station_folds_zero_length_interval() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        // Dips exactly onto Base at MD 5000 and climbs back
        let traj = lateral(11, 1000.0, |md| 50.0 + (md - 5000.0).abs() / 200.0);

        let folded = zone(&traj, &horizons, &CrossingConfig::default());
        assert!(folded.intervals.iter().all(|i| i.md_length() > 0.0));

        let kept = zone(
            &traj,
            &horizons,
            &CrossingConfig { keep_zero_length_intervals: true, ..CrossingConfig::default() },
        );
        assert!(kept.intervals.iter().any(|i| i.md_length() == 0.0));

        // Either way the well ends in the band it started in
        for walk in [&folded, &kept] {
            assert_eq!(walk.intervals.last().unwrap().grid_name, GridName::horizon("Top"));
        }
    }

    #[test]
    fn test_crossing_on_last_station_emits_final_band() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        let tvds = [60.0, 57.0, 54.0, 50.0];
        let stations = tvds
            .iter()
            .enumerate()
            .map(|(i, &tvd)| {
                let md = i as f64 * 1000.0;
                TrajectoryStation { md, tvd, x: md, y: 0.0, distance: md }
            })
            .collect();
        let traj = WellTrajectory::new("W-1", stations).unwrap();

        for config in [
            CrossingConfig::default(),
            CrossingConfig { keep_zero_length_intervals: true, ..CrossingConfig::default() },
        ] {
            let walk = zone(&traj, &horizons, &config);
            assert_eq!(names(&walk), vec!["Top", "Base"]);
            let last = walk.intervals.last().unwrap();
            assert_eq!(last.top.md, 3000.0);
            assert_eq!(last.base.md, 3000.0);
            assert_eq!(walk.intervals[0].base.md, last.top.md);
        }
    }

    #[test]
    fn test_missing_elevation_skips_horizon_for_that_pair() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        let traj = lateral(11, 1000.0, |md| 90.0 - md / 125.0);
        let (mut section, _) = LateralExtractor::new(&LateralConfig::default(), &horizons)
            .extract(&traj)
            .unwrap();
        // Knock out Base on the station just past the crossing
        let idx = section.stations.iter().position(|s| s.station.md == 5000.0).unwrap();
        section.stations[idx + 1].elevations[1] = None;
        section.stations[idx].elevations[1] = None;

        let walk = ZoneCrossingDetector::new(&CrossingConfig::default(), &horizons)
            .detect(&section, "set-A")
            .unwrap();
        // The crossing sits in the knocked-out pairs, so no split is found
        assert_eq!(names(&walk), vec!["Top"]);
    }

    #[test]
    fn test_every_interval_carries_display_angle() {
        let horizons = HorizonSet::build(&[flat("Top", 100.0), flat("Base", 50.0)]);
        let traj = lateral(11, 1000.0, |md| 90.0 - md / 125.0);
        let walk = zone(&traj, &horizons, &CrossingConfig::default());
        for i in &walk.intervals {
            assert_eq!(i.angle_top, walk.display_angle);
            assert_eq!(i.angle_base, walk.display_angle);
            assert_eq!(i.zone_set, "set-A");
            assert_eq!(i.zone_type, ZoneType::Grid);
        }
        assert!((walk.display_angle - std::f64::consts::FRAC_PI_2).abs() < 1e-12);
    }
}
