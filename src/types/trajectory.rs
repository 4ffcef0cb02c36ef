//! Trajectory types: TrajectoryStation, WellTrajectory, EnrichedStation

use serde::{Deserialize, Serialize};

use crate::error::ZoneError;

/// One survey station of a well trajectory.
///
/// `tvd` shares the vertical axis of the horizon elevations: larger values are
/// shallower. `distance` is the cumulative along-path distance from the first
/// station of the well.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrajectoryStation {
    /// Measured depth along the wellbore
    pub md: f64,
    /// True vertical depth (same datum and sign as horizon elevations)
    pub tvd: f64,
    /// Horizontal X offset
    pub x: f64,
    /// Horizontal Y offset
    pub y: f64,
    /// Cumulative along-path distance from the first station
    pub distance: f64,
}

/// Raw survey point before along-path distances are known.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SurveyPoint {
    pub md: f64,
    pub tvd: f64,
    pub x: f64,
    pub y: f64,
}

/// Validated, MD-ordered station list for a single well.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WellTrajectory {
    well_id: String,
    stations: Vec<TrajectoryStation>,
}

impl WellTrajectory {
    /// Build a trajectory from provider stations.
    ///
    /// Fails with `InvalidTrajectory` when any value is non-finite, MD is
    /// not strictly increasing, or along-path distance goes backwards.
    pub fn new(
        well_id: impl Into<String>,
        stations: Vec<TrajectoryStation>,
    ) -> Result<Self, ZoneError> {
        let well_id = well_id.into();

        for (i, s) in stations.iter().enumerate() {
            if ![s.md, s.tvd, s.x, s.y, s.distance].iter().all(|v| v.is_finite()) {
                return Err(ZoneError::InvalidTrajectory {
                    well_id,
                    reason: format!("station {i} has a non-finite value"),
                });
            }
        }

        if let Some(i) = stations.windows(2).position(|w| w[1].md <= w[0].md) {
            return Err(ZoneError::InvalidTrajectory {
                well_id,
                reason: format!(
                    "MD not strictly increasing at station {} ({:.3} -> {:.3})",
                    i + 1,
                    stations[i].md,
                    stations[i + 1].md
                ),
            });
        }

        if let Some(i) = stations.windows(2).position(|w| w[1].distance < w[0].distance) {
            return Err(ZoneError::InvalidTrajectory {
                well_id,
                reason: format!(
                    "distance decreases at station {} ({:.3} -> {:.3})",
                    i + 1,
                    stations[i].distance,
                    stations[i + 1].distance
                ),
            });
        }

        Ok(Self { well_id, stations })
    }

    /// Build a trajectory from survey points, computing the cumulative
    /// 3-D chord distance from the first point.
    pub fn from_survey(
        well_id: impl Into<String>,
        points: &[SurveyPoint],
    ) -> Result<Self, ZoneError> {
        let mut distance = 0.0;
        let mut stations = Vec::with_capacity(points.len());

        for (i, p) in points.iter().enumerate() {
            if i > 0 {
                let prev = &points[i - 1];
                let dx = p.x - prev.x;
                let dy = p.y - prev.y;
                let dz = p.tvd - prev.tvd;
                distance += (dx * dx + dy * dy + dz * dz).sqrt();
            }
            stations.push(TrajectoryStation {
                md: p.md,
                tvd: p.tvd,
                x: p.x,
                y: p.y,
                distance,
            });
        }

        Self::new(well_id, stations)
    }

    pub fn well_id(&self) -> &str {
        &self.well_id
    }

    pub fn stations(&self) -> &[TrajectoryStation] {
        &self.stations
    }

    pub fn len(&self) -> usize {
        self.stations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stations.is_empty()
    }
}

/// A station annotated with horizon elevations and inclination.
///
/// `elevations` is indexed by horizon position in the owning `HorizonSet`;
/// `None` marks a horizon with no usable sample at this station.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedStation {
    pub station: TrajectoryStation,
    pub elevations: Vec<Option<f64>>,
    /// Inclination in degrees relative to the previous raw station
    pub inclination: Option<f64>,
}

impl EnrichedStation {
    /// Elevation of horizon `h` at this station, if present.
    pub fn elevation(&self, h: usize) -> Option<f64> {
        self.elevations.get(h).copied().flatten()
    }
}
