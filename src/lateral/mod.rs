//! Lateral Segment Extractor
//!
//! Restricts a well trajectory to its near-horizontal section. Inclination at
//! station i is `degrees(acos(ΔTVD / ΔMD))` against the previous raw station;
//! only stations strictly below the configured maximum are kept. The first
//! station has no inclination and is therefore never part of the lateral.
//!
//! Kept stations are enriched with the elevation of every horizon at their
//! X/Y position.

use tracing::debug;

use crate::config::LateralConfig;
use crate::error::{WellIssue, ZoneError};
use crate::surface::HorizonSet;
use crate::types::{EnrichedStation, TrajectoryStation, WellTrajectory};

/// Inclination in degrees between two consecutive stations.
///
/// `None` when the stations share an MD.
pub fn inclination_deg(prev: &TrajectoryStation, curr: &TrajectoryStation) -> Option<f64> {
    let d_md = curr.md - prev.md;
    if d_md == 0.0 {
        return None;
    }
    // Survey noise can push |ΔTVD| slightly past ΔMD
    let cos = ((curr.tvd - prev.tvd) / d_md).clamp(-1.0, 1.0);
    Some(cos.acos().to_degrees())
}

/// The lateral window of one well.
#[derive(Debug, Clone)]
pub struct LateralSection {
    pub well_id: String,
    pub stations: Vec<EnrichedStation>,
    /// Index of each kept station in the raw trajectory
    pub raw_indices: Vec<usize>,
    /// `MD[last kept] - MD[first kept]`
    pub total_length: f64,
}

impl LateralSection {
    pub fn first(&self) -> Option<&EnrichedStation> {
        self.stations.first()
    }

    pub fn last(&self) -> Option<&EnrichedStation> {
        self.stations.last()
    }
}

/// Extracts and enriches the lateral section of a trajectory.
pub struct LateralExtractor<'a> {
    config: &'a LateralConfig,
    horizons: &'a HorizonSet,
}

impl<'a> LateralExtractor<'a> {
    pub fn new(config: &'a LateralConfig, horizons: &'a HorizonSet) -> Self {
        Self { config, horizons }
    }

    /// Indices of stations whose inclination is below the threshold.
    pub fn lateral_indices(&self, stations: &[TrajectoryStation]) -> Vec<usize> {
        stations
            .windows(2)
            .enumerate()
            .filter_map(|(i, w)| {
                inclination_deg(&w[0], &w[1])
                    .filter(|inc| *inc < self.config.max_inclination_deg)
                    .map(|_| i + 1)
            })
            .collect()
    }

    /// Filter the trajectory to its lateral and enrich the kept stations.
    ///
    /// Returns `NoLateralStations` when nothing qualifies. Failed horizon
    /// lookups are returned as issues next to the section.
    pub fn extract(
        &self,
        trajectory: &WellTrajectory,
    ) -> Result<(LateralSection, Vec<WellIssue>), ZoneError> {
        let well_id = trajectory.well_id();
        let raw = trajectory.stations();
        let raw_indices = self.lateral_indices(raw);

        let (Some(&first), Some(&last)) = (raw_indices.first(), raw_indices.last()) else {
            return Err(ZoneError::NoLateralStations {
                well_id: well_id.to_string(),
            });
        };

        let mut issues = Vec::new();
        let mut stations = Vec::with_capacity(raw_indices.len());
        for &i in &raw_indices {
            let station = raw[i];
            let (elevations, lookup_issues) =
                self.horizons.elevations_at(well_id, i, station.x, station.y);
            issues.extend(lookup_issues);
            stations.push(EnrichedStation {
                station,
                elevations,
                inclination: inclination_deg(&raw[i - 1], &station),
            });
        }

        let total_length = raw[last].md - raw[first].md;
        debug!(
            well = %well_id,
            kept = stations.len(),
            of = raw.len(),
            total_length,
            "Extracted lateral section"
        );

        Ok((
            LateralSection {
                well_id: well_id.to_string(),
                stations,
                raw_indices,
                total_length,
            },
            issues,
        ))
    }
}
