//! Zone output types: ZoneInterval, LateralPercentageRecord, MasterWellRecord

use serde::{Deserialize, Serialize};

/// Label of the stratigraphic band a well is in.
///
/// A band is named after the horizon bounding it from above. `AboveAll`
/// covers everything shallower than the shallowest horizon.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GridName {
    AboveAll,
    Horizon(String),
}

impl GridName {
    pub fn horizon(label: impl Into<String>) -> Self {
        Self::Horizon(label.into())
    }
}

impl std::fmt::Display for GridName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            GridName::AboveAll => write!(f, "Above All"),
            GridName::Horizon(label) => write!(f, "{label}"),
        }
    }
}

/// How an interval was produced. Part of the master-table key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
pub enum ZoneType {
    /// Computed by intersecting the lateral with horizon grids
    #[default]
    Grid,
}

impl std::fmt::Display for ZoneType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ZoneType::Grid => write!(f, "Grid"),
        }
    }
}

/// Top or base boundary of a zone interval.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ZonePoint {
    pub md: f64,
    pub tvd: f64,
    pub x: f64,
    pub y: f64,
}

/// Contiguous MD range of a well attributed to one stratigraphic band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneInterval {
    pub well_id: String,
    pub grid_name: GridName,
    pub zone_set: String,
    #[serde(default)]
    pub zone_type: ZoneType,
    pub top: ZonePoint,
    pub base: ZonePoint,
    /// Display angle in radians
    pub angle_top: f64,
    pub angle_base: f64,
}

impl ZoneInterval {
    /// MD length of the interval (`base.md - top.md`).
    pub fn md_length(&self) -> f64 {
        self.base.md - self.top.md
    }
}

/// Share of a well's lateral length spent in one band.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LateralPercentageRecord {
    pub well_id: String,
    pub zone_set: String,
    pub grid_name: GridName,
    /// `None` when the lateral length is zero and the share is undefined
    pub percentage: Option<f64>,
}

/// Per (well, zone-set) summary row of the master well table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MasterWellRecord {
    pub well_id: String,
    pub zone_set: String,
    pub lateral_length: f64,
    pub percentages: Vec<LateralPercentageRecord>,
}
