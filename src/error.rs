//! Error taxonomy for zone computation
//!
//! Every error here is scoped to a single well, horizon, or station. The
//! pipeline wraps them in `WellIssue` records and keeps going; nothing in
//! this module aborts a batch.

use serde::Serialize;
use thiserror::Error;

/// Errors raised while zoning a well.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ZoneError {
    #[error("Horizon '{label}' has no sample points")]
    EmptyHorizon { label: String },

    #[error("Well {well_id} has no stations inside the lateral window")]
    NoLateralStations { well_id: String },

    #[error("Well {well_id}: lateral length is zero, percentages not computed")]
    DegenerateGeometry { well_id: String },

    #[error("Horizon '{label}': nearest sample index {index} outside {len} samples")]
    IndexOutOfRange {
        label: String,
        index: usize,
        len: usize,
    },

    #[error("Invalid trajectory for well {well_id}: {reason}")]
    InvalidTrajectory { well_id: String, reason: String },
}

/// Coarse error class used for reporting and counting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    MissingData,
    DegenerateGeometry,
    IndexOutOfRange,
    InvalidInput,
}

impl ZoneError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ZoneError::EmptyHorizon { .. } | ZoneError::NoLateralStations { .. } => {
                ErrorKind::MissingData
            }
            ZoneError::DegenerateGeometry { .. } => ErrorKind::DegenerateGeometry,
            ZoneError::IndexOutOfRange { .. } => ErrorKind::IndexOutOfRange,
            ZoneError::InvalidTrajectory { .. } => ErrorKind::InvalidInput,
        }
    }
}

/// A recoverable problem recorded against one well.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WellIssue {
    /// Empty for batch-level issues such as an empty horizon
    pub well_id: String,
    pub horizon: Option<String>,
    /// Index into the well's raw station list
    pub station: Option<usize>,
    pub error: ZoneError,
}

impl WellIssue {
    pub fn new(well_id: impl Into<String>, error: ZoneError) -> Self {
        Self {
            well_id: well_id.into(),
            horizon: None,
            station: None,
            error,
        }
    }

    pub fn with_horizon(mut self, label: impl Into<String>) -> Self {
        self.horizon = Some(label.into());
        self
    }

    pub fn at_station(mut self, index: usize) -> Self {
        self.station = Some(index);
        self
    }

    pub fn kind(&self) -> ErrorKind {
        self.error.kind()
    }
}

impl std::fmt::Display for WellIssue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if !self.well_id.is_empty() {
            write!(f, "[{}] ", self.well_id)?;
        }
        if let Some(station) = self.station {
            write!(f, "station {station}: ")?;
        }
        write!(f, "{}", self.error)
    }
}
