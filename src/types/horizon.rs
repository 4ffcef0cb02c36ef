//! Horizon surface types: scattered samples and their display label

use serde::{Deserialize, Serialize};

/// A single scattered sample of a horizon surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HorizonSample {
    pub x: f64,
    pub y: f64,
    pub elevation: f64,
}

impl HorizonSample {
    pub fn new(x: f64, y: f64, elevation: f64) -> Self {
        Self { x, y, elevation }
    }
}

/// A named stratigraphic boundary surface ("grid") sampled as a point cloud.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HorizonSurface {
    /// Display label, used as the zone "Grid Name"
    pub label: String,
    pub samples: Vec<HorizonSample>,
}

impl HorizonSurface {
    pub fn new(label: impl Into<String>, samples: Vec<HorizonSample>) -> Self {
        Self {
            label: label.into(),
            samples,
        }
    }
}
