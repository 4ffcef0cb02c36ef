//! Horizon Surface Index
//!
//! Builds one 2-D nearest-neighbour index (R*-tree over x/y) per horizon
//! surface and answers elevation queries with the elevation of the nearest
//! sample. There is no distance weighting and no search radius: a query far
//! outside the sampled area still returns the nearest sample, which is what
//! sparse horizon coverage around a lateral needs.
//!
//! Indexes are immutable after `build` and are shared read-only across
//! concurrently processed wells.

use rayon::prelude::*;
use rstar::{PointDistance, RTree, RTreeObject, AABB};
use tracing::{debug, warn};

use crate::error::{WellIssue, ZoneError};
use crate::types::{HorizonSample, HorizonSurface};

/// R-tree entry: sample position plus its index in `HorizonIndex::samples`.
#[derive(Debug, Clone, Copy, PartialEq)]
struct IndexedSample {
    pos: [f64; 2],
    idx: usize,
}

impl RTreeObject for IndexedSample {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_point(self.pos)
    }
}

impl PointDistance for IndexedSample {
    fn distance_2(&self, point: &[f64; 2]) -> f64 {
        let dx = self.pos[0] - point[0];
        let dy = self.pos[1] - point[1];
        dx * dx + dy * dy
    }
}

/// Nearest-neighbour elevation index for one horizon.
pub struct HorizonIndex {
    label: String,
    samples: Vec<HorizonSample>,
    tree: RTree<IndexedSample>,
}

impl std::fmt::Debug for HorizonIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HorizonIndex")
            .field("label", &self.label)
            .field("samples", &self.samples.len())
            .finish()
    }
}

impl HorizonIndex {
    /// Index a surface. Samples with non-finite coordinates are skipped.
    pub fn build(surface: &HorizonSurface) -> Self {
        let samples: Vec<HorizonSample> = surface
            .samples
            .iter()
            .filter(|s| s.x.is_finite() && s.y.is_finite() && s.elevation.is_finite())
            .copied()
            .collect();

        let skipped = surface.samples.len() - samples.len();
        if skipped > 0 {
            warn!(horizon = %surface.label, skipped, "Dropped non-finite horizon samples");
        }

        let entries = samples
            .iter()
            .enumerate()
            .map(|(idx, s)| IndexedSample { pos: [s.x, s.y], idx })
            .collect();

        Self {
            label: surface.label.clone(),
            samples,
            tree: RTree::bulk_load(entries),
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Nearest sample to (x, y), however far away.
    pub fn nearest_sample(&self, x: f64, y: f64) -> Result<HorizonSample, ZoneError> {
        let entry = self
            .tree
            .nearest_neighbor(&[x, y])
            .ok_or_else(|| ZoneError::EmptyHorizon {
                label: self.label.clone(),
            })?;

        self.samples
            .get(entry.idx)
            .copied()
            .ok_or_else(|| ZoneError::IndexOutOfRange {
                label: self.label.clone(),
                index: entry.idx,
                len: self.samples.len(),
            })
    }

    /// Elevation of the nearest sample to (x, y).
    pub fn query_elevation(&self, x: f64, y: f64) -> Result<f64, ZoneError> {
        self.nearest_sample(x, y).map(|s| s.elevation)
    }
}

/// The indexed horizons of one computation, in input order.
///
/// Empty surfaces are excluded at build time and reported once as
/// `MissingData` issues; wells simply never cross them.
#[derive(Debug, Default)]
pub struct HorizonSet {
    horizons: Vec<HorizonIndex>,
    issues: Vec<WellIssue>,
}

impl HorizonSet {
    /// Index every surface (in parallel) and drop the empty ones.
    pub fn build(surfaces: &[HorizonSurface]) -> Self {
        let indexed: Vec<HorizonIndex> = surfaces.par_iter().map(HorizonIndex::build).collect();

        let mut horizons = Vec::with_capacity(indexed.len());
        let mut issues = Vec::new();
        for index in indexed {
            if index.is_empty() {
                warn!(horizon = %index.label(), "Horizon has no samples, excluded from zoning");
                issues.push(
                    WellIssue::new(
                        "",
                        ZoneError::EmptyHorizon {
                            label: index.label().to_string(),
                        },
                    )
                    .with_horizon(index.label()),
                );
            } else {
                debug!(horizon = %index.label(), samples = index.len(), "Indexed horizon");
                horizons.push(index);
            }
        }

        Self { horizons, issues }
    }

    pub fn len(&self) -> usize {
        self.horizons.len()
    }

    pub fn is_empty(&self) -> bool {
        self.horizons.is_empty()
    }

    pub fn get(&self, h: usize) -> Option<&HorizonIndex> {
        self.horizons.get(h)
    }

    pub fn iter(&self) -> impl Iterator<Item = &HorizonIndex> {
        self.horizons.iter()
    }

    pub fn label(&self, h: usize) -> Option<&str> {
        self.horizons.get(h).map(HorizonIndex::label)
    }

    /// Issues found while building (empty horizons).
    pub fn issues(&self) -> &[WellIssue] {
        &self.issues
    }

    /// Elevation of every horizon at (x, y).
    ///
    /// A failed lookup yields `None` for that horizon and an issue tagged
    /// with the horizon label; the other horizons are unaffected.
    pub fn elevations_at(
        &self,
        well_id: &str,
        station: usize,
        x: f64,
        y: f64,
    ) -> (Vec<Option<f64>>, Vec<WellIssue>) {
        let mut issues = Vec::new();
        let elevations = self
            .horizons
            .iter()
            .map(|h| match h.query_elevation(x, y) {
                Ok(z) => Some(z),
                Err(e) => {
                    warn!(well = %well_id, horizon = %h.label(), station, error = %e, "Horizon lookup failed");
                    issues.push(
                        WellIssue::new(well_id, e)
                            .with_horizon(h.label())
                            .at_station(station),
                    );
                    None
                }
            })
            .collect();
        (elevations, issues)
    }
}
