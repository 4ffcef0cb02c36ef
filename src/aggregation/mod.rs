//! Lateral Percentage Aggregator
//!
//! Sums interval MD length per band and expresses it as a share of the total
//! lateral length. Records come out in `GridName` order (`AboveAll` first,
//! then horizon labels) so repeated runs produce identical tables.

use std::collections::BTreeMap;

use tracing::warn;

use crate::config::AggregationConfig;
use crate::error::ZoneError;
use crate::types::{GridName, LateralPercentageRecord, ZoneInterval};

/// Per-band MD length over one well's intervals.
pub fn md_length_by_band(intervals: &[ZoneInterval]) -> BTreeMap<GridName, f64> {
    let mut lengths: BTreeMap<GridName, f64> = BTreeMap::new();
    for interval in intervals {
        *lengths.entry(interval.grid_name.clone()).or_insert(0.0) += interval.md_length();
    }
    lengths
}

pub struct LateralPercentageAggregator<'a> {
    config: &'a AggregationConfig,
}

impl<'a> LateralPercentageAggregator<'a> {
    pub fn new(config: &'a AggregationConfig) -> Self {
        Self { config }
    }

    /// Percentage of `total_length` spent in each band.
    ///
    /// Fails with `DegenerateGeometry` when the lateral has no length; use
    /// [`Self::not_computed`] to still emit one row per band in that case.
    pub fn aggregate(
        &self,
        well_id: &str,
        zone_set: &str,
        intervals: &[ZoneInterval],
        total_length: f64,
    ) -> Result<Vec<LateralPercentageRecord>, ZoneError> {
        if !(total_length.is_finite() && total_length > 0.0) {
            return Err(ZoneError::DegenerateGeometry {
                well_id: well_id.to_string(),
            });
        }

        let records: Vec<LateralPercentageRecord> = md_length_by_band(intervals)
            .into_iter()
            .map(|(grid_name, length)| LateralPercentageRecord {
                well_id: well_id.to_string(),
                zone_set: zone_set.to_string(),
                grid_name,
                percentage: Some(length / total_length * 100.0),
            })
            .collect();

        let sum: f64 = records.iter().filter_map(|r| r.percentage).sum();
        if (sum - 100.0).abs() > self.config.sum_tolerance_percent {
            warn!(
                well = %well_id,
                zone_set = %zone_set,
                sum,
                tolerance = self.config.sum_tolerance_percent,
                "Lateral percentages do not sum to 100"
            );
        }

        Ok(records)
    }

    /// One row per band with the percentage left undefined.
    pub fn not_computed(
        &self,
        well_id: &str,
        zone_set: &str,
        intervals: &[ZoneInterval],
    ) -> Vec<LateralPercentageRecord> {
        md_length_by_band(intervals)
            .into_keys()
            .map(|grid_name| LateralPercentageRecord {
                well_id: well_id.to_string(),
                zone_set: zone_set.to_string(),
                grid_name,
                percentage: None,
            })
            .collect()
    }
}
