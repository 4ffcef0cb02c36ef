//! Per-well and per-batch results

use serde::Serialize;
use tracing::info;

use crate::config::MergeConfig;
use crate::error::{ErrorKind, WellIssue};
use crate::merge::{IntervalMerger, MasterStore, MergeStats, StoreError};
use crate::types::{LateralPercentageRecord, MasterWellRecord, ZoneInterval};

/// How far a well got through the pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WellStatus {
    /// Intervals produced (percentages may still be undefined)
    Zoned,
    /// No station qualified as lateral; nothing to merge
    NoLateral,
    /// Skipped because the batch was cancelled before this well started
    Cancelled,
}

/// Everything computed for one well, including partial results.
#[derive(Debug, Clone, Serialize)]
pub struct WellOutcome {
    pub well_id: String,
    pub zone_set: String,
    pub status: WellStatus,
    pub lateral_length: Option<f64>,
    /// Horizon labels, shallowest first, as ordered for this well
    pub horizon_order: Vec<String>,
    pub intervals: Vec<ZoneInterval>,
    pub percentages: Vec<LateralPercentageRecord>,
    pub issues: Vec<WellIssue>,
}

impl WellOutcome {
    pub(crate) fn empty(well_id: &str, zone_set: &str, status: WellStatus) -> Self {
        Self {
            well_id: well_id.to_string(),
            zone_set: zone_set.to_string(),
            status,
            lateral_length: None,
            horizon_order: Vec::new(),
            intervals: Vec::new(),
            percentages: Vec::new(),
            issues: Vec::new(),
        }
    }

    /// The master well-table row for this outcome, if the well was zoned.
    pub fn well_record(&self) -> Option<MasterWellRecord> {
        if self.status != WellStatus::Zoned {
            return None;
        }
        Some(MasterWellRecord {
            well_id: self.well_id.clone(),
            zone_set: self.zone_set.clone(),
            lateral_length: self.lateral_length.unwrap_or(0.0),
            percentages: self.percentages.clone(),
        })
    }

    pub fn has_issue(&self, kind: ErrorKind) -> bool {
        self.issues.iter().any(|i| i.kind() == kind)
    }
}

/// Outcome of one batch run, in input well order.
#[derive(Debug, Clone, Serialize)]
pub struct BatchReport {
    pub zone_set: String,
    pub outcomes: Vec<WellOutcome>,
    /// Batch-level issues (empty horizons)
    pub horizon_issues: Vec<WellIssue>,
    pub wells_zoned: usize,
    pub wells_without_lateral: usize,
    pub wells_cancelled: usize,
}

impl BatchReport {
    pub(crate) fn new(zone_set: &str, outcomes: Vec<WellOutcome>, horizon_issues: Vec<WellIssue>) -> Self {
        let count = |status| outcomes.iter().filter(|o| o.status == status).count();
        Self {
            zone_set: zone_set.to_string(),
            wells_zoned: count(WellStatus::Zoned),
            wells_without_lateral: count(WellStatus::NoLateral),
            wells_cancelled: count(WellStatus::Cancelled),
            outcomes,
            horizon_issues,
        }
    }

    /// Every issue of the batch, horizon-level first.
    pub fn issues(&self) -> impl Iterator<Item = &WellIssue> {
        self.horizon_issues
            .iter()
            .chain(self.outcomes.iter().flat_map(|o| o.issues.iter()))
    }

    pub fn outcome(&self, well_id: &str) -> Option<&WellOutcome> {
        self.outcomes.iter().find(|o| o.well_id == well_id)
    }

    /// Sequentially merge every zoned well into `store`.
    pub fn merge_into(
        &self,
        store: &mut dyn MasterStore,
        config: &MergeConfig,
    ) -> Result<MergeStats, StoreError> {
        let merger = IntervalMerger::new(config);
        let mut total = MergeStats::default();

        for outcome in self.outcomes.iter().filter(|o| o.status == WellStatus::Zoned) {
            total += merger.merge_well(store, &outcome.intervals, outcome.well_record().as_ref())?;
        }

        info!(
            zone_set = %self.zone_set,
            backend = store.backend_name(),
            inserted = total.inserted,
            updated = total.updated,
            unchanged = total.unchanged,
            pruned = total.pruned,
            well_records = total.well_records_replaced,
            "Batch merged into master tables"
        );

        Ok(total)
    }
}
