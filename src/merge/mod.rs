//! Interval Table Merger
//!
//! Idempotent upsert of computed intervals and percentage rows into the
//! master tables.
//!
//! - Interval rows are keyed by (well, zone-set, top MD, base MD, zone type).
//!   A matching row has its non-key fields overwritten in place; otherwise
//!   the row is appended.
//! - The per (well, zone-set) well record is replaced as a whole.
//! - With `prune_stale_intervals`, rows for the same (well, zone-set) that
//!   this run did not produce are removed.
//!
//! Storage is behind the `MasterStore` trait. Writers take `&mut`, so merges
//! against one store are serialized by the borrow checker.

mod store;

pub use store::*;

use std::cmp::Ordering;
use std::collections::BTreeSet;
use std::hash::{Hash, Hasher};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::MergeConfig;
use crate::types::{MasterWellRecord, ZoneInterval, ZoneType};

/// Measured depth used as part of a key.
///
/// Equality and ordering follow `f64::total_cmp`, with `-0.0` folded into
/// `0.0` so both spellings of zero address the same row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct KeyDepth(f64);

impl KeyDepth {
    pub fn new(md: f64) -> Self {
        Self(if md == 0.0 { 0.0 } else { md })
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl PartialEq for KeyDepth {
    fn eq(&self, other: &Self) -> bool {
        self.0.to_bits() == other.0.to_bits()
    }
}

impl Eq for KeyDepth {}

impl PartialOrd for KeyDepth {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for KeyDepth {
    fn cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl Hash for KeyDepth {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.to_bits().hash(state);
    }
}

/// Identity of a master interval row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IntervalKey {
    pub well_id: String,
    pub zone_set: String,
    pub top_md: KeyDepth,
    pub base_md: KeyDepth,
    pub zone_type: ZoneType,
}

impl IntervalKey {
    pub fn of(interval: &ZoneInterval) -> Self {
        Self {
            well_id: interval.well_id.clone(),
            zone_set: interval.zone_set.clone(),
            top_md: KeyDepth::new(interval.top.md),
            base_md: KeyDepth::new(interval.base.md),
            zone_type: interval.zone_type,
        }
    }
}

/// What one merge changed. A repeat merge of identical input reports only
/// `unchanged`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeStats {
    pub inserted: usize,
    pub updated: usize,
    pub unchanged: usize,
    pub pruned: usize,
    pub well_records_replaced: usize,
}

impl MergeStats {
    /// True when the merge left the store exactly as it was.
    pub fn is_noop(&self) -> bool {
        self.inserted == 0 && self.updated == 0 && self.pruned == 0 && self.well_records_replaced == 0
    }
}

impl std::ops::AddAssign for MergeStats {
    fn add_assign(&mut self, rhs: Self) {
        self.inserted += rhs.inserted;
        self.updated += rhs.updated;
        self.unchanged += rhs.unchanged;
        self.pruned += rhs.pruned;
        self.well_records_replaced += rhs.well_records_replaced;
    }
}

/// Applies one well's results to a master store.
pub struct IntervalMerger<'a> {
    config: &'a MergeConfig,
}

impl<'a> IntervalMerger<'a> {
    pub fn new(config: &'a MergeConfig) -> Self {
        Self { config }
    }

    /// Upsert the intervals of one (well, zone-set) and replace its well record.
    pub fn merge_well(
        &self,
        store: &mut dyn MasterStore,
        intervals: &[ZoneInterval],
        well_record: Option<&MasterWellRecord>,
    ) -> Result<MergeStats, StoreError> {
        let mut stats = MergeStats::default();
        let mut produced = BTreeSet::new();

        for interval in intervals {
            let key = IntervalKey::of(interval);
            match store.get_interval(&key)? {
                Some(existing) if existing == *interval => stats.unchanged += 1,
                Some(_) => {
                    store.put_interval(key.clone(), interval.clone())?;
                    stats.updated += 1;
                }
                None => {
                    store.put_interval(key.clone(), interval.clone())?;
                    stats.inserted += 1;
                }
            }
            produced.insert(key);
        }

        if self.config.prune_stale_intervals {
            let scope = intervals
                .first()
                .map(|i| (i.well_id.as_str(), i.zone_set.as_str()))
                .or_else(|| well_record.map(|r| (r.well_id.as_str(), r.zone_set.as_str())));
            if let Some((well_id, zone_set)) = scope {
                for key in store.interval_keys_for(well_id, zone_set)? {
                    if !produced.contains(&key) && store.remove_interval(&key)?.is_some() {
                        stats.pruned += 1;
                    }
                }
            }
        }

        if let Some(record) = well_record {
            let current = store.get_well_record(&record.well_id, &record.zone_set)?;
            if current.as_ref() != Some(record) {
                store.put_well_record(record.clone())?;
                stats.well_records_replaced += 1;
            }
        }

        debug!(
            backend = store.backend_name(),
            inserted = stats.inserted,
            updated = stats.updated,
            unchanged = stats.unchanged,
            pruned = stats.pruned,
            "Merged well into master tables"
        );

        Ok(stats)
    }
}
