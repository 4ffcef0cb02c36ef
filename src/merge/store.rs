//! MasterStore trait: pluggable master table backend
//!
//! The merger only needs lookup, insert/overwrite and delete by key:
//! - `InMemoryMaster`: ordered in-memory tables, used by the binary and tests
//! - A database-backed store can implement the same trait

use std::collections::BTreeMap;

use crate::types::{MasterWellRecord, ZoneInterval};

use super::IntervalKey;

/// Backend for the master interval and well tables.
///
/// Mutating methods take `&mut self`: one writer per store at a time.
pub trait MasterStore: Send {
    fn get_interval(&self, key: &IntervalKey) -> Result<Option<ZoneInterval>, StoreError>;

    /// Insert or overwrite the row at `key`
    fn put_interval(&mut self, key: IntervalKey, interval: ZoneInterval) -> Result<(), StoreError>;

    /// Remove a row, returning it if it existed
    fn remove_interval(&mut self, key: &IntervalKey) -> Result<Option<ZoneInterval>, StoreError>;

    /// All interval keys stored for one (well, zone-set)
    fn interval_keys_for(&self, well_id: &str, zone_set: &str) -> Result<Vec<IntervalKey>, StoreError>;

    fn get_well_record(
        &self,
        well_id: &str,
        zone_set: &str,
    ) -> Result<Option<MasterWellRecord>, StoreError>;

    /// Replace the record for its (well, zone-set)
    fn put_well_record(&mut self, record: MasterWellRecord) -> Result<(), StoreError>;

    /// Backend name for logging
    fn backend_name(&self) -> &'static str;
}

/// Master store errors
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("storage error: {0}")]
    Storage(String),
}

/// In-memory master tables, ordered by key.
#[derive(Debug, Default, Clone)]
pub struct InMemoryMaster {
    intervals: BTreeMap<IntervalKey, ZoneInterval>,
    wells: BTreeMap<(String, String), MasterWellRecord>,
}

impl InMemoryMaster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn interval_count(&self) -> usize {
        self.intervals.len()
    }

    pub fn well_count(&self) -> usize {
        self.wells.len()
    }

    /// Flat interval table sorted by key.
    pub fn interval_rows(&self) -> Vec<ZoneInterval> {
        self.intervals.values().cloned().collect()
    }

    /// Flat well table sorted by (well, zone-set).
    pub fn well_rows(&self) -> Vec<MasterWellRecord> {
        self.wells.values().cloned().collect()
    }
}

impl MasterStore for InMemoryMaster {
    fn get_interval(&self, key: &IntervalKey) -> Result<Option<ZoneInterval>, StoreError> {
        Ok(self.intervals.get(key).cloned())
    }

    fn put_interval(&mut self, key: IntervalKey, interval: ZoneInterval) -> Result<(), StoreError> {
        self.intervals.insert(key, interval);
        Ok(())
    }

    fn remove_interval(&mut self, key: &IntervalKey) -> Result<Option<ZoneInterval>, StoreError> {
        Ok(self.intervals.remove(key))
    }

    fn interval_keys_for(&self, well_id: &str, zone_set: &str) -> Result<Vec<IntervalKey>, StoreError> {
        Ok(self
            .intervals
            .keys()
            .filter(|k| k.well_id == well_id && k.zone_set == zone_set)
            .cloned()
            .collect())
    }

    fn get_well_record(
        &self,
        well_id: &str,
        zone_set: &str,
    ) -> Result<Option<MasterWellRecord>, StoreError> {
        Ok(self
            .wells
            .get(&(well_id.to_string(), zone_set.to_string()))
            .cloned())
    }

    fn put_well_record(&mut self, record: MasterWellRecord) -> Result<(), StoreError> {
        self.wells
            .insert((record.well_id.clone(), record.zone_set.clone()), record);
        Ok(())
    }

    fn backend_name(&self) -> &'static str {
        "InMemory"
    }
}
