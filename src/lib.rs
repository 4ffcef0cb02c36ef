//! lateral-zones: Stratigraphic Zone Intersection Engine
//!
//! Computes which stratigraphic bands the lateral section of a well passes
//! through, and what share of the lateral length each band takes.
//!
//! ## Architecture
//!
//! - **Horizon Surface Index** (`surface`): nearest-neighbour elevation lookup per horizon
//! - **Lateral Segment Extractor** (`lateral`): inclination filter + per-station enrichment
//! - **Zone Crossing Detector** (`crossing`): segment walk emitting ordered zone intervals
//! - **Lateral Percentage Aggregator** (`aggregation`): per-band share of lateral length
//! - **Interval Table Merger** (`merge`): idempotent upsert into master tables
//! - **Pipeline** (`pipeline`): per-well orchestration and parallel batches

pub mod config;
pub mod types;
pub mod error;
pub mod surface;
pub mod lateral;
pub mod crossing;
pub mod aggregation;
pub mod merge;
pub mod pipeline;

// Re-export configuration
pub use config::EngineConfig;

// Re-export commonly used types
pub use types::{
    EnrichedStation, GridName, HorizonSample, HorizonSurface, LateralPercentageRecord,
    MasterWellRecord, SurveyPoint, TrajectoryStation, WellTrajectory, ZoneInterval, ZonePoint,
    ZoneType,
};

// Re-export errors
pub use error::{ErrorKind, WellIssue, ZoneError};

// Re-export engine components
pub use surface::{HorizonIndex, HorizonSet};
pub use lateral::{LateralExtractor, LateralSection};
pub use crossing::{ZoneCrossingDetector, ZoneWalk};
pub use aggregation::LateralPercentageAggregator;
pub use merge::{InMemoryMaster, IntervalKey, IntervalMerger, MasterStore, MergeStats, StoreError};
pub use pipeline::{BatchReport, WellOutcome, WellStatus, ZoneEngine};
