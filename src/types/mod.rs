//! Shared data structures for the stratigraphic zone-intersection engine
//!
//! Data flows through these types in pipeline order:
//! - Inbound: `TrajectoryStation` / `WellTrajectory` (survey provider) and
//!   `HorizonSurface` point clouds
//! - Ephemeral: `EnrichedStation` (station + per-horizon elevations + inclination)
//! - Outbound: `ZoneInterval`, `LateralPercentageRecord`, `MasterWellRecord`

mod trajectory;
mod horizon;
mod zone;

pub use trajectory::*;
pub use horizon::*;
pub use zone::*;
