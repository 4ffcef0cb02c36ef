//! Display angle for zone intervals.
//!
//! The angle is metadata for downstream plotting only; it never influences
//! crossing detection.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Quarter-turn targets, 2π included so angles just below a full turn snap up.
pub const SNAP_TARGETS: [f64; 5] = [0.0, FRAC_PI_2, PI, 3.0 * FRAC_PI_2, TAU];

/// Wrap an angle into [0, 2π).
pub fn normalize_angle(angle: f64) -> f64 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round tiny negatives up to exactly 2π
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}

/// Azimuth from the first to the last lateral station, in [0, 2π).
///
/// The y-term is flipped (`y1 - y2`) because the offsets are plotted with
/// the vertical screen axis pointing down.
pub fn lateral_azimuth(first: (f64, f64), last: (f64, f64)) -> f64 {
    let (x1, y1) = first;
    let (x2, y2) = last;
    normalize_angle((y1 - y2).atan2(x2 - x1))
}

/// Nearest quarter-turn target to `angle`.
pub fn snap_to_quarter_turn(angle: f64) -> f64 {
    SNAP_TARGETS
        .iter()
        .copied()
        .min_by(|a, b| (angle - a).abs().total_cmp(&(angle - b).abs()))
        .unwrap_or(0.0)
}

/// Angle stamped onto every interval of a well.
pub fn display_angle(first: (f64, f64), last: (f64, f64), snap: bool) -> f64 {
    let azimuth = lateral_azimuth(first, last);
    let base = if snap { snap_to_quarter_turn(azimuth) } else { azimuth };
    normalize_angle(base + FRAC_PI_2)
}
