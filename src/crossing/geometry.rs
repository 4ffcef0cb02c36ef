//! 2-D line-segment intersection.

/// A point in the (vertical value, along-path distance) plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point2 {
    pub x: f64,
    pub y: f64,
}

impl Point2 {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Parameter slack so hits landing exactly on an endpoint are not lost to rounding.
const PARAM_EPS: f64 = 1e-12;

/// Intersection of segments (a1-a2) and (b1-b2).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentHit {
    pub point: Point2,
    /// Position along a1-a2, in [0, 1]
    pub t: f64,
    /// Position along b1-b2, in [0, 1]
    pub u: f64,
}

/// Returns the single intersection point of two segments, endpoints included.
///
/// Parallel and collinear segments return `None`: an overlap is not a point.
pub fn segment_intersection(a1: Point2, a2: Point2, b1: Point2, b2: Point2) -> Option<SegmentHit> {
    let d1 = Point2::new(a2.x - a1.x, a2.y - a1.y);
    let d2 = Point2::new(b2.x - b1.x, b2.y - b1.y);
    let cross = d1.x * d2.y - d1.y * d2.x;

    let scale = d1.x.hypot(d1.y) * d2.x.hypot(d2.y);
    if scale == 0.0 || cross.abs() <= f64::EPSILON * scale {
        return None; // degenerate, parallel, or coincident
    }

    let d = Point2::new(b1.x - a1.x, b1.y - a1.y);
    let t = (d.x * d2.y - d.y * d2.x) / cross;
    let u = (d.x * d1.y - d.y * d1.x) / cross;

    let range = -PARAM_EPS..=1.0 + PARAM_EPS;
    if !(range.contains(&t) && range.contains(&u)) {
        return None;
    }

    let t = t.clamp(0.0, 1.0);
    Some(SegmentHit {
        point: Point2::new(a1.x + d1.x * t, a1.y + d1.y * t),
        t,
        u: u.clamp(0.0, 1.0),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    #[test]
    fn test_crossing_segments() {
        let hit = segment_intersection(p(0.0, 0.0), p(2.0, 2.0), p(0.0, 2.0), p(2.0, 0.0)).unwrap();
        assert!((hit.point.x - 1.0).abs() < 1e-12);
        assert!((hit.point.y - 1.0).abs() < 1e-12);
        assert!((hit.t - 0.5).abs() < 1e-12);
        assert!((hit.u - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_segments() {
        assert!(segment_intersection(p(0.0, 0.0), p(1.0, 0.0), p(2.0, -1.0), p(2.0, 1.0)).is_none());
    }

    #[test]
    fn test_parallel_segments() {
        assert!(segment_intersection(p(0.0, 0.0), p(1.0, 1.0), p(0.0, 1.0), p(1.0, 2.0)).is_none());
    }

    #[test]
    fn test_collinear_overlap_is_not_a_point() {
        assert!(segment_intersection(p(0.0, 0.0), p(2.0, 0.0), p(1.0, 0.0), p(3.0, 0.0)).is_none());
    }

    #[test]
    fn test_touch_at_endpoint_counts() {
        // Well ends exactly on the horizon
        let hit = segment_intersection(p(60.0, 0.0), p(50.0, 10.0), p(50.0, 0.0), p(50.0, 10.0)).unwrap();
        assert!((hit.t - 1.0).abs() < 1e-12);
        assert!((hit.point.x - 50.0).abs() < 1e-12);
    }

    #[test]
    fn test_zero_length_segment() {
        assert!(segment_intersection(p(1.0, 1.0), p(1.0, 1.0), p(0.0, 0.0), p(2.0, 2.0)).is_none());
    }
}
