use super::curve::ParametricCurve2d;
use super::{Point2d, Vector2d};
use crate::segment::Segment;
use crate::util::Interval;
use cgmath::prelude::*;

/// A cubic bezier curve
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CubicBezier2d {
    points: [Point2d; 4],
}

impl CubicBezier2d {
    pub const fn new(points: &[Point2d; 4]) -> Self {
        Self { points: *points }
    }

    /// The control polygon of the curve as three chords:
    /// start to first handle, handle to handle, and second handle to end.
    pub fn chords(&self) -> [Segment; 3] {
        let [p0, p1, p2, p3] = self.points;
        [
            Segment::from_ends(p0, p1),
            Segment::from_ends(p1, p2),
            Segment::from_ends(p2, p3),
        ]
    }
}

impl ParametricCurve2d for CubicBezier2d {
    /// Evaluates the curve by De Casteljau reduction over its chords.
    fn sample(&self, t: f64) -> Point2d {
        let [a, b, c] = self.chords().map(|chord| chord.point_at_fraction(t));
        let d = Segment::from_ends(a, b).point_at_fraction(t);
        let e = Segment::from_ends(b, c).point_at_fraction(t);
        Segment::from_ends(d, e).point_at_fraction(t)
    }

    fn bounds(&self) -> Interval<f64> {
        Interval { min: 0.0, max: 1.0 }
    }

    fn sample_dt(&self, t: f64) -> Vector2d {
        let t1 = 1.0 - t;
        let [p0, p1, p2, p3] = self.points.map(|p| p.to_vec());
        (-3.0 * t1 * t1) * p0
            + (9.0 * t * t - 12.0 * t + 3.0) * p1
            + (-9.0 * t * t + 6.0 * t) * p2
            + (3.0 * t * t) * p3
    }
}
