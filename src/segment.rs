use crate::math::{lerp_points, ParametricCurve2d, Point2d};
use crate::util::Interval;
use cgmath::prelude::*;

/// A straight piece of a path, driven from `start` to `end` at no more
/// than `max_speed`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Segment {
    start: Point2d,
    end: Point2d,
    max_speed: f64,
}

impl Segment {
    pub const fn new(start: Point2d, end: Point2d, max_speed: f64) -> Self {
        Self {
            start,
            end,
            max_speed,
        }
    }

    /// A segment with no speed attached, used for pure geometry.
    pub const fn from_ends(start: Point2d, end: Point2d) -> Self {
        Self::new(start, end, 0.0)
    }

    pub fn start(&self) -> Point2d {
        self.start
    }

    pub fn end(&self) -> Point2d {
        self.end
    }

    /// The target speed while driving this segment.
    pub fn max_speed(&self) -> f64 {
        self.max_speed
    }

    /// The length of the segment.
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }

    /// The point a fraction `t` of the way from `start` to `end`.
    ///
    /// `t` is not clamped, so values outside `[0, 1]` extend the segment.
    pub fn point_at_fraction(&self, t: f64) -> Point2d {
        lerp_points(self.start, self.end, t)
    }

    /// The point `distance` along the segment's direction from `start`.
    ///
    /// Distances beyond either end extrapolate along the same line.
    /// A zero-length segment has no direction, so `start` is returned.
    pub fn point_at_distance(&self, distance: f64) -> Point2d {
        let length = self.length();
        if length == 0.0 {
            return self.start;
        }
        self.start + (self.end - self.start) * (distance / length)
    }

    /// The fraction along the segment of the point closest to `point`,
    /// clamped to `[0, 1]`.
    pub fn fraction_of_closest_point(&self, point: Point2d) -> f64 {
        let dir = self.end - self.start;
        let length2 = dir.magnitude2();
        if length2 == 0.0 {
            return 0.0;
        }
        self.bounds().clamp((point - self.start).dot(dir) / length2)
    }

    /// The point on the segment nearest to `point`.
    ///
    /// Never leaves the segment, even when the projection onto the
    /// infinite line would.
    pub fn closest_point(&self, point: Point2d) -> Point2d {
        self.point_at_fraction(self.fraction_of_closest_point(point))
    }
}

impl ParametricCurve2d for Segment {
    fn sample(&self, t: f64) -> Point2d {
        self.point_at_fraction(t)
    }

    fn bounds(&self) -> Interval<f64> {
        Interval::new(0.0, 1.0)
    }

    fn sample_dt(&self, _t: f64) -> crate::math::Vector2d {
        self.end - self.start
    }
}
