use super::{Point2d, Rotation};
use cgmath::prelude::*;

/// Linearly interpolates between two points.
///
/// Evaluated as `a * (1 - t) + b * t` rather than `a + t * (b - a)`, so that
/// `t = 0` and `t = 1` reproduce `a` and `b` exactly. `t` is not clamped.
#[inline(always)]
pub fn lerp_points(a: Point2d, b: Point2d, t: f64) -> Point2d {
    Point2d::from_vec(a.to_vec() * (1.0 - t) + b.to_vec() * t)
}

/// Linearly interpolates between two scalars.
#[inline(always)]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a * (1.0 - t) + b * t
}

/// The direction of the vector pointing from `from` to `to`.
pub fn angle_between(from: Point2d, to: Point2d) -> Rotation {
    Rotation::from_vector(to - from)
}
