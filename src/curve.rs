//! Smooth curves through control points, and their conversion into a
//! drivable [`Path`].

use crate::error::{validate_step, PathError};
use crate::math::{lerp, CubicBezier2d, ParametricCurve2d, Point2d, Vector2d};
use crate::path::Path;
use cgmath::Zero;
use itertools::Itertools;
use log::debug;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// The most samples taken between any two control points.
const MAX_SAMPLES_PER_PIECE: usize = 1 << 16;

/// A waypoint on a curve, with tangent handles shaping the curve on
/// either side of it.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(from = "ControlPointDef", into = "ControlPointDef")
)]
pub struct ControlPoint {
    /// Absolute position of the handle the curve arrives along.
    incoming: Point2d,
    /// The waypoint itself.
    position: Point2d,
    /// Absolute position of the handle the curve leaves along.
    outgoing: Point2d,
    /// Target speed at the waypoint.
    speed: f64,
}

impl ControlPoint {
    /// Creates a control point.
    ///
    /// # Parameters
    /// * `incoming` - Offset of the incoming tangent handle from `position`
    /// * `position` - The waypoint
    /// * `outgoing` - Offset of the outgoing tangent handle from `position`
    /// * `speed` - The target speed at the waypoint
    pub fn new(incoming: Vector2d, position: Point2d, outgoing: Vector2d, speed: f64) -> Self {
        Self {
            incoming: position + incoming,
            position,
            outgoing: position + outgoing,
            speed,
        }
    }

    /// A control point without tangent handles.
    pub fn sharp(position: Point2d, speed: f64) -> Self {
        Self::new(Vector2d::zero(), position, Vector2d::zero(), speed)
    }

    pub fn position(&self) -> Point2d {
        self.position
    }

    pub fn incoming(&self) -> Point2d {
        self.incoming
    }

    pub fn outgoing(&self) -> Point2d {
        self.outgoing
    }

    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// The cubic bezier joining this control point to the next.
    pub fn curve_to(&self, next: &ControlPoint) -> CubicBezier2d {
        CubicBezier2d::new(&[self.position, self.outgoing, next.incoming, next.position])
    }
}

/// The serialized form of a [`ControlPoint`], with handles stored as offsets.
#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct ControlPointDef {
    #[serde(default = "Vector2d::zero")]
    incoming: Vector2d,
    position: Point2d,
    #[serde(default = "Vector2d::zero")]
    outgoing: Vector2d,
    speed: f64,
}

#[cfg(feature = "serde")]
impl From<ControlPointDef> for ControlPoint {
    fn from(def: ControlPointDef) -> Self {
        Self::new(def.incoming, def.position, def.outgoing, def.speed)
    }
}

#[cfg(feature = "serde")]
impl From<ControlPoint> for ControlPointDef {
    fn from(point: ControlPoint) -> Self {
        Self {
            incoming: point.incoming - point.position,
            position: point.position,
            outgoing: point.outgoing - point.position,
            speed: point.speed,
        }
    }
}

/// A piecewise cubic bezier curve passing through a sequence of control points.
#[derive(Clone, Debug)]
pub struct BezierCurve {
    points: Vec<ControlPoint>,
}

impl BezierCurve {
    /// Creates a curve through the given control points.
    ///
    /// At least two control points are required.
    pub fn new(points: Vec<ControlPoint>) -> Result<Self, PathError> {
        if points.len() < 2 {
            return Err(PathError::InsufficientControlPoints {
                count: points.len(),
            });
        }
        Ok(Self { points })
    }

    /// Reads a curve from a JSON array of control points.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, PathError> {
        Self::new(serde_json::from_str(json)?)
    }

    /// Appends more control points to the end of the curve.
    pub fn add_points(&mut self, points: impl IntoIterator<Item = ControlPoint>) {
        self.points.extend(points);
    }

    pub fn control_points(&self) -> &[ControlPoint] {
        &self.points
    }

    /// Samples the curve at a regular parameter spacing.
    ///
    /// Yields `(point, speed)` pairs, `ceil(1 / step)` per pair of control
    /// points but no more than 65536. The initial control point is not
    /// yielded, but the final sample of each piece lands exactly on the next
    /// control point.
    pub fn samples(&self, step: f64) -> Result<impl Iterator<Item = (Point2d, f64)> + '_, PathError> {
        let step = validate_step(step)?;
        let count = usize::min((1.0 / step).ceil() as usize, MAX_SAMPLES_PER_PIECE);
        let samples = self.points.iter().tuple_windows().flat_map(move |(a, b)| {
            let curve = a.curve_to(b);
            (1..=count).map(move |k| {
                let j = f64::min(1.0, k as f64 / count as f64);
                (curve.sample(j), lerp(a.speed, b.speed, j))
            })
        });
        Ok(samples)
    }

    /// Flattens the curve into a path of straight segments.
    ///
    /// # Parameters
    /// * `step` - The curve parameter step, in `(0, 1]`. A smaller step
    ///   produces more, shorter segments, up to 65536 per pair of control points.
    pub fn flatten(&self, step: f64) -> Result<Path, PathError> {
        let mut path = Path::new(self.points[0].position);
        for (point, speed) in self.samples(step)? {
            path.add_point(point, speed);
        }
        debug!(
            "Flattened {} control points into {} segments ({:.3} m)",
            self.points.len(),
            path.all_segments().len(),
            path.total_distance()
        );
        Ok(path)
    }
}
