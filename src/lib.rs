//! Waypoint path planning and pure pursuit tracking for ground vehicles.
//!
//! Control points are joined by cubic bezier curves, which are flattened into
//! a [`Path`] of straight [`Segment`]s. The path is then queried once per
//! control tick with the vehicle's position to find the point to steer
//! towards and the speed to drive at.

pub use cgmath;
pub use curve::{BezierCurve, ControlPoint};
pub use error::PathError;
pub use params::TrackingParams;
pub use path::{DrivingData, Path, SharedPath, Telemetry};
pub use segment::Segment;
use slotmap::new_key_type;
pub use util::Interval;

mod curve;
mod error;
pub mod math;
mod params;
mod path;
mod segment;
mod util;

new_key_type! {
    /// Unique ID of an observer registered with [Path::add_observer].
    pub struct ObserverId;
}
