use super::Vector2d;
use cgmath::{Angle, Basis2, Deg, Rad, Rotation as _, Rotation2};

/// A planar rotation, or equivalently a heading measured counter-clockwise
/// from the positive x-axis.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Rotation(Rad<f64>);

impl Rotation {
    /// The identity rotation.
    pub const IDENTITY: Self = Self(Rad(0.0));

    pub fn from_radians(angle: f64) -> Self {
        Self(Rad(angle))
    }

    pub fn from_degrees(angle: f64) -> Self {
        Self(Deg(angle).into())
    }

    /// The direction that a vector points in.
    pub fn from_vector(vec: Vector2d) -> Self {
        Self(Rad::atan2(vec.y, vec.x))
    }

    pub fn radians(&self) -> f64 {
        self.0 .0
    }

    pub fn degrees(&self) -> f64 {
        Deg::from(self.0).0
    }

    pub fn sin(&self) -> f64 {
        self.0.sin()
    }

    pub fn cos(&self) -> f64 {
        self.0.cos()
    }

    /// The rotation which undoes this one.
    pub fn inverse(&self) -> Self {
        Self(-self.0)
    }

    /// Composes this rotation with another.
    pub fn rotate_by(&self, other: Self) -> Self {
        Self(self.0 + other.0)
    }

    /// The opposite heading, rotated by half a turn.
    pub fn flip(&self) -> Self {
        Self(self.0 + Rad::turn_div_2())
    }

    /// Rotates a vector by this rotation.
    pub fn rotate(&self, vec: Vector2d) -> Vector2d {
        Basis2::from_angle(self.0).rotate_vector(vec)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}
