//! Finite rays for picking and pointer queries

use serde::{Deserialize, Serialize};

use crate::foundation::math::Vector3;

/// A ray segment: origin, unit direction and length
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Ray {
    /// The origin of the ray in world space
    pub position: Vector3,
    /// Unit direction (zero when built from coincident points)
    pub direction: Vector3,
    /// Distance from the origin to the far end
    pub length: f32,
}

impl Ray {
    /// Ray running from `from` to `to`
    pub fn new(from: Vector3, to: Vector3) -> Self {
        Self {
            position: from,
            direction: Vector3::direction(from, to),
            length: Vector3::distance(from, to),
        }
    }

    /// Ray from an origin along `direction` (normalised here) for `length`
    pub fn from_direction(origin: Vector3, direction: Vector3, length: f32) -> Self {
        Self {
            position: origin,
            direction: direction.normalize(),
            length,
        }
    }

    /// Origin
    pub const fn start(&self) -> Vector3 {
        self.position
    }

    /// Far end of the segment
    pub fn end(&self) -> Vector3 {
        self.point_at(self.length)
    }

    /// Point at distance `t` along the ray
    pub fn point_at(&self, t: f32) -> Vector3 {
        self.position + self.direction * t
    }
}
