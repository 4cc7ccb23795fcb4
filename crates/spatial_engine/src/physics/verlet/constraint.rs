//! Constraints between two verlet points
//!
//! Endpoints are indices into the owning system's point list.

use crate::foundation::math::Vector3;

use super::VerletPoint;

/// Below this separation a constraint has no direction to push along
const MIN_DISTANCE: f32 = 1e-6;

/// Link between two points
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Constraint {
    /// Rigid link restoring the rest length fully each pass
    Distance {
        /// First endpoint
        a: usize,
        /// Second endpoint
        b: usize,
        /// Rest length
        length: f32,
    },
    /// Distance correction scaled by `stiffness` in `[0, 1]`
    SoftDistance {
        /// First endpoint
        a: usize,
        /// Second endpoint
        b: usize,
        /// Rest length
        length: f32,
        /// Fraction of the correction applied per pass
        stiffness: f32,
    },
    /// Hooke-style pull, not length preserving
    Spring {
        /// First endpoint
        a: usize,
        /// Second endpoint
        b: usize,
        /// Rest length
        length: f32,
        /// Spring constant per pass
        stiffness: f32,
    },
}

fn separation(points: &[VerletPoint], a: usize, b: usize) -> f32 {
    match (points.get(a), points.get(b)) {
        (Some(pa), Some(pb)) => pa.position.distance_to(pb.position),
        _ => 0.0,
    }
}

impl Constraint {
    /// Rigid link with the current separation as rest length
    pub fn distance(points: &[VerletPoint], a: usize, b: usize) -> Self {
        Self::Distance {
            a,
            b,
            length: separation(points, a, b),
        }
    }

    /// Soft link with the current separation as rest length
    pub fn soft_distance(points: &[VerletPoint], a: usize, b: usize, stiffness: f32) -> Self {
        Self::SoftDistance {
            a,
            b,
            length: separation(points, a, b),
            stiffness: stiffness.clamp(0.0, 1.0),
        }
    }

    /// Spring with the current separation as rest length
    pub fn spring(points: &[VerletPoint], a: usize, b: usize, stiffness: f32) -> Self {
        Self::Spring {
            a,
            b,
            length: separation(points, a, b),
            stiffness,
        }
    }

    /// Endpoint indices
    pub const fn endpoints(&self) -> (usize, usize) {
        match *self {
            Self::Distance { a, b, .. }
            | Self::SoftDistance { a, b, .. }
            | Self::Spring { a, b, .. } => (a, b),
        }
    }

    /// Rest length
    pub const fn rest_length(&self) -> f32 {
        match *self {
            Self::Distance { length, .. }
            | Self::SoftDistance { length, .. }
            | Self::Spring { length, .. } => length,
        }
    }

    /// Copy with both endpoint indices shifted by `by`
    #[must_use]
    pub fn offset(mut self, by: usize) -> Self {
        match &mut self {
            Self::Distance { a, b, .. }
            | Self::SoftDistance { a, b, .. }
            | Self::Spring { a, b, .. } => {
                *a += by;
                *b += by;
            }
        }
        self
    }

    /// Relax the link once
    ///
    /// Missing endpoints, coincident endpoints and fully pinned links are
    /// left untouched.
    pub fn apply(&self, points: &mut [VerletPoint]) {
        let (a, b) = self.endpoints();
        if a == b {
            return;
        }
        let (Some(&from), Some(&to)) = (points.get(a), points.get(b)) else {
            return;
        };
        if from.is_static && to.is_static {
            return;
        }

        let delta = to.position - from.position;
        let distance = delta.magnitude();
        if distance < MIN_DISTANCE {
            return;
        }

        let (from_shift, to_shift) = match *self {
            Self::Distance { length, .. } => {
                let offset = Self::relaxation(delta, distance, length, &from, &to);
                (-offset, offset)
            }
            Self::SoftDistance {
                length, stiffness, ..
            } => {
                let offset = Self::relaxation(delta, distance, length, &from, &to) * stiffness;
                (-offset, offset)
            }
            Self::Spring {
                length, stiffness, ..
            } => {
                let force = (delta / distance) * ((distance - length) * stiffness);
                (force, -force)
            }
        };

        if !from.is_static {
            points[a].position += from_shift;
        }
        if !to.is_static {
            points[b].position += to_shift;
        }
    }

    /// Offset that restores `length`, split in half when both ends are free
    fn relaxation(
        delta: Vector3,
        distance: f32,
        length: f32,
        from: &VerletPoint,
        to: &VerletPoint,
    ) -> Vector3 {
        let mut percent = (length - distance) / distance;
        if !from.is_static && !to.is_static {
            percent /= 2.0;
        }
        delta * percent
    }
}
