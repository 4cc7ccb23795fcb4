//! Verlet soft-body physics
//!
//! Points are integrated with position Verlet, then constraints are relaxed
//! a fixed number of times. Every system owns a flat point list and a list of
//! constraints that index into it.

mod constraint;
mod hair;
mod mesh;
mod point;
mod rope;

pub use constraint::Constraint;
pub use hair::{HairConfig, HairStrand, VerletHair};
pub use mesh::{MeshDescription, MeshError, VerletMesh};
pub use point::VerletPoint;
pub use rope::{LinkKind, VerletRope};

use crate::foundation::math::Vector3;

/// Points plus the constraints linking them
#[derive(Debug, Clone, Default)]
pub struct VerletBody {
    /// Point masses
    pub points: Vec<VerletPoint>,
    /// Links, relaxed in order
    pub constraints: Vec<Constraint>,
    /// Relaxation passes per step
    pub constraint_iterations: usize,
}

impl VerletBody {
    /// Body from parts
    pub fn new(
        points: Vec<VerletPoint>,
        constraints: Vec<Constraint>,
        constraint_iterations: usize,
    ) -> Self {
        Self {
            points,
            constraints,
            constraint_iterations,
        }
    }

    /// Integrate every point under a shared acceleration
    pub fn integrate(&mut self, dt: f32, acceleration: Vector3) {
        for point in &mut self.points {
            point.integrate(dt, acceleration);
        }
    }

    /// Relax every constraint `constraint_iterations` times
    pub fn relax(&mut self) {
        for _ in 0..self.constraint_iterations {
            for constraint in &self.constraints {
                constraint.apply(&mut self.points);
            }
        }
    }
}

/// Anything the collision world can step
pub trait VerletSystem {
    /// Backing body
    fn body(&self) -> &VerletBody;

    /// Backing body, mutable
    fn body_mut(&mut self) -> &mut VerletBody;

    /// Point masses
    fn points(&self) -> &[VerletPoint] {
        &self.body().points
    }

    /// Point masses, mutable
    fn points_mut(&mut self) -> &mut [VerletPoint] {
        &mut self.body_mut().points
    }

    /// Links between points
    fn constraints(&self) -> &[Constraint] {
        &self.body().constraints
    }

    /// Relaxation passes per step
    fn constraint_iterations(&self) -> usize {
        self.body().constraint_iterations
    }

    /// Integrate all free points
    fn update_physics(&mut self, dt: f32, gravity: Vector3) {
        self.body_mut().integrate(dt, gravity);
    }

    /// Relax all constraints
    fn apply_constraints(&mut self) {
        self.body_mut().relax();
    }
}

impl VerletSystem for VerletBody {
    fn body(&self) -> &VerletBody {
        self
    }

    fn body_mut(&mut self) -> &mut VerletBody {
        self
    }
}
