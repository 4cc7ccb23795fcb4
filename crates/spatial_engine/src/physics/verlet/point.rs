//! Verlet point mass

use crate::foundation::math::Vector3;

/// Point integrated with position Verlet
///
/// Velocity is implicit: `position - previous_position`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VerletPoint {
    /// Current position
    pub position: Vector3,
    /// Position one step ago
    pub previous_position: Vector3,
    /// Accumulated force, kept between steps until cleared
    pub force: Vector3,
    /// Mass, non-positive values ignore `force`
    pub mass: f32,
    /// Pinned points never move on their own or under constraints
    pub is_static: bool,
}

impl VerletPoint {
    /// Free point at rest at `position`
    pub const fn new(position: Vector3) -> Self {
        Self {
            position,
            previous_position: position,
            force: Vector3::zero(),
            mass: 1.0,
            is_static: false,
        }
    }

    /// Builder: set the mass
    #[must_use]
    pub const fn with_mass(mut self, mass: f32) -> Self {
        self.mass = mass;
        self
    }

    /// Builder: pin the point
    #[must_use]
    pub const fn pinned(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Implicit velocity per step
    pub fn velocity(&self) -> Vector3 {
        self.position - self.previous_position
    }

    /// Move the point and drop its velocity
    pub fn teleport(&mut self, position: Vector3) {
        self.position = position;
        self.previous_position = position;
    }

    /// Integrate with no external acceleration
    pub fn update(&mut self, dt: f32) {
        self.integrate(dt, Vector3::zero());
    }

    /// `pos += (pos - prev) + (force / mass + acceleration) * dt²`
    pub fn integrate(&mut self, dt: f32, acceleration: Vector3) {
        if self.is_static {
            return;
        }

        let velocity = self.velocity();
        self.previous_position = self.position;

        let inverse_mass = if self.mass > 0.0 { 1.0 / self.mass } else { 0.0 };
        let acceleration = self.force * inverse_mass + acceleration;
        self.position += velocity + acceleration * (dt * dt);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_static_point_never_moves() {
        let mut point = VerletPoint::new(Vector3::new(1.0, 2.0, 3.0)).pinned();
        point.force = Vector3::new(100.0, 0.0, 0.0);
        point.previous_position = Vector3::zero();
        for _ in 0..10 {
            point.integrate(0.016, Vector3::new(0.0, -9.81, 0.0));
        }
        assert_eq!(point.position, Vector3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn test_keeps_velocity_without_forces() {
        let mut point = VerletPoint::new(Vector3::zero());
        point.previous_position = Vector3::new(-0.1, 0.0, 0.0);
        point.update(0.016);
        assert_relative_eq!(point.position, Vector3::new(0.1, 0.0, 0.0));
        point.update(0.016);
        assert_relative_eq!(point.position, Vector3::new(0.2, 0.0, 0.0));
    }

    #[test]
    fn test_force_scaled_by_mass() {
        let mut light = VerletPoint::new(Vector3::zero());
        let mut heavy = VerletPoint::new(Vector3::zero()).with_mass(2.0);
        light.force = Vector3::new(0.0, 4.0, 0.0);
        heavy.force = Vector3::new(0.0, 4.0, 0.0);
        light.update(0.5);
        heavy.update(0.5);
        assert_relative_eq!(light.position.y, 1.0);
        assert_relative_eq!(heavy.position.y, 0.5);
    }

    #[test]
    fn test_zero_mass_ignores_force() {
        let mut point = VerletPoint::new(Vector3::zero()).with_mass(0.0);
        point.force = Vector3::one();
        point.integrate(1.0, Vector3::new(0.0, -1.0, 0.0));
        assert_relative_eq!(point.position, Vector3::new(0.0, -1.0, 0.0));
    }

    #[test]
    fn test_teleport_drops_velocity() {
        let mut point = VerletPoint::new(Vector3::zero());
        point.previous_position = Vector3::new(-1.0, 0.0, 0.0);
        point.teleport(Vector3::new(5.0, 0.0, 0.0));
        assert_eq!(point.velocity(), Vector3::zero());
    }
}
