//! Sphere shape

use crate::foundation::math::Vector3;

use super::{Primitive, Ray};

/// Sphere centred on its primitive's world position
#[derive(Debug, Clone)]
pub struct Sphere {
    /// Transform, only the translation part is used
    pub primitive: Primitive,
    /// Radius in world units
    pub radius: f32,
}

impl Sphere {
    /// Creates a sphere at `position` with the given radius
    pub fn new(position: Vector3, radius: f32) -> Self {
        Self {
            primitive: Primitive::new(position),
            radius,
        }
    }

    /// World-space centre as of the last `calculate_matrix`
    pub const fn center(&self) -> Vector3 {
        self.primitive.matrix.get_position()
    }

    /// Push a point inside the sphere out to its surface
    ///
    /// A point exactly at the centre has no direction and is pushed along +Y.
    pub fn point_intersection(&self, point: Vector3) -> Option<Vector3> {
        let center = self.center();
        if point.distance_to(center) > self.radius {
            return None;
        }

        let direction = (point - center).normalize();
        let direction = if direction == Vector3::zero() {
            Vector3::up()
        } else {
            direction
        };
        Some(center + direction * self.radius)
    }

    /// Nearest surface point along the ray segment
    ///
    /// The segment is parametrised over `[0, 1]` from start to end; roots
    /// outside that range are ignored.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Vector3> {
        let start = ray.start();
        let d = ray.end() - start;
        let f = start - self.center();

        let a = d.dot(d);
        if a == 0.0 {
            return None;
        }
        let b = 2.0 * f.dot(d);
        let c = f.dot(f) - self.radius * self.radius;

        let discriminant = b * b - 4.0 * a * c;
        if discriminant < 0.0 {
            return None;
        }

        let root = discriminant.sqrt();
        let near = (-b - root) / (2.0 * a);
        let far = (-b + root) / (2.0 * a);

        [near, far]
            .into_iter()
            .find(|t| (0.0..=1.0).contains(t))
            .map(|t| start + d * t)
    }
}
