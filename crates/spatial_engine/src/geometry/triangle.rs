//! Triangle and ray-triangle intersection

use crate::foundation::math::Vector3;

use super::Ray;

/// Tolerance for parallel rays and self-hits
const EPSILON: f32 = 1e-5;

/// A triangle in world space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Triangle {
    /// First vertex
    pub a: Vector3,
    /// Second vertex
    pub b: Vector3,
    /// Third vertex
    pub c: Vector3,
}

impl Triangle {
    /// Creates a new triangle
    pub const fn new(a: Vector3, b: Vector3, c: Vector3) -> Self {
        Self { a, b, c }
    }

    /// Unit normal (right-hand rule over a, b, c)
    pub fn normal(&self) -> Vector3 {
        (self.b - self.a).cross(self.c - self.a).normalize()
    }

    /// Möller-Trumbore ray-triangle intersection
    ///
    /// Returns the hit point when it lies within `(EPSILON, ray.length]`
    /// along the ray.
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Vector3> {
        let edge1 = self.b - self.a;
        let edge2 = self.c - self.a;

        let h = ray.direction.cross(edge2);
        let det = edge1.dot(h);
        if det.abs() < EPSILON {
            return None;
        }

        let f = 1.0 / det;
        let s = ray.start() - self.a;
        let u = f * s.dot(h);
        if !(0.0..=1.0).contains(&u) {
            return None;
        }

        let q = s.cross(edge1);
        let v = f * ray.direction.dot(q);
        if v < 0.0 || u + v > 1.0 {
            return None;
        }

        let t = f * edge2.dot(q);
        (t > EPSILON && t <= ray.length).then(|| ray.point_at(t))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn floor() -> Triangle {
        Triangle::new(
            Vector3::new(-1.0, 0.0, -1.0),
            Vector3::new(1.0, 0.0, -1.0),
            Vector3::new(0.0, 0.0, 1.0),
        )
    }

    #[test]
    fn test_ray_hits_triangle() {
        let ray = Ray::new(Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, -2.0, 0.0));
        let hit = floor().ray_intersection(&ray).expect("hit");
        assert_relative_eq!(hit, Vector3::zero(), epsilon = 1e-6);
    }

    #[test]
    fn test_ray_too_short() {
        let ray = Ray::new(Vector3::new(0.0, 2.0, 0.0), Vector3::new(0.0, 0.5, 0.0));
        assert!(floor().ray_intersection(&ray).is_none());
    }

    #[test]
    fn test_parallel_ray_misses() {
        let ray = Ray::new(Vector3::new(-5.0, 0.0, 0.0), Vector3::new(5.0, 0.0, 0.0));
        assert!(floor().ray_intersection(&ray).is_none());
    }

    #[test]
    fn test_ray_outside_misses() {
        let ray = Ray::new(Vector3::new(3.0, 2.0, 0.0), Vector3::new(3.0, -2.0, 0.0));
        assert!(floor().ray_intersection(&ray).is_none());
    }

    #[test]
    fn test_hit_behind_origin_is_rejected() {
        let ray = Ray::new(Vector3::new(0.0, -1.0, 0.0), Vector3::new(0.0, -3.0, 0.0));
        assert!(floor().ray_intersection(&ray).is_none());
    }
}
