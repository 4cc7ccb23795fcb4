//! Rope: a chain of points pinned at both ends

use log::warn;

use crate::foundation::math::Vector3;

use super::{Constraint, VerletBody, VerletPoint, VerletSystem};

/// Kind of link between consecutive rope points
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum LinkKind {
    /// [`Constraint::Distance`]
    #[default]
    Rigid,
    /// [`Constraint::SoftDistance`]
    Soft {
        /// Correction fraction per pass
        stiffness: f32,
    },
    /// [`Constraint::Spring`]
    Spring {
        /// Spring constant per pass
        stiffness: f32,
    },
}

impl LinkKind {
    /// Link points `a` and `b` at their current separation
    pub fn link(self, points: &[VerletPoint], a: usize, b: usize) -> Constraint {
        match self {
            Self::Rigid => Constraint::distance(points, a, b),
            Self::Soft { stiffness } => Constraint::soft_distance(points, a, b, stiffness),
            Self::Spring { stiffness } => Constraint::spring(points, a, b, stiffness),
        }
    }
}

/// Straight chain of `count + 1` points with the ends pinned
#[derive(Debug, Clone)]
pub struct VerletRope {
    body: VerletBody,
}

impl VerletRope {
    /// Rigid rope from `from` to `to` split into `count` segments
    pub fn new(from: Vector3, to: Vector3, count: usize, iterations: usize) -> Self {
        Self::with_link(from, to, count, iterations, LinkKind::Rigid)
    }

    /// Rope whose segments use the given link kind
    pub fn with_link(
        from: Vector3,
        to: Vector3,
        count: usize,
        iterations: usize,
        link: LinkKind,
    ) -> Self {
        let count = if count == 0 {
            warn!("rope with zero segments, using one");
            1
        } else {
            count
        };

        let mut points: Vec<VerletPoint> = (0..=count)
            .map(|i| {
                #[allow(clippy::cast_precision_loss)]
                let t = i as f32 / count as f32;
                VerletPoint::new(Vector3::lerp(from, to, t))
            })
            .collect();
        points[0].is_static = true;
        points[count].is_static = true;

        let constraints = (0..count).map(|i| link.link(&points, i, i + 1)).collect();

        Self {
            body: VerletBody::new(points, constraints, iterations),
        }
    }

    /// First point
    pub fn start(&self) -> &VerletPoint {
        &self.body.points[0]
    }

    /// Last point
    pub fn end(&self) -> &VerletPoint {
        &self.body.points[self.body.points.len() - 1]
    }

    /// First point, mutable (to drag or unpin the rope end)
    pub fn start_mut(&mut self) -> &mut VerletPoint {
        &mut self.body.points[0]
    }

    /// Last point, mutable
    pub fn end_mut(&mut self) -> &mut VerletPoint {
        let last = self.body.points.len() - 1;
        &mut self.body.points[last]
    }
}

impl VerletSystem for VerletRope {
    fn body(&self) -> &VerletBody {
        &self.body
    }

    fn body_mut(&mut self) -> &mut VerletBody {
        &mut self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_rope_layout() {
        let rope = VerletRope::new(Vector3::zero(), Vector3::new(2.0, 0.0, 0.0), 2, 4);
        assert_eq!(rope.points().len(), 3);
        assert_eq!(rope.constraints().len(), 2);
        assert_eq!(rope.constraint_iterations(), 4);
        for constraint in rope.constraints() {
            assert_relative_eq!(constraint.rest_length(), 1.0);
        }
        assert!(rope.start().is_static);
        assert!(rope.end().is_static);
        assert!(!rope.points()[1].is_static);
    }

    #[test]
    fn test_rope_holds_its_line_without_gravity() {
        let mut rope = VerletRope::new(Vector3::zero(), Vector3::new(2.0, 0.0, 0.0), 2, 4);
        for _ in 0..120 {
            rope.update_physics(1.0 / 60.0, Vector3::zero());
            rope.apply_constraints();
        }
        for point in rope.points() {
            assert!(point.position.y.abs() < 1e-3);
            assert!(point.position.z.abs() < 1e-3);
        }
    }

    #[test]
    fn test_rope_sags_under_gravity_but_keeps_ends() {
        let mut rope = VerletRope::with_link(
            Vector3::zero(),
            Vector3::new(4.0, 0.0, 0.0),
            8,
            2,
            LinkKind::Soft { stiffness: 0.5 },
        );
        for _ in 0..30 {
            rope.update_physics(1.0 / 60.0, Vector3::new(0.0, -9.81, 0.0));
            rope.apply_constraints();
        }
        assert_eq!(rope.start().position, Vector3::zero());
        assert_eq!(rope.end().position, Vector3::new(4.0, 0.0, 0.0));
        assert!(rope.points()[4].position.y < 0.0);
    }

    #[test]
    fn test_zero_segments_falls_back_to_one() {
        let rope = VerletRope::new(Vector3::zero(), Vector3::one(), 0, 1);
        assert_eq!(rope.points().len(), 2);
        assert!(matches!(rope.constraints()[0], Constraint::Distance { .. }));
    }

    #[test]
    fn test_spring_links() {
        let rope = VerletRope::with_link(
            Vector3::zero(),
            Vector3::new(1.0, 0.0, 0.0),
            2,
            1,
            LinkKind::Spring { stiffness: 0.2 },
        );
        assert!(rope
            .constraints()
            .iter()
            .all(|c| matches!(c, Constraint::Spring { stiffness, .. } if (*stiffness - 0.2).abs() < f32::EPSILON)));
    }
}
