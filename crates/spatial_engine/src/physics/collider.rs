//! Colliders: a shape, its ray hover state and its event handlers

use crate::events::{ColliderEventHandler, ColliderEventKind, EventHandlers};
use crate::foundation::math::{Matrix4x4, Quaternion, Vector3};
use crate::geometry::{Cube, ParentTransform, Primitive, Ray, Sphere};

/// Collision shape types
#[derive(Debug, Clone)]
pub enum ColliderShape {
    /// Oriented box
    Box(Cube),
    /// Sphere
    Sphere(Sphere),
}

impl ColliderShape {
    /// Shared transform
    pub const fn primitive(&self) -> &Primitive {
        match self {
            Self::Box(cube) => &cube.primitive,
            Self::Sphere(sphere) => &sphere.primitive,
        }
    }

    /// Shared transform, mutable
    pub fn primitive_mut(&mut self) -> &mut Primitive {
        match self {
            Self::Box(cube) => &mut cube.primitive,
            Self::Sphere(sphere) => &mut sphere.primitive,
        }
    }

    /// Refresh the world matrix (and box corners)
    pub fn update(&mut self) {
        match self {
            Self::Box(cube) => {
                cube.primitive.calculate_matrix();
                cube.calculate_vertices();
            }
            Self::Sphere(sphere) => sphere.primitive.calculate_matrix(),
        }
    }

    /// Nearest hit point along the ray
    pub fn ray_intersection(&self, ray: &Ray) -> Option<Vector3> {
        match self {
            Self::Box(cube) => cube.ray_intersection(ray),
            Self::Sphere(sphere) => sphere.ray_intersection(ray),
        }
    }

    /// Surface point a penetrating point should be pushed to
    pub fn point_intersection(&self, point: Vector3) -> Option<Vector3> {
        match self {
            Self::Box(cube) => cube.point_intersection(point),
            Self::Sphere(sphere) => sphere.point_intersection(point),
        }
    }
}

/// Hover state of a collider with respect to the pointer ray
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RayState {
    /// Ray does not hit the collider
    #[default]
    NotHovered,
    /// Ray hits the collider, trigger not engaged on it
    Hovered,
    /// Ray hits the collider and the trigger went down on it
    HoveredTriggered,
}

/// Shape registered with a [`World`](super::World)
#[derive(Debug)]
pub struct Collider {
    /// Geometry
    pub shape: ColliderShape,
    pub(crate) state: RayState,
    pub(crate) trigger_armed: bool,
    pub(crate) events: EventHandlers,
}

impl Collider {
    /// Collider around a shape
    pub fn new(shape: ColliderShape) -> Self {
        let mut collider = Self {
            shape,
            state: RayState::NotHovered,
            trigger_armed: false,
            events: EventHandlers::new(),
        };
        collider.update();
        collider
    }

    /// Box collider at `position` with full extents `size`
    pub fn cuboid(position: Vector3, size: Vector3) -> Self {
        Self::new(ColliderShape::Box(Cube::new(position, size)))
    }

    /// Sphere collider at `position`
    pub fn sphere(position: Vector3, radius: f32) -> Self {
        Self::new(ColliderShape::Sphere(Sphere::new(position, radius)))
    }

    /// Builder: attach a parent transform
    #[must_use]
    pub fn with_parent(mut self, parent: ParentTransform) -> Self {
        self.set_parent(parent);
        self
    }

    /// Register a handler for one event kind
    #[must_use]
    pub fn with_handler(
        mut self,
        kind: ColliderEventKind,
        handler: impl ColliderEventHandler + 'static,
    ) -> Self {
        self.events.on(kind, handler);
        self
    }

    /// Register a handler for one event kind
    pub fn on(&mut self, kind: ColliderEventKind, handler: impl ColliderEventHandler + 'static) {
        self.events.on(kind, handler);
    }

    /// Register a handler for every event kind
    pub fn on_any(&mut self, handler: impl ColliderEventHandler + 'static) {
        self.events.on_any(handler);
    }

    /// Handlers attached to this collider
    pub const fn events(&self) -> &EventHandlers {
        &self.events
    }

    /// Current hover state
    pub const fn state(&self) -> RayState {
        self.state
    }

    /// Refresh world matrix and derived geometry
    pub fn update(&mut self) {
        self.shape.update();
    }

    /// Replace the parent link; takes effect on the next update
    pub fn set_parent(&mut self, parent: ParentTransform) {
        self.shape.primitive_mut().parent = parent;
        self.update();
    }

    /// Local position
    pub const fn position(&self) -> Vector3 {
        self.shape.primitive().position
    }

    /// Set the local position; takes effect on the next update
    pub fn set_position(&mut self, position: Vector3) {
        self.shape.primitive_mut().position = position;
    }

    /// Local rotation
    pub const fn rotation(&self) -> Quaternion {
        self.shape.primitive().rotation
    }

    /// Set the local rotation; takes effect on the next update
    pub fn set_rotation(&mut self, rotation: Quaternion) {
        self.shape.primitive_mut().rotation = rotation;
    }

    /// World matrix as of the last update
    pub const fn matrix(&self) -> &Matrix4x4 {
        &self.shape.primitive().matrix
    }

    /// World position from the current parent
    pub fn world_position(&self) -> Vector3 {
        self.shape.primitive().world_position()
    }

    /// World rotation from the current parent
    pub fn world_rotation(&self) -> Quaternion {
        self.shape.primitive().world_rotation()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_box_collider_tracks_position_after_update() {
        let mut collider = Collider::cuboid(Vector3::zero(), Vector3::one());
        collider.set_position(Vector3::new(0.0, 0.0, -3.0));
        let ray = Ray::from_direction(Vector3::zero(), Vector3::forward(), 10.0);

        // stale vertices until the next update
        let stale = collider.shape.ray_intersection(&ray).expect("stale hit");
        assert_relative_eq!(stale.z, -0.5, epsilon = 1e-6);

        collider.update();
        let hit = collider.shape.ray_intersection(&ray).expect("hit");
        assert_relative_eq!(hit.z, -2.5, epsilon = 1e-6);
    }

    #[test]
    fn test_sphere_collider_pushes_points() {
        let collider = Collider::sphere(Vector3::new(0.0, 1.0, 0.0), 0.5);
        let pushed = collider
            .shape
            .point_intersection(Vector3::new(0.0, 1.2, 0.0))
            .expect("inside");
        assert_relative_eq!(pushed, Vector3::new(0.0, 1.5, 0.0));
    }

    #[test]
    fn test_parent_moves_collider() {
        let parent = Matrix4x4::from_translation(Vector3::new(5.0, 0.0, 0.0));
        let collider = Collider::sphere(Vector3::new(1.0, 0.0, 0.0), 1.0).with_parent(parent.into());
        assert_relative_eq!(collider.matrix().get_position(), Vector3::new(6.0, 0.0, 0.0));
        assert_relative_eq!(collider.world_position(), Vector3::new(6.0, 0.0, 0.0));
        assert_eq!(collider.state(), RayState::NotHovered);
    }
}
