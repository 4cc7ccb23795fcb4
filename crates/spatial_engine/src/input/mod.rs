//! Pointer input
//!
//! Hosts translate whatever device they poll (XR controller, mouse) into a
//! [`Pointer`]: an optional world-space ray plus a trigger flag.

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Matrix4x4, Vector2, Vector3, Vector4};
use crate::geometry::Ray;

/// Snapshot of a tracked controller
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ControllerState {
    /// Controller pose in world space
    pub transform: Matrix4x4,
    /// Trigger held
    pub trigger: bool,
    /// Thumbstick position in `[-1, 1]`
    pub axis: Vector2,
}

/// Ray source driving the collider state machine
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Pointer {
    /// Base ray; `None` skips ray tests entirely
    pub ray: Option<Ray>,
    /// Trigger held
    pub trigger: bool,
}

impl Pointer {
    /// Pointer without a ray
    pub const fn new() -> Self {
        Self {
            ray: None,
            trigger: false,
        }
    }

    /// Cast from a pose: origin at its position, along its -Z axis
    pub fn set_from_pose(&mut self, pose: &Matrix4x4, length: f32) {
        let direction = pose.transform_direction(Vector3::forward());
        self.ray = Some(Ray::from_direction(pose.get_position(), direction, length));
    }

    /// Take both the pose and the trigger from a controller
    pub fn set_from_controller(&mut self, controller: &ControllerState, length: f32) {
        self.set_from_pose(&controller.transform, length);
        self.trigger = controller.trigger;
    }

    /// Cast through a point given in normalized device coordinates
    ///
    /// `inverse_view_projection` maps clip space back to world space. Returns
    /// false and leaves the pointer unchanged when unprojection degenerates.
    pub fn set_from_screen(
        &mut self,
        ndc: Vector2,
        inverse_view_projection: &Matrix4x4,
        length: f32,
    ) -> bool {
        let unproject = |z: f32| {
            let v = inverse_view_projection.multiply_vector(Vector4::new(ndc.x, ndc.y, z, 1.0));
            (v.w.abs() > f32::EPSILON).then(|| v.to_vector3() / v.w)
        };
        let (Some(near), Some(far)) = (unproject(-1.0), unproject(1.0)) else {
            return false;
        };
        let direction = far - near;
        if direction == Vector3::zero() {
            return false;
        }
        self.ray = Some(Ray::from_direction(near, direction, length));
        true
    }

    /// Set the trigger state
    pub fn set_trigger(&mut self, pressed: bool) {
        self.trigger = pressed;
    }

    /// Drop the ray, the world then skips ray tests
    pub fn clear(&mut self) {
        self.ray = None;
    }
}
