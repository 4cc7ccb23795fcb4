//! Bone node stored in a skeleton arena

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Matrix4x4, Quaternion, Vector3};

/// Position, rotation and scale of a bone
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoneTransform {
    /// Translation relative to the parent
    pub position: Vector3,
    /// Rotation relative to the parent
    pub rotation: Quaternion,
    /// Scale, stored for consumers but not composed into world matrices
    pub scale: Vector3,
}

impl Default for BoneTransform {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::identity(),
            scale: Vector3::one(),
        }
    }
}

/// Single joint of a [`Skeleton`](super::Skeleton)
///
/// Parent and children are indices into the owning skeleton's bone list.
#[derive(Debug, Clone)]
pub struct Bone {
    /// Identifier from the skin (glTF node index)
    pub id: u32,
    /// Name used for lookups by the animation sampler
    pub name: String,
    /// Current local transform
    pub transform: BoneTransform,
    /// Local transform captured at build time
    pub rest: BoneTransform,
    /// Procedural rotation applied after `transform.rotation`
    pub local_rotation: Quaternion,
    /// Maps mesh space into this bone's bind space
    pub inverse_bind_matrix: Matrix4x4,
    pub(crate) parent: Option<usize>,
    pub(crate) children: Vec<usize>,
    pub(crate) world_matrix: Matrix4x4,
}

impl Bone {
    pub(crate) fn new(
        id: u32,
        name: String,
        transform: BoneTransform,
        inverse_bind_matrix: Matrix4x4,
    ) -> Self {
        Self {
            id,
            name,
            transform,
            rest: transform,
            local_rotation: Quaternion::identity(),
            inverse_bind_matrix,
            parent: None,
            children: Vec::new(),
            world_matrix: Matrix4x4::identity(),
        }
    }

    /// `T(position) * R(rotation * local_rotation)`, scale left out
    pub fn local_matrix(&self) -> Matrix4x4 {
        Matrix4x4::from_translation(self.transform.position)
            .rotate_quaternion(self.transform.rotation.mul(self.local_rotation))
    }

    /// World matrix as of the last skeleton update
    pub const fn world_matrix(&self) -> &Matrix4x4 {
        &self.world_matrix
    }

    /// Index of the parent bone, `None` for roots
    pub const fn parent(&self) -> Option<usize> {
        self.parent
    }

    /// Indices of the direct children
    pub fn children(&self) -> &[usize] {
        &self.children
    }

    /// Matrix handed to the skinning shader
    pub fn skin_matrix(&self) -> Matrix4x4 {
        self.world_matrix * self.inverse_bind_matrix
    }

    /// Restore the build-time local transform and drop the procedural offset
    pub fn reset_to_rest(&mut self) {
        self.transform = self.rest;
        self.local_rotation = Quaternion::identity();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::AngleUnit;
    use approx::assert_relative_eq;

    #[test]
    fn test_local_matrix_ignores_scale() {
        let transform = BoneTransform {
            position: Vector3::new(0.0, 1.0, 0.0),
            scale: Vector3::new(3.0, 3.0, 3.0),
            ..BoneTransform::default()
        };
        let bone = Bone::new(0, "hip".into(), transform, Matrix4x4::identity());
        assert_relative_eq!(bone.local_matrix().get_scale(), Vector3::one());
        assert_relative_eq!(bone.local_matrix().get_position(), Vector3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_reset_to_rest() {
        let mut bone = Bone::new(0, "neck".into(), BoneTransform::default(), Matrix4x4::identity());
        bone.transform.position = Vector3::new(1.0, 2.0, 3.0);
        bone.local_rotation = Quaternion::from_euler_xyz(10.0, 0.0, 0.0, AngleUnit::Deg);
        bone.reset_to_rest();
        assert_eq!(bone.transform, BoneTransform::default());
        assert_eq!(bone.local_rotation, Quaternion::identity());
    }
}
