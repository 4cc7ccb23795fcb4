//! Skin description handed over by the asset loader

use serde::{Deserialize, Serialize};

use crate::foundation::math::{Matrix4x4, Quaternion, Vector3};

/// One joint of a skin, as read from the asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoneDescription {
    /// Unique identifier (glTF node index)
    pub id: u32,
    /// Bone name
    pub name: String,
    /// Identifiers of the direct children
    pub children: Vec<u32>,
    /// Local translation
    pub position: Vector3,
    /// Local rotation
    pub rotation: Quaternion,
    /// Local scale
    pub scale: Vector3,
    /// Inverse bind matrix
    pub inverse_bind_matrix: Matrix4x4,
}

impl Default for BoneDescription {
    fn default() -> Self {
        Self {
            id: 0,
            name: String::new(),
            children: Vec::new(),
            position: Vector3::zero(),
            rotation: Quaternion::identity(),
            scale: Vector3::one(),
            inverse_bind_matrix: Matrix4x4::identity(),
        }
    }
}

impl BoneDescription {
    /// Bone with an id and name, everything else at rest defaults
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            ..Self::default()
        }
    }

    /// Builder: set child ids
    #[must_use]
    pub fn with_children(mut self, children: &[u32]) -> Self {
        self.children = children.to_vec();
        self
    }

    /// Builder: set the local translation
    #[must_use]
    pub const fn with_position(mut self, position: Vector3) -> Self {
        self.position = position;
        self
    }

    /// Builder: set the local rotation
    #[must_use]
    pub const fn with_rotation(mut self, rotation: Quaternion) -> Self {
        self.rotation = rotation;
        self
    }
}

/// Ordered list of joints; the order defines the skin matrix order
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SkinDescription {
    /// Joints in skin order
    pub bones: Vec<BoneDescription>,
}

/// Structural problems found while building a skeleton
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SkeletonError {
    /// The skin has no bones
    #[error("skin has no bones")]
    Empty,

    /// Two bones share an id
    #[error("duplicate bone id {0}")]
    DuplicateId(u32),

    /// A bone lists a child id that is not in the skin
    #[error("bone {parent} lists unknown child {child}")]
    UnknownChild {
        /// Bone listing the child
        parent: u32,
        /// Missing child id
        child: u32,
    },

    /// A bone is listed as a child more than once
    #[error("bone {0} has more than one parent")]
    MultipleParents(u32),

    /// Every bone has a parent
    #[error("skin has no root bone")]
    NoRoot,

    /// A bone cannot be reached from any root (part of a cycle)
    #[error("bone {0} is not reachable from any root")]
    Unreachable(u32),
}
