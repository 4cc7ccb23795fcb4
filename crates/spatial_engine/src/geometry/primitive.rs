//! Transform shared by all geometric shapes

use std::fmt;
use std::rc::Rc;

use crate::foundation::math::{Matrix4x4, Quaternion, Vector3};

/// Where a primitive's parent matrix comes from
#[derive(Clone, Default)]
pub enum ParentTransform {
    /// No parent, local space is world space
    #[default]
    None,
    /// Fixed parent matrix
    Static(Matrix4x4),
    /// Resolved on every [`ParentTransform::resolve`] call
    Dynamic(Rc<dyn Fn() -> Matrix4x4>),
}

impl ParentTransform {
    /// Wrap a resolver closure
    pub fn dynamic(resolver: impl Fn() -> Matrix4x4 + 'static) -> Self {
        Self::Dynamic(Rc::new(resolver))
    }

    /// Current parent matrix, `None` without a parent
    pub fn resolve(&self) -> Option<Matrix4x4> {
        match self {
            Self::None => None,
            Self::Static(matrix) => Some(*matrix),
            Self::Dynamic(resolver) => Some(resolver()),
        }
    }

    /// True unless [`ParentTransform::None`]
    pub const fn is_some(&self) -> bool {
        !matches!(self, Self::None)
    }
}

impl fmt::Debug for ParentTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::None => f.write_str("None"),
            Self::Static(matrix) => f.debug_tuple("Static").field(matrix).finish(),
            Self::Dynamic(_) => f.write_str("Dynamic(..)"),
        }
    }
}

impl From<Matrix4x4> for ParentTransform {
    fn from(matrix: Matrix4x4) -> Self {
        Self::Static(matrix)
    }
}

/// Local transform plus the derived local-to-world matrix
///
/// `matrix` is only refreshed by [`Primitive::calculate_matrix`]; editing the
/// fields does not mark anything dirty.
#[derive(Debug, Clone)]
pub struct Primitive {
    /// Local position
    pub position: Vector3,
    /// Local rotation
    pub rotation: Quaternion,
    /// Local scale
    pub scale: Vector3,
    /// Local-to-world matrix as of the last `calculate_matrix`
    pub matrix: Matrix4x4,
    /// Parent link
    pub parent: ParentTransform,
}

impl Default for Primitive {
    fn default() -> Self {
        Self {
            position: Vector3::zero(),
            rotation: Quaternion::identity(),
            scale: Vector3::one(),
            matrix: Matrix4x4::identity(),
            parent: ParentTransform::None,
        }
    }
}

impl Primitive {
    /// Primitive at `position` with identity rotation and unit scale
    pub fn new(position: Vector3) -> Self {
        let mut primitive = Self {
            position,
            ..Self::default()
        };
        primitive.calculate_matrix();
        primitive
    }

    /// Builder: attach a parent
    #[must_use]
    pub fn with_parent(mut self, parent: ParentTransform) -> Self {
        self.parent = parent;
        self.calculate_matrix();
        self
    }

    /// Recompute `matrix = parent * T * R * S`
    pub fn calculate_matrix(&mut self) {
        let local =
            Matrix4x4::from_translation_rotation_scale(self.position, self.rotation, self.scale);
        self.matrix = match self.parent.resolve() {
            Some(parent) => parent * local,
            None => local,
        };
    }

    /// Local position carried through the parent matrix
    pub fn world_position(&self) -> Vector3 {
        self.parent
            .resolve()
            .map_or(self.position, |parent| parent.transform_point(self.position))
    }

    /// Local rotation composed with the parent's rotation
    pub fn world_rotation(&self) -> Quaternion {
        self.parent.resolve().map_or(self.rotation, |parent| {
            parent.rotate_quaternion(self.rotation).get_rotation()
        })
    }
}
