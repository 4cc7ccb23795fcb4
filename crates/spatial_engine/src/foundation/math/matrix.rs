//! Column-major matrices
//!
//! Storage matches what the rasterizer uploads: a 4x4 keeps translation at
//! `raw[12..15]`, a 3x3 (2D affine) keeps it at `raw[6..8]`. Chained builders
//! post-multiply, so `m.translate(t).rotate_quaternion(q)` is `m * T * R`.

use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{AngleUnit, Quaternion, Vector2, Vector3, Vector4};

/// 3x3 matrix for 2D affine transforms
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Matrix3x3 {
    /// Column-major elements
    pub raw: [f32; 9],
}

impl Default for Matrix3x3 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix3x3 {
    /// Identity matrix
    pub const fn identity() -> Self {
        Self {
            raw: [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0],
        }
    }

    /// Wrap column-major elements
    pub const fn from_raw(raw: [f32; 9]) -> Self {
        Self { raw }
    }

    /// Matrix product `a * b`
    pub fn mul(a: &Self, b: &Self) -> Self {
        let mut out = [0.0; 9];
        for c in 0..3 {
            for r in 0..3 {
                out[c * 3 + r] = (0..3).map(|k| a.raw[k * 3 + r] * b.raw[c * 3 + k]).sum();
            }
        }
        Self { raw: out }
    }

    /// Post-multiply by a rotation of `angle`
    pub fn rotate(&self, angle: f32, unit: AngleUnit) -> Self {
        let (s, c) = unit.to_radians(angle).sin_cos();
        let rotation = Self::from_raw([c, s, 0.0, -s, c, 0.0, 0.0, 0.0, 1.0]);
        Self::mul(self, &rotation)
    }

    /// Post-multiply by a translation
    pub fn translate(&self, v: Vector2) -> Self {
        let translation = Self::from_raw([1.0, 0.0, 0.0, 0.0, 1.0, 0.0, v.x, v.y, 1.0]);
        Self::mul(self, &translation)
    }

    /// Post-multiply by a scale
    pub fn scale(&self, v: Vector2) -> Self {
        let mut out = *self;
        for r in 0..3 {
            out.raw[r] *= v.x;
            out.raw[3 + r] *= v.y;
        }
        out
    }

    /// Translation part
    pub const fn get_position(&self) -> Vector2 {
        Vector2::new(self.raw[6], self.raw[7])
    }
}

/// 4x4 matrix, column-major with translation at indices 12 to 14
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Matrix4x4 {
    /// Column-major elements
    pub raw: [f32; 16],
}

impl Default for Matrix4x4 {
    fn default() -> Self {
        Self::identity()
    }
}

impl Matrix4x4 {
    /// Identity matrix
    pub const fn identity() -> Self {
        Self {
            raw: [
                1.0, 0.0, 0.0, 0.0, //
                0.0, 1.0, 0.0, 0.0, //
                0.0, 0.0, 1.0, 0.0, //
                0.0, 0.0, 0.0, 1.0,
            ],
        }
    }

    /// All zeros
    pub const fn zero() -> Self {
        Self { raw: [0.0; 16] }
    }

    /// Wrap column-major elements
    pub const fn from_raw(raw: [f32; 16]) -> Self {
        Self { raw }
    }

    /// Translation-only matrix
    pub fn from_translation(v: Vector3) -> Self {
        Self::identity().translate(v)
    }

    /// `T(translation) * R(rotation) * S(scale)`
    pub fn from_translation_rotation_scale(
        translation: Vector3,
        rotation: Quaternion,
        scale: Vector3,
    ) -> Self {
        Self::identity()
            .translate(translation)
            .rotate_quaternion(rotation)
            .scale(scale)
    }

    /// Matrix product `a * b`
    pub fn multiply(a: &Self, b: &Self) -> Self {
        let mut out = [0.0; 16];
        for c in 0..4 {
            for r in 0..4 {
                out[c * 4 + r] = (0..4).map(|k| a.raw[k * 4 + r] * b.raw[c * 4 + k]).sum();
            }
        }
        Self { raw: out }
    }

    /// Post-multiply by a translation
    pub fn translate(&self, v: Vector3) -> Self {
        let mut out = *self;
        for r in 0..4 {
            out.raw[12 + r] += self.raw[r] * v.x + self.raw[4 + r] * v.y + self.raw[8 + r] * v.z;
        }
        out
    }

    /// Post-multiply by a rotation
    pub fn rotate_quaternion(&self, q: Quaternion) -> Self {
        Self::multiply(self, &q.to_matrix4x4())
    }

    /// Post-multiply by a scale
    pub fn scale(&self, v: Vector3) -> Self {
        let mut out = *self;
        for r in 0..4 {
            out.raw[r] *= v.x;
            out.raw[4 + r] *= v.y;
            out.raw[8 + r] *= v.z;
        }
        out
    }

    /// `self * v`
    pub fn multiply_vector(&self, v: Vector4) -> Vector4 {
        let m = &self.raw;
        Vector4::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12] * v.w,
            m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13] * v.w,
            m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14] * v.w,
            m[3] * v.x + m[7] * v.y + m[11] * v.z + m[15] * v.w,
        )
    }

    /// Transform a point (w = 1), affine matrices only
    pub fn transform_point(&self, p: Vector3) -> Vector3 {
        self.multiply_vector(p.to_vector4(1.0)).to_vector3()
    }

    /// Transform a direction (w = 0), ignores translation
    pub fn transform_direction(&self, d: Vector3) -> Vector3 {
        self.multiply_vector(d.to_vector4(0.0)).to_vector3()
    }

    /// Swap rows and columns
    pub fn transpose(&self) -> Self {
        let mut out = [0.0; 16];
        for c in 0..4 {
            for r in 0..4 {
                out[r * 4 + c] = self.raw[c * 4 + r];
            }
        }
        Self { raw: out }
    }

    /// Inverse, `None` when the matrix is singular
    pub fn invert(&self) -> Option<Self> {
        nalgebra::Matrix4::from_column_slice(&self.raw)
            .try_inverse()
            .map(Self::from)
    }

    /// OpenGL-style perspective projection, `far` may be infinite
    pub fn perspective(fov_y: f32, aspect: f32, near: f32, far: f32) -> Self {
        let f = 1.0 / (fov_y / 2.0).tan();
        let mut out = Self::zero();
        out.raw[0] = f / aspect;
        out.raw[5] = f;
        out.raw[11] = -1.0;
        if far.is_finite() {
            let nf = 1.0 / (near - far);
            out.raw[10] = (far + near) * nf;
            out.raw[14] = 2.0 * far * near * nf;
        } else {
            out.raw[10] = -1.0;
            out.raw[14] = -2.0 * near;
        }
        out
    }

    /// Model matrix at `eye` whose -Z axis faces `target`
    ///
    /// Returns the identity when eye and target coincide.
    pub fn target_to(eye: Vector3, target: Vector3, up: Vector3) -> Self {
        let offset = eye - target;
        if offset.magnitude() < 1e-6 {
            return Self::identity();
        }

        let z_axis = offset.normalize();
        let mut x_axis = up.cross(z_axis).normalize();
        if x_axis == Vector3::zero() {
            let fallback = if z_axis.x.abs() < 0.999 {
                Vector3::right()
            } else {
                Vector3::new(0.0, 0.0, 1.0)
            };
            x_axis = fallback.cross(z_axis).normalize();
        }
        let y_axis = z_axis.cross(x_axis);

        Self::from_raw([
            x_axis.x, x_axis.y, x_axis.z, 0.0, //
            y_axis.x, y_axis.y, y_axis.z, 0.0, //
            z_axis.x, z_axis.y, z_axis.z, 0.0, //
            eye.x, eye.y, eye.z, 1.0,
        ])
    }

    /// Translation part
    pub const fn get_position(&self) -> Vector3 {
        Vector3::new(self.raw[12], self.raw[13], self.raw[14])
    }

    /// Length of each basis column
    pub fn get_scale(&self) -> Vector3 {
        Vector3::new(
            self.column(0).magnitude(),
            self.column(1).magnitude(),
            self.column(2).magnitude(),
        )
    }

    /// Rotation part, identity when any axis has zero scale
    pub fn get_rotation(&self) -> Quaternion {
        let scale = self.get_scale();
        if scale.x == 0.0 || scale.y == 0.0 || scale.z == 0.0 {
            return Quaternion::identity();
        }
        Quaternion::from_rotation_columns(
            self.column(0) / scale.x,
            self.column(1) / scale.y,
            self.column(2) / scale.z,
        )
    }

    fn column(&self, i: usize) -> Vector3 {
        Vector3::new(self.raw[i * 4], self.raw[i * 4 + 1], self.raw[i * 4 + 2])
    }
}

impl Mul for Matrix4x4 {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::multiply(&self, &rhs)
    }
}

impl Mul<Vector4> for Matrix4x4 {
    type Output = Vector4;

    fn mul(self, rhs: Vector4) -> Vector4 {
        self.multiply_vector(rhs)
    }
}
