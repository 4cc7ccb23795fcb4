//! Fixed-size vector types
//!
//! Value semantics by default: `add`, `sub`, `scale` return new values.
//! The `*_mut` variants update in place and are meant for per-point hot loops.

use std::ops::{Add, AddAssign, Div, Mul, Neg, Sub, SubAssign};

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::utils;
use super::Matrix4x4;

/// 2D vector
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vector2 {
    /// Create a vector from components
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Component-wise sum
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y)
    }

    /// Component-wise difference
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y)
    }

    /// Uniform scale
    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s)
    }

    /// Euclidean length
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector in the same direction, zero for a zero-length input
    pub fn normalize(self) -> Self {
        let length = self.magnitude();
        if length == 0.0 {
            return Self::zero();
        }
        Self::new(self.x / length, self.y / length)
    }

    /// Interpret components as degrees and convert to radians
    pub fn to_rad(self) -> Self {
        Self::new(utils::deg_to_rad(self.x), utils::deg_to_rad(self.y))
    }

    /// Interpret components as radians and convert to degrees
    pub fn to_deg(self) -> Self {
        Self::new(utils::rad_to_deg(self.x), utils::rad_to_deg(self.y))
    }

    /// Linear interpolation between `a` and `b`
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self::new(utils::lerp(a.x, b.x, t), utils::lerp(a.y, b.y, t))
    }

    /// Split a flat buffer into vectors, ignoring a trailing partial element
    pub fn list_from_slice(values: &[f32]) -> Vec<Self> {
        values
            .chunks_exact(2)
            .map(|c| Self::new(c[0], c[1]))
            .collect()
    }
}

/// 3D vector
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector3 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
}

impl Vector3 {
    /// Create a vector from components
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// (0, 0, 0)
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// (1, 1, 1)
    pub const fn one() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }

    /// (0, 0, -1), the forward axis of cameras and controller poses
    pub const fn forward() -> Self {
        Self::new(0.0, 0.0, -1.0)
    }

    /// (1, 0, 0)
    pub const fn right() -> Self {
        Self::new(1.0, 0.0, 0.0)
    }

    /// (0, 1, 0)
    pub const fn up() -> Self {
        Self::new(0.0, 1.0, 0.0)
    }

    /// Overwrite all components from another vector
    pub fn set(&mut self, other: Self) {
        *self = other;
    }

    /// Negated copy
    pub fn invert(self) -> Self {
        Self::new(-self.x, -self.y, -self.z)
    }

    /// Uniform scale
    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s)
    }

    /// Uniform scale in place
    pub fn scale_mut(&mut self, s: f32) -> &mut Self {
        self.x *= s;
        self.y *= s;
        self.z *= s;
        self
    }

    /// Divide every component by `s`
    pub fn div_scalar(self, s: f32) -> Self {
        Self::new(self.x / s, self.y / s, self.z / s)
    }

    /// Component-wise sum
    pub fn add(self, other: Self) -> Self {
        Self::new(self.x + other.x, self.y + other.y, self.z + other.z)
    }

    /// Component-wise sum in place
    pub fn add_mut(&mut self, other: Self) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self.z += other.z;
        self
    }

    /// Component-wise difference
    pub fn sub(self, other: Self) -> Self {
        Self::new(self.x - other.x, self.y - other.y, self.z - other.z)
    }

    /// Component-wise difference in place
    pub fn sub_mut(&mut self, other: Self) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self.z -= other.z;
        self
    }

    /// Component-wise product
    pub fn component_mul(self, other: Self) -> Self {
        Self::new(self.x * other.x, self.y * other.y, self.z * other.z)
    }

    /// Cross product (right-handed)
    pub fn cross(self, other: Self) -> Self {
        Self::new(
            self.y * other.z - self.z * other.y,
            self.z * other.x - self.x * other.z,
            self.x * other.y - self.y * other.x,
        )
    }

    /// Dot product
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y + self.z * other.z
    }

    /// Euclidean length
    pub fn magnitude(self) -> f32 {
        self.square_magnitude().sqrt()
    }

    /// Squared length, avoids the square root
    pub fn square_magnitude(self) -> f32 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Unit vector in the same direction, zero for a zero-length input
    pub fn normalize(self) -> Self {
        let length = self.magnitude();
        if length == 0.0 {
            return Self::zero();
        }
        self.div_scalar(length)
    }

    /// Distance between two points
    pub fn distance_to(self, to: Self) -> f32 {
        self.sub(to).magnitude()
    }

    /// Distance between two points
    pub fn distance(from: Self, to: Self) -> f32 {
        from.distance_to(to)
    }

    /// Unit direction pointing from `from` to `to`
    pub fn direction(from: Self, to: Self) -> Self {
        to.sub(from).normalize()
    }

    /// Interpret components as degrees and convert to radians
    pub fn to_rad(self) -> Self {
        Self::new(
            utils::deg_to_rad(self.x),
            utils::deg_to_rad(self.y),
            utils::deg_to_rad(self.z),
        )
    }

    /// Interpret components as radians and convert to degrees
    pub fn to_deg(self) -> Self {
        Self::new(
            utils::rad_to_deg(self.x),
            utils::rad_to_deg(self.y),
            utils::rad_to_deg(self.z),
        )
    }

    /// Extend with a `w` component (1.0 for points, 0.0 for directions)
    pub const fn to_vector4(self, w: f32) -> Vector4 {
        Vector4::new(self.x, self.y, self.z, w)
    }

    /// Linear interpolation between `a` and `b`
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self::new(
            utils::lerp(a.x, b.x, t),
            utils::lerp(a.y, b.y, t),
            utils::lerp(a.z, b.z, t),
        )
    }

    /// Components as an array
    pub const fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Split a flat buffer into vectors, ignoring a trailing partial element
    pub fn list_from_slice(values: &[f32]) -> Vec<Self> {
        values
            .chunks_exact(3)
            .map(|c| Self::new(c[0], c[1], c[2]))
            .collect()
    }

    /// True when every component is finite
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(v: [f32; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

impl Add for Vector3 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::add(self, rhs)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Self) {
        self.add_mut(rhs);
    }
}

impl Sub for Vector3 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::sub(self, rhs)
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Self) {
        self.sub_mut(rhs);
    }
}

impl Mul<f32> for Vector3 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        self.scale(rhs)
    }
}

impl Div<f32> for Vector3 {
    type Output = Self;

    fn div(self, rhs: f32) -> Self {
        self.div_scalar(rhs)
    }
}

impl Neg for Vector3 {
    type Output = Self;

    fn neg(self) -> Self {
        self.invert()
    }
}

/// 4D vector, mostly homogeneous coordinates
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Vector4 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W component
    pub w: f32,
}

impl Vector4 {
    /// Create a vector from components
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Uniform scale
    pub fn scale(self, s: f32) -> Self {
        Self::new(self.x * s, self.y * s, self.z * s, self.w * s)
    }

    /// Component-wise sum
    pub fn add(self, other: Self) -> Self {
        Self::new(
            self.x + other.x,
            self.y + other.y,
            self.z + other.z,
            self.w + other.w,
        )
    }

    /// Component-wise difference
    pub fn sub(self, other: Self) -> Self {
        Self::new(
            self.x - other.x,
            self.y - other.y,
            self.z - other.z,
            self.w - other.w,
        )
    }

    /// Euclidean length
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Unit vector in the same direction, zero for a zero-length input
    pub fn normalize(self) -> Self {
        let length = self.magnitude();
        if length == 0.0 {
            return Self::default();
        }
        self.scale(1.0 / length)
    }

    /// Interpret components as degrees and convert to radians
    pub fn to_rad(self) -> Self {
        Self::new(
            utils::deg_to_rad(self.x),
            utils::deg_to_rad(self.y),
            utils::deg_to_rad(self.z),
            utils::deg_to_rad(self.w),
        )
    }

    /// Interpret components as radians and convert to degrees
    pub fn to_deg(self) -> Self {
        Self::new(
            utils::rad_to_deg(self.x),
            utils::rad_to_deg(self.y),
            utils::rad_to_deg(self.z),
            utils::rad_to_deg(self.w),
        )
    }

    /// Drop the `w` component
    pub const fn to_vector3(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// Transform by a matrix (`m * v`)
    pub fn multiply_matrix(self, m: &Matrix4x4) -> Self {
        m.multiply_vector(self)
    }

    /// Linear interpolation between `a` and `b`
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        Self::new(
            utils::lerp(a.x, b.x, t),
            utils::lerp(a.y, b.y, t),
            utils::lerp(a.z, b.z, t),
            utils::lerp(a.w, b.w, t),
        )
    }

    /// Split a flat buffer into vectors, ignoring a trailing partial element
    pub fn list_from_slice(values: &[f32]) -> Vec<Self> {
        values
            .chunks_exact(4)
            .map(|c| Self::new(c[0], c[1], c[2], c[3]))
            .collect()
    }
}
