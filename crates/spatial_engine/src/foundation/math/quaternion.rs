//! Rotation quaternion

use std::ops::Mul;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

use super::{utils, AngleUnit, Matrix4x4, Vector3};

/// Rotation stored as `(x, y, z, w)`
///
/// `a.mul(b)` is the Hamilton product: applying the result to a vector rotates
/// it by `b` first, then by `a`.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Pod, Zeroable)]
pub struct Quaternion {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
    /// Z component
    pub z: f32,
    /// W (scalar) component
    pub w: f32,
}

impl Default for Quaternion {
    fn default() -> Self {
        Self::identity()
    }
}

impl Quaternion {
    /// Create a quaternion from raw components
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// No rotation
    pub const fn identity() -> Self {
        Self::new(0.0, 0.0, 0.0, 1.0)
    }

    /// Euclidean norm of the four components
    pub fn magnitude(self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z + self.w * self.w).sqrt()
    }

    /// Unit quaternion, identity for a zero-length input
    pub fn normalize(self) -> Self {
        let length = self.magnitude();
        if length == 0.0 {
            return Self::identity();
        }
        Self::new(
            self.x / length,
            self.y / length,
            self.z / length,
            self.w / length,
        )
    }

    /// Hamilton product `self * other`
    pub fn mul(self, other: Self) -> Self {
        let (ax, ay, az, aw) = (self.x, self.y, self.z, self.w);
        let (bx, by, bz, bw) = (other.x, other.y, other.z, other.w);
        Self::new(
            ax * bw + aw * bx + ay * bz - az * by,
            ay * bw + aw * by + az * bx - ax * bz,
            az * bw + aw * bz + ax * by - ay * bx,
            aw * bw - ax * bx - ay * by - az * bz,
        )
    }

    /// Hamilton product in place
    pub fn mul_mut(&mut self, other: Self) -> &mut Self {
        *self = Self::mul(*self, other);
        self
    }

    /// Conjugate, the inverse of a unit quaternion
    pub const fn invert(self) -> Self {
        Self::new(-self.x, -self.y, -self.z, self.w)
    }

    /// Rotation from Euler angles stored in a vector
    pub fn from_euler(angles: Vector3, unit: AngleUnit) -> Self {
        Self::from_euler_xyz(angles.x, angles.y, angles.z, unit)
    }

    /// Rotation applying X first, then Y, then Z
    pub fn from_euler_xyz(x: f32, y: f32, z: f32, unit: AngleUnit) -> Self {
        let (sx, cx) = (unit.to_radians(x) * 0.5).sin_cos();
        let (sy, cy) = (unit.to_radians(y) * 0.5).sin_cos();
        let (sz, cz) = (unit.to_radians(z) * 0.5).sin_cos();

        Self::new(
            sx * cy * cz - cx * sy * sz,
            cx * sy * cz + sx * cy * sz,
            cx * cy * sz - sx * sy * cz,
            cx * cy * cz + sx * sy * sz,
        )
    }

    /// Euler angles in radians, inverse of [`Quaternion::from_euler_xyz`]
    ///
    /// The Y angle is clamped to ±90° at the poles.
    pub fn to_euler(self) -> Vector3 {
        let Self { x, y, z, w } = self;

        let roll = (2.0 * (w * x + y * z)).atan2(1.0 - 2.0 * (x * x + y * y));

        let sin_pitch = 2.0 * (w * y - z * x);
        let pitch = if sin_pitch.abs() >= 1.0 {
            std::f32::consts::FRAC_PI_2.copysign(sin_pitch)
        } else {
            sin_pitch.asin()
        };

        let yaw = (2.0 * (w * z + x * y)).atan2(1.0 - 2.0 * (y * y + z * z));

        Vector3::new(roll, pitch, yaw)
    }

    /// Apply an additional X, Y, Z Euler rotation on top of this one
    pub fn rotate_euler_xyz_mut(&mut self, x: f32, y: f32, z: f32, unit: AngleUnit) -> &mut Self {
        let delta = Self::from_euler_xyz(x, y, z, unit);
        *self = self.mul(delta);
        self
    }

    /// Rotation of `angle` radians around `axis`
    ///
    /// A zero axis yields the identity.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let axis = axis.normalize();
        if axis == Vector3::zero() {
            return Self::identity();
        }
        let (s, c) = (angle * 0.5).sin_cos();
        Self::new(axis.x * s, axis.y * s, axis.z * s, c)
    }

    /// Shortest rotation taking direction `from` onto direction `to`
    pub fn from_two_vectors(from: Vector3, to: Vector3) -> Self {
        let from = from.normalize();
        let to = to.normalize();
        if from == Vector3::zero() || to == Vector3::zero() {
            return Self::identity();
        }

        let dot = from.dot(to);
        if dot < -1.0 + 1e-6 {
            // Opposite: any perpendicular axis works
            let mut axis = Vector3::right().cross(from);
            if axis.square_magnitude() < 1e-6 {
                axis = Vector3::up().cross(from);
            }
            return Self::from_axis_angle(axis, std::f32::consts::PI);
        }

        let axis = from.cross(to);
        Self::new(axis.x, axis.y, axis.z, 1.0 + dot).normalize()
    }

    /// Orientation whose forward (-Z) axis looks along `direction`
    pub fn from_direction(direction: Vector3, up: Vector3) -> Self {
        let z_axis = direction.normalize().invert();
        if z_axis == Vector3::zero() {
            return Self::identity();
        }

        let mut x_axis = up.cross(z_axis).normalize();
        if x_axis == Vector3::zero() {
            let fallback = if z_axis.y.abs() < 0.999 {
                Vector3::up()
            } else {
                Vector3::right()
            };
            x_axis = fallback.cross(z_axis).normalize();
        }
        let y_axis = z_axis.cross(x_axis);

        let basis = Matrix4x4::from_raw([
            x_axis.x, x_axis.y, x_axis.z, 0.0, //
            y_axis.x, y_axis.y, y_axis.z, 0.0, //
            z_axis.x, z_axis.y, z_axis.z, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ]);
        Self::from_matrix(&basis)
    }

    /// Rotation turning `forward` to the -Z axis of a frame oriented by `up`
    ///
    /// Opposite directions rotate half a turn around `up`; aligned directions
    /// give the identity.
    pub fn target_to(forward: Vector3, up: Vector3) -> Self {
        let target = forward.normalize();
        if target == Vector3::zero() {
            return Self::identity();
        }

        let dot = Vector3::forward().dot(target);
        if (dot + 1.0).abs() < 1e-6 {
            return Self::from_axis_angle(up, std::f32::consts::PI);
        }
        if (dot - 1.0).abs() < 1e-6 {
            return Self::identity();
        }

        Self::from_direction(target, up)
    }

    /// Rotation part of a matrix without shear
    pub fn from_matrix(m: &Matrix4x4) -> Self {
        let r = &m.raw;
        Self::from_rotation_columns(
            Vector3::new(r[0], r[1], r[2]),
            Vector3::new(r[4], r[5], r[6]),
            Vector3::new(r[8], r[9], r[10]),
        )
    }

    /// Trace / largest-diagonal decomposition of an orthonormal basis
    pub(crate) fn from_rotation_columns(c0: Vector3, c1: Vector3, c2: Vector3) -> Self {
        // sm_ij: column i, row j
        let (sm11, sm12, sm13) = (c0.x, c0.y, c0.z);
        let (sm21, sm22, sm23) = (c1.x, c1.y, c1.z);
        let (sm31, sm32, sm33) = (c2.x, c2.y, c2.z);

        let trace = sm11 + sm22 + sm33;
        let q = if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new((sm23 - sm32) / s, (sm31 - sm13) / s, (sm12 - sm21) / s, 0.25 * s)
        } else if sm11 > sm22 && sm11 > sm33 {
            let s = (1.0 + sm11 - sm22 - sm33).sqrt() * 2.0;
            Self::new(0.25 * s, (sm12 + sm21) / s, (sm31 + sm13) / s, (sm23 - sm32) / s)
        } else if sm22 > sm33 {
            let s = (1.0 + sm22 - sm11 - sm33).sqrt() * 2.0;
            Self::new((sm12 + sm21) / s, 0.25 * s, (sm23 + sm32) / s, (sm31 - sm13) / s)
        } else {
            let s = (1.0 + sm33 - sm11 - sm22).sqrt() * 2.0;
            Self::new((sm31 + sm13) / s, (sm23 + sm32) / s, 0.25 * s, (sm12 - sm21) / s)
        };
        q.normalize()
    }

    /// Rotation matrix (column-major, no translation)
    pub fn to_matrix4x4(self) -> Matrix4x4 {
        let Self { x, y, z, w } = self;
        let (x2, y2, z2) = (x + x, y + y, z + z);
        let (xx, yx, yy) = (x * x2, y * x2, y * y2);
        let (zx, zy, zz) = (z * x2, z * y2, z * z2);
        let (wx, wy, wz) = (w * x2, w * y2, w * z2);

        Matrix4x4::from_raw([
            1.0 - yy - zz,
            yx + wz,
            zx - wy,
            0.0,
            yx - wz,
            1.0 - xx - zz,
            zy + wx,
            0.0,
            zx + wy,
            zy - wx,
            1.0 - xx - yy,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Rotate a vector
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        let u = Vector3::new(self.x, self.y, self.z);
        let uv = u.cross(v);
        let uuv = u.cross(uv);
        v + (uv * self.w + uuv) * 2.0
    }

    /// Component-wise interpolation, `t` clamped to `[0, 1]`, normalised result
    pub fn lerp(a: Self, b: Self, t: f32) -> Self {
        let t = utils::clamp(t, 0.0, 1.0);
        Self::new(
            utils::lerp(a.x, b.x, t),
            utils::lerp(a.y, b.y, t),
            utils::lerp(a.z, b.z, t),
            utils::lerp(a.w, b.w, t),
        )
        .normalize()
    }

    /// Spherical interpolation along the shorter arc
    pub fn slerp(a: Self, b: Self, t: f32) -> Self {
        let t = utils::clamp(t, 0.0, 1.0);
        let mut b = b;
        let mut cos = a.x * b.x + a.y * b.y + a.z * b.z + a.w * b.w;
        if cos < 0.0 {
            cos = -cos;
            b = Self::new(-b.x, -b.y, -b.z, -b.w);
        }

        let (ka, kb) = if 1.0 - cos > 1e-6 {
            let omega = cos.acos();
            let sin = omega.sin();
            (((1.0 - t) * omega).sin() / sin, (t * omega).sin() / sin)
        } else {
            (1.0 - t, t)
        };

        Self::new(
            a.x * ka + b.x * kb,
            a.y * ka + b.y * kb,
            a.z * ka + b.z * kb,
            a.w * ka + b.w * kb,
        )
        .normalize()
    }
}

impl Mul for Quaternion {
    type Output = Self;

    fn mul(self, rhs: Self) -> Self {
        Self::mul(self, rhs)
    }
}
