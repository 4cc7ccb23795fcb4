//! Math utilities and types
//!
//! Small `Copy` value types for vectors, quaternions and matrices with the
//! memory layout the rasterizer expects. Conversions to and from `nalgebra`
//! are provided for anything heavier (decompositions, inversion).

mod interop;
mod matrix;
mod quaternion;
mod vector;

pub use matrix::{Matrix3x3, Matrix4x4};
pub use quaternion::Quaternion;
pub use vector::{Vector2, Vector3, Vector4};

use serde::{Deserialize, Serialize};

/// Unit of an angle argument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AngleUnit {
    /// Degrees
    #[default]
    Deg,
    /// Radians
    Rad,
}

impl AngleUnit {
    /// Convert `value` expressed in this unit to radians
    pub fn to_radians(self, value: f32) -> f32 {
        match self {
            Self::Deg => utils::deg_to_rad(value),
            Self::Rad => value,
        }
    }
}

/// Scalar helpers
pub mod utils {
    /// Degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * std::f32::consts::PI / 180.0
    }

    /// Radians to degrees
    pub fn rad_to_deg(radians: f32) -> f32 {
        radians * 180.0 / std::f32::consts::PI
    }

    /// Linear interpolation, `t` is not clamped
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Clamp `value` into `[min, max]`
    pub fn clamp(value: f32, min: f32, max: f32) -> f32 {
        value.max(min).min(max)
    }

    /// Map `value` from `[in_min, in_max]` onto `[out_min, out_max]`
    ///
    /// A zero-width input range maps everything to `out_min`.
    pub fn remap(value: f32, in_min: f32, in_max: f32, out_min: f32, out_max: f32) -> f32 {
        let span = in_max - in_min;
        if span == 0.0 {
            return out_min;
        }
        out_min + (value - in_min) / span * (out_max - out_min)
    }
}

/// Implements `approx` comparisons component-wise over the listed fields.
macro_rules! impl_approx {
    ($ty:ty, |$a:ident, $b:ident| $fields:expr) => {
        impl approx::AbsDiffEq for $ty {
            type Epsilon = f32;

            fn default_epsilon() -> f32 {
                f32::EPSILON
            }

            fn abs_diff_eq(&self, other: &Self, epsilon: f32) -> bool {
                let ($a, $b) = (self, other);
                $fields
                    .iter()
                    .all(|(l, r): &(f32, f32)| approx::AbsDiffEq::abs_diff_eq(l, r, epsilon))
            }
        }

        impl approx::RelativeEq for $ty {
            fn default_max_relative() -> f32 {
                f32::EPSILON
            }

            fn relative_eq(&self, other: &Self, epsilon: f32, max_relative: f32) -> bool {
                let ($a, $b) = (self, other);
                $fields
                    .iter()
                    .all(|(l, r): &(f32, f32)| {
                        approx::RelativeEq::relative_eq(l, r, epsilon, max_relative)
                    })
            }
        }
    };
}

impl_approx!(Vector2, |a, b| [(a.x, b.x), (a.y, b.y)]);
impl_approx!(Vector3, |a, b| [(a.x, b.x), (a.y, b.y), (a.z, b.z)]);
impl_approx!(Vector4, |a, b| [(a.x, b.x), (a.y, b.y), (a.z, b.z), (a.w, b.w)]);
impl_approx!(Quaternion, |a, b| [(a.x, b.x), (a.y, b.y), (a.z, b.z), (a.w, b.w)]);
impl_approx!(Matrix3x3, |a, b| {
    let pairs: [(f32, f32); 9] = std::array::from_fn(|i| (a.raw[i], b.raw[i]));
    pairs
});
impl_approx!(Matrix4x4, |a, b| {
    let pairs: [(f32, f32); 16] = std::array::from_fn(|i| (a.raw[i], b.raw[i]));
    pairs
});
