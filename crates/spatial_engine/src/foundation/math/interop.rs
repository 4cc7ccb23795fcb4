//! Conversions to and from `nalgebra`

use super::{Matrix4x4, Quaternion, Vector3, Vector4};

impl From<nalgebra::Vector3<f32>> for Vector3 {
    fn from(v: nalgebra::Vector3<f32>) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<Vector3> for nalgebra::Vector3<f32> {
    fn from(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z)
    }
}

impl From<nalgebra::Vector4<f32>> for Vector4 {
    fn from(v: nalgebra::Vector4<f32>) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<Vector4> for nalgebra::Vector4<f32> {
    fn from(v: Vector4) -> Self {
        Self::new(v.x, v.y, v.z, v.w)
    }
}

impl From<nalgebra::Matrix4<f32>> for Matrix4x4 {
    fn from(m: nalgebra::Matrix4<f32>) -> Self {
        let mut raw = [0.0; 16];
        raw.copy_from_slice(m.as_slice());
        Self::from_raw(raw)
    }
}

impl From<Matrix4x4> for nalgebra::Matrix4<f32> {
    fn from(m: Matrix4x4) -> Self {
        Self::from_column_slice(&m.raw)
    }
}

impl From<nalgebra::UnitQuaternion<f32>> for Quaternion {
    fn from(q: nalgebra::UnitQuaternion<f32>) -> Self {
        let c = q.into_inner().coords;
        Self::new(c.x, c.y, c.z, c.w)
    }
}

impl From<Quaternion> for nalgebra::UnitQuaternion<f32> {
    fn from(q: Quaternion) -> Self {
        Self::from_quaternion(nalgebra::Quaternion::new(q.w, q.x, q.y, q.z))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::AngleUnit;
    use approx::assert_relative_eq;

    #[test]
    fn test_quaternion_agrees_with_nalgebra() {
        let q = Quaternion::from_euler_xyz(20.0, 35.0, -50.0, AngleUnit::Deg);
        let unit: nalgebra::UnitQuaternion<f32> = q.into();
        let v = Vector3::new(1.0, 2.0, 3.0);

        let ours = q.rotate_vector(v);
        let theirs: Vector3 = (unit * nalgebra::Vector3::from(v)).into();
        assert_relative_eq!(ours, theirs, epsilon = 1e-5);
        assert_relative_eq!(Quaternion::from(unit), q, epsilon = 1e-6);
    }

    #[test]
    fn test_matrix_layout_matches_nalgebra() {
        let m = Matrix4x4::from_translation(Vector3::new(1.0, 2.0, 3.0));
        let n: nalgebra::Matrix4<f32> = m.into();
        assert_relative_eq!(n[(0, 3)], 1.0);
        assert_relative_eq!(n[(2, 3)], 3.0);
        assert_eq!(Matrix4x4::from(n), m);
    }
}
