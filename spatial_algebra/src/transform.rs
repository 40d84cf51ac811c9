use crate::{
    Real,
    rotation::{rotation_from_axis_angle, rotation_from_rpy},
};
use nalgebra::{Matrix3, Matrix4, Vector3};
use std::ops::Mul;

/// Homogeneous transform.
///
/// A `Transform` named `a_from_b` holds the pose of frame B in frame A:
/// `rotation` maps B coordinates into A coordinates and `translation` is the
/// origin of B expressed in A. Composition reads like matrix multiplication,
/// `a_from_c = a_from_b * b_from_c`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform<T: Real> {
    pub rotation: Matrix3<T>,
    pub translation: Vector3<T>,
}

impl<T: Real> Default for Transform<T> {
    fn default() -> Self {
        Self::identity()
    }
}

impl<T: Real> Transform<T> {
    pub fn new(rotation: Matrix3<T>, translation: Vector3<T>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn identity() -> Self {
        Self::new(Matrix3::identity(), Vector3::zeros())
    }

    pub fn from_translation(translation: Vector3<T>) -> Self {
        Self::new(Matrix3::identity(), translation)
    }

    pub fn from_rotation(rotation: Matrix3<T>) -> Self {
        Self::new(rotation, Vector3::zeros())
    }

    pub fn from_axis_angle(axis: &Vector3<T>, angle: T) -> Self {
        Self::from_rotation(rotation_from_axis_angle(axis, angle))
    }

    /// URDF style origin: translate by `xyz`, then rotate by fixed-axis `rpy`.
    pub fn from_xyz_rpy(xyz: &Vector3<T>, rpy: &Vector3<T>) -> Self {
        Self::new(rotation_from_rpy(rpy), *xyz)
    }

    /// Reads the upper 3x4 block of a 4x4 homogeneous matrix.
    pub fn from_matrix(m: &Matrix4<T>) -> Self {
        Self::new(
            m.fixed_view::<3, 3>(0, 0).into_owned(),
            m.fixed_view::<3, 1>(0, 3).into_owned(),
        )
    }

    pub fn matrix(&self) -> Matrix4<T> {
        let mut m = Matrix4::identity();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&self.rotation);
        m.fixed_view_mut::<3, 1>(0, 3).copy_from(&self.translation);
        m
    }

    /// Closed form inverse, `b_from_a` from `a_from_b`.
    pub fn inv(&self) -> Self {
        let rotation = self.rotation.transpose();
        let translation = -(rotation * self.translation);
        Self::new(rotation, translation)
    }

    /// Maps a point given in B coordinates to A coordinates.
    pub fn transform_point(&self, point: &Vector3<T>) -> Vector3<T> {
        self.rotation * point + self.translation
    }
}

impl<T: Real> Mul<Transform<T>> for Transform<T> {
    type Output = Transform<T>;
    #[inline]
    fn mul(self, rhs: Transform<T>) -> Transform<T> {
        Transform::new(
            self.rotation * rhs.rotation,
            self.rotation * rhs.translation + self.translation,
        )
    }
}

impl<T: Real> From<Matrix4<T>> for Transform<T> {
    fn from(m: Matrix4<T>) -> Self {
        Transform::from_matrix(&m)
    }
}
