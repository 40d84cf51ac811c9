use crate::Real;
use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};

/// Cross product matrix, `skew(a) * b == a.cross(&b)`.
#[inline]
pub fn skew<T: Real>(v: &Vector3<T>) -> Matrix3<T> {
    let z = T::zero();
    Matrix3::new(z, -v[2], v[1], v[2], z, -v[0], -v[1], v[0], z)
}

/// Inverse of [`skew`]. Only the antisymmetric part of `m` is meaningful.
#[inline]
pub fn vee<T: Real>(m: &Matrix3<T>) -> Vector3<T> {
    Vector3::new(m[(2, 1)], m[(0, 2)], m[(1, 0)])
}

/// Spatial motion cross product matrix (Featherstone 2.31), angular first.
pub fn motion_cross_matrix<T: Real>(v: &Vector6<T>) -> Matrix6<T> {
    let w = skew(&Vector3::new(v[0], v[1], v[2]));
    let u = skew(&Vector3::new(v[3], v[4], v[5]));
    let mut m = Matrix6::zeros();
    m.fixed_view_mut::<3, 3>(0, 0).copy_from(&w);
    m.fixed_view_mut::<3, 3>(3, 0).copy_from(&u);
    m.fixed_view_mut::<3, 3>(3, 3).copy_from(&w);
    m
}

/// Spatial force cross product matrix (Featherstone 2.32), `-motion_cross_matrix(v)^T`.
pub fn force_cross_matrix<T: Real>(v: &Vector6<T>) -> Matrix6<T> {
    -motion_cross_matrix(v).transpose()
}
