//! Conversions between the public mixed representation and the internal
//! body-coordinate, angular-first representation.

use nalgebra::{DMatrix, Matrix3, Matrix6};
use spatial_algebra::Real;

/// Maps a mixed base velocity `[p_dot; omega]` (world axes) to the body twist
/// `[omega_b; v_b]` of a frame with world orientation `rotation`.
pub fn body_from_mixed<T: Real>(rotation: &Matrix3<T>) -> Matrix6<T> {
    let rt = rotation.transpose();
    let mut m = Matrix6::zeros();
    m.fixed_view_mut::<3, 3>(0, 3).copy_from(&rt);
    m.fixed_view_mut::<3, 3>(3, 0).copy_from(&rt);
    m
}

/// Inverse of [`body_from_mixed`].
pub fn mixed_from_body<T: Real>(rotation: &Matrix3<T>) -> Matrix6<T> {
    let mut m = Matrix6::zeros();
    m.fixed_view_mut::<3, 3>(0, 3).copy_from(rotation);
    m.fixed_view_mut::<3, 3>(3, 0).copy_from(rotation);
    m
}

/// Generalized velocity map `nu_internal = t * nu_mixed`, block diagonal with
/// the base conversion and an `ndof` identity.
pub fn generalized_transform<T: Real>(base_rotation: &Matrix3<T>, ndof: usize) -> DMatrix<T> {
    let mut t = DMatrix::identity(6 + ndof, 6 + ndof);
    t.fixed_view_mut::<6, 6>(0, 0)
        .copy_from(&body_from_mixed(base_rotation));
    t
}

pub(crate) fn dynamic<T: Real>(m: &Matrix6<T>) -> DMatrix<T> {
    DMatrix::from_fn(6, 6, |r, c| m[(r, c)])
}
