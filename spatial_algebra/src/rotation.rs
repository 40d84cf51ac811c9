use crate::{Real, skew::skew};
use nalgebra::{Matrix3, Vector3};

/// Rotation about the x axis by `a`.
pub fn rotation_x<T: Real>(a: T) -> Matrix3<T> {
    let (s, c) = (a.sin(), a.cos());
    let (z, o) = (T::zero(), T::one());
    Matrix3::new(o, z, z, z, c, -s, z, s, c)
}

/// Rotation about the y axis by `a`.
pub fn rotation_y<T: Real>(a: T) -> Matrix3<T> {
    let (s, c) = (a.sin(), a.cos());
    let (z, o) = (T::zero(), T::one());
    Matrix3::new(c, z, s, z, o, z, -s, z, c)
}

/// Rotation about the z axis by `a`.
pub fn rotation_z<T: Real>(a: T) -> Matrix3<T> {
    let (s, c) = (a.sin(), a.cos());
    let (z, o) = (T::zero(), T::one());
    Matrix3::new(c, -s, z, s, c, z, z, z, o)
}

/// Rodrigues' formula. `axis` is expected to be unit length; the model
/// normalizes joint axes once at construction so this stays free of a sqrt.
pub fn rotation_from_axis_angle<T: Real>(axis: &Vector3<T>, angle: T) -> Matrix3<T> {
    let k = skew(axis);
    let (s, c) = (angle.sin(), angle.cos());
    Matrix3::identity() + k * s + k * k * (T::one() - c)
}

/// Fixed-axis XYZ roll-pitch-yaw, i.e. `Rz(yaw) * Ry(pitch) * Rx(roll)`.
pub fn rotation_from_rpy<T: Real>(rpy: &Vector3<T>) -> Matrix3<T> {
    rotation_z(rpy[2]) * rotation_y(rpy[1]) * rotation_x(rpy[0])
}
