//! Spatial algebra over a generic scalar.
//!
//! Everything here is written against [`Real`] so the same kinematic and dynamic
//! routines run on plain floats or on a differentiable scalar. Spatial vectors are
//! stored angular part first (Featherstone ordering).

pub mod real;
pub mod rotation;
pub mod skew;
pub mod transform;

pub use real::Real;
pub use transform::Transform;

use nalgebra::{Matrix3, Matrix6, Vector3, Vector6};
use skew::{skew, vee};
use std::ops::{Add, AddAssign, Mul, Neg, Sub};

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialVector<T: Real> {
    pub rotation: Vector3<T>,
    pub translation: Vector3<T>,
}

impl<T: Real> SpatialVector<T> {
    pub fn new(rotation: Vector3<T>, translation: Vector3<T>) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    pub fn zeros() -> Self {
        Self::new(Vector3::zeros(), Vector3::zeros())
    }

    pub fn vector(&self) -> Vector6<T> {
        let (r, t) = (self.rotation, self.translation);
        Vector6::new(r[0], r[1], r[2], t[0], t[1], t[2])
    }

    ///Featherstone 2.34
    pub fn cross_force(self, rhs: SpatialVector<T>) -> SpatialVector<T> {
        let new_rotation =
            self.rotation.cross(&rhs.rotation) + self.translation.cross(&rhs.translation);
        let new_translation = self.rotation.cross(&rhs.translation);
        SpatialVector::new(new_rotation, new_translation)
    }

    /// Featherstone 2.33
    pub fn cross_motion(self, rhs: SpatialVector<T>) -> SpatialVector<T> {
        let new_rotation = self.rotation.cross(&rhs.rotation);
        let new_translation =
            self.rotation.cross(&rhs.translation) + self.translation.cross(&rhs.rotation);
        SpatialVector::new(new_rotation, new_translation)
    }
}

impl<T: Real> From<Vector6<T>> for SpatialVector<T> {
    fn from(v: Vector6<T>) -> SpatialVector<T> {
        SpatialVector::new(Vector3::new(v[0], v[1], v[2]), Vector3::new(v[3], v[4], v[5]))
    }
}

impl<T: Real> Add<SpatialVector<T>> for SpatialVector<T> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(
            self.rotation + rhs.rotation,
            self.translation + rhs.translation,
        )
    }
}

impl<T: Real> Sub<SpatialVector<T>> for SpatialVector<T> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(
            self.rotation - rhs.rotation,
            self.translation - rhs.translation,
        )
    }
}

impl<T: Real> Mul<T> for SpatialVector<T> {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: T) -> Self {
        Self::new(self.rotation * rhs, self.translation * rhs)
    }
}

/// Motion vector, e.g. velocity or acceleration: `[angular; linear]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MotionVector<T: Real>(pub SpatialVector<T>);

impl<T: Real> MotionVector<T> {
    pub fn new(rotation: Vector3<T>, translation: Vector3<T>) -> Self {
        Self(SpatialVector::new(rotation, translation))
    }

    pub fn zeros() -> Self {
        Self(SpatialVector::zeros())
    }

    pub fn rotation(&self) -> Vector3<T> {
        self.0.rotation
    }

    pub fn translation(&self) -> Vector3<T> {
        self.0.translation
    }

    pub fn vector(&self) -> Vector6<T> {
        self.0.vector()
    }

    pub fn cross_motion(self, rhs: MotionVector<T>) -> MotionVector<T> {
        MotionVector(self.0.cross_motion(rhs.0))
    }

    pub fn cross_force(self, rhs: ForceVector<T>) -> ForceVector<T> {
        ForceVector(self.0.cross_force(rhs.0))
    }

    /// Power pairing with a force, `m . f`.
    pub fn dot(&self, force: &ForceVector<T>) -> T {
        self.0.rotation.dot(&force.0.rotation) + self.0.translation.dot(&force.0.translation)
    }
}

impl<T: Real> From<Vector6<T>> for MotionVector<T> {
    fn from(v: Vector6<T>) -> Self {
        Self(SpatialVector::from(v))
    }
}

impl<T: Real> Add<MotionVector<T>> for MotionVector<T> {
    type Output = MotionVector<T>;
    #[inline]
    fn add(self, rhs: MotionVector<T>) -> MotionVector<T> {
        MotionVector(self.0 + rhs.0)
    }
}

impl<T: Real> Sub<MotionVector<T>> for MotionVector<T> {
    type Output = MotionVector<T>;
    #[inline]
    fn sub(self, rhs: MotionVector<T>) -> MotionVector<T> {
        MotionVector(self.0 - rhs.0)
    }
}

impl<T: Real> Mul<T> for MotionVector<T> {
    type Output = MotionVector<T>;
    #[inline]
    fn mul(self, rhs: T) -> MotionVector<T> {
        MotionVector(self.0 * rhs)
    }
}

/// Force vector, e.g. wrench or momentum: `[moment; force]`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ForceVector<T: Real>(pub SpatialVector<T>);

impl<T: Real> ForceVector<T> {
    pub fn new(rotation: Vector3<T>, translation: Vector3<T>) -> Self {
        Self(SpatialVector::new(rotation, translation))
    }

    pub fn zeros() -> Self {
        Self(SpatialVector::zeros())
    }

    pub fn rotation(&self) -> Vector3<T> {
        self.0.rotation
    }

    pub fn translation(&self) -> Vector3<T> {
        self.0.translation
    }

    pub fn vector(&self) -> Vector6<T> {
        self.0.vector()
    }
}

impl<T: Real> From<Vector6<T>> for ForceVector<T> {
    fn from(v: Vector6<T>) -> Self {
        Self(SpatialVector::from(v))
    }
}

impl<T: Real> Add<ForceVector<T>> for ForceVector<T> {
    type Output = ForceVector<T>;
    #[inline]
    fn add(self, rhs: ForceVector<T>) -> ForceVector<T> {
        ForceVector(self.0 + rhs.0)
    }
}

impl<T: Real> AddAssign<ForceVector<T>> for ForceVector<T> {
    #[inline]
    fn add_assign(&mut self, rhs: ForceVector<T>) {
        self.0 = self.0 + rhs.0;
    }
}

impl<T: Real> Sub<ForceVector<T>> for ForceVector<T> {
    type Output = ForceVector<T>;
    #[inline]
    fn sub(self, rhs: ForceVector<T>) -> ForceVector<T> {
        ForceVector(self.0 - rhs.0)
    }
}

impl<T: Real> Neg for ForceVector<T> {
    type Output = ForceVector<T>;
    #[inline]
    fn neg(self) -> ForceVector<T> {
        ForceVector::new(-self.0.rotation, -self.0.translation)
    }
}

/// Plücker transform built from a homogeneous [`Transform`].
///
/// `SpatialTransform(a_from_b)` maps motion and force vectors expressed in B
/// into A. The transpose of the motion transform equals the force form of the
/// inverse, so `x.inv() * f` is `x^T f`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialTransform<T: Real>(pub Transform<T>);

impl<T: Real> Default for SpatialTransform<T> {
    fn default() -> Self {
        Self(Transform::identity())
    }
}

impl<T: Real> SpatialTransform<T> {
    pub fn identity() -> Self {
        Self(Transform::identity())
    }

    #[inline]
    pub fn inv(&self) -> SpatialTransform<T> {
        SpatialTransform(self.0.inv())
    }

    /// 6x6 motion form, `[[R, 0], [p x R, R]]`.
    pub fn motion_matrix(&self) -> Matrix6<T> {
        let r = self.0.rotation;
        let pr = skew(&self.0.translation) * r;
        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&pr);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
        m
    }

    /// 6x6 force form, `[[R, p x R], [0, R]]`.
    pub fn force_matrix(&self) -> Matrix6<T> {
        let r = self.0.rotation;
        let pr = skew(&self.0.translation) * r;
        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&r);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&pr);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&r);
        m
    }
}

impl<T: Real> From<Transform<T>> for SpatialTransform<T> {
    #[inline]
    fn from(value: Transform<T>) -> Self {
        Self(value)
    }
}

impl<T: Real> Mul<MotionVector<T>> for SpatialTransform<T> {
    type Output = MotionVector<T>;
    fn mul(self, motion: MotionVector<T>) -> MotionVector<T> {
        let transform = self.0;
        let rotation = transform.rotation * motion.0.rotation;
        let translation =
            transform.rotation * motion.0.translation + transform.translation.cross(&rotation);
        MotionVector::new(rotation, translation)
    }
}

impl<T: Real> Mul<ForceVector<T>> for SpatialTransform<T> {
    type Output = ForceVector<T>;
    fn mul(self, force: ForceVector<T>) -> ForceVector<T> {
        let transform = self.0;
        let translation = transform.rotation * force.0.translation;
        let rotation =
            transform.rotation * force.0.rotation + transform.translation.cross(&translation);
        ForceVector::new(rotation, translation)
    }
}

impl<T: Real> Mul<SpatialTransform<T>> for SpatialTransform<T> {
    type Output = SpatialTransform<T>;
    #[inline]
    fn mul(self, rhs: SpatialTransform<T>) -> SpatialTransform<T> {
        SpatialTransform(self.0 * rhs.0)
    }
}

/// Rigid body spatial inertia about a frame origin, angular block first.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpatialInertia<T: Real>(pub Matrix6<T>);

impl<T: Real> SpatialInertia<T> {
    /// `inertia` is the rotational inertia about the center of mass, in the
    /// axes of the frame the center of mass is expressed in.
    pub fn new(mass: T, center_of_mass: &Vector3<T>, inertia: &Matrix3<T>) -> Self {
        let cx = skew(center_of_mass);
        let cxt = cx.transpose();

        let quad11 = inertia + cx * cxt * mass;
        let quad12 = cx * mass;
        let quad21 = cxt * mass;
        let quad22 = Matrix3::identity() * mass;

        let mut m = Matrix6::zeros();
        m.fixed_view_mut::<3, 3>(0, 0).copy_from(&quad11);
        m.fixed_view_mut::<3, 3>(0, 3).copy_from(&quad12);
        m.fixed_view_mut::<3, 3>(3, 0).copy_from(&quad21);
        m.fixed_view_mut::<3, 3>(3, 3).copy_from(&quad22);
        Self(m)
    }

    pub fn zeros() -> Self {
        Self(Matrix6::zeros())
    }

    pub fn matrix(&self) -> Matrix6<T> {
        self.0
    }

    pub fn mass(&self) -> T {
        self.0[(3, 3)]
    }

    /// Center of mass relative to the frame origin, `None` for a massless body.
    pub fn center_of_mass(&self) -> Option<Vector3<T>> {
        let mass = self.mass();
        if mass.to_f64() <= 0.0 {
            return None;
        }
        let mc: Matrix3<T> = self.0.fixed_view::<3, 3>(0, 3).into_owned();
        Some(vee(&mc) / mass)
    }

    /// Rotational inertia about the center of mass, or `None` for a massless body.
    pub fn rotational_inertia_at_com(&self) -> Option<Matrix3<T>> {
        let c = self.center_of_mass()?;
        let cx = skew(&c);
        let about_origin: Matrix3<T> = self.0.fixed_view::<3, 3>(0, 0).into_owned();
        Some(about_origin - cx * cx.transpose() * self.mass())
    }

    /// Re-expresses an inertia given in B into A, `X^T I X` with `X = b_from_a`.
    pub fn transformed(&self, a_from_b: &SpatialTransform<T>) -> SpatialInertia<T> {
        let x = a_from_b.inv().motion_matrix();
        SpatialInertia(x.transpose() * self.0 * x)
    }
}

impl<T: Real> Add<SpatialInertia<T>> for SpatialInertia<T> {
    type Output = SpatialInertia<T>;
    #[inline]
    fn add(self, rhs: SpatialInertia<T>) -> SpatialInertia<T> {
        SpatialInertia(self.0 + rhs.0)
    }
}

impl<T: Real> Mul<MotionVector<T>> for SpatialInertia<T> {
    type Output = ForceVector<T>;
    fn mul(self, motion: MotionVector<T>) -> ForceVector<T> {
        ForceVector::from(self.0 * motion.vector())
    }
}
