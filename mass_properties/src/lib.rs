use nalgebra::{Matrix3, Vector3};
use spatial_algebra::{Real, SpatialInertia};
use thiserror::Error;

pub mod shape;
pub use shape::{Geometry, Shape, ShapeParameters};

#[derive(Debug, Error)]
pub enum MassPropertiesErrors {
    #[error("Ixx cant be less than zero")]
    IxxLessThanZero,
    #[error("Iyy cant be less than zero")]
    IyyLessThanZero,
    #[error("Izz cant be less than zero")]
    IzzLessThanZero,
    #[error("inertia is not positive semi-definite")]
    InertiaNotPositiveSemiDefinite,
    #[error("mass cannot be less than zero")]
    MassLessThanZero,
    #[error("{name} must be strictly positive, got {value}")]
    InvalidParameter { name: &'static str, value: f64 },
    #[error("shape '{0}' has no closed form inertia")]
    UnsupportedShape(String),
}

/// Rotational inertia about the center of mass, upper triangle of a symmetric matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Inertia<T: Real> {
    pub ixx: T,
    pub ixy: T,
    pub ixz: T,
    pub iyy: T,
    pub iyz: T,
    pub izz: T,
}

impl<T: Real> Inertia<T> {
    pub fn new(ixx: T, iyy: T, izz: T, ixy: T, ixz: T, iyz: T) -> Result<Self, MassPropertiesErrors> {
        if ixx.to_f64() < 0.0 {
            return Err(MassPropertiesErrors::IxxLessThanZero);
        }
        if iyy.to_f64() < 0.0 {
            return Err(MassPropertiesErrors::IyyLessThanZero);
        }
        if izz.to_f64() < 0.0 {
            return Err(MassPropertiesErrors::IzzLessThanZero);
        }
        let inertia = Self {
            ixx,
            ixy,
            ixz,
            iyy,
            iyz,
            izz,
        };
        if !inertia.is_positive_semi_definite() {
            return Err(MassPropertiesErrors::InertiaNotPositiveSemiDefinite);
        }
        Ok(inertia)
    }

    /// Sylvester's criterion over every principal minor, on the primal values.
    /// Minors are compared against a tolerance scaled by the largest moment.
    fn is_positive_semi_definite(&self) -> bool {
        let [xx, yy, zz, xy, xz, yz] = [
            self.ixx, self.iyy, self.izz, self.ixy, self.ixz, self.iyz,
        ]
        .map(|v| v.to_f64());
        let scale = xx.max(yy).max(zz);
        let tol = 1e-9 * scale * scale;

        let minors = [xx * yy - xy * xy, xx * zz - xz * xz, yy * zz - yz * yz];
        if minors.iter().any(|m| *m < -tol) {
            return false;
        }
        let det = xx * (yy * zz - yz * yz) - xy * (xy * zz - yz * xz) + xz * (xy * yz - yy * xz);
        det >= -tol * scale
    }

    pub fn zeros() -> Self {
        let z = T::zero();
        Self {
            ixx: z,
            ixy: z,
            ixz: z,
            iyy: z,
            iyz: z,
            izz: z,
        }
    }

    /// Reads the upper triangle, the matrix is assumed symmetric.
    pub fn from_matrix(m: &Matrix3<T>) -> Result<Self, MassPropertiesErrors> {
        Self::new(
            m[(0, 0)],
            m[(1, 1)],
            m[(2, 2)],
            m[(0, 1)],
            m[(0, 2)],
            m[(1, 2)],
        )
    }

    pub fn matrix(&self) -> Matrix3<T> {
        Matrix3::new(
            self.ixx, self.ixy, self.ixz, self.ixy, self.iyy, self.iyz, self.ixz, self.iyz,
            self.izz,
        )
    }
}

/// Mass, center of mass in the link frame, inertia about the center of mass in link axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MassProperties<T: Real> {
    pub mass: T,
    pub center_of_mass: Vector3<T>,
    pub inertia: Inertia<T>,
}

impl<T: Real> Default for MassProperties<T> {
    fn default() -> Self {
        Self::massless()
    }
}

impl<T: Real> MassProperties<T> {
    pub fn new(
        mass: T,
        center_of_mass: Vector3<T>,
        inertia: Inertia<T>,
    ) -> Result<Self, MassPropertiesErrors> {
        if mass.to_f64() < 0.0 {
            return Err(MassPropertiesErrors::MassLessThanZero);
        }
        Ok(Self {
            mass,
            center_of_mass,
            inertia,
        })
    }

    pub fn massless() -> Self {
        Self {
            mass: T::zero(),
            center_of_mass: Vector3::zeros(),
            inertia: Inertia::zeros(),
        }
    }

    /// Spatial inertia about the link frame origin.
    pub fn spatial_inertia(&self) -> SpatialInertia<T> {
        SpatialInertia::new(self.mass, &self.center_of_mass, &self.inertia.matrix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_negative_values_rejected() {
        assert!(matches!(
            Inertia::new(-1.0, 1.0, 1.0, 0.0, 0.0, 0.0),
            Err(MassPropertiesErrors::IxxLessThanZero)
        ));
        assert!(matches!(
            MassProperties::new(-2.0, Vector3::zeros(), Inertia::zeros()),
            Err(MassPropertiesErrors::MassLessThanZero)
        ));
    }

    #[test]
    fn test_indefinite_inertia_rejected() {
        // non-negative diagonal, but the xy minor is negative
        assert!(matches!(
            Inertia::new(0.1, 0.1, 0.1, 0.5, 0.0, 0.0),
            Err(MassPropertiesErrors::InertiaNotPositiveSemiDefinite)
        ));
        // every 2x2 minor is fine, the determinant is not
        assert!(matches!(
            Inertia::new(1.0, 1.0, 1.0, -0.9, -0.9, -0.9),
            Err(MassPropertiesErrors::InertiaNotPositiveSemiDefinite)
        ));
        // a thin rod has a zero principal moment
        assert!(Inertia::new(1.0, 1.0, 0.0, 0.0, 0.0, 0.0).is_ok());
        assert!(Inertia::<f64>::from_matrix(&Matrix3::zeros()).is_ok());
    }

    #[test]
    fn test_inertia_matrix_is_symmetric() {
        let inertia = Inertia::new(1.0, 2.0, 3.0, 0.1, 0.2, 0.3).unwrap();
        let m = inertia.matrix();
        assert_abs_diff_eq!(m, m.transpose());
        assert_eq!(Inertia::from_matrix(&m).unwrap(), inertia);
    }

    #[test]
    fn test_spatial_inertia() {
        let c = Vector3::new(0.0, 0.0, -0.5);
        let inertia = Inertia::new(1.0, 1.0, 0.5, 0.0, 0.0, 0.0).unwrap();
        let mp = MassProperties::new(3.0, c, inertia).unwrap();
        let si = mp.spatial_inertia();
        assert_abs_diff_eq!(si.mass(), 3.0);
        assert_abs_diff_eq!(si.center_of_mass().unwrap(), c, epsilon = 1e-12);
        // parallel axis: Ixx about the origin gains m * cz^2
        assert_abs_diff_eq!(si.0[(0, 0)], 1.0 + 3.0 * 0.25, epsilon = 1e-12);
    }
}
