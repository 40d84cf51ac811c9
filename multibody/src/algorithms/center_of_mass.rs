use super::RigidBodyAlgorithms;
use crate::MultibodyErrors;
use nalgebra::{DMatrix, DVector, Vector3};
use spatial_algebra::{Real, Transform};

impl<T: Real> RigidBodyAlgorithms<'_, T> {
    pub fn total_mass(&self) -> T {
        self.model.total_mass()
    }

    fn positive_total_mass(&self) -> Result<T, MultibodyErrors> {
        let mass = self.total_mass();
        if mass.to_f64() > 0.0 {
            Ok(mass)
        } else {
            Err(MultibodyErrors::Numerical(format!(
                "model '{}' has no mass",
                self.model.name
            )))
        }
    }

    /// World position of the center of mass.
    pub fn center_of_mass(
        &self,
        base_transform: &Transform<T>,
        q: &DVector<T>,
    ) -> Result<Vector3<T>, MultibodyErrors> {
        self.check_joint_vector("joint positions", q)?;
        let mass = self.positive_total_mass()?;
        let kinematics = self.tree_kinematics(q);

        let mut weighted = Vector3::zeros();
        for (link, base_from_link) in self.model.links().iter().zip(&kinematics.base_from_link) {
            let mp = &link.mass_properties;
            weighted += base_from_link.transform_point(&mp.center_of_mass) * mp.mass;
        }
        Ok(base_transform.transform_point(&(weighted / mass)))
    }

    /// `3 x (6 + n)` Jacobian of the center of mass position, the linear rows
    /// of the centroidal momentum matrix divided by the total mass.
    pub fn com_jacobian(
        &self,
        base_transform: &Transform<T>,
        q: &DVector<T>,
    ) -> Result<DMatrix<T>, MultibodyErrors> {
        let mass = self.positive_total_mass()?;
        let (_, centroidal) = self.crba(base_transform, q)?;
        Ok(centroidal.rows(0, 3).into_owned() / mass)
    }
}
