use super::{
    RigidBodyAlgorithms, TreeKinematics,
    mixed::{dynamic, generalized_transform},
};
use crate::MultibodyErrors;
use nalgebra::{DMatrix, DVector, Vector3};
use spatial_algebra::{Real, SpatialInertia, SpatialTransform, Transform};

impl<T: Real> RigidBodyAlgorithms<'_, T> {
    /// Composite inertia of every subtree, each in its own link frame.
    pub(crate) fn composite_inertias(
        &self,
        kinematics: &TreeKinematics<T>,
    ) -> Vec<SpatialInertia<T>> {
        let mut composite: Vec<SpatialInertia<T>> = self
            .model
            .links()
            .iter()
            .map(|link| link.spatial_inertia())
            .collect();

        for i in (1..composite.len()).rev() {
            if let Some(joint) = self.model.parent_joint(i) {
                let in_parent = composite[i].transformed(&kinematics.parent_from_link[i]);
                composite[joint.parent] = composite[joint.parent] + in_parent;
            }
        }
        composite
    }

    /// Joint-space inertia in body coordinates, angular first on the base block.
    pub(crate) fn internal_mass_matrix(
        &self,
        kinematics: &TreeKinematics<T>,
        composite: &[SpatialInertia<T>],
    ) -> DMatrix<T> {
        let n = self.model.ndof();
        let mut m = DMatrix::zeros(6 + n, 6 + n);
        m.fixed_view_mut::<6, 6>(0, 0)
            .copy_from(&composite[0].matrix());

        for i in 1..composite.len() {
            let Some(joint) = self.model.parent_joint(i) else {
                continue;
            };
            let (Some(k), Some(s)) = (joint.dof(), joint.motion_subspace()) else {
                continue;
            };

            let mut f = composite[i] * s;
            m[(6 + k, 6 + k)] = s.dot(&f);

            // carry the column up to the root
            let mut j = i;
            while let Some(inner) = self.model.parent_joint(j) {
                f = kinematics.parent_from_link[j] * f;
                j = inner.parent;
                if let Some(parent_joint) = self.model.parent_joint(j) {
                    if let (Some(kj), Some(sj)) = (parent_joint.dof(), parent_joint.motion_subspace()) {
                        let value = sj.dot(&f);
                        m[(6 + kj, 6 + k)] = value;
                        m[(6 + k, 6 + kj)] = value;
                    }
                }
            }

            let column = f.vector();
            for r in 0..6 {
                m[(r, 6 + k)] = column[r];
                m[(6 + k, r)] = column[r];
            }
        }
        m
    }

    /// Composite rigid body algorithm.
    ///
    /// Returns the `(6 + n) x (6 + n)` mass matrix and the `6 x (6 + n)`
    /// centroidal momentum matrix, both against the mixed generalized velocity.
    /// Centroidal momentum rows are linear momentum then angular momentum about
    /// the center of mass, in world axes.
    pub fn crba(
        &self,
        base_transform: &Transform<T>,
        q: &DVector<T>,
    ) -> Result<(DMatrix<T>, DMatrix<T>), MultibodyErrors> {
        self.check_joint_vector("joint positions", q)?;
        let n = self.model.ndof();
        let kinematics = self.tree_kinematics(q);
        let composite = self.composite_inertias(&kinematics);
        let internal = self.internal_mass_matrix(&kinematics, &composite);
        let t = generalized_transform(&base_transform.rotation, n);

        let mass_matrix = t.transpose() * &internal * &t;

        // centroidal frame: at the center of mass, world aligned
        let c = composite[0]
            .center_of_mass()
            .unwrap_or_else(Vector3::zeros);
        let base_from_centroid = Transform::new(base_transform.rotation.transpose(), c);
        let centroid_from_base =
            dynamic(&SpatialTransform(base_from_centroid.inv()).force_matrix());
        let momentum = centroid_from_base * internal.rows(0, 6).into_owned() * &t;

        // reorder to linear then angular
        let centroidal = DMatrix::from_fn(6, 6 + n, |r, col| momentum[((r + 3) % 6, col)]);

        Ok((mass_matrix, centroidal))
    }
}
