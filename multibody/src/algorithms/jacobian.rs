use super::{
    RigidBodyAlgorithms, TreeKinematics,
    mixed::{dynamic, generalized_transform, mixed_from_body},
};
use crate::MultibodyErrors;
use nalgebra::{DMatrix, DVector};
use spatial_algebra::{Real, SpatialTransform, Transform};

impl<T: Real> RigidBodyAlgorithms<'_, T> {
    /// Body Jacobian of `frame` in its own coordinates, angular rows first,
    /// against the internal generalized velocity (base body twist, joint rates).
    pub(crate) fn body_jacobian(
        &self,
        frame: usize,
        kinematics: &TreeKinematics<T>,
    ) -> Result<DMatrix<T>, MultibodyErrors> {
        let n = self.model.ndof();
        let frame_from_base = kinematics.base_from_link[frame].inv();

        let mut jacobian = DMatrix::zeros(6, 6 + n);
        jacobian
            .fixed_view_mut::<6, 6>(0, 0)
            .copy_from(&SpatialTransform(frame_from_base).motion_matrix());

        let name = &self.model.links()[frame].name;
        for j in self.model.path(name)? {
            let joint = &self.model.joints()[j];
            if let (Some(dof), Some(s)) = (joint.dof(), joint.motion_subspace()) {
                let frame_from_link =
                    SpatialTransform(frame_from_base * kinematics.base_from_link[joint.child]);
                jacobian
                    .fixed_view_mut::<6, 1>(0, 6 + dof)
                    .copy_from(&(frame_from_link * s).vector());
            }
        }
        Ok(jacobian)
    }

    /// Mixed Jacobian of `frame`, `6 x (6 + n)`. Rows are the world-axes
    /// velocity of the frame origin then the world-axes angular velocity.
    pub fn jacobian(
        &self,
        frame: &str,
        base_transform: &Transform<T>,
        q: &DVector<T>,
    ) -> Result<DMatrix<T>, MultibodyErrors> {
        self.check_joint_vector("joint positions", q)?;
        let i = self.frame_index(frame)?;
        let kinematics = self.tree_kinematics(q);
        let body = self.body_jacobian(i, &kinematics)?;
        let base_from_frame = kinematics.base_from_link[i];
        let world_rotation = base_transform.rotation * base_from_frame.rotation;

        let t = generalized_transform(&base_transform.rotation, self.model.ndof());
        Ok(dynamic(&mixed_from_body(&world_rotation)) * body * t)
    }

    /// Joint columns of the Jacobian with the base held at the identity,
    /// `6 x n`. Expresses the frame velocity relative to the root link.
    pub fn relative_jacobian(
        &self,
        frame: &str,
        q: &DVector<T>,
    ) -> Result<DMatrix<T>, MultibodyErrors> {
        let jacobian = self.jacobian(frame, &Transform::identity(), q)?;
        Ok(jacobian.columns(6, self.model.ndof()).into_owned())
    }
}
