use super::RigidBodyAlgorithms;
use crate::MultibodyErrors;
use nalgebra::DVector;
use spatial_algebra::{Real, Transform};

impl<T: Real> RigidBodyAlgorithms<'_, T> {
    /// World pose of `frame`, i.e. `world_from_frame`, given `world_from_base`.
    pub fn forward_kinematics(
        &self,
        frame: &str,
        base_transform: &Transform<T>,
        q: &DVector<T>,
    ) -> Result<Transform<T>, MultibodyErrors> {
        self.check_joint_vector("joint positions", q)?;
        let path = self.model.path(frame)?;
        let mut world_from_link = *base_transform;
        for j in path {
            let joint = &self.model.joints()[j];
            world_from_link = world_from_link * joint.transform(joint.position(q));
        }
        Ok(world_from_link)
    }
}
