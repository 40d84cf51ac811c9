//! Rigid-body algorithms over a [`Model`].
//!
//! Inputs and outputs use the mixed representation: the base velocity is
//! `[p_dot; omega]` with both parts in world axes, linear first, and frame
//! velocities are the world-axes velocity of the frame origin followed by its
//! angular velocity. Internally every sweep runs in body coordinates with
//! angular-first spatial vectors.

pub mod center_of_mass;
pub mod composite_rigid_body;
pub mod forward_dynamics;
pub mod forward_kinematics;
pub mod jacobian;
pub mod mixed;
pub mod recursive_newton_euler;

use crate::{MultibodyErrors, model::Model};
use nalgebra::DVector;
use spatial_algebra::{Real, SpatialTransform, Transform};

/// Borrows a model and evaluates kinematic and dynamic quantities on it.
/// Every method is pure; one model can serve any number of evaluations.
#[derive(Debug, Clone, Copy)]
pub struct RigidBodyAlgorithms<'a, T: Real> {
    model: &'a Model<T>,
}

/// Link poses for one joint configuration, indexed like `Model::links`.
#[derive(Debug, Clone)]
pub(crate) struct TreeKinematics<T: Real> {
    pub parent_from_link: Vec<SpatialTransform<T>>,
    pub base_from_link: Vec<Transform<T>>,
}

impl<'a, T: Real> RigidBodyAlgorithms<'a, T> {
    pub fn new(model: &'a Model<T>) -> Self {
        Self { model }
    }

    pub fn model(&self) -> &'a Model<T> {
        self.model
    }

    pub fn ndof(&self) -> usize {
        self.model.ndof()
    }

    pub(crate) fn check_joint_vector(
        &self,
        name: &'static str,
        vector: &DVector<T>,
    ) -> Result<(), MultibodyErrors> {
        if vector.len() != self.model.ndof() {
            return Err(MultibodyErrors::StateDimension {
                name,
                expected: self.model.ndof(),
                found: vector.len(),
            });
        }
        Ok(())
    }

    pub(crate) fn frame_index(&self, frame: &str) -> Result<usize, MultibodyErrors> {
        self.model
            .link_index(frame)
            .ok_or_else(|| MultibodyErrors::FrameNotFound(frame.to_string()))
    }

    /// Single forward sweep, root pose is the identity.
    pub(crate) fn tree_kinematics(&self, q: &DVector<T>) -> TreeKinematics<T> {
        let n = self.model.links().len();
        let mut parent_from_link = Vec::with_capacity(n);
        let mut base_from_link: Vec<Transform<T>> = Vec::with_capacity(n);

        for i in 0..n {
            match self.model.parent_joint(i) {
                Some(joint) => {
                    let transform = joint.transform(joint.position(q));
                    base_from_link.push(base_from_link[joint.parent] * transform);
                    parent_from_link.push(SpatialTransform(transform));
                }
                None => {
                    base_from_link.push(Transform::identity());
                    parent_from_link.push(SpatialTransform::identity());
                }
            }
        }

        TreeKinematics {
            parent_from_link,
            base_from_link,
        }
    }
}
