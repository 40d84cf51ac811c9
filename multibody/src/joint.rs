use crate::description::{JointLimits, JointType};
use nalgebra::{DVector, Vector3};
use spatial_algebra::{MotionVector, Real, Transform, rotation::rotation_from_axis_angle};

/// How a joint of the description takes part in the generalized coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JointActuation {
    /// Moves with joint-space coordinate `dof`.
    Actuated { dof: usize },
    /// Movable joint left out of the actuated list, held at zero position.
    Locked,
    /// Rigid connection.
    Fixed,
}

/// A joint of the kinematic tree.
///
/// `origin` is the pose of the joint frame in the parent link frame. The child
/// link frame coincides with the joint frame moved by the joint position.
#[derive(Debug, Clone)]
pub struct Joint<T: Real> {
    pub name: String,
    pub joint_type: JointType,
    pub parent: usize,
    pub child: usize,
    pub origin: Transform<T>,
    /// Unit axis in the joint frame.
    pub axis: Vector3<T>,
    pub actuation: JointActuation,
    pub limits: Option<JointLimits>,
}

impl<T: Real> Joint<T> {
    pub fn dof(&self) -> Option<usize> {
        match self.actuation {
            JointActuation::Actuated { dof } => Some(dof),
            _ => None,
        }
    }

    /// Joint position read from the joint-space vector, zero when not actuated.
    pub fn position(&self, q: &DVector<T>) -> T {
        self.dof().map_or(T::zero(), |dof| q[dof])
    }

    /// Motion subspace in the child frame, `None` for joints without an axis.
    pub fn motion_subspace(&self) -> Option<MotionVector<T>> {
        match self.joint_type {
            JointType::Revolute | JointType::Continuous => {
                Some(MotionVector::new(self.axis, Vector3::zeros()))
            }
            JointType::Prismatic => Some(MotionVector::new(Vector3::zeros(), self.axis)),
            JointType::Fixed | JointType::Floating => None,
        }
    }

    /// `parent_from_child` at joint position `q`.
    pub fn transform(&self, q: T) -> Transform<T> {
        let motion = match self.joint_type {
            JointType::Revolute | JointType::Continuous => {
                Transform::from_rotation(rotation_from_axis_angle(&self.axis, q))
            }
            JointType::Prismatic => Transform::from_translation(self.axis * q),
            JointType::Fixed | JointType::Floating => return self.origin,
        };
        self.origin * motion
    }
}
