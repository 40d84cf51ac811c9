//! Floating-base kinematics and dynamics of robots with parametric link shapes.
//!
//! [`ParametricKinDyn`] answers one quantity per call. Every call takes the
//! shape parameters explicitly, rebuilds the model from the description and
//! evaluates it, so nothing is cached between calls. Callers that evaluate
//! many quantities for the same parameters can build the model once with
//! [`ParametricKinDyn::build_model`] and drive [`RigidBodyAlgorithms`] directly.

pub mod config;

pub use config::KinDynConfig;
pub use multibody::{Model, RigidBodyAlgorithms, RobotDescription};
pub use spatial_algebra::{Real, Transform};

use multibody::{MultibodyErrors, ParametricModelFactory};
use nalgebra::{DMatrix, DVector, Vector3, Vector6};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum KinDynErrors {
    #[error("could not parse configuration: {0}")]
    Config(String),
    #[error("{0}")]
    Multibody(#[from] MultibodyErrors),
}

/// Everything that defines the model for one call.
///
/// `length_multiplier` and `density` are aligned with `parametric_links`.
#[derive(Debug, Clone)]
pub struct ParametricInputs<'a, T: Real> {
    pub description: &'a RobotDescription,
    pub actuated_joints: &'a [String],
    pub parametric_links: &'a [String],
    pub length_multiplier: DVector<T>,
    pub density: DVector<T>,
}

impl<'a, T: Real> ParametricInputs<'a, T> {
    pub fn new(
        description: &'a RobotDescription,
        actuated_joints: &'a [String],
        parametric_links: &'a [String],
        length_multiplier: DVector<T>,
        density: DVector<T>,
    ) -> Self {
        Self {
            description,
            actuated_joints,
            parametric_links,
            length_multiplier,
            density,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ParametricKinDyn {
    config: KinDynConfig,
}

impl ParametricKinDyn {
    pub fn new(config: KinDynConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &KinDynConfig {
        &self.config
    }

    pub fn build_model<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
    ) -> Result<Model<T>, KinDynErrors> {
        let factory = ParametricModelFactory::new(
            inputs.description,
            inputs.parametric_links,
            inputs.length_multiplier.as_slice(),
            inputs.density.as_slice(),
        )?;
        Ok(factory.build(inputs.actuated_joints)?)
    }

    fn evaluate<T: Real, R>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        f: impl FnOnce(&RigidBodyAlgorithms<'_, T>) -> Result<R, MultibodyErrors>,
    ) -> Result<R, KinDynErrors> {
        let model = self.build_model(inputs)?;
        tracing::debug!(model = model.name.as_str(), ndof = model.ndof(), "evaluating");
        let algorithms = RigidBodyAlgorithms::new(&model);
        Ok(f(&algorithms)?)
    }

    /// `(6 + n) x (6 + n)` mass matrix.
    pub fn mass_matrix<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
    ) -> Result<DMatrix<T>, KinDynErrors> {
        self.evaluate(inputs, |a| Ok(a.crba(base_transform, joint_positions)?.0))
    }

    /// `6 x (6 + n)` centroidal momentum matrix, linear momentum rows first.
    pub fn centroidal_momentum_matrix<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
    ) -> Result<DMatrix<T>, KinDynErrors> {
        self.evaluate(inputs, |a| Ok(a.crba(base_transform, joint_positions)?.1))
    }

    /// World pose of `frame`.
    pub fn forward_kinematics<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        frame: &str,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
    ) -> Result<Transform<T>, KinDynErrors> {
        self.evaluate(inputs, |a| {
            a.forward_kinematics(frame, base_transform, joint_positions)
        })
    }

    /// `6 x (6 + n)` Jacobian of `frame`.
    pub fn jacobian<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        frame: &str,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
    ) -> Result<DMatrix<T>, KinDynErrors> {
        self.evaluate(inputs, |a| a.jacobian(frame, base_transform, joint_positions))
    }

    /// `6 x n` Jacobian of `frame` relative to the root link.
    pub fn relative_jacobian<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        frame: &str,
        joint_positions: &DVector<T>,
    ) -> Result<DMatrix<T>, KinDynErrors> {
        self.evaluate(inputs, |a| a.relative_jacobian(frame, joint_positions))
    }

    pub fn com_position<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
    ) -> Result<Vector3<T>, KinDynErrors> {
        self.evaluate(inputs, |a| a.center_of_mass(base_transform, joint_positions))
    }

    pub fn com_jacobian<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
    ) -> Result<DMatrix<T>, KinDynErrors> {
        self.evaluate(inputs, |a| a.com_jacobian(base_transform, joint_positions))
    }

    /// Coriolis, centrifugal and gravity terms.
    pub fn bias_force<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
        base_velocity: &Vector6<T>,
        joint_velocities: &DVector<T>,
    ) -> Result<DVector<T>, KinDynErrors> {
        let gravity = self.config.gravity();
        self.evaluate(inputs, |a| {
            a.rnea(
                base_transform,
                joint_positions,
                base_velocity,
                joint_velocities,
                &gravity,
            )
        })
    }

    /// Bias force with gravity removed.
    pub fn coriolis_term<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
        base_velocity: &Vector6<T>,
        joint_velocities: &DVector<T>,
    ) -> Result<DVector<T>, KinDynErrors> {
        self.evaluate(inputs, |a| {
            a.rnea(
                base_transform,
                joint_positions,
                base_velocity,
                joint_velocities,
                &Vector3::zeros(),
            )
        })
    }

    /// Bias force at zero velocity.
    pub fn gravity_term<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
    ) -> Result<DVector<T>, KinDynErrors> {
        let gravity = self.config.gravity();
        self.evaluate(inputs, |a| {
            a.rnea(
                base_transform,
                joint_positions,
                &Vector6::zeros(),
                &DVector::zeros(joint_positions.len()),
                &gravity,
            )
        })
    }

    pub fn total_mass<T: Real>(&self, inputs: &ParametricInputs<'_, T>) -> Result<T, KinDynErrors> {
        self.evaluate(inputs, |a| Ok(a.total_mass()))
    }

    /// Generalized acceleration of the floating base system under joint torques.
    pub fn forward_dynamics<T: Real>(
        &self,
        inputs: &ParametricInputs<'_, T>,
        base_transform: &Transform<T>,
        joint_positions: &DVector<T>,
        base_velocity: &Vector6<T>,
        joint_velocities: &DVector<T>,
        joint_torques: &DVector<T>,
    ) -> Result<DVector<T>, KinDynErrors> {
        let gravity = self.config.gravity();
        self.evaluate(inputs, |a| {
            a.forward_dynamics(
                base_transform,
                joint_positions,
                base_velocity,
                joint_velocities,
                joint_torques,
                &gravity,
            )
        })
    }
}
