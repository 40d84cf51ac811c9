pub mod algorithms;
pub mod description;
pub mod factory;
pub mod joint;
pub mod link;
pub mod model;

pub use algorithms::RigidBodyAlgorithms;
pub use description::{
    InertialDescription, JointDescription, JointType, LinkDescription, Origin, RobotDescription,
};
pub use factory::{LinkOverride, ParametricModelFactory};
pub use model::Model;

use mass_properties::MassPropertiesErrors;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MultibodyErrors {
    #[error("could not parse robot description: {0}")]
    Description(String),
    #[error("could not find frame '{0}' in the model")]
    FrameNotFound(String),
    #[error("{0}")]
    MassProperties(#[from] MassPropertiesErrors),
    #[error("invalid model: {0}")]
    ModelConstruction(String),
    #[error("numerical failure: {0}")]
    Numerical(String),
    #[error(
        "got {links} parametric links, {length_multipliers} length multipliers and {densities} densities"
    )]
    ParameterArity {
        links: usize,
        length_multipliers: usize,
        densities: usize,
    },
    #[error("{name} has length {found}, expected {expected}")]
    StateDimension {
        name: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("could not find joint '{0}' in the description")]
    UnknownJoint(String),
    #[error("could not find link '{0}' in the description")]
    UnknownLink(String),
}
