//! Structural robot description.
//!
//! A plain, serde-serializable tree of links and joints in `f64`. It holds the
//! nominal data only; per-call shape parameters are applied by the factory when
//! a [`Model`](crate::model::Model) is built.

use crate::MultibodyErrors;
use mass_properties::Geometry;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JointType {
    Fixed,
    Revolute,
    Continuous,
    Prismatic,
    Floating,
}

impl JointType {
    /// True for joints with a single motion axis.
    pub fn has_axis(&self) -> bool {
        matches!(
            self,
            JointType::Revolute | JointType::Continuous | JointType::Prismatic
        )
    }
}

/// Pose of a child frame in its parent frame: translation, then fixed-axis roll-pitch-yaw.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Origin {
    #[serde(default)]
    pub xyz: [f64; 3],
    #[serde(default)]
    pub rpy: [f64; 3],
}

impl Origin {
    pub fn new(xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        Self { xyz, rpy }
    }

    pub fn from_xyz(xyz: [f64; 3]) -> Self {
        Self { xyz, rpy: [0.0; 3] }
    }
}

/// Nominal inertial data. `origin` places the center of mass frame in the link frame,
/// the inertia is about the center of mass in that frame's axes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InertialDescription {
    #[serde(default)]
    pub origin: Origin,
    pub mass: f64,
    pub ixx: f64,
    #[serde(default)]
    pub ixy: f64,
    #[serde(default)]
    pub ixz: f64,
    pub iyy: f64,
    #[serde(default)]
    pub iyz: f64,
    pub izz: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkDescription {
    pub name: String,
    #[serde(default)]
    pub inertial: Option<InertialDescription>,
    #[serde(default)]
    pub geometry: Option<Geometry>,
}

impl LinkDescription {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            inertial: None,
            geometry: None,
        }
    }

    pub fn with_inertial(mut self, inertial: InertialDescription) -> Self {
        self.inertial = Some(inertial);
        self
    }

    pub fn with_geometry(mut self, geometry: Geometry) -> Self {
        self.geometry = Some(geometry);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct JointLimits {
    pub lower: f64,
    pub upper: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JointDescription {
    pub name: String,
    pub joint_type: JointType,
    pub parent: String,
    pub child: String,
    #[serde(default)]
    pub origin: Origin,
    #[serde(default = "default_axis")]
    pub axis: [f64; 3],
    #[serde(default)]
    pub limits: Option<JointLimits>,
}

fn default_axis() -> [f64; 3] {
    [1.0, 0.0, 0.0]
}

impl JointDescription {
    pub fn new(name: &str, joint_type: JointType, parent: &str, child: &str) -> Self {
        Self {
            name: name.to_string(),
            joint_type,
            parent: parent.to_string(),
            child: child.to_string(),
            origin: Origin::default(),
            axis: default_axis(),
            limits: None,
        }
    }

    pub fn revolute(name: &str, parent: &str, child: &str, axis: [f64; 3]) -> Self {
        Self::new(name, JointType::Revolute, parent, child).with_axis(axis)
    }

    pub fn prismatic(name: &str, parent: &str, child: &str, axis: [f64; 3]) -> Self {
        Self::new(name, JointType::Prismatic, parent, child).with_axis(axis)
    }

    pub fn fixed(name: &str, parent: &str, child: &str) -> Self {
        Self::new(name, JointType::Fixed, parent, child)
    }

    pub fn with_axis(mut self, axis: [f64; 3]) -> Self {
        self.axis = axis;
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    pub fn with_limits(mut self, lower: f64, upper: f64) -> Self {
        self.limits = Some(JointLimits { lower, upper });
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RobotDescription {
    pub name: String,
    pub links: Vec<LinkDescription>,
    pub joints: Vec<JointDescription>,
}

impl RobotDescription {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            links: Vec::new(),
            joints: Vec::new(),
        }
    }

    pub fn with_link(mut self, link: LinkDescription) -> Self {
        self.links.push(link);
        self
    }

    pub fn with_joint(mut self, joint: JointDescription) -> Self {
        self.joints.push(joint);
        self
    }

    pub fn from_ron(s: &str) -> Result<Self, MultibodyErrors> {
        ron::from_str(s).map_err(|e| MultibodyErrors::Description(e.to_string()))
    }

    pub fn to_ron(&self) -> Result<String, MultibodyErrors> {
        ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
            .map_err(|e| MultibodyErrors::Description(e.to_string()))
    }

    pub fn link(&self, name: &str) -> Option<&LinkDescription> {
        self.links.iter().find(|link| link.name == name)
    }

    pub fn joint(&self, name: &str) -> Option<&JointDescription> {
        self.joints.iter().find(|joint| joint.name == name)
    }
}
