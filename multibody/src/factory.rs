use crate::{
    MultibodyErrors,
    description::{InertialDescription, LinkDescription, RobotDescription},
    link::Link,
    model::{JointBuilder, Model, ModelBuilder},
};
use mass_properties::{Inertia, MassProperties, MassPropertiesErrors, ShapeParameters};
use nalgebra::{Matrix3, Vector3};
use spatial_algebra::{Real, Transform, rotation::rotation_from_rpy};
use std::collections::HashMap;

/// Shape parameters for one named link, consumed by a single factory invocation.
#[derive(Debug, Clone)]
pub struct LinkOverride<T: Real> {
    pub link: String,
    pub parameters: ShapeParameters<T>,
}

/// Builds a [`Model`] from a nominal description and per-call shape parameters.
///
/// Links named in the parametric list get their mass properties from their
/// geometry scaled by the length multiplier and filled with the density. Joints
/// hanging off a parametric link have their origin translation scaled by the
/// same multiplier so child attachments follow the resized geometry.
#[derive(Debug, Clone)]
pub struct ParametricModelFactory<'a, T: Real> {
    description: &'a RobotDescription,
    overrides: HashMap<&'a str, LinkOverride<T>>,
}

impl<'a, T: Real> ParametricModelFactory<'a, T> {
    pub fn new(
        description: &'a RobotDescription,
        parametric_links: &'a [String],
        length_multiplier: &[T],
        density: &[T],
    ) -> Result<Self, MultibodyErrors> {
        if parametric_links.len() != length_multiplier.len()
            || parametric_links.len() != density.len()
        {
            return Err(MultibodyErrors::ParameterArity {
                links: parametric_links.len(),
                length_multipliers: length_multiplier.len(),
                densities: density.len(),
            });
        }

        let mut overrides = HashMap::with_capacity(parametric_links.len());
        for ((name, k), rho) in parametric_links.iter().zip(length_multiplier).zip(density) {
            if description.link(name).is_none() {
                return Err(MultibodyErrors::UnknownLink(name.clone()));
            }
            let link_override = LinkOverride {
                link: name.clone(),
                parameters: ShapeParameters::new(*k, *rho)?,
            };
            if overrides.insert(name.as_str(), link_override).is_some() {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "link '{}' is listed as parametric more than once",
                    name
                )));
            }
        }

        Ok(Self {
            description,
            overrides,
        })
    }

    pub fn is_parametric(&self, link: &str) -> bool {
        self.overrides.contains_key(link)
    }

    fn resolve_link(&self, link: &LinkDescription) -> Result<MassProperties<T>, MultibodyErrors> {
        if let Some(link_override) = self.overrides.get(link.name.as_str()) {
            let geometry = link.geometry.as_ref().ok_or_else(|| {
                MassPropertiesErrors::UnsupportedShape("none".to_string())
            })?;
            let mass_properties = link_override.parameters.resolve(geometry)?;
            tracing::debug!(
                link = link.name.as_str(),
                shape = geometry.shape.name(),
                mass = mass_properties.mass.to_f64(),
                "resolved parametric link"
            );
            return Ok(mass_properties);
        }

        match &link.inertial {
            Some(inertial) => nominal_mass_properties(inertial),
            None => {
                tracing::debug!(link = link.name.as_str(), "link has no inertial data, massless");
                Ok(MassProperties::massless())
            }
        }
    }

    fn joint_origin(&self, parent: &str, xyz: &[f64; 3], rpy: &[f64; 3]) -> Transform<T> {
        let mut origin = Transform::from_xyz_rpy(&vector(xyz), &vector(rpy));
        if let Some(link_override) = self.overrides.get(parent) {
            origin.translation = origin.translation * link_override.parameters.length_multiplier;
        }
        origin
    }

    pub fn build(&self, actuated_joints: &[String]) -> Result<Model<T>, MultibodyErrors> {
        let mut builder = ModelBuilder::new(&self.description.name);

        for link in &self.description.links {
            builder.add_link(Link::new(&link.name, self.resolve_link(link)?));
        }

        for joint in &self.description.joints {
            builder.add_joint(JointBuilder {
                name: joint.name.clone(),
                joint_type: joint.joint_type,
                parent: joint.parent.clone(),
                child: joint.child.clone(),
                origin: self.joint_origin(&joint.parent, &joint.origin.xyz, &joint.origin.rpy),
                axis: joint.axis,
                limits: joint.limits,
            });
        }

        builder.build(actuated_joints)
    }
}

fn vector<T: Real>(v: &[f64; 3]) -> Vector3<T> {
    Vector3::new(T::from_f64(v[0]), T::from_f64(v[1]), T::from_f64(v[2]))
}

fn nominal_mass_properties<T: Real>(
    inertial: &InertialDescription,
) -> Result<MassProperties<T>, MultibodyErrors> {
    let i = inertial;
    let principal = Matrix3::new(
        i.ixx, i.ixy, i.ixz, i.ixy, i.iyy, i.iyz, i.ixz, i.iyz, i.izz,
    );
    let rotation = rotation_from_rpy(&Vector3::from(i.origin.rpy));
    let inertia = rotation * principal * rotation.transpose();
    let inertia = Inertia::from_matrix(&inertia.map(T::from_f64))?;
    Ok(MassProperties::new(
        T::from_f64(i.mass),
        vector(&i.origin.xyz),
        inertia,
    )?)
}
