use crate::{
    MultibodyErrors,
    description::{JointLimits, JointType},
    joint::{Joint, JointActuation},
    link::Link,
};
use nalgebra::Vector3;
use spatial_algebra::{Real, Transform};
use std::collections::{HashMap, HashSet, VecDeque};

#[derive(Debug, Clone)]
pub struct JointBuilder<T: Real> {
    pub name: String,
    pub joint_type: JointType,
    pub parent: String,
    pub child: String,
    pub origin: Transform<T>,
    pub axis: [f64; 3],
    pub limits: Option<JointLimits>,
}

/// Collects links and joints in any order and validates them into a [`Model`].
#[derive(Debug, Clone)]
pub struct ModelBuilder<T: Real> {
    pub name: String,
    pub links: Vec<Link<T>>,
    pub joints: Vec<JointBuilder<T>>,
}

impl<T: Real> ModelBuilder<T> {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            links: Vec::new(),
            joints: Vec::new(),
        }
    }

    pub fn add_link(&mut self, link: Link<T>) {
        self.links.push(link);
    }

    pub fn add_joint(&mut self, joint: JointBuilder<T>) {
        self.joints.push(joint);
    }

    fn validate(&self) -> Result<(), MultibodyErrors> {
        let mut link_names = HashSet::new();
        for link in &self.links {
            if !link_names.insert(link.name.as_str()) {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "link '{}' is defined more than once",
                    link.name
                )));
            }
        }

        let mut joint_names = HashSet::new();
        let mut children = HashSet::new();
        for joint in &self.joints {
            if !joint_names.insert(joint.name.as_str()) {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "joint '{}' is defined more than once",
                    joint.name
                )));
            }
            for end in [&joint.parent, &joint.child] {
                if !link_names.contains(end.as_str()) {
                    return Err(MultibodyErrors::ModelConstruction(format!(
                        "joint '{}' references missing link '{}'",
                        joint.name, end
                    )));
                }
            }
            if joint.parent == joint.child {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "joint '{}' connects link '{}' to itself",
                    joint.name, joint.child
                )));
            }
            if !children.insert(joint.child.as_str()) {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "link '{}' has more than one parent joint",
                    joint.child
                )));
            }
            if let Some(limits) = &joint.limits {
                if limits.lower.is_nan() || limits.upper.is_nan() || limits.lower > limits.upper {
                    return Err(MultibodyErrors::ModelConstruction(format!(
                        "joint '{}' has lower limit {} above upper limit {}",
                        joint.name, limits.lower, limits.upper
                    )));
                }
            }
            if joint.joint_type.has_axis() && joint.axis.iter().all(|a| *a == 0.0) {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "joint '{}' has a zero axis",
                    joint.name
                )));
            }
        }
        Ok(())
    }

    /// Orders the tree root first and assigns joint-space coordinates in the
    /// order of `actuated_joints`.
    pub fn build(self, actuated_joints: &[String]) -> Result<Model<T>, MultibodyErrors> {
        self.validate()?;

        let mut actuated: HashMap<&str, usize> = HashMap::new();
        for (dof, name) in actuated_joints.iter().enumerate() {
            let joint = self
                .joints
                .iter()
                .find(|j| &j.name == name)
                .ok_or_else(|| MultibodyErrors::UnknownJoint(name.clone()))?;
            if !joint.joint_type.has_axis() {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "joint '{}' of type {:?} cannot be actuated",
                    name, joint.joint_type
                )));
            }
            if actuated.insert(name.as_str(), dof).is_some() {
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "joint '{}' is listed as actuated more than once",
                    name
                )));
            }
        }

        let child_links: HashSet<&str> = self.joints.iter().map(|j| j.child.as_str()).collect();
        let roots: Vec<&Link<T>> = self
            .links
            .iter()
            .filter(|l| !child_links.contains(l.name.as_str()))
            .collect();
        let root = match roots.as_slice() {
            [root] => root.name.clone(),
            [] => {
                return Err(MultibodyErrors::ModelConstruction(
                    "no root link, every link has a parent joint".to_string(),
                ));
            }
            _ => {
                let names: Vec<&str> = roots.iter().map(|l| l.name.as_str()).collect();
                return Err(MultibodyErrors::ModelConstruction(format!(
                    "multiple root links {:?}",
                    names
                )));
            }
        };

        let mut outer_joints: HashMap<&str, Vec<&JointBuilder<T>>> = HashMap::new();
        for joint in &self.joints {
            outer_joints
                .entry(joint.parent.as_str())
                .or_default()
                .push(joint);
        }

        let mut unordered: HashMap<String, Link<T>> = self
            .links
            .iter()
            .map(|l| (l.name.clone(), l.clone()))
            .collect();

        let mut links = Vec::with_capacity(self.links.len());
        let mut joints = Vec::with_capacity(self.joints.len());
        let mut index: HashMap<String, usize> = HashMap::new();
        let mut queue = VecDeque::from([(root, None::<&JointBuilder<T>>)]);

        // breadth first, so every parent lands before its children
        while let Some((name, inner_joint)) = queue.pop_front() {
            let Some(mut link) = unordered.remove(&name) else {
                continue;
            };
            let link_index = links.len();

            if let Some(builder) = inner_joint {
                let parent = index[&builder.parent];
                let actuation = match (builder.joint_type, actuated.get(builder.name.as_str())) {
                    (_, Some(&dof)) => JointActuation::Actuated { dof },
                    (JointType::Fixed, None) => JointActuation::Fixed,
                    (_, None) => JointActuation::Locked,
                };
                let [x, y, z] = builder.axis;
                let norm = (x * x + y * y + z * z).sqrt();
                joints.push(Joint {
                    name: builder.name.clone(),
                    joint_type: builder.joint_type,
                    parent,
                    child: link_index,
                    origin: builder.origin,
                    axis: Vector3::new(
                        T::from_f64(x / norm),
                        T::from_f64(y / norm),
                        T::from_f64(z / norm),
                    ),
                    actuation,
                    limits: builder.limits,
                });
                link.parent_joint = Some(joints.len() - 1);
            }

            index.insert(name.clone(), link_index);
            links.push(link);

            if let Some(outer) = outer_joints.get(name.as_str()) {
                for joint in outer {
                    queue.push_back((joint.child.clone(), Some(*joint)));
                }
            }
        }

        if !unordered.is_empty() {
            let mut names: Vec<String> = unordered.into_keys().collect();
            names.sort();
            return Err(MultibodyErrors::ModelConstruction(format!(
                "links {:?} are not connected to the root",
                names
            )));
        }

        let model = Model {
            name: self.name,
            links,
            joints,
            index,
            ndof: actuated_joints.len(),
        };

        tracing::debug!(
            model = model.name.as_str(),
            links = model.links.len(),
            ndof = model.ndof,
            locked = ?model.locked_joints(),
            "built model"
        );

        Ok(model)
    }
}

/// Kinematic tree with links in topological order, root first.
///
/// Joint `j` always connects `joints[j].parent` to `joints[j].child` with the
/// parent stored before the child, so a forward sweep over `links` visits every
/// parent before its children.
#[derive(Debug, Clone)]
pub struct Model<T: Real> {
    pub name: String,
    links: Vec<Link<T>>,
    joints: Vec<Joint<T>>,
    index: HashMap<String, usize>,
    ndof: usize,
}

impl<T: Real> Model<T> {
    pub fn links(&self) -> &[Link<T>] {
        &self.links
    }

    pub fn joints(&self) -> &[Joint<T>] {
        &self.joints
    }

    pub fn root(&self) -> &Link<T> {
        &self.links[0]
    }

    pub fn ndof(&self) -> usize {
        self.ndof
    }

    pub fn link_index(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    pub fn link(&self, name: &str) -> Option<&Link<T>> {
        self.link_index(name).map(|i| &self.links[i])
    }

    pub fn joint(&self, name: &str) -> Option<&Joint<T>> {
        self.joints.iter().find(|j| j.name == name)
    }

    /// Joint connecting link `i` to its parent.
    pub fn parent_joint(&self, i: usize) -> Option<&Joint<T>> {
        self.links[i].parent_joint.map(|j| &self.joints[j])
    }

    /// Joint indices from the root down to `frame`.
    pub fn path(&self, frame: &str) -> Result<Vec<usize>, MultibodyErrors> {
        let mut i = self
            .link_index(frame)
            .ok_or_else(|| MultibodyErrors::FrameNotFound(frame.to_string()))?;
        let mut path = Vec::new();
        while let Some(j) = self.links[i].parent_joint {
            path.push(j);
            i = self.joints[j].parent;
        }
        path.reverse();
        Ok(path)
    }

    pub fn total_mass(&self) -> T {
        self.links
            .iter()
            .fold(T::zero(), |acc, link| acc + link.mass_properties.mass)
    }

    /// Names of actuated joints in joint-space order.
    pub fn actuated_joints(&self) -> Vec<&str> {
        let mut actuated: Vec<(usize, &str)> = self
            .joints
            .iter()
            .filter_map(|j| j.dof().map(|dof| (dof, j.name.as_str())))
            .collect();
        actuated.sort_unstable_by_key(|(dof, _)| *dof);
        actuated.into_iter().map(|(_, name)| name).collect()
    }

    pub fn locked_joints(&self) -> Vec<&str> {
        self.joints
            .iter()
            .filter(|j| j.actuation == JointActuation::Locked)
            .map(|j| j.name.as_str())
            .collect()
    }
}
