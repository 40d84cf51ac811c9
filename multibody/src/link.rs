use mass_properties::MassProperties;
use spatial_algebra::{Real, SpatialInertia};

#[derive(Debug, Clone)]
pub struct Link<T: Real> {
    pub name: String,
    pub mass_properties: MassProperties<T>,
    /// Index of the joint connecting this link to its parent, `None` for the root.
    pub parent_joint: Option<usize>,
}

impl<T: Real> Link<T> {
    pub fn new(name: &str, mass_properties: MassProperties<T>) -> Self {
        Self {
            name: name.to_string(),
            mass_properties,
            parent_joint: None,
        }
    }

    pub fn spatial_inertia(&self) -> SpatialInertia<T> {
        self.mass_properties.spatial_inertia()
    }
}
