use crate::KinDynErrors;
use nalgebra::Vector3;
use serde::{Deserialize, Serialize};
use spatial_algebra::Real;

/// Standard gravity along world -z.
pub const STANDARD_GRAVITY: [f64; 3] = [0.0, 0.0, -9.80665];

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct KinDynConfig {
    /// World-axes gravitational acceleration.
    #[serde(default = "standard_gravity")]
    pub gravity: [f64; 3],
}

fn standard_gravity() -> [f64; 3] {
    STANDARD_GRAVITY
}

impl Default for KinDynConfig {
    fn default() -> Self {
        Self {
            gravity: STANDARD_GRAVITY,
        }
    }
}

impl KinDynConfig {
    pub fn with_gravity(mut self, gravity: [f64; 3]) -> Self {
        self.gravity = gravity;
        self
    }

    pub fn from_ron(s: &str) -> Result<Self, KinDynErrors> {
        ron::from_str(s).map_err(|e| KinDynErrors::Config(e.to_string()))
    }

    pub fn gravity<T: Real>(&self) -> Vector3<T> {
        Vector3::new(
            T::from_f64(self.gravity[0]),
            T::from_f64(self.gravity[1]),
            T::from_f64(self.gravity[2]),
        )
    }
}
