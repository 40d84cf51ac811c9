use crate::{Inertia, MassProperties, MassPropertiesErrors};
use nalgebra::{Matrix3, Vector3};
use serde::{Deserialize, Serialize};
use spatial_algebra::{Real, rotation::rotation_from_rpy};

/// Nominal link shape, dimensions in meters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Box { size: [f64; 3] },
    /// Axis along the local z axis of the shape frame.
    Cylinder { radius: f64, length: f64 },
    Sphere { radius: f64 },
    Mesh { filename: String },
}

impl Shape {
    pub fn name(&self) -> &'static str {
        match self {
            Shape::Box { .. } => "box",
            Shape::Cylinder { .. } => "cylinder",
            Shape::Sphere { .. } => "sphere",
            Shape::Mesh { .. } => "mesh",
        }
    }
}

/// A shape placed in the link frame.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    pub shape: Shape,
    #[serde(default)]
    pub xyz: [f64; 3],
    #[serde(default)]
    pub rpy: [f64; 3],
}

impl Geometry {
    pub fn new(shape: Shape) -> Self {
        Self {
            shape,
            xyz: [0.0; 3],
            rpy: [0.0; 3],
        }
    }

    pub fn with_origin(mut self, xyz: [f64; 3], rpy: [f64; 3]) -> Self {
        self.xyz = xyz;
        self.rpy = rpy;
        self
    }
}

/// Shape parameters of one parametric link.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ShapeParameters<T: Real> {
    pub length_multiplier: T,
    pub density: T,
}

impl<T: Real> ShapeParameters<T> {
    pub fn new(length_multiplier: T, density: T) -> Result<Self, MassPropertiesErrors> {
        positive("length_multiplier", length_multiplier)?;
        positive("density", density)?;
        Ok(Self {
            length_multiplier,
            density,
        })
    }

    /// Mass properties of `geometry` scaled uniformly by the length multiplier
    /// and filled with the density. The shape origin offset scales with the
    /// dimensions, so the center of mass moves linearly with the multiplier.
    pub fn resolve(&self, geometry: &Geometry) -> Result<MassProperties<T>, MassPropertiesErrors> {
        let k = self.length_multiplier;
        let rho = self.density;
        let twelfth = T::from_f64(1.0 / 12.0);

        let (mass, principal) = match &geometry.shape {
            Shape::Box { size } => {
                let x = positive("box size x", T::from_f64(size[0]))? * k;
                let y = positive("box size y", T::from_f64(size[1]))? * k;
                let z = positive("box size z", T::from_f64(size[2]))? * k;
                let m = rho * x * y * z;
                let (xx, yy, zz) = (x * x, y * y, z * z);
                (
                    m,
                    Vector3::new(
                        m * (yy + zz) * twelfth,
                        m * (xx + zz) * twelfth,
                        m * (xx + yy) * twelfth,
                    ),
                )
            }
            Shape::Cylinder { radius, length } => {
                let r = positive("cylinder radius", T::from_f64(*radius))? * k;
                let h = positive("cylinder length", T::from_f64(*length))? * k;
                let rr = r * r;
                let m = rho * T::pi() * rr * h;
                let transverse = m * (T::from_f64(3.0) * rr + h * h) * twelfth;
                (
                    m,
                    Vector3::new(transverse, transverse, m * rr * T::from_f64(0.5)),
                )
            }
            Shape::Sphere { radius } => {
                let r = positive("sphere radius", T::from_f64(*radius))? * k;
                let rr = r * r;
                let m = rho * T::from_f64(4.0 / 3.0) * T::pi() * rr * r;
                let i = m * rr * T::from_f64(0.4);
                (m, Vector3::new(i, i, i))
            }
            Shape::Mesh { .. } => {
                return Err(MassPropertiesErrors::UnsupportedShape(
                    geometry.shape.name().to_string(),
                ));
            }
        };

        let rpy = Vector3::new(
            T::from_f64(geometry.rpy[0]),
            T::from_f64(geometry.rpy[1]),
            T::from_f64(geometry.rpy[2]),
        );
        let rotation = rotation_from_rpy(&rpy);
        let inertia = rotation * Matrix3::from_diagonal(&principal) * rotation.transpose();
        let center_of_mass = Vector3::new(
            T::from_f64(geometry.xyz[0]),
            T::from_f64(geometry.xyz[1]),
            T::from_f64(geometry.xyz[2]),
        ) * k;

        MassProperties::new(mass, center_of_mass, Inertia::from_matrix(&inertia)?)
    }
}

fn positive<T: Real>(name: &'static str, value: T) -> Result<T, MassPropertiesErrors> {
    let primal = value.to_f64();
    if primal > 0.0 && primal.is_finite() {
        Ok(value)
    } else {
        Err(MassPropertiesErrors::InvalidParameter {
            name,
            value: primal,
        })
    }
}
