//! Shape parameter derivatives through a forward-mode dual number.

use approx::assert_relative_eq;
use kindyn::{ParametricInputs, ParametricKinDyn, Real, Transform};
use mass_properties::{Geometry, Shape};
use multibody::{JointDescription, LinkDescription, Origin, RobotDescription};
use nalgebra::DVector;
use num_traits::{One, Zero};
use std::f64::consts::FRAC_PI_2;
use std::ops::{Add, AddAssign, Div, DivAssign, Mul, MulAssign, Neg, Sub, SubAssign};

/// `re + du * eps` with `eps^2 = 0`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
struct Dual {
    re: f64,
    du: f64,
}

impl Dual {
    fn constant(re: f64) -> Self {
        Self { re, du: 0.0 }
    }

    fn variable(re: f64) -> Self {
        Self { re, du: 1.0 }
    }
}

impl Add for Dual {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            re: self.re + rhs.re,
            du: self.du + rhs.du,
        }
    }
}

impl Sub for Dual {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            re: self.re - rhs.re,
            du: self.du - rhs.du,
        }
    }
}

impl Mul for Dual {
    type Output = Self;
    fn mul(self, rhs: Self) -> Self {
        Self {
            re: self.re * rhs.re,
            du: self.du * rhs.re + self.re * rhs.du,
        }
    }
}

impl Div for Dual {
    type Output = Self;
    fn div(self, rhs: Self) -> Self {
        Self {
            re: self.re / rhs.re,
            du: (self.du * rhs.re - self.re * rhs.du) / (rhs.re * rhs.re),
        }
    }
}

impl Neg for Dual {
    type Output = Self;
    fn neg(self) -> Self {
        Self {
            re: -self.re,
            du: -self.du,
        }
    }
}

impl AddAssign for Dual {
    fn add_assign(&mut self, rhs: Self) {
        *self = *self + rhs;
    }
}

impl SubAssign for Dual {
    fn sub_assign(&mut self, rhs: Self) {
        *self = *self - rhs;
    }
}

impl MulAssign for Dual {
    fn mul_assign(&mut self, rhs: Self) {
        *self = *self * rhs;
    }
}

impl DivAssign for Dual {
    fn div_assign(&mut self, rhs: Self) {
        *self = *self / rhs;
    }
}

impl Zero for Dual {
    fn zero() -> Self {
        Self::constant(0.0)
    }

    fn is_zero(&self) -> bool {
        self.re == 0.0 && self.du == 0.0
    }
}

impl One for Dual {
    fn one() -> Self {
        Self::constant(1.0)
    }
}

impl Real for Dual {
    fn from_f64(value: f64) -> Self {
        Self::constant(value)
    }

    fn to_f64(&self) -> f64 {
        self.re
    }

    fn sin(self) -> Self {
        Self {
            re: self.re.sin(),
            du: self.du * self.re.cos(),
        }
    }

    fn cos(self) -> Self {
        Self {
            re: self.re.cos(),
            du: -self.du * self.re.sin(),
        }
    }

    fn sqrt(self) -> Self {
        let re = self.re.sqrt();
        Self {
            re,
            du: self.du / (2.0 * re),
        }
    }
}

fn arm() -> RobotDescription {
    RobotDescription::new("arm")
        .with_link(
            LinkDescription::new("shoulder").with_geometry(Geometry::new(Shape::Sphere {
                radius: 0.1,
            })),
        )
        .with_link(
            LinkDescription::new("upper").with_geometry(
                Geometry::new(Shape::Cylinder {
                    radius: 0.04,
                    length: 0.6,
                })
                .with_origin([0.0, 0.0, -0.3], [0.0; 3]),
            ),
        )
        .with_link(LinkDescription::new("hand"))
        .with_joint(JointDescription::revolute("pitch", "shoulder", "upper", [0.0, 1.0, 0.0]))
        .with_joint(
            JointDescription::fixed("wrist", "upper", "hand")
                .with_origin(Origin::from_xyz([0.0, 0.0, -0.6])),
        )
}

struct Fixture {
    description: RobotDescription,
    actuated: Vec<String>,
    parametric: Vec<String>,
}

impl Fixture {
    fn new() -> Self {
        Self {
            description: arm(),
            actuated: vec!["pitch".to_string()],
            parametric: vec!["shoulder".to_string(), "upper".to_string()],
        }
    }

    /// Seeds the derivative on the multiplier of the upper arm.
    fn dual_inputs(&self, k: f64) -> ParametricInputs<'_, Dual> {
        ParametricInputs::new(
            &self.description,
            &self.actuated,
            &self.parametric,
            DVector::from_vec(vec![Dual::constant(1.0), Dual::variable(k)]),
            DVector::from_vec(vec![Dual::constant(2000.0), Dual::constant(1000.0)]),
        )
    }

    fn inputs(&self, k: f64) -> ParametricInputs<'_, f64> {
        ParametricInputs::new(
            &self.description,
            &self.actuated,
            &self.parametric,
            DVector::from_vec(vec![1.0, k]),
            DVector::from_vec(vec![2000.0, 1000.0]),
        )
    }
}

#[test]
fn test_total_mass_derivative() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let k = 1.4;
    let mass = kindyn.total_mass(&fixture.dual_inputs(k)).unwrap();
    let upper = kindyn.total_mass(&fixture.inputs(k)).unwrap()
        - kindyn.total_mass(&fixture.inputs(1e-9)).unwrap();
    // only the upper arm depends on k, as k^3
    assert_relative_eq!(mass.du, 3.0 * upper / k, max_relative = 1e-6);
    assert_relative_eq!(
        mass.re,
        kindyn.total_mass(&fixture.inputs(k)).unwrap(),
        max_relative = 1e-12
    );
}

#[test]
fn test_dynamics_derivatives_match_finite_differences() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let k = 0.8;
    let h = 1e-6;
    let q = DVector::from_vec(vec![0.7]);
    let q_dual = q.map(Dual::constant);
    let base = Transform::identity();

    let gravity = kindyn
        .gravity_term(&fixture.dual_inputs(k), &Transform::identity(), &q_dual)
        .unwrap();
    let plus = kindyn.gravity_term(&fixture.inputs(k + h), &base, &q).unwrap();
    let minus = kindyn.gravity_term(&fixture.inputs(k - h), &base, &q).unwrap();
    for i in 0..7 {
        let expected = (plus[i] - minus[i]) / (2.0 * h);
        assert_relative_eq!(gravity[i].du, expected, epsilon = 1e-5, max_relative = 1e-5);
    }

    let m = kindyn
        .mass_matrix(&fixture.dual_inputs(k), &Transform::identity(), &q_dual)
        .unwrap();
    let plus = kindyn.mass_matrix(&fixture.inputs(k + h), &base, &q).unwrap();
    let minus = kindyn.mass_matrix(&fixture.inputs(k - h), &base, &q).unwrap();
    for (i, entry) in m.iter().enumerate() {
        let expected = (plus[i] - minus[i]) / (2.0 * h);
        assert_relative_eq!(entry.du, expected, epsilon = 1e-5, max_relative = 1e-5);
    }
}

#[test]
fn test_hand_position_derivative() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let q = DVector::from_vec(vec![FRAC_PI_2]).map(Dual::constant);
    let hand = kindyn
        .forward_kinematics(&fixture.dual_inputs(1.0), "hand", &Transform::identity(), &q)
        .unwrap();
    // hand sits at -0.6 k along the rotated rod, i.e. at (-0.6 k, 0, 0)
    assert_relative_eq!(hand.translation[0].re, -0.6, epsilon = 1e-12);
    assert_relative_eq!(hand.translation[0].du, -0.6, epsilon = 1e-12);
    assert_relative_eq!(hand.translation[2].du, 0.0, epsilon = 1e-12);
}
