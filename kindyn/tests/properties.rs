use approx::{assert_abs_diff_eq, assert_relative_eq};
use kindyn::{KinDynConfig, KinDynErrors, ParametricInputs, ParametricKinDyn, Transform};
use mass_properties::{Geometry, MassPropertiesErrors, Shape};
use multibody::{
    InertialDescription, JointDescription, LinkDescription, MultibodyErrors, Origin,
    RobotDescription,
};
use nalgebra::{DMatrix, DVector, Matrix3, Vector3, Vector6};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;
use spatial_algebra::rotation::rotation_from_rpy;

/// Floating torso with two legs, the right knee left out of the actuated list.
fn biped() -> RobotDescription {
    let thigh = || {
        Geometry::new(Shape::Cylinder {
            radius: 0.06,
            length: 0.45,
        })
        .with_origin([0.0, 0.0, -0.225], [0.0; 3])
    };
    let shin = || {
        Geometry::new(Shape::Box {
            size: [0.08, 0.08, 0.4],
        })
        .with_origin([0.0, 0.0, -0.2], [0.0; 3])
    };
    RobotDescription::new("biped")
        .with_link(
            LinkDescription::new("torso").with_geometry(Geometry::new(Shape::Box {
                size: [0.3, 0.4, 0.5],
            })),
        )
        .with_link(LinkDescription::new("left_thigh").with_geometry(thigh()))
        .with_link(LinkDescription::new("right_thigh").with_geometry(thigh()))
        .with_link(LinkDescription::new("left_shin").with_geometry(shin()))
        .with_link(LinkDescription::new("right_shin").with_geometry(shin()))
        .with_link(LinkDescription::new("head").with_inertial(InertialDescription {
            origin: Origin::from_xyz([0.0, 0.0, 0.1]),
            mass: 2.5,
            ixx: 0.01,
            ixy: 0.0,
            ixz: 0.0,
            iyy: 0.01,
            iyz: 0.0,
            izz: 0.01,
        }))
        .with_joint(
            JointDescription::revolute("left_hip", "torso", "left_thigh", [0.0, 1.0, 0.0])
                .with_origin(Origin::from_xyz([0.0, 0.1, -0.25])),
        )
        .with_joint(
            JointDescription::revolute("right_hip", "torso", "right_thigh", [0.0, 1.0, 0.0])
                .with_origin(Origin::from_xyz([0.0, -0.1, -0.25])),
        )
        .with_joint(
            JointDescription::revolute("left_knee", "left_thigh", "left_shin", [0.0, 1.0, 0.0])
                .with_origin(Origin::from_xyz([0.0, 0.0, -0.45]))
                .with_limits(0.0, 2.5),
        )
        .with_joint(
            JointDescription::revolute("right_knee", "right_thigh", "right_shin", [0.0, 1.0, 0.0])
                .with_origin(Origin::from_xyz([0.0, 0.0, -0.45])),
        )
        .with_joint(
            JointDescription::new("neck", multibody::JointType::Continuous, "torso", "head")
                .with_axis([0.0, 0.0, 1.0])
                .with_origin(Origin::new([0.0, 0.0, 0.25], [0.0, 0.0, 0.3])),
        )
}

struct Fixture {
    description: RobotDescription,
    actuated: Vec<String>,
    parametric: Vec<String>,
}

fn strings(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

impl Fixture {
    fn new() -> Self {
        Self {
            description: biped(),
            actuated: strings(&["left_hip", "right_hip", "left_knee", "neck"]),
            parametric: strings(&["torso", "left_thigh", "right_thigh", "left_shin", "right_shin"]),
        }
    }

    fn inputs(&self, k: &[f64], density: &[f64]) -> ParametricInputs<'_, f64> {
        ParametricInputs::new(
            &self.description,
            &self.actuated,
            &self.parametric,
            DVector::from_row_slice(k),
            DVector::from_row_slice(density),
        )
    }

    fn nominal(&self) -> ParametricInputs<'_, f64> {
        self.inputs(&[1.0, 1.1, 0.9, 1.0, 1.2], &[300.0, 1000.0, 1000.0, 800.0, 850.0])
    }
}

fn base_transform() -> Transform<f64> {
    Transform::new(
        rotation_from_rpy(&Vector3::new(0.1, 0.4, -1.3)),
        Vector3::new(0.2, 0.3, 0.9),
    )
}

fn random_q(rng: &mut SmallRng) -> DVector<f64> {
    DVector::from_fn(4, |_, _| rng.random_range(-1.0..1.0))
}

#[test]
fn test_mass_matrix_is_symmetric_positive_definite() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let inputs = fixture.nominal();
    let mut rng = SmallRng::seed_from_u64(7);
    for _ in 0..10 {
        let q = random_q(&mut rng);
        let m = kindyn.mass_matrix(&inputs, &base_transform(), &q).unwrap();
        assert_eq!(m.shape(), (10, 10));
        assert_abs_diff_eq!(m, m.transpose(), epsilon = 1e-10);
        assert!(m.cholesky().is_some());
    }
}

#[test]
fn test_total_mass_is_configuration_invariant() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let inputs = fixture.nominal();
    let total = kindyn.total_mass(&inputs).unwrap();
    let mut rng = SmallRng::seed_from_u64(11);
    for _ in 0..5 {
        let q = random_q(&mut rng);
        let cmm = kindyn
            .centroidal_momentum_matrix(&inputs, &base_transform(), &q)
            .unwrap();
        let linear: Matrix3<f64> = cmm.fixed_view::<3, 3>(0, 0).into_owned();
        assert_abs_diff_eq!(linear, Matrix3::identity() * total, epsilon = 1e-9);
    }
}

#[test]
fn test_mass_scales_with_cube_of_multiplier() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let density = [300.0, 1000.0, 1000.0, 800.0, 850.0];
    let head = 2.5;
    let nominal = kindyn.total_mass(&fixture.inputs(&[1.0; 5], &density)).unwrap();
    let scaled = kindyn.total_mass(&fixture.inputs(&[1.3; 5], &density)).unwrap();
    assert_relative_eq!(
        scaled - head,
        1.3_f64.powi(3) * (nominal - head),
        max_relative = 1e-12
    );
}

#[test]
fn test_bias_force_vanishes_at_rest_without_gravity() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::new(KinDynConfig::default().with_gravity([0.0; 3]));
    let q = DVector::from_vec(vec![0.3, -0.4, 1.0, 0.2]);
    let h = kindyn
        .bias_force(
            &fixture.nominal(),
            &base_transform(),
            &q,
            &Vector6::zeros(),
            &DVector::zeros(4),
        )
        .unwrap();
    assert_abs_diff_eq!(h, DVector::zeros(10), epsilon = 1e-12);
}

#[test]
fn test_bias_force_splits_into_gravity_and_coriolis() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let inputs = fixture.nominal();
    let mut rng = SmallRng::seed_from_u64(3);
    let q = random_q(&mut rng);
    let base_velocity = Vector6::from_fn(|_, _| rng.random_range(-1.0..1.0));
    let joint_velocities = random_q(&mut rng);

    let bias = kindyn
        .bias_force(&inputs, &base_transform(), &q, &base_velocity, &joint_velocities)
        .unwrap();
    let coriolis = kindyn
        .coriolis_term(&inputs, &base_transform(), &q, &base_velocity, &joint_velocities)
        .unwrap();
    let gravity = kindyn.gravity_term(&inputs, &base_transform(), &q).unwrap();
    assert_abs_diff_eq!(bias, coriolis + gravity, epsilon = 1e-9);
}

#[test]
fn test_relative_jacobian_matches_full_jacobian() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let inputs = fixture.nominal();
    let q = DVector::from_vec(vec![0.5, -0.2, 0.8, 1.1]);
    let relative = kindyn.relative_jacobian(&inputs, "left_shin", &q).unwrap();
    let full = kindyn
        .jacobian(&inputs, "left_shin", &Transform::identity(), &q)
        .unwrap();
    assert_eq!(relative.shape(), (6, 4));
    assert_abs_diff_eq!(relative, full.columns(6, 4).into_owned(), epsilon = 1e-14);
}

#[test]
fn test_forward_kinematics_round_trip() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let inputs = fixture.nominal();
    let q = DVector::from_vec(vec![0.5, -0.2, 0.8, 1.1]);
    let base = base_transform();
    let world_from_shin = kindyn.forward_kinematics(&inputs, "left_shin", &base, &q).unwrap();
    let root_from_shin = kindyn
        .forward_kinematics(&inputs, "left_shin", &Transform::identity(), &q)
        .unwrap();
    assert_abs_diff_eq!(
        (base.inv() * world_from_shin).matrix(),
        root_from_shin.matrix(),
        epsilon = 1e-12
    );
    let torso = kindyn.forward_kinematics(&inputs, "torso", &base, &q).unwrap();
    assert_abs_diff_eq!(torso.matrix(), base.matrix(), epsilon = 1e-15);
}

#[test]
fn test_com_jacobian_agrees_with_centroidal_matrix() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let inputs = fixture.nominal();
    let q = DVector::from_vec(vec![0.1, 0.2, 0.3, 0.4]);
    let mass = kindyn.total_mass(&inputs).unwrap();
    let jacobian = kindyn.com_jacobian(&inputs, &base_transform(), &q).unwrap();
    let cmm = kindyn
        .centroidal_momentum_matrix(&inputs, &base_transform(), &q)
        .unwrap();
    assert_abs_diff_eq!(
        jacobian * mass,
        cmm.rows(0, 3).into_owned(),
        epsilon = 1e-10
    );
    let com = kindyn.com_position(&inputs, &base_transform(), &q).unwrap();
    assert!(com.iter().all(|c| c.is_finite()));
}

#[test]
fn test_forward_dynamics_satisfies_equations_of_motion() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let inputs = fixture.nominal();
    let q = DVector::from_vec(vec![0.1, -0.5, 0.9, 0.0]);
    let base_velocity = Vector6::new(0.1, 0.0, -0.2, 0.3, 0.1, 0.0);
    let joint_velocities = DVector::from_vec(vec![0.5, -0.1, 0.2, 1.0]);
    let torques = DVector::from_vec(vec![3.0, -2.0, 1.0, 0.1]);

    let nu_dot = kindyn
        .forward_dynamics(&inputs, &base_transform(), &q, &base_velocity, &joint_velocities, &torques)
        .unwrap();
    let m = kindyn.mass_matrix(&inputs, &base_transform(), &q).unwrap();
    let h = kindyn
        .bias_force(&inputs, &base_transform(), &q, &base_velocity, &joint_velocities)
        .unwrap();
    let mut expected = DVector::zeros(10);
    expected.rows_mut(6, 4).copy_from(&torques);
    assert_abs_diff_eq!(m * nu_dot + h, expected, epsilon = 1e-8);
}

#[test]
fn test_parallel_evaluation_matches_sequential() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let density = [300.0, 1000.0, 1000.0, 800.0, 850.0];
    let multipliers: Vec<f64> = (0..16).map(|i| 0.5 + 0.1 * i as f64).collect();
    let q = DVector::from_vec(vec![0.2, 0.1, 0.4, -0.3]);

    let evaluate = |k: f64| -> DMatrix<f64> {
        kindyn
            .mass_matrix(&fixture.inputs(&[k; 5], &density), &base_transform(), &q)
            .unwrap()
    };
    let parallel: Vec<DMatrix<f64>> = multipliers.par_iter().map(|k| evaluate(*k)).collect();
    let sequential: Vec<DMatrix<f64>> = multipliers.iter().map(|k| evaluate(*k)).collect();
    for (p, s) in parallel.iter().zip(&sequential) {
        assert_eq!(p, s);
    }
}

#[test]
fn test_errors_are_reported() {
    let fixture = Fixture::new();
    let kindyn = ParametricKinDyn::default();
    let q = DVector::zeros(4);

    // two parametric links, one density
    let links = strings(&["torso", "left_thigh"]);
    let inputs = ParametricInputs::new(
        &fixture.description,
        &fixture.actuated,
        &links,
        DVector::from_vec(vec![1.0, 1.0]),
        DVector::from_vec(vec![1000.0]),
    );
    assert!(matches!(
        kindyn.mass_matrix(&inputs, &base_transform(), &q),
        Err(KinDynErrors::Multibody(MultibodyErrors::ParameterArity { .. }))
    ));

    let missing_joint = strings(&["left_hip", "tail"]);
    let inputs = ParametricInputs::new(
        &fixture.description,
        &missing_joint,
        &fixture.parametric,
        DVector::from_element(5, 1.0),
        DVector::from_element(5, 1000.0),
    );
    assert!(matches!(
        kindyn.total_mass(&inputs),
        Err(KinDynErrors::Multibody(MultibodyErrors::UnknownJoint(name))) if name == "tail"
    ));

    assert!(matches!(
        kindyn.jacobian(&fixture.nominal(), "wing", &base_transform(), &q),
        Err(KinDynErrors::Multibody(MultibodyErrors::FrameNotFound(_)))
    ));

    let head = strings(&["head"]);
    let inputs = ParametricInputs::new(
        &fixture.description,
        &fixture.actuated,
        &head,
        DVector::from_element(1, 1.0),
        DVector::from_element(1, 1000.0),
    );
    assert!(matches!(
        kindyn.total_mass(&inputs),
        Err(KinDynErrors::Multibody(MultibodyErrors::MassProperties(
            MassPropertiesErrors::UnsupportedShape(_)
        )))
    ));

    assert!(matches!(
        kindyn.mass_matrix(&fixture.nominal(), &base_transform(), &DVector::zeros(3)),
        Err(KinDynErrors::Multibody(MultibodyErrors::StateDimension { .. }))
    ));
}
