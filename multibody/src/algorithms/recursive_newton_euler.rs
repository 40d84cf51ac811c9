use super::{RigidBodyAlgorithms, mixed::generalized_transform};
use crate::MultibodyErrors;
use nalgebra::{DVector, Vector3, Vector6};
use spatial_algebra::{ForceVector, MotionVector, Real, Transform};

impl<T: Real> RigidBodyAlgorithms<'_, T> {
    /// Recursive Newton-Euler with zero generalized acceleration.
    ///
    /// Returns the `6 + n` bias force `h` of `M nu_dot + h = tau` in the mixed
    /// representation. `gravity` is the world-axes gravitational acceleration,
    /// e.g. `[0, 0, -9.81]`. With zero gravity the result is the Coriolis and
    /// centrifugal term, with zero velocities it is the gravity term.
    pub fn rnea(
        &self,
        base_transform: &Transform<T>,
        q: &DVector<T>,
        base_velocity: &Vector6<T>,
        joint_velocities: &DVector<T>,
        gravity: &Vector3<T>,
    ) -> Result<DVector<T>, MultibodyErrors> {
        self.check_joint_vector("joint positions", q)?;
        self.check_joint_vector("joint velocities", joint_velocities)?;

        let n = self.model.ndof();
        let links = self.model.links();
        let kinematics = self.tree_kinematics(q);

        let rt = base_transform.rotation.transpose();
        let p_dot: Vector3<T> = base_velocity.fixed_rows::<3>(0).into_owned();
        let omega: Vector3<T> = base_velocity.fixed_rows::<3>(3).into_owned();

        // mixed base acceleration held at zero, seen in base coordinates, plus gravity
        let v0 = MotionVector::new(rt * omega, rt * p_dot);
        let a0 = MotionVector::new(
            Vector3::zeros(),
            -(rt * gravity) - rt * omega.cross(&p_dot),
        );

        let mut v: Vec<MotionVector<T>> = Vec::with_capacity(links.len());
        let mut a: Vec<MotionVector<T>> = Vec::with_capacity(links.len());
        let mut f: Vec<ForceVector<T>> = Vec::with_capacity(links.len());

        for (i, link) in links.iter().enumerate() {
            let (vi, ai) = match self.model.parent_joint(i) {
                Some(joint) => {
                    let link_from_parent = kinematics.parent_from_link[i].inv();
                    let vj = match (joint.dof(), joint.motion_subspace()) {
                        (Some(k), Some(s)) => s * joint_velocities[k],
                        _ => MotionVector::zeros(),
                    };
                    let vi = link_from_parent * v[joint.parent] + vj;
                    let ai = link_from_parent * a[joint.parent] + vi.cross_motion(vj);
                    (vi, ai)
                }
                None => (v0, a0),
            };
            let inertia = link.spatial_inertia();
            f.push(inertia * ai + vi.cross_force(inertia * vi));
            v.push(vi);
            a.push(ai);
        }

        let mut tau = DVector::zeros(6 + n);
        for i in (1..links.len()).rev() {
            let Some(joint) = self.model.parent_joint(i) else {
                continue;
            };
            if let (Some(k), Some(s)) = (joint.dof(), joint.motion_subspace()) {
                tau[6 + k] = s.dot(&f[i]);
            }
            let fi = f[i];
            f[joint.parent] += kinematics.parent_from_link[i] * fi;
        }
        tau.fixed_rows_mut::<6>(0).copy_from(&f[0].vector());

        let t = generalized_transform(&base_transform.rotation, n);
        Ok(t.transpose() * tau)
    }
}
