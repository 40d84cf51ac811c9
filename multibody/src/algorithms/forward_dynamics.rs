use super::RigidBodyAlgorithms;
use crate::MultibodyErrors;
use nalgebra::{DMatrix, DVector, Vector3, Vector6};
use spatial_algebra::{Real, Transform};

impl<T: Real> RigidBodyAlgorithms<'_, T> {
    /// Generalized acceleration `[p_ddot; omega_dot; q_ddot]` of the unforced
    /// floating base under joint torques, from `M nu_dot = [0; tau] - h`.
    pub fn forward_dynamics(
        &self,
        base_transform: &Transform<T>,
        q: &DVector<T>,
        base_velocity: &Vector6<T>,
        joint_velocities: &DVector<T>,
        joint_torques: &DVector<T>,
        gravity: &Vector3<T>,
    ) -> Result<DVector<T>, MultibodyErrors> {
        self.check_joint_vector("joint torques", joint_torques)?;
        let (m, _) = self.crba(base_transform, q)?;
        let h = self.rnea(base_transform, q, base_velocity, joint_velocities, gravity)?;

        let mut rhs = -h;
        for (k, tau) in joint_torques.iter().enumerate() {
            rhs[6 + k] += *tau;
        }
        let l = cholesky(&m)?;
        Ok(cholesky_solve(&l, &rhs))
    }
}

/// Lower triangular `l` with `m = l l^T`. Only the lower triangle of `m` is read.
pub fn cholesky<T: Real>(m: &DMatrix<T>) -> Result<DMatrix<T>, MultibodyErrors> {
    let n = m.nrows();
    let mut l = DMatrix::zeros(n, n);
    for j in 0..n {
        let mut d = m[(j, j)];
        for k in 0..j {
            d -= l[(j, k)] * l[(j, k)];
        }
        let pivot = d.to_f64();
        if pivot.is_nan() || pivot <= 0.0 {
            return Err(MultibodyErrors::Numerical(format!(
                "mass matrix is not positive definite, pivot {} is {}",
                j, pivot
            )));
        }
        let ljj = d.sqrt();
        l[(j, j)] = ljj;
        for i in (j + 1)..n {
            let mut s = m[(i, j)];
            for k in 0..j {
                s -= l[(i, k)] * l[(j, k)];
            }
            l[(i, j)] = s / ljj;
        }
    }
    Ok(l)
}

/// Solves `l l^T x = b` by forward then back substitution.
pub fn cholesky_solve<T: Real>(l: &DMatrix<T>, b: &DVector<T>) -> DVector<T> {
    let n = l.nrows();
    let mut y = b.clone();
    for i in 0..n {
        for k in 0..i {
            let lik = l[(i, k)];
            let yk = y[k];
            y[i] -= lik * yk;
        }
        y[i] = y[i] / l[(i, i)];
    }
    let mut x = y;
    for i in (0..n).rev() {
        for k in (i + 1)..n {
            let lki = l[(k, i)];
            let xk = x[k];
            x[i] -= lki * xk;
        }
        x[i] = x[i] / l[(i, i)];
    }
    x
}
