//! Time-varying coordinate transforms
//!
//! A [`Transform`] maps a position `p` at time `t` to a new position
//! `T(p, t)`, and reports its own time derivative (velocity) and spatial
//! Jacobian.  When used in a [`Sweep`](crate::space_time::Sweep), the
//! transform maps world coordinates into the local coordinates of the swept
//! shape, so a transform that moves the shape by `+v` is expressed as
//! `p - v·t`.
//!
//! Transforms can be chained with [`Compose`]; the curve transports
//! ([`Polyline`] and [`PolyBezier`]) carry a shape along a path, optionally
//! rotating it to follow the path's tangent.
use crate::{
    Error, fd,
    maths::{Matrix, Vector},
};

mod affine;
mod compose;
mod frame;
mod polybezier;
mod polyline;

pub use affine::{Rotation, Scale, Translation};
pub use compose::Compose;
pub use polybezier::PolyBezier;
pub use polyline::Polyline;

/// A time-parametrized coordinate map with analytic derivatives
///
/// [`velocity`](Self::velocity) must be `∂T/∂t`, and
/// [`position_jacobian`](Self::position_jacobian) must be `∂T/∂p` (with
/// column `i` holding the derivative with respect to `p[i]`).
pub trait Transform<const N: usize>: Send + Sync {
    /// Applies the transform to a position at time `t`
    fn transform(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error>;

    /// Returns the derivative of [`transform`](Self::transform) with respect
    /// to time
    fn velocity(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error>;

    /// Returns the Jacobian of [`transform`](Self::transform) with respect to
    /// position
    fn position_jacobian(
        &self,
        pos: &Vector<N>,
        t: f64,
    ) -> Result<Matrix<N>, Error>;

    /// Estimates the velocity with central differences in time
    fn finite_difference_velocity(
        &self,
        pos: &Vector<N>,
        t: f64,
        delta: f64,
    ) -> Result<Vector<N>, Error> {
        fd::vector_derivative(|t| self.transform(pos, t), t, delta)
    }

    /// Estimates the position Jacobian with central differences
    fn finite_difference_jacobian(
        &self,
        pos: &Vector<N>,
        t: f64,
        delta: f64,
    ) -> Result<Matrix<N>, Error> {
        fd::jacobian(|p| self.transform(p, t), pos, delta)
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Checks analytic velocity and Jacobian against central differences
    pub fn check_transform<const N: usize>(
        tr: &dyn Transform<N>,
        pos: &Vector<N>,
        t: f64,
        tol: f64,
    ) {
        let v = tr.velocity(pos, t).unwrap();
        let fv = tr.finite_difference_velocity(pos, t, fd::STEP).unwrap();
        assert!(
            (v - fv).amax() < tol,
            "velocity mismatch at {pos:?}, t = {t}: analytic {v:?}, \
             numeric {fv:?}"
        );
        let j = tr.position_jacobian(pos, t).unwrap();
        let fj = tr.finite_difference_jacobian(pos, t, fd::STEP).unwrap();
        assert!(
            (j - fj).amax() < tol,
            "jacobian mismatch at {pos:?}, t = {t}: analytic {j:?}, \
             numeric {fj:?}"
        );
    }
}
