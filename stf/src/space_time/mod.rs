//! Time-varying implicit functions
//!
//! A [`SpaceTimeFunction`] is a scalar field `f(p, t)` over space and a
//! normalized time parameter `t ∈ [0, 1]`, together with its time derivative
//! and its full space-time gradient.
//!
//! The usual way to build one is a [`Sweep`], which moves an
//! [`ImplicitFunction`](crate::ImplicitFunction) with a
//! [`Transform`](crate::Transform).  Space-time functions are then combined
//! with [`Union`], [`Interpolate`], and [`Offset`]; every combinator computes
//! its derivatives from its children's derivatives with the chain rule, so no
//! finite differences are used during evaluation.  The one exception is
//! [`ExplicitForm`], which falls back to finite differences when it isn't
//! given analytic derivatives (see [`DerivativeMode`]).
//!
//! ```
//! use nalgebra::Vector3;
//! use std::sync::Arc;
//! use stf::{
//!     SpaceTimeFunction,
//!     implicit::Ball,
//!     space_time::Sweep,
//!     transform::Translation,
//! };
//!
//! let ball = Ball::new(0.5, Vector3::zeros())?;
//! let shift = Translation::new(Vector3::new(-1.0, 0.0, 0.0));
//! let sweep = Sweep::new(Arc::new(ball), Arc::new(shift));
//!
//! let p = Vector3::new(0.0, 0.0, 0.0);
//! assert_eq!(sweep.value(&p, 1.0)?, 0.5);
//! assert_eq!(sweep.time_derivative(&p, 1.0)?, 1.0);
//! # Ok::<(), stf::Error>(())
//! ```
use crate::{Error, fd, grad::Grad, maths::Vector};

mod explicit;
mod interpolate;
mod offset;
mod profile;
mod sweep;
mod union;

pub use explicit::{DerivativeMode, ExplicitForm};
pub use interpolate::Interpolate;
pub use offset::Offset;
pub use profile::{BezierProfile, CustomProfile, Profile};
pub use sweep::Sweep;
pub use union::Union;

/// A scalar field over space and time with analytic derivatives
///
/// The time component of [`gradient`](Self::gradient) must equal
/// [`time_derivative`](Self::time_derivative).
pub trait SpaceTimeFunction<const N: usize>: Send + Sync {
    /// Evaluates the field at the given position and time
    fn value(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error>;

    /// Evaluates `∂f/∂t` at the given position and time
    fn time_derivative(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error>;

    /// Evaluates the space-time gradient at the given position and time
    fn gradient(&self, pos: &Vector<N>, t: f64) -> Result<Grad<N>, Error>;

    /// Estimates the space-time gradient with central differences
    ///
    /// This is a debugging tool, and is never used during evaluation.
    fn finite_difference_gradient(
        &self,
        pos: &Vector<N>,
        t: f64,
        delta: f64,
    ) -> Result<Grad<N>, Error> {
        let spatial = fd::gradient(|p| self.value(p, t), pos, delta)?;
        let dt = fd::derivative(|t| self.value(pos, t), t, delta)?;
        Ok(Grad::new(spatial, dt))
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Checks an analytic space-time gradient against central differences
    ///
    /// Also checks that the gradient's time component matches
    /// `time_derivative`.
    pub fn check_gradient<const N: usize>(
        f: &dyn SpaceTimeFunction<N>,
        pos: &Vector<N>,
        t: f64,
        tol: f64,
    ) {
        let g = f.gradient(pos, t).unwrap();
        let dt = f.time_derivative(pos, t).unwrap();
        assert!(
            (g.dt - dt).abs() < 1e-12,
            "time derivative mismatch at {pos:?}, t = {t}: gradient has {}, \
             time_derivative returned {dt}",
            g.dt
        );
        let n = f.finite_difference_gradient(pos, t, fd::STEP).unwrap();
        assert!(
            g.max_abs_diff(&n) < tol,
            "gradient mismatch at {pos:?}, t = {t}: analytic {g}, \
             numeric {n}"
        );
    }
}
