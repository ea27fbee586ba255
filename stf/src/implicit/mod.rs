//! Time-independent implicit surfaces
//!
//! An [`ImplicitFunction`] is a scalar field `f(p)` together with its analytic
//! gradient.  By convention, `f(p) < 0` is inside the shape, `f(p) > 0` is
//! outside, and the zero level set is the surface.
//!
//! Implicit functions have no evaluation-time error path: they are defined
//! for every position once constructed.  They become time-dependent when
//! transported by a [`Transform`](crate::Transform) inside a
//! [`Sweep`](crate::space_time::Sweep).
use crate::{fd, maths::Vector};
use std::convert::Infallible;

mod generic;
mod primitives;
mod rbf;
mod union;

pub use generic::GenericFunction;
pub use primitives::{Ball, Capsule, Torus};
pub use rbf::{Duchon, Vipss};
pub use union::ImplicitUnion;

/// A scalar field with an analytic gradient
///
/// Implementations must return the true gradient of [`value`](Self::value)
/// from [`gradient`](Self::gradient); this is checked in tests against
/// [`finite_difference_gradient`](Self::finite_difference_gradient).
pub trait ImplicitFunction<const N: usize>: Send + Sync {
    /// Evaluates the field at the given position
    fn value(&self, pos: &Vector<N>) -> f64;

    /// Evaluates the gradient of the field at the given position
    fn gradient(&self, pos: &Vector<N>) -> Vector<N>;

    /// Estimates the gradient with central differences
    ///
    /// This is a debugging tool, and is never used during evaluation.
    fn finite_difference_gradient(
        &self,
        pos: &Vector<N>,
        delta: f64,
    ) -> Vector<N> {
        let Ok(out) =
            fd::gradient(|p| Ok::<_, Infallible>(self.value(p)), pos, delta);
        out
    }
}

#[cfg(test)]
pub(crate) mod test_util {
    use super::*;

    /// Checks an analytic gradient against central differences
    pub fn check_gradient<const N: usize>(
        f: &dyn ImplicitFunction<N>,
        pos: &Vector<N>,
        tol: f64,
    ) {
        let a = f.gradient(pos);
        let b = f.finite_difference_gradient(pos, fd::STEP);
        assert!(
            (a - b).amax() < tol,
            "gradient mismatch at {pos:?}: analytic {a:?}, numeric {b:?}"
        );
    }
}
