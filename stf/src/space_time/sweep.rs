use super::SpaceTimeFunction;
use crate::{
    Error, grad::Grad, implicit::ImplicitFunction, maths::Vector,
    transform::Transform,
};
use std::sync::Arc;

/// An implicit function carried through space by a transform
///
/// The swept field is `f(T(p, t))`: the transform maps world positions into
/// the function's local coordinates at each time.
#[derive(Clone)]
pub struct Sweep<const N: usize> {
    function: Arc<dyn ImplicitFunction<N>>,
    transform: Arc<dyn Transform<N>>,
}

impl<const N: usize> Sweep<N> {
    /// Builds a new sweep
    pub fn new(
        function: Arc<dyn ImplicitFunction<N>>,
        transform: Arc<dyn Transform<N>>,
    ) -> Self {
        Self {
            function,
            transform,
        }
    }
}

impl<const N: usize> SpaceTimeFunction<N> for Sweep<N> {
    fn value(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        let q = self.transform.transform(pos, t)?;
        Ok(self.function.value(&q))
    }

    fn time_derivative(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        let q = self.transform.transform(pos, t)?;
        let v = self.transform.velocity(pos, t)?;
        Ok(self.function.gradient(&q).dot(&v))
    }

    fn gradient(&self, pos: &Vector<N>, t: f64) -> Result<Grad<N>, Error> {
        let q = self.transform.transform(pos, t)?;
        let v = self.transform.velocity(pos, t)?;
        let j = self.transform.position_jacobian(pos, t)?;
        let g = self.function.gradient(&q);
        Ok(Grad::new(j.transpose() * g, g.dot(&v)))
    }
}
