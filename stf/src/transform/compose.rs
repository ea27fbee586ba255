use super::Transform;
use crate::{
    Error,
    maths::{Matrix, Vector},
};
use std::sync::Arc;

/// Applies one transform, then another
///
/// `Compose::new(a, b)` evaluates `b(a(p, t), t)`; velocity and Jacobian
/// follow from the chain rule.
#[derive(Clone)]
pub struct Compose<const N: usize> {
    first: Arc<dyn Transform<N>>,
    second: Arc<dyn Transform<N>>,
}

impl<const N: usize> Compose<N> {
    /// Builds a composition which applies `first`, then `second`
    pub fn new(
        first: Arc<dyn Transform<N>>,
        second: Arc<dyn Transform<N>>,
    ) -> Self {
        Self { first, second }
    }
}

impl<const N: usize> Transform<N> for Compose<N> {
    fn transform(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        let mid = self.first.transform(pos, t)?;
        self.second.transform(&mid, t)
    }

    fn velocity(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        let mid = self.first.transform(pos, t)?;
        let v1 = self.first.velocity(pos, t)?;
        let v2 = self.second.velocity(&mid, t)?;
        let j2 = self.second.position_jacobian(&mid, t)?;
        Ok(v2 + j2 * v1)
    }

    fn position_jacobian(
        &self,
        pos: &Vector<N>,
        t: f64,
    ) -> Result<Matrix<N>, Error> {
        let mid = self.first.transform(pos, t)?;
        let j1 = self.first.position_jacobian(pos, t)?;
        let j2 = self.second.position_jacobian(&mid, t)?;
        Ok(j2 * j1)
    }
}
