use super::{Profile, SpaceTimeFunction};
use crate::{Error, grad::Grad, maths::Vector};
use std::sync::Arc;

/// Adds a function of time to a space-time function
///
/// This grows or shrinks the underlying shape uniformly: a positive offset
/// moves the surface inwards.  The spatial gradient is unchanged.
#[derive(Clone)]
pub struct Offset<const N: usize> {
    function: Arc<dyn SpaceTimeFunction<N>>,
    offset: Profile,
}

impl<const N: usize> Offset<N> {
    /// Builds a new offset function
    pub fn new(
        function: Arc<dyn SpaceTimeFunction<N>>,
        offset: Profile,
    ) -> Self {
        Self { function, offset }
    }
}

impl<const N: usize> SpaceTimeFunction<N> for Offset<N> {
    fn value(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        Ok(self.function.value(pos, t)? + self.offset.value(t))
    }

    fn time_derivative(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        Ok(self.function.time_derivative(pos, t)? + self.offset.derivative(t))
    }

    fn gradient(&self, pos: &Vector<N>, t: f64) -> Result<Grad<N>, Error> {
        let mut g = self.function.gradient(pos, t)?;
        g.dt += self.offset.derivative(t);
        Ok(g)
    }
}
