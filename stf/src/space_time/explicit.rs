use super::SpaceTimeFunction;
use crate::{Error, grad::Grad, maths::Vector};

/// Step used for forward differences when no derivative is supplied
const STEP: f64 = 1e-6;

/// Scalar closure of position and time
pub type ValueFn<const N: usize> =
    Box<dyn Fn(&Vector<N>, f64) -> f64 + Send + Sync>;

/// Gradient closure of position and time
pub type GradientFn<const N: usize> =
    Box<dyn Fn(&Vector<N>, f64) -> Grad<N> + Send + Sync>;

/// How an [`ExplicitForm`] computes one of its derivatives
#[derive(Copy, Clone, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "snake_case")]
pub enum DerivativeMode {
    /// Calls a user-supplied closure
    Analytic,
    /// Uses forward differences with a step of `1e-6`
    ///
    /// This is much less accurate than an analytic derivative, with errors on
    /// the order of the step size times the second derivative.
    FiniteDifference,
}

/// Space-time function built from user-supplied closures
///
/// Only the value closure is required.  If the time derivative or gradient
/// closures are omitted, the missing derivatives are estimated with forward
/// differences; check [`time_derivative_mode`](Self::time_derivative_mode)
/// and [`gradient_mode`](Self::gradient_mode) to see which strategy is in
/// use.
pub struct ExplicitForm<const N: usize> {
    value: ValueFn<N>,
    time_derivative: Option<ValueFn<N>>,
    gradient: Option<GradientFn<N>>,
}

impl<const N: usize> ExplicitForm<N> {
    /// Builds a function from a value closure alone
    ///
    /// All derivatives are estimated with finite differences.
    pub fn new<V>(value: V) -> Self
    where
        V: Fn(&Vector<N>, f64) -> f64 + Send + Sync + 'static,
    {
        Self::build(Box::new(value), None, None)
    }

    /// Builds a function from optional closures
    ///
    /// Returns [`Error::MissingCallable`] if `value` is absent.
    pub fn from_parts(
        value: Option<ValueFn<N>>,
        time_derivative: Option<ValueFn<N>>,
        gradient: Option<GradientFn<N>>,
    ) -> Result<Self, Error> {
        let value = value.ok_or(Error::MissingCallable("value function"))?;
        Ok(Self::build(value, time_derivative, gradient))
    }

    /// Supplies an analytic time derivative
    pub fn with_time_derivative<D>(self, time_derivative: D) -> Self
    where
        D: Fn(&Vector<N>, f64) -> f64 + Send + Sync + 'static,
    {
        Self::build(self.value, Some(Box::new(time_derivative)), self.gradient)
    }

    /// Supplies an analytic space-time gradient
    pub fn with_gradient<G>(self, gradient: G) -> Self
    where
        G: Fn(&Vector<N>, f64) -> Grad<N> + Send + Sync + 'static,
    {
        Self::build(self.value, self.time_derivative, Some(Box::new(gradient)))
    }

    fn build(
        value: ValueFn<N>,
        time_derivative: Option<ValueFn<N>>,
        gradient: Option<GradientFn<N>>,
    ) -> Self {
        let out = Self {
            value,
            time_derivative,
            gradient,
        };
        if out.gradient_mode() == DerivativeMode::FiniteDifference
            || out.time_derivative_mode() == DerivativeMode::FiniteDifference
        {
            log::debug!(
                "explicit form using {} time derivative and {} gradient",
                out.time_derivative_mode(),
                out.gradient_mode()
            );
        }
        out
    }

    /// Returns the strategy used by
    /// [`time_derivative`](SpaceTimeFunction::time_derivative)
    pub fn time_derivative_mode(&self) -> DerivativeMode {
        if self.time_derivative.is_some() {
            DerivativeMode::Analytic
        } else {
            DerivativeMode::FiniteDifference
        }
    }

    /// Returns the strategy used for the spatial part of
    /// [`gradient`](SpaceTimeFunction::gradient)
    pub fn gradient_mode(&self) -> DerivativeMode {
        if self.gradient.is_some() {
            DerivativeMode::Analytic
        } else {
            DerivativeMode::FiniteDifference
        }
    }
}

impl<const N: usize> SpaceTimeFunction<N> for ExplicitForm<N> {
    fn value(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        Ok((self.value)(pos, t))
    }

    fn time_derivative(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        Ok(match &self.time_derivative {
            Some(d) => d(pos, t),
            None => ((self.value)(pos, t + STEP) - (self.value)(pos, t)) / STEP,
        })
    }

    /// Returns the user-supplied gradient, or a forward-difference estimate
    ///
    /// In the latter case, the time component comes from
    /// [`time_derivative`](SpaceTimeFunction::time_derivative).
    fn gradient(&self, pos: &Vector<N>, t: f64) -> Result<Grad<N>, Error> {
        if let Some(g) = &self.gradient {
            return Ok(g(pos, t));
        }
        let v = (self.value)(pos, t);
        let mut spatial = Vector::<N>::zeros();
        for i in 0..N {
            let mut p = *pos;
            p[i] += STEP;
            spatial[i] = ((self.value)(&p, t) - v) / STEP;
        }
        Ok(Grad::new(spatial, self.time_derivative(pos, t)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::space_time::test_util::check_gradient;
    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector3};

    /// A circle of radius 1 moving along +X at unit speed
    fn moving_circle(p: &Vector2<f64>, t: f64) -> f64 {
        (p - Vector2::new(t, 0.0)).norm() - 1.0
    }

    #[test]
    fn finite_differences() {
        let f = ExplicitForm::new(moving_circle);
        assert_eq!(f.time_derivative_mode(), DerivativeMode::FiniteDifference);
        assert_eq!(f.gradient_mode(), DerivativeMode::FiniteDifference);

        let p = Vector2::new(2.0, 0.0);
        assert_eq!(f.value(&p, 0.0).unwrap(), 1.0);
        assert_relative_eq!(
            f.time_derivative(&p, 0.0).unwrap(),
            -1.0,
            epsilon = 1e-5
        );
        let g = f.gradient(&p, 0.0).unwrap();
        assert_relative_eq!(g.spatial, Vector2::new(1.0, 0.0), epsilon = 1e-5);
        assert_eq!(g.dt, f.time_derivative(&p, 0.0).unwrap());
        check_gradient(&f, &Vector2::new(0.3, 1.5), 0.4, 1e-4);
    }

    #[test]
    fn analytic() {
        let f = ExplicitForm::new(|p: &Vector3<f64>, t| p.x * t + p.y * p.y)
            .with_time_derivative(|p, _t| p.x)
            .with_gradient(|p, t| {
                Grad::new(Vector3::new(t, 2.0 * p.y, 0.0), p.x)
            });
        assert_eq!(f.time_derivative_mode(), DerivativeMode::Analytic);
        assert_eq!(f.gradient_mode(), DerivativeMode::Analytic);
        let p = Vector3::new(2.0, 3.0, 4.0);
        assert_eq!(f.time_derivative(&p, 0.5).unwrap(), 2.0);
        assert_eq!(
            f.gradient(&p, 0.5).unwrap(),
            Grad::new(Vector3::new(0.5, 6.0, 0.0), 2.0)
        );
        check_gradient(&f, &p, 0.5, 1e-6);
    }

    #[test]
    fn missing_value() {
        let r = ExplicitForm::<2>::from_parts(None, None, None);
        assert!(matches!(r, Err(Error::MissingCallable("value function"))));
        assert_eq!(
            DerivativeMode::FiniteDifference.to_string(),
            "finite_difference"
        );
    }
}
