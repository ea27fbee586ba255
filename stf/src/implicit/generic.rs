use super::ImplicitFunction;
use crate::{Error, maths::Vector};

type ValueFn<const N: usize> = Box<dyn Fn(&Vector<N>) -> f64 + Send + Sync>;
type GradientFn<const N: usize> =
    Box<dyn Fn(&Vector<N>) -> Vector<N> + Send + Sync>;

/// Implicit function built from user-supplied closures
///
/// The caller is responsible for making the gradient closure consistent with
/// the value closure.
pub struct GenericFunction<const N: usize> {
    value: ValueFn<N>,
    gradient: GradientFn<N>,
}

impl<const N: usize> GenericFunction<N> {
    /// Builds a function from a value closure and a gradient closure
    pub fn new<V, G>(value: V, gradient: G) -> Self
    where
        V: Fn(&Vector<N>) -> f64 + Send + Sync + 'static,
        G: Fn(&Vector<N>) -> Vector<N> + Send + Sync + 'static,
    {
        Self {
            value: Box::new(value),
            gradient: Box::new(gradient),
        }
    }

    /// Builds a function from optional closures
    ///
    /// Returns [`Error::MissingCallable`] if either closure is absent.
    pub fn from_parts(
        value: Option<ValueFn<N>>,
        gradient: Option<GradientFn<N>>,
    ) -> Result<Self, Error> {
        let value = value.ok_or(Error::MissingCallable("value function"))?;
        let gradient =
            gradient.ok_or(Error::MissingCallable("gradient function"))?;
        Ok(Self { value, gradient })
    }
}

impl<const N: usize> ImplicitFunction<N> for GenericFunction<N> {
    fn value(&self, pos: &Vector<N>) -> f64 {
        (self.value)(pos)
    }

    fn gradient(&self, pos: &Vector<N>) -> Vector<N> {
        (self.gradient)(pos)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use nalgebra::Vector2;

    #[test]
    fn closures() {
        let f = GenericFunction::new(
            |p: &Vector2<f64>| p.x * p.x + p.y,
            |p: &Vector2<f64>| Vector2::new(2.0 * p.x, 1.0),
        );
        let p = Vector2::new(3.0, -1.0);
        assert_eq!(f.value(&p), 8.0);
        assert_eq!(f.gradient(&p), Vector2::new(6.0, 1.0));
        crate::implicit::test_util::check_gradient(&f, &p, 1e-5);
    }

    #[test]
    fn missing() {
        let r = GenericFunction::<3>::from_parts(Some(Box::new(|_| 0.0)), None);
        assert!(matches!(
            r,
            Err(Error::MissingCallable("gradient function"))
        ));
        let r = GenericFunction::<2>::from_parts(
            None,
            Some(Box::new(|_| Vector2::zeros())),
        );
        assert!(matches!(r, Err(Error::MissingCallable("value function"))));
    }
}
