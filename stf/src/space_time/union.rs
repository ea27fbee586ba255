use super::SpaceTimeFunction;
use crate::{Error, blend::Blending, grad::Grad, maths::Vector};
use std::sync::Arc;

/// Hard or smooth union of two space-time functions
///
/// This applies the same blending as
/// [`ImplicitUnion`](crate::implicit::ImplicitUnion) at every `(p, t)`, with
/// the blend weights applied to the full space-time gradient.  At an exact
/// tie, both operands are weighted equally.
#[derive(Clone)]
pub struct Union<const N: usize> {
    f1: Arc<dyn SpaceTimeFunction<N>>,
    f2: Arc<dyn SpaceTimeFunction<N>>,
    smooth_distance: f64,
    blending: Blending,
}

impl<const N: usize> Union<N> {
    /// Builds a union using the default (quadratic) kernel
    ///
    /// Returns [`Error::NegativeSmoothDistance`] if `smooth_distance < 0`
    pub fn new(
        f1: Arc<dyn SpaceTimeFunction<N>>,
        f2: Arc<dyn SpaceTimeFunction<N>>,
        smooth_distance: f64,
    ) -> Result<Self, Error> {
        Self::with_blending(f1, f2, smooth_distance, Blending::default())
    }

    /// Builds a union with a specific blending kernel
    pub fn with_blending(
        f1: Arc<dyn SpaceTimeFunction<N>>,
        f2: Arc<dyn SpaceTimeFunction<N>>,
        smooth_distance: f64,
        blending: Blending,
    ) -> Result<Self, Error> {
        if smooth_distance.is_nan() || smooth_distance < 0.0 {
            return Err(Error::NegativeSmoothDistance(smooth_distance));
        }
        Ok(Self {
            f1,
            f2,
            smooth_distance,
            blending,
        })
    }

    fn weights(&self, pos: &Vector<N>, t: f64) -> Result<[f64; 2], Error> {
        let a = self.f1.value(pos, t)?;
        let b = self.f2.value(pos, t)?;
        Ok(self.blending.blend(a, b, self.smooth_distance).weights)
    }
}

impl<const N: usize> SpaceTimeFunction<N> for Union<N> {
    fn value(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        let a = self.f1.value(pos, t)?;
        let b = self.f2.value(pos, t)?;
        Ok(self.blending.blend(a, b, self.smooth_distance).value)
    }

    fn time_derivative(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        let [wa, wb] = self.weights(pos, t)?;
        let mut out = 0.0;
        if wa != 0.0 {
            out += self.f1.time_derivative(pos, t)? * wa;
        }
        if wb != 0.0 {
            out += self.f2.time_derivative(pos, t)? * wb;
        }
        Ok(out)
    }

    fn gradient(&self, pos: &Vector<N>, t: f64) -> Result<Grad<N>, Error> {
        let [wa, wb] = self.weights(pos, t)?;
        let mut out = Grad::new(Vector::zeros(), 0.0);
        if wa != 0.0 {
            out = out.lerp(1.0, &self.f1.gradient(pos, t)?, wa);
        }
        if wb != 0.0 {
            out = out.lerp(1.0, &self.f2.gradient(pos, t)?, wb);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        implicit::Ball,
        space_time::{Sweep, test_util::check_gradient},
        transform::Translation,
    };
    use approx::assert_relative_eq;
    use nalgebra::Vector3;
    use strum::IntoEnumIterator;

    /// Two balls moving towards each other along X
    fn balls() -> [Arc<dyn SpaceTimeFunction<3>>; 2] {
        let sweep = |x: f64, dx: f64| -> Arc<dyn SpaceTimeFunction<3>> {
            Arc::new(Sweep::new(
                Arc::new(Ball::new(0.5, Vector3::new(x, 0.0, 0.0)).unwrap()),
                Arc::new(Translation::new(Vector3::new(dx, 0.0, 0.0))),
            ))
        };
        [sweep(-1.0, -0.5), sweep(1.0, 0.5)]
    }

    #[test]
    fn hard_union() {
        let [a, b] = balls();
        let u = Union::new(a.clone(), b.clone(), 0.0).unwrap();
        for p in [
            Vector3::new(0.0, 0.3, 0.0),
            Vector3::new(-1.1, 0.2, 0.4),
            Vector3::new(0.8, -0.5, 0.1),
        ] {
            for t in [0.0, 0.5, 1.0] {
                let va = a.value(&p, t).unwrap();
                let vb = b.value(&p, t).unwrap();
                assert_eq!(u.value(&p, t).unwrap(), va.min(vb));
            }
        }
        check_gradient(&u, &Vector3::new(0.5, 0.2, 0.1), 0.5, 1e-4);
    }

    #[test]
    fn tie() {
        let [a, b] = balls();
        let u = Union::new(a.clone(), b.clone(), 0.0).unwrap();
        let p = Vector3::new(0.0, 0.3, 0.0);
        let ga = a.gradient(&p, 0.5).unwrap();
        let gb = b.gradient(&p, 0.5).unwrap();
        let g = u.gradient(&p, 0.5).unwrap();
        assert_relative_eq!(g.spatial, (ga.spatial + gb.spatial) / 2.0);
        assert_relative_eq!(g.dt, (ga.dt + gb.dt) / 2.0);
    }

    #[test]
    fn smooth_union() {
        let [a, b] = balls();
        for blending in Blending::iter() {
            let u =
                Union::with_blending(a.clone(), b.clone(), 0.2, blending)
                    .unwrap();
            for p in [
                Vector3::new(0.0, 0.3, 0.0),
                Vector3::new(0.1, 0.2, -0.1),
                Vector3::new(-0.6, 0.0, 0.3),
                Vector3::new(1.5, 0.0, 0.0),
            ] {
                for t in [0.0, 0.3, 0.9] {
                    let va = a.value(&p, t).unwrap();
                    let vb = b.value(&p, t).unwrap();
                    assert!(u.value(&p, t).unwrap() <= va.min(vb));
                }
            }
            for t in [0.0, 0.3, 0.9] {
                check_gradient(&u, &Vector3::new(0.1, 0.2, -0.1), t, 1e-4);
                check_gradient(&u, &Vector3::new(-0.6, 0.0, 0.3), t, 1e-4);
            }
        }
    }

    #[test]
    fn far_from_band() {
        let [a, b] = balls();
        let u = Union::new(a.clone(), b, 0.1).unwrap();
        let p = Vector3::new(-1.0, 0.0, 0.0);
        assert_eq!(u.value(&p, 0.0).unwrap(), a.value(&p, 0.0).unwrap());
        assert_eq!(
            u.gradient(&p, 0.2).unwrap(),
            a.gradient(&p, 0.2).unwrap()
        );
    }

    #[test]
    fn negative_distance() {
        let [a, b] = balls();
        assert!(matches!(
            Union::new(a, b, -0.5),
            Err(Error::NegativeSmoothDistance(..))
        ));
    }
}
