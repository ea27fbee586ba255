use super::{Profile, SpaceTimeFunction};
use crate::{Error, grad::Grad, maths::Vector};
use std::sync::Arc;

/// Blends from one space-time function to another over time
///
/// The result is `f1 · (1 - s(t)) + f2 · s(t)`, where `s` is a [`Profile`]
/// (by default `s(t) = t`, so the result is `f1` at `t = 0` and `f2` at
/// `t = 1`).
#[derive(Clone)]
pub struct Interpolate<const N: usize> {
    f1: Arc<dyn SpaceTimeFunction<N>>,
    f2: Arc<dyn SpaceTimeFunction<N>>,
    profile: Profile,
}

impl<const N: usize> Interpolate<N> {
    /// Builds a linear interpolation
    pub fn new(
        f1: Arc<dyn SpaceTimeFunction<N>>,
        f2: Arc<dyn SpaceTimeFunction<N>>,
    ) -> Self {
        Self::with_profile(f1, f2, Profile::default())
    }

    /// Builds an interpolation with a custom blend profile
    pub fn with_profile(
        f1: Arc<dyn SpaceTimeFunction<N>>,
        f2: Arc<dyn SpaceTimeFunction<N>>,
        profile: Profile,
    ) -> Self {
        Self { f1, f2, profile }
    }
}

impl<const N: usize> SpaceTimeFunction<N> for Interpolate<N> {
    fn value(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        let s = self.profile.value(t);
        Ok(self.f1.value(pos, t)? * (1.0 - s) + self.f2.value(pos, t)? * s)
    }

    fn time_derivative(&self, pos: &Vector<N>, t: f64) -> Result<f64, Error> {
        let (s, ds) = self.profile.eval(t);
        let a = self.f1.value(pos, t)?;
        let b = self.f2.value(pos, t)?;
        let da = self.f1.time_derivative(pos, t)?;
        let db = self.f2.time_derivative(pos, t)?;
        Ok(da * (1.0 - s) + db * s + (b - a) * ds)
    }

    fn gradient(&self, pos: &Vector<N>, t: f64) -> Result<Grad<N>, Error> {
        let s = self.profile.value(t);
        let ga = self.f1.gradient(pos, t)?;
        let gb = self.f2.gradient(pos, t)?;
        // The time component is not a linear blend of the operands'
        let spatial = ga.spatial * (1.0 - s) + gb.spatial * s;
        Ok(Grad::new(spatial, self.time_derivative(pos, t)?))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::{
        implicit::{Ball, Capsule},
        space_time::{Sweep, test_util::check_gradient},
        transform::{Rotation, Translation},
    };
    use nalgebra::Vector3;

    fn operands() -> [Arc<dyn SpaceTimeFunction<3>>; 2] {
        let a = Sweep::new(
            Arc::new(Ball::new(0.5, Vector3::zeros()).unwrap()),
            Arc::new(Translation::new(Vector3::new(0.5, 0.0, 0.25))),
        );
        let b = Sweep::new(
            Arc::new(
                Capsule::new(0.2, Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0))
                    .unwrap(),
            ),
            Arc::new(
                Rotation::about_axis(Vector3::zeros(), Vector3::z(), 60.0)
                    .unwrap(),
            ),
        );
        [Arc::new(a), Arc::new(b)]
    }

    #[test]
    fn endpoints() {
        let [a, b] = operands();
        let f = Interpolate::new(a.clone(), b.clone());
        for p in [
            Vector3::new(0.3, 0.4, -0.2),
            Vector3::new(-1.0, 0.5, 0.0),
        ] {
            assert_eq!(f.value(&p, 0.0).unwrap(), a.value(&p, 0.0).unwrap());
            assert_eq!(f.value(&p, 1.0).unwrap(), b.value(&p, 1.0).unwrap());
        }
    }

    #[test]
    fn derivatives() {
        let [a, b] = operands();
        let profiles = [
            Profile::default(),
            Profile::SmoothStep,
            Profile::cosine(),
            Profile::Cosine {
                num_periods: 1.5,
                phase: 0.4,
            },
        ];
        for profile in profiles {
            let f = Interpolate::with_profile(a.clone(), b.clone(), profile);
            for t in [0.0, 0.35, 0.8] {
                check_gradient(&f, &Vector3::new(0.3, 0.4, -0.2), t, 1e-4);
                check_gradient(&f, &Vector3::new(1.2, -0.3, 0.5), t, 1e-4);
            }
        }
    }
}
