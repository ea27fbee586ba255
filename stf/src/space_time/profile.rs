//! Scalar functions of time with analytic derivatives
use crate::{
    Error,
    maths::{self, Vector},
};
use std::f64::consts::{FRAC_PI_2, PI};
use std::sync::Arc;

type ScalarFn = Arc<dyn Fn(f64) -> f64 + Send + Sync>;

/// User-supplied value and derivative closures
#[derive(Clone)]
pub struct CustomProfile {
    value: ScalarFn,
    derivative: ScalarFn,
}

impl std::fmt::Debug for CustomProfile {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "CustomProfile")
    }
}

/// A function of time `s(t)` and its derivative `s'(t)`
///
/// Profiles drive the blend factor of an
/// [`Interpolate`](super::Interpolate) and the offset of an
/// [`Offset`](super::Offset).
#[derive(Clone, Debug)]
pub enum Profile {
    /// `s(t) = value`
    Constant(f64),
    /// `s(t) = slope · t + intercept`
    Linear {
        /// Rate of change
        slope: f64,
        /// Value at `t = 0`
        intercept: f64,
    },
    /// `s(t) = 3t² - 2t³`
    SmoothStep,
    /// `s(t) = (sin(2π · num_periods · t + phase - π/2) + 1) / 2`
    ///
    /// With half a period and no phase, this eases from 0 to 1 over
    /// `t ∈ [0, 1]`.
    Cosine {
        /// Number of full periods over `t ∈ [0, 1]`
        num_periods: f64,
        /// Phase shift, in radians
        phase: f64,
    },
    /// `s(t) = c₀ + c₁ t + c₂ t² + ...`
    Polynomial(Vec<f64>),
    /// `s(t) = amplitude · sin(frequency · t + phase) + offset`
    Sinusoidal {
        /// Peak deviation from `offset`
        amplitude: f64,
        /// Angular frequency, in radians per unit time
        frequency: f64,
        /// Phase shift, in radians
        phase: f64,
        /// Constant added to the result
        offset: f64,
    },
    /// `s(t) = amplitude · exp(rate · t) + offset`
    Exponential {
        /// Scale of the exponential term
        amplitude: f64,
        /// Growth rate
        rate: f64,
        /// Constant added to the result
        offset: f64,
    },
    /// Piecewise-cubic curve through `[t, value]` control points
    Bezier(BezierProfile),
    /// User-supplied closures; see [`Profile::custom`]
    Custom(CustomProfile),
}

impl Default for Profile {
    /// The identity profile `s(t) = t`
    fn default() -> Self {
        Profile::Linear {
            slope: 1.0,
            intercept: 0.0,
        }
    }
}

impl Profile {
    /// Standard cosine easing, `(1 - cos(π t)) / 2`
    pub fn cosine() -> Self {
        Profile::Cosine {
            num_periods: 0.5,
            phase: 0.0,
        }
    }

    /// Builds a profile from a pair of closures
    ///
    /// The caller is responsible for making `derivative` consistent with
    /// `value`.
    pub fn custom<F, D>(value: F, derivative: D) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
        D: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        Profile::Custom(CustomProfile {
            value: Arc::new(value),
            derivative: Arc::new(derivative),
        })
    }

    /// Evaluates the profile and its derivative at time `t`
    pub fn eval(&self, t: f64) -> (f64, f64) {
        match self {
            Profile::Constant(v) => (*v, 0.0),
            Profile::Linear { slope, intercept } => {
                (slope * t + intercept, *slope)
            }
            Profile::SmoothStep => {
                (3.0 * t * t - 2.0 * t * t * t, 6.0 * t - 6.0 * t * t)
            }
            Profile::Cosine { num_periods, phase } => {
                let x = t * num_periods * 2.0 * PI + phase - FRAC_PI_2;
                ((x.sin() + 1.0) / 2.0, num_periods * PI * x.cos())
            }
            Profile::Polynomial(coeffs) => {
                // Horner's rule for the value and derivative together
                let mut v = 0.0;
                let mut d = 0.0;
                for c in coeffs.iter().rev() {
                    d = d * t + v;
                    v = v * t + c;
                }
                (v, d)
            }
            Profile::Sinusoidal {
                amplitude,
                frequency,
                phase,
                offset,
            } => {
                let x = frequency * t + phase;
                (
                    amplitude * x.sin() + offset,
                    amplitude * frequency * x.cos(),
                )
            }
            Profile::Exponential {
                amplitude,
                rate,
                offset,
            } => {
                let e = (rate * t).exp();
                (amplitude * e + offset, amplitude * rate * e)
            }
            Profile::Bezier(b) => b.eval(t),
            Profile::Custom(c) => ((c.value)(t), (c.derivative)(t)),
        }
    }

    /// Evaluates the profile at time `t`
    pub fn value(&self, t: f64) -> f64 {
        self.eval(t).0
    }

    /// Evaluates the profile's derivative at time `t`
    pub fn derivative(&self, t: f64) -> f64 {
        self.eval(t).1
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Scalar piecewise-cubic Bezier profile
///
/// Control points are `[t, value]` pairs, `3n + 1` of them for `n` segments.
/// Within segment `i`, the local parameter runs linearly from the time of
/// control point `3i` to that of control point `3i + 3`, and the value is the
/// cubic Bezier of the four control values.  Before the first control point
/// and after the last, the profile holds its end value with zero derivative.
#[derive(Clone, Debug)]
pub struct BezierProfile {
    points: Vec<[f64; 2]>,
}

impl BezierProfile {
    /// Builds a new profile from `[t, value]` control points
    ///
    /// Segment end times (every third control point) must be non-decreasing;
    /// otherwise, this returns [`Error::Decreasing`].
    pub fn new(points: Vec<[f64; 2]>) -> Result<Self, Error> {
        if points.len() < 4 {
            return Err(Error::TooFewPoints {
                what: "bezier profile",
                expected: 4,
                actual: points.len(),
            });
        }
        if (points.len() - 1) % 3 != 0 {
            return Err(Error::BadControlPointCount(points.len()));
        }
        for w in points.iter().step_by(3).collect::<Vec<_>>().windows(2) {
            let (previous, value) = (w[0][0], w[1][0]);
            if value < previous || value.is_nan() {
                return Err(Error::Decreasing {
                    what: "bezier profile segment times",
                    previous,
                    value,
                });
            }
        }
        Ok(Self { points })
    }

    fn segment_count(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    fn values(&self, segment: usize) -> [Vector<1>; 4] {
        std::array::from_fn(|i| {
            Vector::<1>::new(self.points[segment * 3 + i][1])
        })
    }

    /// Returns the value and derivative at time `t`
    pub fn eval(&self, t: f64) -> (f64, f64) {
        let (first, last) = match (self.points.first(), self.points.last()) {
            (Some(a), Some(b)) => (a, b),
            _ => return (0.0, 0.0),
        };
        if t <= first[0] {
            return (first[1], 0.0);
        } else if t >= last[0] {
            return (last[1], 0.0);
        }

        let n = self.segment_count();
        let segment = (0..n)
            .find(|&i| t <= self.points[i * 3 + 3][0])
            .unwrap_or(n - 1);
        let t0 = self.points[segment * 3][0];
        let t3 = self.points[segment * 3 + 3][0];
        let span = t3 - t0;
        let v = self.values(segment);
        if span.abs() < 1e-10 {
            return (v[0].x, 0.0);
        }
        let alpha = (t - t0) / span;
        (
            maths::bezier(&v, alpha).x,
            maths::bezier_derivative(&v, alpha).x / span,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::fd;
    use approx::assert_relative_eq;

    fn check_derivative(p: &Profile, t: f64) {
        let d = fd::derivative(|t| Ok(p.value(t)), t, fd::STEP).unwrap();
        assert_relative_eq!(p.derivative(t), d, epsilon = 1e-6);
    }

    #[test]
    fn easing() {
        let linear = Profile::default();
        let smooth = Profile::SmoothStep;
        let cosine = Profile::cosine();
        for p in [&linear, &smooth, &cosine] {
            assert_relative_eq!(p.value(0.0), 0.0, epsilon = 1e-12);
            assert_relative_eq!(p.value(1.0), 1.0, epsilon = 1e-12);
            assert_relative_eq!(p.value(0.5), 0.5, epsilon = 1e-12);
            for t in [0.1, 0.5, 0.85] {
                check_derivative(p, t);
            }
        }
        assert_relative_eq!(smooth.derivative(0.0), 0.0);
        assert_relative_eq!(cosine.derivative(1.0), 0.0, epsilon = 1e-12);

        let wave = Profile::Cosine {
            num_periods: 2.0,
            phase: 0.3,
        };
        for t in [0.0, 0.2, 0.7] {
            check_derivative(&wave, t);
        }
    }

    #[test]
    fn offsets() {
        let profiles = [
            Profile::Constant(2.5),
            Profile::Linear {
                slope: -1.0,
                intercept: 0.5,
            },
            Profile::Polynomial(vec![1.0, -2.0, 0.5, 3.0]),
            Profile::Sinusoidal {
                amplitude: 0.2,
                frequency: 6.0,
                phase: 0.1,
                offset: -0.3,
            },
            Profile::Exponential {
                amplitude: 0.5,
                rate: -2.0,
                offset: 1.0,
            },
            Profile::custom(|t| t.sin(), |t| t.cos()),
        ];
        for p in &profiles {
            for t in [0.0, 0.25, 0.9] {
                check_derivative(p, t);
            }
        }
        assert_eq!(profiles[0].eval(0.7), (2.5, 0.0));
        assert_relative_eq!(profiles[2].value(2.0), 1.0 - 4.0 + 2.0 + 24.0);
        assert_relative_eq!(profiles[2].derivative(2.0), -2.0 + 2.0 + 36.0);
        assert_eq!(Profile::Polynomial(vec![]).eval(3.0), (0.0, 0.0));
    }

    #[test]
    fn bezier() {
        let b = BezierProfile::new(vec![
            [0.0, 0.0],
            [0.2, 1.0],
            [0.3, 1.0],
            [0.5, 0.5],
            [0.6, 0.0],
            [0.8, 0.0],
            [1.0, -1.0],
        ])
        .unwrap();
        let p = Profile::Bezier(b);
        assert_eq!(p.eval(-1.0), (0.0, 0.0));
        assert_eq!(p.eval(2.0), (-1.0, 0.0));
        assert_relative_eq!(p.value(0.5), 0.5);
        assert_relative_eq!(p.value(0.25), 0.375 + 0.375 + 0.125 * 0.5);
        for t in [0.1, 0.25, 0.6, 0.95] {
            check_derivative(&p, t);
        }
    }

    #[test]
    fn bad_bezier() {
        assert!(matches!(
            BezierProfile::new(vec![[0.0, 0.0]; 3]),
            Err(Error::TooFewPoints { actual: 3, .. })
        ));
        assert!(matches!(
            BezierProfile::new(vec![[0.0, 0.0]; 5]),
            Err(Error::BadControlPointCount(5))
        ));
        let backwards = vec![
            [0.0, 0.0],
            [0.2, 1.0],
            [0.3, 1.0],
            [0.6, 0.5],
            [0.5, 0.0],
            [0.4, 0.0],
            [0.5, -1.0],
        ];
        assert!(matches!(
            BezierProfile::new(backwards),
            Err(Error::Decreasing { previous, value, .. })
                if previous == 0.6 && value == 0.5
        ));
    }
}
