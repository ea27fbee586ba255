//! Smooth-minimum blending kernels
//!
//! Each kernel is a closed-form function `g(h)` of the blend parameter
//! `h = max(k - |a - b|, 0) / k`, where `k` is the smoothing distance scaled by
//! a kernel-specific factor.  The blended value is `min(a, b) - k · g(h)`.
//!
//! All four kernels are normalized so that at a tie (`a == b`), the blended
//! value is exactly `min(a, b) - smooth_distance`.

/// Blending kernel used by smooth unions
#[derive(
    Copy,
    Clone,
    Debug,
    Default,
    PartialEq,
    Eq,
    strum::EnumString,
    strum::Display,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(
    feature = "describe",
    derive(serde::Deserialize),
    serde(rename_all = "snake_case")
)]
pub enum Blending {
    /// `g(h) = h² / 4`
    #[default]
    Quadratic,
    /// `g(h) = h³ / 6`
    Cubic,
    /// `g(h) = h³ (4 - h) / 16`
    Quartic,
    /// Circular arc between the two operands
    Circular,
}

/// Result of blending two values
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Blend {
    /// Blended value
    pub value: f64,
    /// Partial derivatives of the blended value with respect to each operand
    ///
    /// The gradient of a blend is `weights[0] · ∇a + weights[1] · ∇b`.
    pub weights: [f64; 2],
}

impl Blending {
    /// Ratio between the kernel's band width `k` and the smoothing distance
    fn band_scale(self) -> f64 {
        match self {
            Blending::Quadratic => 4.0,
            Blending::Cubic => 6.0,
            Blending::Quartic => 16.0 / 3.0,
            Blending::Circular => 1.0 / (1.0 - 0.5f64.sqrt()),
        }
    }

    /// Evaluates the kernel `g(h)` and its derivative `g'(h)`
    fn kernel(self, h: f64) -> (f64, f64) {
        match self {
            Blending::Quadratic => (h * h / 4.0, h / 2.0),
            Blending::Cubic => (h * h * h / 6.0, h * h / 2.0),
            Blending::Quartic => {
                (h * h * h * (4.0 - h) / 16.0, h * h * (3.0 - h) / 4.0)
            }
            Blending::Circular => {
                let r = (1.0 + 2.0 * h - h * h).sqrt();
                (0.5 * (1.0 + h - r), 0.5 * (1.0 - (1.0 - h) / r))
            }
        }
    }

    /// Blends two values with the given smoothing distance
    ///
    /// A smoothing distance of zero is a hard `min`.  Outside of the blending
    /// band, the result is exactly `min(a, b)` and all of the weight goes to
    /// the smaller operand; at an exact tie, the weight is split evenly.
    ///
    /// `smooth_distance` must be non-negative; this is checked by the unions
    /// at construction.
    pub fn blend(self, a: f64, b: f64, smooth_distance: f64) -> Blend {
        let k = self.band_scale() * smooth_distance;
        let diff = a - b;
        if k <= 0.0 || diff.abs() >= k {
            let weights = if a < b {
                [1.0, 0.0]
            } else if b < a {
                [0.0, 1.0]
            } else {
                [0.5, 0.5]
            };
            return Blend {
                value: a.min(b),
                weights,
            };
        }

        let h = (k - diff.abs()) / k;
        let (g, dg) = self.kernel(h);
        let weights = if a < b {
            [1.0 - dg, dg]
        } else if b < a {
            [dg, 1.0 - dg]
        } else {
            // g'(1) = 1/2 for every kernel, so both sides agree
            [0.5, 0.5]
        };
        Blend {
            value: a.min(b) - k * g,
            weights,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use std::str::FromStr;
    use strum::IntoEnumIterator;

    #[test]
    fn hard_min() {
        for b in Blending::iter() {
            let r = b.blend(1.0, 2.0, 0.0);
            assert_eq!(r.value, 1.0);
            assert_eq!(r.weights, [1.0, 0.0]);

            let r = b.blend(3.0, -2.0, 0.0);
            assert_eq!(r.value, -2.0);
            assert_eq!(r.weights, [0.0, 1.0]);

            let r = b.blend(0.5, 0.5, 0.0);
            assert_eq!(r.value, 0.5);
            assert_eq!(r.weights, [0.5, 0.5]);
        }
    }

    #[test]
    fn tie_depth() {
        for b in Blending::iter() {
            let r = b.blend(1.0, 1.0, 0.25);
            assert_relative_eq!(r.value, 0.75, epsilon = 1e-12);
        }
    }

    #[test]
    fn below_min() {
        for b in Blending::iter() {
            for i in 0..100 {
                let a = i as f64 / 25.0 - 2.0;
                let r = b.blend(a, 0.3, 0.5);
                assert!(r.value <= a.min(0.3) + 1e-12, "{b}: {a}");
            }
            let r = b.blend(0.0, 100.0, 0.5);
            assert_eq!(r.value, 0.0);
        }
    }

    #[test]
    fn weights_match_finite_differences() {
        let h = 1e-6;
        for b in Blending::iter() {
            for (x, y) in [(0.1, 0.3), (0.4, 0.0), (-0.2, -0.1), (1.0, 0.2)] {
                let r = b.blend(x, y, 0.25);
                let da = (b.blend(x + h, y, 0.25).value
                    - b.blend(x - h, y, 0.25).value)
                    / (2.0 * h);
                let db = (b.blend(x, y + h, 0.25).value
                    - b.blend(x, y - h, 0.25).value)
                    / (2.0 * h);
                assert_relative_eq!(r.weights[0], da, epsilon = 1e-5);
                assert_relative_eq!(r.weights[1], db, epsilon = 1e-5);
            }
        }
    }

    #[test]
    fn continuous_at_band_edge() {
        for b in Blending::iter() {
            let k = b.band_scale() * 0.5;
            let inside = b.blend(0.0, k - 1e-9, 0.5).value;
            let outside = b.blend(0.0, k + 1e-9, 0.5).value;
            assert_relative_eq!(inside, outside, epsilon = 1e-8);
        }
    }

    #[test]
    fn parse() {
        assert_eq!(Blending::from_str("quartic").unwrap(), Blending::Quartic);
        assert_eq!(Blending::Circular.to_string(), "circular");
        assert!(Blending::from_str("linear").is_err());
        assert_eq!(Blending::default(), Blending::Quadratic);
    }
}
