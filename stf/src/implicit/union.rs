use super::ImplicitFunction;
use crate::{Error, blend::Blending, maths::Vector};
use std::sync::Arc;

/// Hard or smooth union of two implicit functions
///
/// With a smoothing distance of zero, this is `min(f1, f2)`; otherwise, the
/// corner between the two operands is rounded by the selected [`Blending`]
/// kernel.  At an exact tie, the gradient is the average of both operands'
/// gradients.
pub struct ImplicitUnion<const N: usize> {
    f1: Arc<dyn ImplicitFunction<N>>,
    f2: Arc<dyn ImplicitFunction<N>>,
    smooth_distance: f64,
    blending: Blending,
}

impl<const N: usize> ImplicitUnion<N> {
    /// Builds a union using the default (quadratic) kernel
    ///
    /// Returns [`Error::NegativeSmoothDistance`] if `smooth_distance < 0`
    pub fn new(
        f1: Arc<dyn ImplicitFunction<N>>,
        f2: Arc<dyn ImplicitFunction<N>>,
        smooth_distance: f64,
    ) -> Result<Self, Error> {
        Self::with_blending(f1, f2, smooth_distance, Blending::default())
    }

    /// Builds a union with a specific blending kernel
    pub fn with_blending(
        f1: Arc<dyn ImplicitFunction<N>>,
        f2: Arc<dyn ImplicitFunction<N>>,
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
}

impl<const N: usize> ImplicitFunction<N> for ImplicitUnion<N> {
    fn value(&self, pos: &Vector<N>) -> f64 {
        let a = self.f1.value(pos);
        let b = self.f2.value(pos);
        self.blending.blend(a, b, self.smooth_distance).value
    }

    fn gradient(&self, pos: &Vector<N>) -> Vector<N> {
        let a = self.f1.value(pos);
        let b = self.f2.value(pos);
        let [wa, wb] = self.blending.blend(a, b, self.smooth_distance).weights;
        let mut out = Vector::zeros();
        if wa != 0.0 {
            out += self.f1.gradient(pos) * wa;
        }
        if wb != 0.0 {
            out += self.f2.gradient(pos) * wb;
        }
        out
    }
}
