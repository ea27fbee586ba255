use super::{Transform, frame};
use crate::{
    Error,
    maths::{Matrix, Space, Vector},
};
use nalgebra::Const;

/// Transport along a piecewise-linear path
///
/// The parameter `t ∈ [0, 1]` is spread evenly over the segments, so segment
/// `i` covers `t ∈ [i / n, (i + 1) / n]` for `n` segments.  Outside of
/// `[0, 1]`, the first or last segment is extrapolated.
///
/// The transform maps world coordinates into the local frame of a point moving
/// along the path: `transform(p, t) = Fᵗ · (p - c(t))`, where `c(t)` is the
/// point on the path and `F` is the segment's Bishop frame.  With tangent
/// following disabled, `F` is the identity.
#[derive(Clone, Debug)]
pub struct Polyline<const N: usize> {
    points: Vec<Vector<N>>,
    /// One frame per segment, empty if tangent following is disabled
    frames: Vec<Matrix<N>>,
}

impl<const N: usize> Polyline<N>
where
    Const<N>: Space<N>,
{
    /// Builds a new polyline from at least two points
    ///
    /// If `follow_tangent` is true, the local frame rotates so that its last
    /// axis is aligned with the current segment.  Returns
    /// [`Error::TooFewPoints`] if there are fewer than two points, or
    /// [`Error::ZeroLength`] if tangent following is enabled and a segment has
    /// zero length.
    pub fn new(
        points: Vec<Vector<N>>,
        follow_tangent: bool,
    ) -> Result<Self, Error> {
        if points.len() < 2 {
            return Err(Error::TooFewPoints {
                what: "polyline",
                expected: 2,
                actual: points.len(),
            });
        }
        let frames = if follow_tangent {
            frame::propagate(points.windows(2).map(|w| w[1] - w[0]))?
        } else {
            vec![]
        };
        log::debug!(
            "built polyline with {} segments ({} frames)",
            points.len() - 1,
            frames.len()
        );
        Ok(Self { points, frames })
    }
}

impl<const N: usize> Polyline<N> {
    /// Returns the segment index and the local parameter within it
    ///
    /// The local parameter is not clamped, so it may leave `[0, 1]` when `t`
    /// is outside of `[0, 1]`.
    fn find_segment(&self, t: f64) -> (usize, f64) {
        let x = t * (self.points.len() - 1) as f64;
        let segment = (x.floor().max(0.0) as usize).min(self.points.len() - 2);
        (segment, x - segment as f64)
    }

    /// Returns the transposed frame for a segment
    fn local_frame(&self, segment: usize) -> Matrix<N> {
        self.frames
            .get(segment)
            .map(|f| f.transpose())
            .unwrap_or_else(Matrix::identity)
    }
}

impl<const N: usize> Transform<N> for Polyline<N> {
    fn transform(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        let (segment, alpha) = self.find_segment(t);
        let p0 = self.points[segment];
        let p1 = self.points[segment + 1];
        let center = p0 + (p1 - p0) * alpha;
        Ok(self.local_frame(segment) * (pos - center))
    }

    fn velocity(&self, _pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        let (segment, _) = self.find_segment(t);
        let dir = self.points[segment + 1] - self.points[segment];
        let rate = (self.points.len() - 1) as f64;
        Ok(-(self.local_frame(segment) * dir) * rate)
    }

    fn position_jacobian(
        &self,
        _pos: &Vector<N>,
        t: f64,
    ) -> Result<Matrix<N>, Error> {
        let (segment, _) = self.find_segment(t);
        Ok(self.local_frame(segment))
    }
}
