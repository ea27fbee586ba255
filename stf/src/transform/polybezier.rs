use super::{Transform, frame};
use crate::{
    Error,
    maths::{self, Matrix, Space, Vector},
};
use nalgebra::Const;

/// Number of reference frames sampled along each Bezier segment
const FRAMES_PER_SEGMENT: usize = 4;

/// Transport along a piecewise cubic Bezier curve
///
/// The curve is given by `3n + 1` control points, where consecutive segments
/// share an endpoint.  As with [`Polyline`](super::Polyline), the parameter
/// `t ∈ [0, 1]` is spread evenly over the segments and the transform maps
/// world coordinates into the curve's local frame,
/// `transform(p, t) = Fᵗ · (p - B(t))`.
///
/// When following the tangent, reference frames are sampled at four evenly
/// spaced points on each segment and propagated from one to the next by
/// minimal rotations.  At an arbitrary `t`, the two neighboring reference
/// frames are each rotated so that their tangent axis matches the curve's
/// exact tangent, and the result is twisted from one toward the other with a
/// smoothstep weight.  The frame and its derivative are continuous across
/// reference frames, and the derivative (hence the transform's velocity) is
/// exact.
#[derive(Clone, Debug)]
pub struct PolyBezier<const N: usize> {
    points: Vec<Vector<N>>,
    /// Reference frames, [`FRAMES_PER_SEGMENT`] per segment, or empty if
    /// tangent following is disabled
    frames: Vec<Matrix<N>>,
}

/// Local frame and its derivative with respect to the segment parameter
struct LocalFrame<const N: usize> {
    frame: Matrix<N>,
    derivative: Matrix<N>,
}

impl<const N: usize> PolyBezier<N>
where
    Const<N>: Space<N>,
{
    /// Builds a new curve from `3n + 1` control points
    ///
    /// Returns an error if there are fewer than 4 points, if the point count
    /// isn't of the form `3n + 1`, or if tangent following is enabled and the
    /// curve is stationary at one of the reference samples.
    pub fn new(
        points: Vec<Vector<N>>,
        follow_tangent: bool,
    ) -> Result<Self, Error> {
        if points.len() < 4 {
            return Err(Error::TooFewPoints {
                what: "piecewise Bezier curve",
                expected: 4,
                actual: points.len(),
            });
        }
        if (points.len() - 1) % 3 != 0 {
            return Err(Error::BadControlPointCount(points.len()));
        }

        let frames = if follow_tangent {
            let segments = (points.len() - 1) / 3;
            let tangents = (0..segments).flat_map(|i| {
                let cp = Self::control_points_of(&points, i);
                (0..FRAMES_PER_SEGMENT).map(move |j| {
                    let alpha = j as f64 / (FRAMES_PER_SEGMENT - 1) as f64;
                    maths::bezier_derivative(&cp, alpha)
                })
            });
            frame::propagate(tangents)?
        } else {
            vec![]
        };
        log::debug!(
            "built Bezier curve with {} segments ({} reference frames)",
            (points.len() - 1) / 3,
            frames.len()
        );
        Ok(Self { points, frames })
    }

    /// Builds a curve which passes through every sample point
    ///
    /// Each pair of consecutive samples is joined by a cubic segment.  The
    /// tangent at each interior sample is half the difference between its
    /// neighbors (as in a Catmull-Rom spline); the endpoints use one-sided
    /// differences.  Inner control points are placed a third of the tangent
    /// away from each sample.
    pub fn from_samples(
        samples: Vec<Vector<N>>,
        follow_tangent: bool,
    ) -> Result<Self, Error> {
        let n = samples.len();
        if n < 2 {
            return Err(Error::TooFewPoints {
                what: "sampled Bezier curve",
                expected: 2,
                actual: n,
            });
        }
        let tangents = (0..n)
            .map(|i| {
                if i == 0 {
                    samples[1] - samples[0]
                } else if i == n - 1 {
                    samples[n - 1] - samples[n - 2]
                } else {
                    (samples[i + 1] - samples[i - 1]) / 2.0
                }
            })
            .collect::<Vec<_>>();

        let mut points = Vec::with_capacity(3 * (n - 1) + 1);
        points.push(samples[0]);
        for i in 0..n - 1 {
            points.push(samples[i] + tangents[i] / 3.0);
            points.push(samples[i + 1] - tangents[i + 1] / 3.0);
            points.push(samples[i + 1]);
        }
        Self::new(points, follow_tangent)
    }
}

impl<const N: usize> PolyBezier<N> {
    fn segment_count(&self) -> usize {
        (self.points.len() - 1) / 3
    }

    fn control_points_of(
        points: &[Vector<N>],
        segment: usize,
    ) -> [Vector<N>; 4] {
        let i = segment * 3;
        [points[i], points[i + 1], points[i + 2], points[i + 3]]
    }

    fn control_points(&self, segment: usize) -> [Vector<N>; 4] {
        Self::control_points_of(&self.points, segment)
    }

    /// Returns the segment index and the local parameter within it
    ///
    /// As with polylines, the local parameter is extrapolated (not clamped)
    /// outside of `t ∈ [0, 1]`.
    fn find_segment(&self, t: f64) -> (usize, f64) {
        let n = self.segment_count();
        let x = t * n as f64;
        let segment = (t.max(0.0) * n as f64).floor() as usize;
        let segment = segment.min(n - 1);
        (segment, x - segment as f64)
    }
}

impl<const N: usize> PolyBezier<N>
where
    Const<N>: Space<N>,
{
    /// Returns the local frame at the given position on a segment
    ///
    /// Returns `None` if tangent following is disabled.
    fn local_frame(
        &self,
        segment: usize,
        alpha: f64,
    ) -> Result<Option<LocalFrame<N>>, Error> {
        if self.frames.is_empty() {
            return Ok(None);
        }
        let cp = self.control_points(segment);
        let vel = maths::bezier_derivative(&cp, alpha);
        let acc = maths::bezier_second_derivative(&cp, alpha);
        let (tangent, dtangent) =
            frame::unit_tangent(&vel, &acc).ok_or(Error::ZeroLength)?;

        // Reference frames `k` and `k + 1` bracket this position
        let steps = (FRAMES_PER_SEGMENT - 1) as f64;
        let k = ((alpha * steps).floor().max(0.0) as usize)
            .min(FRAMES_PER_SEGMENT - 2);
        let rotate = |reference: &Matrix<N>| -> Result<_, Error> {
            let from = frame::tangent(reference);
            let rot = maths::rotation_between(&from, &tangent)?;
            let drot =
                maths::rotation_between_derivative(&from, &tangent, &dtangent)?;
            Ok((rot * reference, drot * reference))
        };
        let index = segment * FRAMES_PER_SEGMENT + k;
        let (a, da) = rotate(&self.frames[index])?;
        let (b, db) = rotate(&self.frames[index + 1])?;

        // Smoothstep weight, with zero slope at both references
        let u = (alpha * steps - k as f64).clamp(0.0, 1.0);
        let s = u * u * (3.0 - 2.0 * u);
        let ds = 6.0 * u * (1.0 - u) * steps;
        let (frame, derivative) = maths::partial_twist(&a, &da, &b, &db, s, ds);
        Ok(Some(LocalFrame { frame, derivative }))
    }
}

impl<const N: usize> Transform<N> for PolyBezier<N>
where
    Const<N>: Space<N>,
{
    fn transform(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        let (segment, alpha) = self.find_segment(t);
        let offset = pos - maths::bezier(&self.control_points(segment), alpha);
        Ok(match self.local_frame(segment, alpha)? {
            Some(f) => f.frame.transpose() * offset,
            None => offset,
        })
    }

    fn velocity(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        let (segment, alpha) = self.find_segment(t);
        let cp = self.control_points(segment);
        let offset = pos - maths::bezier(&cp, alpha);
        let dcurve = maths::bezier_derivative(&cp, alpha);

        // Derivative with respect to the segment parameter, then scaled by the
        // segment count to get the derivative with respect to `t`
        let d = match self.local_frame(segment, alpha)? {
            Some(f) => {
                f.derivative.transpose() * offset - f.frame.transpose() * dcurve
            }
            None => -dcurve,
        };
        Ok(d * self.segment_count() as f64)
    }

    fn position_jacobian(
        &self,
        _pos: &Vector<N>,
        t: f64,
    ) -> Result<Matrix<N>, Error> {
        let (segment, alpha) = self.find_segment(t);
        Ok(match self.local_frame(segment, alpha)? {
            Some(f) => f.frame.transpose(),
            None => Matrix::identity(),
        })
    }
}
