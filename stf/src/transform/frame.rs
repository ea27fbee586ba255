//! Bishop frames for curve transports
//!
//! A frame is an orthonormal matrix whose last column (see
//! [`tangent_axis`](crate::maths::tangent_axis)) tracks the curve's tangent.
//! Each frame is obtained from its predecessor by the minimal rotation between
//! their tangents, so the remaining columns are carried along without twist.
use crate::{
    Error,
    maths::{self, Matrix, Space, Vector},
};
use nalgebra::Const;

/// Propagates frames along a sequence of tangent directions
///
/// The first frame rotates the tangent axis onto the first direction; every
/// later frame is the previous frame rotated from the previous direction onto
/// the current one.
pub(super) fn propagate<const N: usize, I>(
    directions: I,
) -> Result<Vec<Matrix<N>>, Error>
where
    Const<N>: Space<N>,
    I: IntoIterator<Item = Vector<N>>,
{
    let mut prev_dir = maths::tangent_axis::<N>();
    let mut prev_frame = Matrix::<N>::identity();
    let mut out = vec![];
    for dir in directions {
        let frame = maths::rotation_between(&prev_dir, &dir)? * prev_frame;
        out.push(frame);
        prev_dir = dir;
        prev_frame = frame;
    }
    Ok(out)
}

/// Returns the tangent column of a frame
pub(super) fn tangent<const N: usize>(frame: &Matrix<N>) -> Vector<N> {
    frame.column(N - 1).into_owned()
}

/// Unit tangent of a curve and its derivative along the curve parameter
///
/// Given the curve's first and second derivatives, the unit tangent is
/// `T = v / |v|` and its derivative is `(a - (a·T) T) / |v|`.  Returns `None`
/// if the curve is stationary.
pub(super) fn unit_tangent<const N: usize>(
    vel: &Vector<N>,
    acc: &Vector<N>,
) -> Option<(Vector<N>, Vector<N>)> {
    let speed = vel.norm();
    if speed < 1e-10 {
        return None;
    }
    let t = vel / speed;
    let dt = (acc - t * acc.dot(&t)) / speed;
    Some((t, dt))
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Vector2, Vector3};

    #[test]
    fn frames_follow_tangents() {
        let dirs = [
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(1.0, 1.0, 0.0),
            Vector3::new(0.0, 1.0, 1.0),
            Vector3::new(-1.0, 0.0, 0.2),
        ];
        let frames = propagate(dirs).unwrap();
        assert_eq!(frames.len(), 4);
        for (f, d) in frames.iter().zip(&dirs) {
            assert_relative_eq!(
                f.transpose() * f,
                Matrix::<3>::identity(),
                epsilon = 1e-12
            );
            assert_relative_eq!(f.determinant(), 1.0, epsilon = 1e-12);
            assert_relative_eq!(tangent(f), d.normalize(), epsilon = 1e-12);
        }
    }

    #[test]
    fn frames_2d() {
        let frames =
            propagate([Vector2::new(1.0, 0.0), Vector2::new(0.0, -1.0)])
                .unwrap();
        assert_relative_eq!(
            frames[1] * Vector2::y(),
            Vector2::new(0.0, -1.0),
            epsilon = 1e-12
        );
        assert!(propagate([Vector2::zeros()]).is_err());
    }

    #[test]
    fn tangent_derivative() {
        let v = Vector2::new(2.0, 0.0);
        let a = Vector2::new(1.0, 3.0);
        let (t, dt) = unit_tangent(&v, &a).unwrap();
        assert_eq!(t, Vector2::x());
        assert_relative_eq!(dt, Vector2::new(0.0, 1.5));
        assert!(unit_tangent(&Vector2::zeros(), &a).is_none());
    }
}
