//! Central-difference approximations
//!
//! These are debugging oracles for the analytic derivatives; nothing on the
//! evaluation path calls them.  They back the `finite_difference_*` methods on
//! [`ImplicitFunction`](crate::ImplicitFunction),
//! [`Transform`](crate::Transform), and
//! [`SpaceTimeFunction`](crate::SpaceTimeFunction).
use crate::{
    Error,
    maths::{Matrix, Vector},
};

/// Default step size for central differences
pub const STEP: f64 = 1e-6;

/// Central-difference gradient of a scalar field
///
/// This is generic over the error type, so that infallible fields can use
/// [`Infallible`](std::convert::Infallible).
pub fn gradient<const N: usize, F, E>(
    f: F,
    pos: &Vector<N>,
    delta: f64,
) -> Result<Vector<N>, E>
where
    F: Fn(&Vector<N>) -> Result<f64, E>,
{
    let mut out = Vector::<N>::zeros();
    for i in 0..N {
        let mut hi = *pos;
        let mut lo = *pos;
        hi[i] += delta;
        lo[i] -= delta;
        out[i] = (f(&hi)? - f(&lo)?) / (2.0 * delta);
    }
    Ok(out)
}

/// Central-difference derivative of a scalar function of one variable
pub fn derivative<F>(f: F, t: f64, delta: f64) -> Result<f64, Error>
where
    F: Fn(f64) -> Result<f64, Error>,
{
    Ok((f(t + delta)? - f(t - delta)?) / (2.0 * delta))
}

/// Central-difference derivative of a vector function of one variable
pub fn vector_derivative<const N: usize, F>(
    f: F,
    t: f64,
    delta: f64,
) -> Result<Vector<N>, Error>
where
    F: Fn(f64) -> Result<Vector<N>, Error>,
{
    Ok((f(t + delta)? - f(t - delta)?) / (2.0 * delta))
}

/// Central-difference Jacobian of a vector field
///
/// Column `i` of the result is the partial derivative with respect to
/// `pos[i]`.
pub fn jacobian<const N: usize, F>(
    f: F,
    pos: &Vector<N>,
    delta: f64,
) -> Result<Matrix<N>, Error>
where
    F: Fn(&Vector<N>) -> Result<Vector<N>, Error>,
{
    let mut out = Matrix::<N>::zeros();
    for i in 0..N {
        let mut hi = *pos;
        let mut lo = *pos;
        hi[i] += delta;
        lo[i] -= delta;
        let col = (f(&hi)? - f(&lo)?) / (2.0 * delta);
        out.set_column(i, &col);
    }
    Ok(out)
}

#[cfg(test)]
mod test {
    use super::*;
    use approx::assert_relative_eq;
    use nalgebra::{Matrix2, Vector2, Vector3};

    #[test]
    fn quadratic_gradient() {
        let f = |p: &Vector2<f64>| Ok::<_, Error>(p.x * p.x + 3.0 * p.y);
        let g = gradient(f, &Vector2::new(2.0, 1.0), STEP).unwrap();
        assert_relative_eq!(g, Vector2::new(4.0, 3.0), epsilon = 1e-6);
    }

    #[test]
    fn infallible_gradient() {
        let f = |p: &Vector3<f64>| {
            Ok::<_, std::convert::Infallible>(p.x * p.y - p.z * p.z)
        };
        let Ok(g) = gradient(f, &Vector3::new(1.0, 2.0, -1.0), STEP);
        assert_relative_eq!(g, Vector3::new(2.0, 1.0, 2.0), epsilon = 1e-6);
    }

    #[test]
    fn linear_jacobian() {
        let m = Matrix2::new(1.0, 2.0, -3.0, 4.0);
        let j = jacobian(|p| Ok(m * p), &Vector2::new(0.5, -0.5), STEP)
            .unwrap();
        assert_relative_eq!(j, m, epsilon = 1e-6);
    }

    #[test]
    fn derivatives() {
        let d = derivative(|t| Ok(t.sin()), 0.3, STEP).unwrap();
        assert_relative_eq!(d, 0.3f64.cos(), epsilon = 1e-8);

        let v = vector_derivative(
            |t| Ok(Vector2::new(t * t, -t)),
            2.0,
            STEP,
        )
        .unwrap();
        assert_relative_eq!(v, Vector2::new(4.0, -1.0), epsilon = 1e-6);
    }

    #[test]
    fn errors_propagate() {
        let r = derivative(|_| Err(Error::ZeroLength), 0.0, STEP);
        assert!(matches!(r, Err(Error::ZeroLength)));
    }
}
