//! Fixed-size vector and matrix kernel
//!
//! Everything here is built on `nalgebra`'s statically-sized types, so the
//! usual operations (dot and cross products, norms, matrix products and
//! transposes) come straight from `nalgebra`.  This module adds the pieces
//! that `nalgebra` doesn't provide with the semantics we need: normalization
//! that fails loudly, minimal rotations between two directions, and closed-form
//! cubic Bezier evaluation.
use crate::Error;
use nalgebra::{Const, Matrix2, Matrix3, SMatrix, SVector, Vector3};

/// Position or direction in `N`-dimensional space
pub type Vector<const N: usize> = SVector<f64, N>;

/// Square `N × N` matrix, applied as `M · v`
pub type Matrix<const N: usize> = SMatrix<f64, N, N>;

/// Vectors shorter than this cannot be normalized
pub const MIN_NORM: f64 = 1e-8;

/// Returns a unit vector with the same direction as `v`
///
/// Returns [`Error::ZeroLength`] if `v` is shorter than [`MIN_NORM`]
pub fn normalize<const N: usize>(v: &Vector<N>) -> Result<Vector<N>, Error> {
    let n = v.norm();
    if n < MIN_NORM {
        Err(Error::ZeroLength)
    } else {
        Ok(v / n)
    }
}

/// Skew-symmetric matrix `K` such that `K · u == v × u`
pub fn skew(v: &Vector3<f64>) -> Matrix3<f64> {
    Matrix3::new(
        0.0, -v.z, v.y, //
        v.z, 0.0, -v.x, //
        -v.y, v.x, 0.0,
    )
}

/// Rotation matrix taking the direction of `from` onto the direction of `to`
///
/// This is the minimal rotation: in 3D, it rotates about `from × to`.
pub fn rotation_between<const N: usize>(
    from: &Vector<N>,
    to: &Vector<N>,
) -> Result<Matrix<N>, Error>
where
    Const<N>: Space<N>,
{
    <Const<N> as Space<N>>::rotation_between(from, to)
}

/// Derivative of [`rotation_between`] as its target direction moves
///
/// `from` and `to` must be unit vectors, and `dto` is the derivative of `to`
/// (which is therefore perpendicular to it).
pub fn rotation_between_derivative<const N: usize>(
    from: &Vector<N>,
    to: &Vector<N>,
    dto: &Vector<N>,
) -> Result<Matrix<N>, Error>
where
    Const<N>: Space<N>,
{
    <Const<N> as Space<N>>::rotation_between_derivative(from, to, dto)
}

/// Dimension-specific geometry
///
/// This is implemented for `Const<2>` and `Const<3>`, and is used as a bound
/// (`Const<N>: Space<N>`) on objects that only make sense in 2D and 3D.
pub trait Space<const N: usize> {
    /// Minimal rotation taking the direction of `from` onto `to`
    fn rotation_between(
        from: &Vector<N>,
        to: &Vector<N>,
    ) -> Result<Matrix<N>, Error>;

    /// Derivative of the minimal rotation between unit vectors `from` and
    /// `to`, given the derivative `dto` of `to`
    fn rotation_between_derivative(
        from: &Vector<N>,
        to: &Vector<N>,
        dto: &Vector<N>,
    ) -> Result<Matrix<N>, Error>;

    /// Rotates frame `a` by a fraction `s` of the twist which takes it onto
    /// frame `b`
    ///
    /// Both frames must be rotations which share their tangent column, so
    /// that they differ only by a turn about the tangent.  `da`, `db`, and
    /// `ds` are derivatives along a common parameter; returns the blended
    /// frame and its derivative.
    fn partial_twist(
        a: &Matrix<N>,
        da: &Matrix<N>,
        b: &Matrix<N>,
        db: &Matrix<N>,
        s: f64,
        ds: f64,
    ) -> (Matrix<N>, Matrix<N>);
}

impl Space<2> for Const<2> {
    fn rotation_between(
        from: &Vector<2>,
        to: &Vector<2>,
    ) -> Result<Matrix<2>, Error> {
        let u = normalize(from)?;
        let v = normalize(to)?;
        let c = u.dot(&v);
        let s = u.x * v.y - u.y * v.x;
        Ok(Matrix2::new(c, -s, s, c))
    }

    fn rotation_between_derivative(
        from: &Vector<2>,
        _to: &Vector<2>,
        dto: &Vector<2>,
    ) -> Result<Matrix<2>, Error> {
        let dc = from.dot(dto);
        let ds = from.x * dto.y - from.y * dto.x;
        Ok(Matrix2::new(dc, -ds, ds, dc))
    }

    /// A 2D frame is fixed by its tangent, so there is never any twist
    fn partial_twist(
        a: &Matrix<2>,
        da: &Matrix<2>,
        _b: &Matrix<2>,
        _db: &Matrix<2>,
        _s: f64,
        _ds: f64,
    ) -> (Matrix<2>, Matrix<2>) {
        (*a, *da)
    }
}

/// Below this cosine, two directions are treated as opposite
const ANTIPARALLEL: f64 = -1.0 + 1e-6;

impl Space<3> for Const<3> {
    /// Uses `R = I + W + W² / (1 + c)`, where `W = v uᵀ - u vᵀ` and `c = u·v`
    ///
    /// For parallel vectors, `W` vanishes and this is the identity.
    fn rotation_between(
        from: &Vector<3>,
        to: &Vector<3>,
    ) -> Result<Matrix<3>, Error> {
        let u = normalize(from)?;
        let v = normalize(to)?;
        let c = u.dot(&v);

        if c < ANTIPARALLEL {
            // The general formula is unstable here, so build a half-turn
            // about any axis perpendicular to `from`
            let mut axis = u.cross(&Vector3::x());
            if axis.norm() < 1e-6 {
                axis = u.cross(&Vector3::y());
            }
            let k = skew(&normalize(&axis)?);
            Ok(Matrix3::identity() + 2.0 * k * k)
        } else {
            let w = v * u.transpose() - u * v.transpose();
            Ok(Matrix3::identity() + w + w * w / (1.0 + c))
        }
    }

    fn rotation_between_derivative(
        from: &Vector<3>,
        to: &Vector<3>,
        dto: &Vector<3>,
    ) -> Result<Matrix<3>, Error> {
        let (u, v) = (from, to);
        let c = u.dot(v);
        if c < ANTIPARALLEL {
            return Err(Error::ZeroLength);
        }
        let dc = u.dot(dto);
        let w = v * u.transpose() - u * v.transpose();
        let dw = dto * u.transpose() - u * dto.transpose();
        let a = 1.0 + c;
        Ok(dw + (dw * w + w * dw) / a - w * w * (dc / (a * a)))
    }

    /// Measures the twist `φ` from the first columns of both frames, then
    /// applies `Rot(T, s·φ)` to `a` using Rodrigues' formula
    fn partial_twist(
        a: &Matrix<3>,
        da: &Matrix<3>,
        b: &Matrix<3>,
        db: &Matrix<3>,
        s: f64,
        ds: f64,
    ) -> (Matrix<3>, Matrix<3>) {
        let col = |m: &Matrix<3>, i: usize| m.column(i).into_owned();
        let (a0, da0) = (col(a, 0), col(da, 0));
        let (b0, db0) = (col(b, 0), col(db, 0));
        let (t, dt) = (col(a, 2), col(da, 2));

        let x = a0.dot(&b0);
        let y = a0.cross(&b0).dot(&t);
        let dx = da0.dot(&b0) + a0.dot(&db0);
        let dy = (da0.cross(&b0) + a0.cross(&db0)).dot(&t)
            + a0.cross(&b0).dot(&dt);
        let phi = y.atan2(x);
        let dphi = (x * dy - y * dx) / (x * x + y * y);

        let theta = s * phi;
        let dtheta = ds * phi + s * dphi;
        let (sin, cos) = theta.sin_cos();
        let k = skew(&t);
        let dk = skew(&dt);
        let rot = Matrix3::identity() + k * sin + k * k * (1.0 - cos);
        let drot = k * (cos * dtheta)
            + dk * sin
            + k * k * (sin * dtheta)
            + (dk * k + k * dk) * (1.0 - cos);
        (rot * a, drot * a + rot * da)
    }
}

/// Blends between two frames which share a tangent; see
/// [`Space::partial_twist`]
pub fn partial_twist<const N: usize>(
    a: &Matrix<N>,
    da: &Matrix<N>,
    b: &Matrix<N>,
    db: &Matrix<N>,
    s: f64,
    ds: f64,
) -> (Matrix<N>, Matrix<N>)
where
    Const<N>: Space<N>,
{
    <Const<N> as Space<N>>::partial_twist(a, da, b, db, s, ds)
}

/// Unit vector along the last axis (`y` in 2D, `z` in 3D)
///
/// Curve-following frames keep the local tangent in this column.
pub fn tangent_axis<const N: usize>() -> Vector<N> {
    let mut v = Vector::<N>::zeros();
    v[N - 1] = 1.0;
    v
}

////////////////////////////////////////////////////////////////////////////////

/// Evaluates a cubic Bezier segment at `t`
pub fn bezier<const N: usize>(cp: &[Vector<N>; 4], t: f64) -> Vector<N> {
    let u = 1.0 - t;
    cp[0] * (u * u * u)
        + cp[1] * (3.0 * u * u * t)
        + cp[2] * (3.0 * u * t * t)
        + cp[3] * (t * t * t)
}

/// First derivative of a cubic Bezier segment with respect to `t`
pub fn bezier_derivative<const N: usize>(
    cp: &[Vector<N>; 4],
    t: f64,
) -> Vector<N> {
    let u = 1.0 - t;
    (cp[1] - cp[0]) * (3.0 * u * u)
        + (cp[2] - cp[1]) * (6.0 * u * t)
        + (cp[3] - cp[2]) * (3.0 * t * t)
}

/// Second derivative of a cubic Bezier segment with respect to `t`
pub fn bezier_second_derivative<const N: usize>(
    cp: &[Vector<N>; 4],
    t: f64,
) -> Vector<N> {
    let u = 1.0 - t;
    (cp[2] - cp[1] * 2.0 + cp[0]) * (6.0 * u)
        + (cp[3] - cp[2] * 2.0 + cp[1]) * (6.0 * t)
}
