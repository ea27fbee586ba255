//! Translation, scaling, and rotation ramped linearly in time
use super::Transform;
use crate::{
    Error,
    maths::{self, Matrix, Vector},
};
use nalgebra::{Matrix2, Vector2, Vector3};

/// Translation by `vector · t`
#[derive(Clone, Debug)]
pub struct Translation<const N: usize> {
    vector: Vector<N>,
}

impl<const N: usize> Translation<N> {
    /// Builds a translation which moves positions by `vector` over `t ∈ [0, 1]`
    pub fn new(vector: Vector<N>) -> Self {
        Self { vector }
    }
}

impl<const N: usize> Transform<N> for Translation<N> {
    fn transform(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        Ok(pos + self.vector * t)
    }

    fn velocity(&self, _pos: &Vector<N>, _t: f64) -> Result<Vector<N>, Error> {
        Ok(self.vector)
    }

    fn position_jacobian(
        &self,
        _pos: &Vector<N>,
        _t: f64,
    ) -> Result<Matrix<N>, Error> {
        Ok(Matrix::identity())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Per-axis scaling about a center
///
/// The scale factor along axis `i` ramps from 1 at `t = 0` to `factors[i]` at
/// `t = 1`.
#[derive(Clone, Debug)]
pub struct Scale<const N: usize> {
    factors: Vector<N>,
    center: Vector<N>,
}

impl<const N: usize> Scale<N> {
    /// Builds a new scaling transform
    pub fn new(factors: Vector<N>, center: Vector<N>) -> Self {
        Self { factors, center }
    }

    fn ramp(&self, t: f64) -> Vector<N> {
        self.factors.map(|f| 1.0 + (f - 1.0) * t)
    }
}

impl<const N: usize> Transform<N> for Scale<N> {
    fn transform(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        Ok((pos - self.center).component_mul(&self.ramp(t)) + self.center)
    }

    fn velocity(&self, pos: &Vector<N>, _t: f64) -> Result<Vector<N>, Error> {
        Ok((pos - self.center)
            .component_mul(&self.factors.map(|f| f - 1.0)))
    }

    fn position_jacobian(
        &self,
        _pos: &Vector<N>,
        t: f64,
    ) -> Result<Matrix<N>, Error> {
        Ok(Matrix::from_diagonal(&self.ramp(t)))
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Rotation about a center, with the angle ramped linearly in time
///
/// In 2D, this rotates about a point; in 3D, about an axis through `center`.
/// The rotation angle is `t · angle` (in degrees), so the default angle of
/// [`Rotation::FULL_TURN`] completes one revolution over `t ∈ [0, 1]`.
#[derive(Clone, Debug)]
pub struct Rotation<const N: usize> {
    center: Vector<N>,
    /// Generator `K`, so that `R(θ) = I + sin θ K + (1 - cos θ) K²`
    generator: Matrix<N>,
    /// Total rotation angle, in radians
    angle: f64,
}

impl<const N: usize> Rotation<N> {
    /// One full revolution, in degrees
    pub const FULL_TURN: f64 = 360.0;

    fn matrix(&self, t: f64) -> Matrix<N> {
        let theta = t * self.angle;
        let k = &self.generator;
        Matrix::identity() + k * theta.sin() + k * k * (1.0 - theta.cos())
    }
}

impl Rotation<2> {
    /// Builds a rotation about a point in the plane
    pub fn planar(center: Vector2<f64>, angle_degrees: f64) -> Self {
        Self {
            center,
            generator: Matrix2::new(0.0, -1.0, 1.0, 0.0),
            angle: angle_degrees.to_radians(),
        }
    }
}

impl Rotation<3> {
    /// Builds a rotation about an axis passing through `center`
    ///
    /// Returns an error if `axis` has (nearly) zero length.
    pub fn about_axis(
        center: Vector3<f64>,
        axis: Vector3<f64>,
        angle_degrees: f64,
    ) -> Result<Self, Error> {
        let axis = maths::normalize(&axis).map_err(|_| Error::ZeroScale {
            what: "rotation axis",
            value: axis.norm(),
        })?;
        Ok(Self {
            center,
            generator: maths::skew(&axis),
            angle: angle_degrees.to_radians(),
        })
    }
}

impl<const N: usize> Transform<N> for Rotation<N> {
    fn transform(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        Ok(self.matrix(t) * (pos - self.center) + self.center)
    }

    /// Angular rate crossed with the rotated, re-centered position
    fn velocity(&self, pos: &Vector<N>, t: f64) -> Result<Vector<N>, Error> {
        let rotated = self.matrix(t) * (pos - self.center);
        Ok(self.generator * rotated * self.angle)
    }

    fn position_jacobian(
        &self,
        _pos: &Vector<N>,
        t: f64,
    ) -> Result<Matrix<N>, Error> {
        Ok(self.matrix(t))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::transform::test_util::check_transform;
    use approx::assert_relative_eq;

    #[test]
    fn translation() {
        let tr = Translation::new(Vector3::new(1.0, 0.0, 0.0));
        let p = Vector3::zeros();
        assert_eq!(tr.transform(&p, 0.5).unwrap(), Vector3::new(0.5, 0.0, 0.0));
        for t in [0.0, 0.3, 1.0] {
            assert_eq!(tr.velocity(&p, t).unwrap(), Vector3::x());
        }
        check_transform(&tr, &Vector3::new(0.2, -1.0, 3.0), 0.7, 1e-6);
    }

    #[test]
    fn scale() {
        let s = Scale::new(Vector2::new(2.0, 0.5), Vector2::new(1.0, 1.0));
        let p = Vector2::new(2.0, 3.0);
        assert_eq!(s.transform(&p, 0.0).unwrap(), p);
        assert_relative_eq!(
            s.transform(&p, 1.0).unwrap(),
            Vector2::new(3.0, 2.0)
        );
        assert_relative_eq!(
            s.position_jacobian(&p, 0.5).unwrap(),
            Matrix2::new(1.5, 0.0, 0.0, 0.75)
        );
        for t in [0.0, 0.4, 1.0] {
            check_transform(&s, &p, t, 1e-6);
        }
    }

    #[test]
    fn rotation_2d() {
        let r = Rotation::planar(Vector2::new(1.0, 0.0), 90.0);
        let p = Vector2::new(2.0, 0.0);
        assert_relative_eq!(
            r.transform(&p, 1.0).unwrap(),
            Vector2::new(1.0, 1.0),
            epsilon = 1e-12
        );
        assert_relative_eq!(
            r.velocity(&p, 0.0).unwrap(),
            Vector2::new(0.0, std::f64::consts::FRAC_PI_2),
            epsilon = 1e-12
        );
        for t in [0.0, 0.25, 0.8] {
            check_transform(&r, &Vector2::new(-0.3, 0.7), t, 1e-5);
        }
    }

    #[test]
    fn rotation_3d() {
        let r = Rotation::about_axis(
            Vector3::zeros(),
            Vector3::new(0.0, 0.0, 2.0),
            Rotation::<3>::FULL_TURN,
        )
        .unwrap();
        let p = Vector3::new(1.0, 0.0, 0.5);
        assert_relative_eq!(
            r.transform(&p, 0.25).unwrap(),
            Vector3::new(0.0, 1.0, 0.5),
            epsilon = 1e-12
        );
        assert_relative_eq!(r.transform(&p, 1.0).unwrap(), p, epsilon = 1e-12);

        let r = Rotation::about_axis(
            Vector3::new(0.5, -0.2, 0.1),
            Vector3::new(1.0, 2.0, -0.5),
            135.0,
        )
        .unwrap();
        for t in [0.0, 0.3, 0.9] {
            check_transform(&r, &Vector3::new(0.4, 1.1, -0.6), t, 1e-5);
            let j = r.position_jacobian(&p, t).unwrap();
            assert_relative_eq!(
                j.transpose() * j,
                Matrix::<3>::identity(),
                epsilon = 1e-12
            );
        }

        assert!(
            Rotation::about_axis(Vector3::zeros(), Vector3::zeros(), 90.0)
                .is_err()
        );
    }
}
