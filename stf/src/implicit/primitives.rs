//! Simple closed-form shapes
use super::ImplicitFunction;
use crate::{Error, maths::Vector};
use nalgebra::Vector3;

fn check_positive(what: &'static str, value: f64) -> Result<(), Error> {
    if value > 0.0 {
        Ok(())
    } else {
        Err(Error::NonPositive { what, value })
    }
}

/// Ball (circle in 2D, sphere in 3D)
///
/// With the default degree of 1, this is the signed distance
/// `‖p - center‖ - radius`.  Higher degrees return
/// `‖p - center‖ᵈ - radiusᵈ`, which has the same zero set but a smoother
/// field at the center.
#[derive(Clone, Debug)]
pub struct Ball<const N: usize> {
    radius: f64,
    center: Vector<N>,
    degree: i32,
}

impl<const N: usize> Ball<N> {
    /// Builds a new ball of degree 1
    pub fn new(radius: f64, center: Vector<N>) -> Result<Self, Error> {
        check_positive("radius", radius)?;
        Ok(Self {
            radius,
            center,
            degree: 1,
        })
    }

    /// Changes the degree of the distance field
    pub fn with_degree(self, degree: i32) -> Result<Self, Error> {
        check_positive("degree", degree as f64)?;
        Ok(Self { degree, ..self })
    }

    /// Returns the ball's radius
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Returns the ball's center
    pub fn center(&self) -> Vector<N> {
        self.center
    }
}

impl<const N: usize> ImplicitFunction<N> for Ball<N> {
    fn value(&self, pos: &Vector<N>) -> f64 {
        let d = (pos - self.center).norm();
        d.powi(self.degree) - self.radius.powi(self.degree)
    }

    fn gradient(&self, pos: &Vector<N>) -> Vector<N> {
        let diff = pos - self.center;
        let d = diff.norm();
        if d == 0.0 {
            return Vector::zeros();
        }
        diff * (self.degree as f64 * d.powi(self.degree - 2))
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Capsule: all points within `radius` of a line segment
#[derive(Clone, Debug)]
pub struct Capsule<const N: usize> {
    radius: f64,
    start: Vector<N>,
    end: Vector<N>,
}

impl<const N: usize> Capsule<N> {
    /// Builds a new capsule around the segment from `start` to `end`
    ///
    /// A degenerate segment (`start == end`) produces a ball.
    pub fn new(
        radius: f64,
        start: Vector<N>,
        end: Vector<N>,
    ) -> Result<Self, Error> {
        check_positive("radius", radius)?;
        Ok(Self { radius, start, end })
    }

    fn closest_point(&self, pos: &Vector<N>) -> Vector<N> {
        let d = self.end - self.start;
        let len2 = d.norm_squared();
        if len2 == 0.0 {
            return self.start;
        }
        let t = ((pos - self.start).dot(&d) / len2).clamp(0.0, 1.0);
        self.start + d * t
    }
}

impl<const N: usize> ImplicitFunction<N> for Capsule<N> {
    fn value(&self, pos: &Vector<N>) -> f64 {
        (pos - self.closest_point(pos)).norm() - self.radius
    }

    fn gradient(&self, pos: &Vector<N>) -> Vector<N> {
        let g = pos - self.closest_point(pos);
        let n = g.norm();
        if n > 1e-6 { g / n } else { Vector::zeros() }
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Torus around the Z axis
#[derive(Clone, Debug)]
pub struct Torus {
    major_radius: f64,
    minor_radius: f64,
    center: Vector3<f64>,
}

impl Torus {
    /// Builds a new torus
    ///
    /// `major_radius` is the distance from the center to the middle of the
    /// tube; `minor_radius` is the radius of the tube.
    pub fn new(
        major_radius: f64,
        minor_radius: f64,
        center: Vector3<f64>,
    ) -> Result<Self, Error> {
        check_positive("major radius", major_radius)?;
        check_positive("minor radius", minor_radius)?;
        Ok(Self {
            major_radius,
            minor_radius,
            center,
        })
    }
}

impl ImplicitFunction<3> for Torus {
    fn value(&self, pos: &Vector3<f64>) -> f64 {
        let p = pos - self.center;
        let a = p.xy().norm() - self.major_radius;
        (a * a + p.z * p.z).sqrt() - self.minor_radius
    }

    fn gradient(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        let p = pos - self.center;
        let len_xy = p.xy().norm();

        // On the Z axis, the field is a cone; pick its axial direction
        if len_xy < 1e-6 {
            return Vector3::new(0.0, 0.0, if p.z >= 0.0 { 1.0 } else { -1.0 });
        }

        let a = len_xy - self.major_radius;
        let q = (a * a + p.z * p.z).sqrt();
        if q < 1e-6 {
            // Gradient is undefined on the core circle
            return Vector3::zeros();
        }

        Vector3::new(
            (a / q) * (p.x / len_xy),
            (a / q) * (p.y / len_xy),
            p.z / q,
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::implicit::test_util::check_gradient;
    use approx::assert_relative_eq;
    use nalgebra::Vector2;

    #[test]
    fn ball() {
        let b = Ball::new(1.0, Vector3::zeros()).unwrap();
        assert_eq!(b.value(&Vector3::new(2.0, 0.0, 0.0)), 1.0);
        assert_eq!(b.gradient(&Vector3::new(2.0, 0.0, 0.0)), Vector3::x());
        assert_eq!(b.gradient(&Vector3::zeros()), Vector3::zeros());
        assert_eq!(b.value(&Vector3::zeros()), -1.0);

        let b = Ball::new(0.5, Vector2::new(1.0, 1.0)).unwrap();
        assert_relative_eq!(b.value(&Vector2::new(1.0, 2.0)), 0.5);
        for p in [Vector2::new(0.3, -0.2), Vector2::new(2.0, 1.5)] {
            check_gradient(&b, &p, 1e-6);
        }
    }

    #[test]
    fn ball_degree() {
        let b = Ball::new(2.0, Vector3::zeros())
            .unwrap()
            .with_degree(2)
            .unwrap();
        assert_relative_eq!(b.value(&Vector3::new(1.0, 0.0, 0.0)), -3.0);
        for p in [Vector3::new(0.3, -0.2, 0.1), Vector3::new(2.0, 1.5, -1.0)] {
            check_gradient(&b, &p, 1e-5);
        }
        let b = Ball::new(1.0, Vector3::zeros()).unwrap();
        assert!(b.with_degree(0).is_err());
    }

    #[test]
    fn bad_radius() {
        assert!(matches!(
            Ball::new(0.0, Vector2::zeros()),
            Err(Error::NonPositive { what: "radius", .. })
        ));
        assert!(Capsule::new(-1.0, Vector2::zeros(), Vector2::x()).is_err());
        assert!(Torus::new(1.0, 0.0, Vector3::zeros()).is_err());
    }

    #[test]
    fn capsule() {
        let c =
            Capsule::new(0.5, Vector3::zeros(), Vector3::new(1.0, 0.0, 0.0))
                .unwrap();
        assert_relative_eq!(c.value(&Vector3::new(0.5, 1.0, 0.0)), 0.5);
        assert_relative_eq!(c.value(&Vector3::new(2.0, 0.0, 0.0)), 0.5);
        assert_relative_eq!(c.value(&Vector3::new(-1.0, 0.0, 0.0)), 0.5);
        assert_eq!(c.gradient(&Vector3::new(0.5, 0.0, 0.0)), Vector3::zeros());
        for p in [
            Vector3::new(0.5, 1.0, 0.3),
            Vector3::new(1.5, -0.2, 0.1),
            Vector3::new(-0.4, 0.3, 0.3),
        ] {
            check_gradient(&c, &p, 1e-6);
        }

        // Degenerate segment behaves like a ball
        let c = Capsule::new(1.0, Vector2::x(), Vector2::x()).unwrap();
        assert_relative_eq!(c.value(&Vector2::new(1.0, 3.0)), 1.0);
    }

    #[test]
    fn torus() {
        let t = Torus::new(1.0, 0.25, Vector3::zeros()).unwrap();
        assert_relative_eq!(t.value(&Vector3::new(1.0, 0.0, 0.0)), -0.25);
        assert_relative_eq!(t.value(&Vector3::new(0.0, 2.0, 0.0)), 0.75);
        assert_eq!(t.gradient(&Vector3::new(0.0, 0.0, -1.0)), -Vector3::z());
        assert_eq!(t.gradient(&Vector3::new(1.0, 0.0, 0.0)), Vector3::zeros());
        for p in [
            Vector3::new(1.5, 0.3, 0.2),
            Vector3::new(-0.2, 0.6, -0.4),
            Vector3::new(0.1, -2.0, 1.0),
        ] {
            check_gradient(&t, &p, 1e-6);
        }
    }
}
