//! Space-time gradient values
use crate::maths::Vector;
use nalgebra::{Vector3, Vector4};

/// Space-time gradient of a [`SpaceTimeFunction`](crate::SpaceTimeFunction)
///
/// This is the `N + 1`-dimensional gradient `(∂f/∂x, ..., ∂f/∂t)`, split into
/// its spatial part and its time component.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Grad<const N: usize> {
    /// Partial derivatives with respect to position
    pub spatial: Vector<N>,
    /// Partial derivative with respect to time
    pub dt: f64,
}

impl<const N: usize> std::fmt::Display for Grad<N> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for v in self.spatial.iter() {
            write!(f, "{v}, ")?;
        }
        write!(f, "{})", self.dt)
    }
}

impl<const N: usize> Grad<N> {
    /// Constructs a new gradient
    pub fn new(spatial: Vector<N>, dt: f64) -> Self {
        Self { spatial, dt }
    }

    /// Looks up a partial derivative by index (`N` is the time component)
    ///
    /// # Panics
    /// If the index is greater than `N`
    pub fn d(&self, i: usize) -> f64 {
        match i {
            i if i < N => self.spatial[i],
            i if i == N => self.dt,
            _ => panic!("invalid index {i}"),
        }
    }

    /// Linear combination `self · a + other · b`
    pub fn lerp(&self, a: f64, other: &Self, b: f64) -> Self {
        Self {
            spatial: self.spatial * a + other.spatial * b,
            dt: self.dt * a + other.dt * b,
        }
    }

    /// Largest absolute difference between two gradients
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        (self.spatial - other.spatial)
            .amax()
            .max((self.dt - other.dt).abs())
    }
}

impl<const N: usize> std::ops::Add<Grad<N>> for Grad<N> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        self.lerp(1.0, &rhs, 1.0)
    }
}

impl From<Grad<2>> for Vector3<f64> {
    fn from(g: Grad<2>) -> Self {
        Vector3::new(g.spatial.x, g.spatial.y, g.dt)
    }
}

impl From<Grad<3>> for Vector4<f64> {
    fn from(g: Grad<3>) -> Self {
        Vector4::new(g.spatial.x, g.spatial.y, g.spatial.z, g.dt)
    }
}
