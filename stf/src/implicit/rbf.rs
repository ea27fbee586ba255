//! Radial-basis-function surfaces
//!
//! Both [`Duchon`] and [`Vipss`] evaluate the same field: a sum of cubic
//! radial terms and gradient-coupled terms centered at each control point
//! `pᵢ`, plus a global affine term,
//!
//! ```text
//! f(x) = Σᵢ [ dᵢ³·aᵢ + 3dᵢ·(x - pᵢ)·bᵢ ] + c₀ + c·x,   dᵢ = ‖x - pᵢ‖
//! ```
//!
//! where `x` is the query position after a similarity normalization.  The two
//! types differ only in how that normalization is specified.  Coefficients
//! are supplied by the caller; fitting them is out of scope.
use super::ImplicitFunction;
use crate::{Error, load};
use nalgebra::{Matrix3, Vector3, Vector4};
use std::path::Path;

/// Shared RBF evaluator
#[derive(Clone, Debug)]
struct Rbf {
    points: Vec<Vector3<f64>>,
    /// Per-point `[a, bx, by, bz]`
    coeffs: Vec<Vector4<f64>>,
    /// `[c₀, cx, cy, cz]`
    affine: Vector4<f64>,

    /// Scale applied to query positions before evaluation
    scale: f64,
    /// Translation applied to query positions after scaling
    translation: Vector3<f64>,
    /// Whether to negate the field
    negate: bool,
}

impl Rbf {
    fn new(
        points: Vec<Vector3<f64>>,
        coeffs: Vec<Vector4<f64>>,
        affine: Vector4<f64>,
    ) -> Result<Self, Error> {
        if points.len() != coeffs.len() {
            return Err(Error::MismatchedLengths(
                points.len(),
                coeffs.len(),
                "points and RBF coefficients",
            ));
        }
        if points.is_empty() {
            return Err(Error::EmptyPoints);
        }
        Ok(Self {
            points,
            coeffs,
            affine,
            scale: 1.0,
            translation: Vector3::zeros(),
            negate: false,
        })
    }

    /// Returns the center and half-diagonal of the control points' bounds
    fn bounds(&self) -> (Vector3<f64>, f64) {
        let mut lo = self.points[0];
        let mut hi = self.points[0];
        for p in &self.points[1..] {
            lo = lo.inf(p);
            hi = hi.sup(p);
        }
        let center = (lo + hi) / 2.0;
        (center, (hi - center).norm())
    }

    fn sign(&self) -> f64 {
        if self.negate { -1.0 } else { 1.0 }
    }

    fn value(&self, pos: &Vector3<f64>) -> f64 {
        let pos = pos * self.scale + self.translation;
        let mut out = 0.0;
        for (p, c) in self.points.iter().zip(&self.coeffs) {
            let diff = pos - p;
            let d = diff.norm();
            out += d * d * d * c[0]
                + 3.0 * d * diff.dot(&c.fixed_rows::<3>(1));
        }
        out += self.affine[0] + self.affine.fixed_rows::<3>(1).dot(&pos);
        out * self.sign()
    }

    fn gradient(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        let pos = pos * self.scale + self.translation;
        let mut out = Vector3::zeros();
        for (p, c) in self.points.iter().zip(&self.coeffs) {
            let diff = pos - p;
            let d = diff.norm();
            out += diff * (3.0 * d * c[0]);

            // Hessian of the cubic term, applied to the point's b coefficients
            if d > 1e-8 {
                let h = (Matrix3::identity() * d
                    + diff * diff.transpose() / d)
                    * 3.0;
                out += h * c.fixed_rows::<3>(1);
            }
        }
        out += self.affine.fixed_rows::<3>(1);
        out * (self.scale * self.sign())
    }
}

////////////////////////////////////////////////////////////////////////////////

/// Duchon-interpolant RBF surface
///
/// By default, the control points' bounding box is mapped onto a sphere of
/// radius 1 at the origin; use [`with_normalization`](Self::with_normalization)
/// to place it elsewhere.  The field is negative inside unless
/// [`positive_inside`](Self::positive_inside) is set, in which case it is
/// negated to restore the usual convention.
#[derive(Clone, Debug)]
pub struct Duchon {
    rbf: Rbf,
}

impl Duchon {
    /// Builds a new surface from control points and coefficients
    ///
    /// `coeffs` holds `[a, bx, by, bz]` for each point, and `affine` holds
    /// `[c₀, cx, cy, cz]`.
    pub fn new(
        points: Vec<Vector3<f64>>,
        coeffs: Vec<Vector4<f64>>,
        affine: Vector4<f64>,
    ) -> Result<Self, Error> {
        let rbf = Rbf::new(points, coeffs, affine)?;
        Self { rbf }.with_normalization(Vector3::zeros(), 1.0)
    }

    /// Loads a surface from a `.xyz` sample file and a coefficient file
    ///
    /// The coefficient file stores the per-point coefficients in column-major
    /// order (all `a` values, then all `bx`, etc), followed by the four affine
    /// coefficients.
    pub fn from_files<P: AsRef<Path>, Q: AsRef<Path>>(
        samples: P,
        coeffs: Q,
    ) -> Result<Self, Error> {
        let samples = samples.as_ref();
        if samples.extension().and_then(|e| e.to_str()) != Some("xyz") {
            return Err(Error::ParseError(format!(
                "expected a .xyz sample file, got {}",
                samples.display()
            )));
        }
        let points = load::read_xyz::<3, _>(samples)?;
        let (coeffs, affine) = load::read_coefficients(coeffs, points.len())?;
        Self::new(points, coeffs, affine)
    }

    /// Maps the control points' bounding box onto a sphere
    ///
    /// The bounding box's half-diagonal is scaled to `radius`, and its center
    /// is moved to `center`.
    pub fn with_normalization(
        mut self,
        center: Vector3<f64>,
        radius: f64,
    ) -> Result<Self, Error> {
        if radius.abs() < 1e-6 {
            return Err(Error::ZeroScale {
                what: "radius",
                value: radius,
            });
        }
        let (bbox_center, half_diagonal) = self.rbf.bounds();
        if half_diagonal < 1e-12 {
            return Err(Error::ZeroScale {
                what: "bounding box",
                value: half_diagonal,
            });
        }
        let scale = half_diagonal / radius;
        self.rbf.scale = scale;
        self.rbf.translation = bbox_center - center * scale;
        log::debug!(
            "duchon normalization: {} points, scale {scale}",
            self.rbf.points.len()
        );
        Ok(self)
    }

    /// Sets whether the fitted field is positive inside the surface
    pub fn positive_inside(mut self, positive_inside: bool) -> Self {
        self.rbf.negate = positive_inside;
        self
    }
}

impl ImplicitFunction<3> for Duchon {
    fn value(&self, pos: &Vector3<f64>) -> f64 {
        self.rbf.value(pos)
    }
    fn gradient(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        self.rbf.gradient(pos)
    }
}

////////////////////////////////////////////////////////////////////////////////

/// VIPSS RBF surface
///
/// VIPSS fits are positive inside, so the field is always negated.  Query
/// positions are mapped by `x / scale + bbox_center - center / scale`, so
/// that `center` lands on the middle of the control points' bounding box.
#[derive(Clone, Debug)]
pub struct Vipss {
    rbf: Rbf,
}

impl Vipss {
    /// Builds a new surface
    ///
    /// Returns an error if `points` and `coeffs` have different lengths, if
    /// `points` is empty, or if `scale` is (nearly) zero.
    pub fn new(
        points: Vec<Vector3<f64>>,
        coeffs: Vec<Vector4<f64>>,
        affine: Vector4<f64>,
        center: Vector3<f64>,
        scale: f64,
    ) -> Result<Self, Error> {
        let mut rbf = Rbf::new(points, coeffs, affine)?;
        if scale.abs() < 1e-6 {
            return Err(Error::ZeroScale {
                what: "scale",
                value: scale,
            });
        }
        let (bbox_center, _) = rbf.bounds();
        rbf.scale = 1.0 / scale;
        rbf.translation = bbox_center - center / scale;
        rbf.negate = true;
        log::debug!("vipss normalization: {} points", rbf.points.len());
        Ok(Self { rbf })
    }
}

impl ImplicitFunction<3> for Vipss {
    fn value(&self, pos: &Vector3<f64>) -> f64 {
        self.rbf.value(pos)
    }
    fn gradient(&self, pos: &Vector3<f64>) -> Vector3<f64> {
        self.rbf.gradient(pos)
    }
}
