//! Declarative descriptions of space-time functions
//!
//! A description is a JSON document with one object per node.  Each object
//! has a `type` tag naming the node and the node's parameters as sibling
//! fields; the root object may also declare its `dimension`.
//!
//! ```
//! use nalgebra::Vector3;
//! use stf::{SpaceTimeFunction, describe::Description};
//!
//! let desc: Description = r#"{
//!     "dimension": 3,
//!     "type": "sweep",
//!     "primitive": { "type": "ball", "radius": 0.5, "center": [0, 0, 0] },
//!     "transform": { "type": "translation", "vector": [1, 0, 0] }
//! }"#
//! .parse()?;
//! let f = desc.build::<3>()?;
//! assert_eq!(f.value(&Vector3::zeros(), 1.0)?, 0.5);
//! # Ok::<(), stf::Error>(())
//! ```
//!
//! Space-time nodes are `sweep`, `union`, `interpolate`, and `offset`.
//! Implicit functions (`ball`, `capsule`, `torus`, `duchon`, and
//! `implicit_union`) appear as the `primitive` of a sweep, and transforms
//! (`translation`, `scale`, `rotation`, `compose`, `polyline`, and
//! `polybezier`) as its `transform`.  Unions and compositions of more than two
//! operands are built as left-leaning chains.
//!
//! `explicit` nodes are rejected, because closures cannot be described in
//! text; build an [`ExplicitForm`](crate::space_time::ExplicitForm) in code
//! instead.
//!
//! Data files (point clouds and RBF coefficients) are loaded with the
//! [`load`](crate::load) module.  When a description is read with
//! [`Description::load`], relative file paths are resolved against the
//! description's directory.
use crate::{
    Error, SpaceTimeFunction,
    implicit::{Duchon, ImplicitFunction, Torus},
    maths::{Space, Vector},
    transform::{Rotation, Transform},
};
use nalgebra::{Const, Vector2, Vector3};
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

mod node;
use node::{Context, FunctionNode};

/// A parsed description, ready to be built
#[derive(Debug, serde::Deserialize)]
pub struct Description {
    dimension: Option<usize>,
    #[serde(flatten)]
    root: FunctionNode,
    #[serde(skip)]
    base_dir: Option<PathBuf>,
}

impl std::str::FromStr for Description {
    type Err = Error;
    fn from_str(s: &str) -> Result<Self, Error> {
        Ok(serde_json::from_str(s)?)
    }
}

impl Description {
    /// Reads a description from a file
    ///
    /// Relative data-file paths in the description are resolved against the
    /// file's parent directory.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let mut out: Self = text.parse()?;
        out.base_dir = path.parent().map(Path::to_owned);
        log::debug!("loaded description from {}", path.display());
        Ok(out)
    }

    /// Returns the dimension declared by the description, if any
    pub fn dimension(&self) -> Option<usize> {
        self.dimension
    }

    /// Builds the function tree for a particular dimension
    ///
    /// Returns [`Error::DimensionMismatch`] if the description declares a
    /// different dimension, or [`Error::UnsupportedDimension`] if it uses a
    /// node which doesn't exist in dimension `N`.
    pub fn build<const N: usize>(
        &self,
    ) -> Result<Arc<dyn SpaceTimeFunction<N>>, Error>
    where
        Const<N>: Dimension<N>,
    {
        match self.dimension {
            Some(d) if d != 2 && d != 3 => {
                return Err(Error::UnsupportedDimension(d));
            }
            Some(d) if d != N => {
                return Err(Error::DimensionMismatch {
                    expected: N,
                    actual: d,
                });
            }
            _ => (),
        }
        let ctx = Context {
            base_dir: self.base_dir.as_deref(),
        };
        self.root.build(&ctx)
    }
}

/// Parses and builds a description from a string
pub fn from_str<const N: usize>(
    s: &str,
) -> Result<Arc<dyn SpaceTimeFunction<N>>, Error>
where
    Const<N>: Dimension<N>,
{
    s.parse::<Description>()?.build()
}

/// Reads and builds a description from a file
pub fn from_file<const N: usize, P: AsRef<Path>>(
    path: P,
) -> Result<Arc<dyn SpaceTimeFunction<N>>, Error>
where
    Const<N>: Dimension<N>,
{
    Description::load(path)?.build()
}

////////////////////////////////////////////////////////////////////////////////

/// Builders for nodes which only exist in some dimensions
///
/// This is implemented for `Const<2>` and `Const<3>`.
pub trait Dimension<const N: usize>: Space<N> {
    /// Builds a torus around the Z axis
    fn torus(
        major_radius: f64,
        minor_radius: f64,
        center: Vector<N>,
    ) -> Result<Arc<dyn ImplicitFunction<N>>, Error>;

    /// Loads an RBF surface and normalizes it onto a sphere
    fn duchon(
        samples: &Path,
        coeffs: &Path,
        center: Option<Vector<N>>,
        radius: f64,
        positive_inside: bool,
    ) -> Result<Arc<dyn ImplicitFunction<N>>, Error>;

    /// Builds a rotation of `angle` degrees about `center`
    ///
    /// In 3D, `axis` is required.
    fn rotation(
        angle: f64,
        center: Vector<N>,
        axis: Option<&[f64]>,
    ) -> Result<Arc<dyn Transform<N>>, Error>;
}

impl Dimension<2> for Const<2> {
    fn torus(
        _major_radius: f64,
        _minor_radius: f64,
        _center: Vector2<f64>,
    ) -> Result<Arc<dyn ImplicitFunction<2>>, Error> {
        Err(Error::UnsupportedDimension(2))
    }

    fn duchon(
        _samples: &Path,
        _coeffs: &Path,
        _center: Option<Vector2<f64>>,
        _radius: f64,
        _positive_inside: bool,
    ) -> Result<Arc<dyn ImplicitFunction<2>>, Error> {
        Err(Error::UnsupportedDimension(2))
    }

    fn rotation(
        angle: f64,
        center: Vector2<f64>,
        axis: Option<&[f64]>,
    ) -> Result<Arc<dyn Transform<2>>, Error> {
        if axis.is_some() {
            return Err(Error::ParseError(
                "2D rotations do not take an axis".to_owned(),
            ));
        }
        Ok(Arc::new(Rotation::planar(center, angle)))
    }
}

impl Dimension<3> for Const<3> {
    fn torus(
        major_radius: f64,
        minor_radius: f64,
        center: Vector3<f64>,
    ) -> Result<Arc<dyn ImplicitFunction<3>>, Error> {
        Ok(Arc::new(Torus::new(major_radius, minor_radius, center)?))
    }

    fn duchon(
        samples: &Path,
        coeffs: &Path,
        center: Option<Vector3<f64>>,
        radius: f64,
        positive_inside: bool,
    ) -> Result<Arc<dyn ImplicitFunction<3>>, Error> {
        let d = Duchon::from_files(samples, coeffs)?
            .with_normalization(center.unwrap_or_else(Vector3::zeros), radius)?
            .positive_inside(positive_inside);
        Ok(Arc::new(d))
    }

    fn rotation(
        angle: f64,
        center: Vector3<f64>,
        axis: Option<&[f64]>,
    ) -> Result<Arc<dyn Transform<3>>, Error> {
        let axis = axis.ok_or_else(|| {
            Error::ParseError("3D rotations require an axis".to_owned())
        })?;
        let axis = node::vector::<3>(axis, "rotation axis")?;
        Ok(Arc::new(Rotation::about_axis(center, axis, angle)?))
    }
}
