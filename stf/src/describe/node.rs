//! Description nodes and their builders
use super::Dimension;
use crate::{
    Error, SpaceTimeFunction,
    blend::Blending,
    implicit::{Ball, Capsule, ImplicitFunction, ImplicitUnion},
    load,
    maths::Vector,
    space_time::{BezierProfile, Interpolate, Offset, Profile, Sweep, Union},
    transform::{Compose, PolyBezier, Polyline, Scale, Transform, Translation},
};
use nalgebra::Const;
use serde::Deserialize;
use std::{
    path::{Path, PathBuf},
    sync::Arc,
};

/// Shared state while building a tree
pub(super) struct Context<'a> {
    pub base_dir: Option<&'a Path>,
}

impl Context<'_> {
    /// Resolves a relative path against the description's directory
    fn path(&self, p: &Path) -> PathBuf {
        match self.base_dir {
            Some(dir) if p.is_relative() => dir.join(p),
            _ => p.to_owned(),
        }
    }
}

/// Converts a list of coordinates into a vector
pub(super) fn vector<const N: usize>(
    v: &[f64],
    what: &'static str,
) -> Result<Vector<N>, Error> {
    if v.len() != N {
        return Err(Error::MismatchedLengths(v.len(), N, what));
    }
    Ok(Vector::<N>::from_column_slice(v))
}

fn vectors<const N: usize>(
    v: &[Vec<f64>],
    what: &'static str,
) -> Result<Vec<Vector<N>>, Error> {
    v.iter().map(|p| vector(p, what)).collect()
}

fn optional_vector<const N: usize>(
    v: &Option<Vec<f64>>,
    what: &'static str,
) -> Result<Vector<N>, Error> {
    match v {
        Some(v) => vector(v, what),
        None => Ok(Vector::zeros()),
    }
}

/// Folds two or more operands into a left-leaning chain
fn left_chain<T: ?Sized, F>(
    what: &str,
    items: Vec<Arc<T>>,
    join: F,
) -> Result<Arc<T>, Error>
where
    F: FnMut(Arc<T>, Arc<T>) -> Result<Arc<T>, Error>,
{
    let count = items.len();
    let mut iter = items.into_iter();
    match iter.next() {
        Some(first) if count >= 2 => iter.try_fold(first, join),
        _ => Err(Error::ParseError(format!(
            "{what} requires at least 2 operands (got {count})"
        ))),
    }
}

fn default_true() -> bool {
    true
}

fn default_one() -> f64 {
    1.0
}

fn default_degree() -> i32 {
    1
}

fn default_periods() -> f64 {
    0.5
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub(super) enum FunctionNode {
    Sweep {
        primitive: PrimitiveNode,
        transform: TransformNode,
    },
    Union {
        functions: Vec<FunctionNode>,
        #[serde(default)]
        smooth_distance: f64,
        #[serde(default)]
        blending: Blending,
    },
    Interpolate {
        function1: Box<FunctionNode>,
        function2: Box<FunctionNode>,
        #[serde(default)]
        interpolation_type: InterpolationType,
        #[serde(default = "default_periods")]
        num_periods: f64,
        #[serde(default)]
        phase: f64,
    },
    Offset {
        base_function: Box<FunctionNode>,
        offset_function: ProfileNode,
    },
    Explicit,
}

#[derive(Copy, Clone, Debug, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub(super) enum InterpolationType {
    #[default]
    Linear,
    Smooth,
    Cosine,
}

impl FunctionNode {
    pub fn build<const N: usize>(
        &self,
        ctx: &Context,
    ) -> Result<Arc<dyn SpaceTimeFunction<N>>, Error>
    where
        Const<N>: Dimension<N>,
    {
        log::trace!("building {} node", <&'static str>::from(self));
        let out: Arc<dyn SpaceTimeFunction<N>> = match self {
            FunctionNode::Sweep {
                primitive,
                transform,
            } => Arc::new(Sweep::<N>::new(
                primitive.build(ctx)?,
                transform.build(ctx)?,
            )),
            FunctionNode::Union {
                functions,
                smooth_distance,
                blending,
            } => {
                let fs = functions
                    .iter()
                    .map(|f| f.build::<N>(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                left_chain("union", fs, |a, b| {
                    let u = Union::with_blending(
                        a,
                        b,
                        *smooth_distance,
                        *blending,
                    )?;
                    Ok(Arc::new(u) as Arc<dyn SpaceTimeFunction<N>>)
                })?
            }
            FunctionNode::Interpolate {
                function1,
                function2,
                interpolation_type,
                num_periods,
                phase,
            } => {
                if num_periods.is_nan() || *num_periods <= 0.0 {
                    return Err(Error::NonPositive {
                        what: "num_periods",
                        value: *num_periods,
                    });
                }
                let profile = match interpolation_type {
                    InterpolationType::Linear => Profile::default(),
                    InterpolationType::Smooth => Profile::SmoothStep,
                    InterpolationType::Cosine => Profile::Cosine {
                        num_periods: *num_periods,
                        phase: *phase,
                    },
                };
                Arc::new(Interpolate::<N>::with_profile(
                    function1.build(ctx)?,
                    function2.build(ctx)?,
                    profile,
                ))
            }
            FunctionNode::Offset {
                base_function,
                offset_function,
            } => Arc::new(Offset::<N>::new(
                base_function.build(ctx)?,
                offset_function.build()?,
            )),
            FunctionNode::Explicit => {
                return Err(Error::ParseError(
                    "explicit functions cannot be described; \
                     build them in code"
                        .to_owned(),
                ));
            }
        };
        Ok(out)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub(super) enum ProfileNode {
    Constant {
        value: f64,
    },
    Linear {
        slope: f64,
        intercept: f64,
    },
    Polynomial {
        coefficients: Vec<f64>,
    },
    Sinusoidal {
        amplitude: f64,
        frequency: f64,
        #[serde(default)]
        phase: f64,
        #[serde(default)]
        offset: f64,
    },
    Exponential {
        amplitude: f64,
        rate: f64,
        #[serde(default)]
        offset: f64,
    },
    Polybezier {
        control_points: Vec<[f64; 2]>,
    },
}

impl ProfileNode {
    fn build(&self) -> Result<Profile, Error> {
        log::trace!("building {} profile", <&'static str>::from(self));
        Ok(match self {
            ProfileNode::Constant { value } => Profile::Constant(*value),
            ProfileNode::Linear { slope, intercept } => Profile::Linear {
                slope: *slope,
                intercept: *intercept,
            },
            ProfileNode::Polynomial { coefficients } => {
                if coefficients.is_empty() {
                    return Err(Error::ParseError(
                        "polynomial requires at least one coefficient"
                            .to_owned(),
                    ));
                }
                Profile::Polynomial(coefficients.clone())
            }
            ProfileNode::Sinusoidal {
                amplitude,
                frequency,
                phase,
                offset,
            } => Profile::Sinusoidal {
                amplitude: *amplitude,
                frequency: *frequency,
                phase: *phase,
                offset: *offset,
            },
            ProfileNode::Exponential {
                amplitude,
                rate,
                offset,
            } => Profile::Exponential {
                amplitude: *amplitude,
                rate: *rate,
                offset: *offset,
            },
            ProfileNode::Polybezier { control_points } => {
                Profile::Bezier(BezierProfile::new(control_points.clone())?)
            }
        })
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub(super) enum PrimitiveNode {
    Ball {
        radius: f64,
        center: Vec<f64>,
        #[serde(default = "default_degree")]
        degree: i32,
    },
    Capsule {
        radius: f64,
        start: Vec<f64>,
        end: Vec<f64>,
    },
    Torus {
        major_radius: f64,
        minor_radius: f64,
        center: Vec<f64>,
    },
    Duchon {
        samples_file: PathBuf,
        coeffs_file: PathBuf,
        center: Option<Vec<f64>>,
        #[serde(default = "default_one")]
        radius: f64,
        #[serde(default)]
        positive_inside: bool,
    },
    ImplicitUnion {
        primitives: Vec<PrimitiveNode>,
        #[serde(default)]
        smooth_distance: f64,
        #[serde(default)]
        blending: Blending,
    },
}

impl PrimitiveNode {
    fn build<const N: usize>(
        &self,
        ctx: &Context,
    ) -> Result<Arc<dyn ImplicitFunction<N>>, Error>
    where
        Const<N>: Dimension<N>,
    {
        log::trace!("building {} primitive", <&'static str>::from(self));
        let out: Arc<dyn ImplicitFunction<N>> = match self {
            PrimitiveNode::Ball {
                radius,
                center,
                degree,
            } => Arc::new(
                Ball::new(*radius, vector::<N>(center, "ball center")?)?
                    .with_degree(*degree)?,
            ),
            PrimitiveNode::Capsule { radius, start, end } => {
                Arc::new(Capsule::new(
                    *radius,
                    vector::<N>(start, "capsule start")?,
                    vector(end, "capsule end")?,
                )?)
            }
            PrimitiveNode::Torus {
                major_radius,
                minor_radius,
                center,
            } => <Const<N> as Dimension<N>>::torus(
                *major_radius,
                *minor_radius,
                vector(center, "torus center")?,
            )?,
            PrimitiveNode::Duchon {
                samples_file,
                coeffs_file,
                center,
                radius,
                positive_inside,
            } => <Const<N> as Dimension<N>>::duchon(
                &ctx.path(samples_file),
                &ctx.path(coeffs_file),
                center
                    .as_ref()
                    .map(|c| vector(c, "duchon center"))
                    .transpose()?,
                *radius,
                *positive_inside,
            )?,
            PrimitiveNode::ImplicitUnion {
                primitives,
                smooth_distance,
                blending,
            } => {
                let fs = primitives
                    .iter()
                    .map(|f| f.build::<N>(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                left_chain("implicit union", fs, |a, b| {
                    let u = ImplicitUnion::with_blending(
                        a,
                        b,
                        *smooth_distance,
                        *blending,
                    )?;
                    Ok(Arc::new(u) as Arc<dyn ImplicitFunction<N>>)
                })?
            }
        };
        Ok(out)
    }
}

////////////////////////////////////////////////////////////////////////////////

#[derive(Debug, Deserialize, strum::IntoStaticStr)]
#[serde(tag = "type", rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub(super) enum TransformNode {
    Translation {
        vector: Vec<f64>,
    },
    Scale {
        factors: Vec<f64>,
        center: Option<Vec<f64>>,
    },
    Rotation {
        angle: f64,
        center: Option<Vec<f64>>,
        axis: Option<Vec<f64>>,
    },
    Compose {
        transforms: Vec<TransformNode>,
    },
    Polyline {
        points: Option<Vec<Vec<f64>>>,
        points_file: Option<PathBuf>,
        #[serde(default = "default_true")]
        follow_tangent: bool,
    },
    Polybezier {
        control_points: Option<Vec<Vec<f64>>>,
        control_points_file: Option<PathBuf>,
        sample_points: Option<Vec<Vec<f64>>>,
        sample_points_file: Option<PathBuf>,
        #[serde(default = "default_true")]
        follow_tangent: bool,
    },
}

/// Source of a curve's points
enum Points<'a> {
    Inline(&'a [Vec<f64>]),
    File(&'a Path),
}

impl Points<'_> {
    fn load<const N: usize>(
        &self,
        ctx: &Context,
        what: &'static str,
    ) -> Result<Vec<Vector<N>>, Error> {
        match self {
            Points::Inline(p) => vectors(p, what),
            Points::File(f) => load::read_xyz(ctx.path(f)),
        }
    }
}

/// Picks exactly one of several optional point sources
fn one_of<'a, const K: usize>(
    what: &str,
    sources: [(&str, Option<Points<'a>>); K],
) -> Result<(usize, Points<'a>), Error> {
    let names = sources.iter().map(|(n, _)| *n).collect::<Vec<_>>();
    let mut found = sources
        .into_iter()
        .enumerate()
        .filter_map(|(i, (_, p))| p.map(|p| (i, p)));
    match (found.next(), found.next()) {
        (Some(out), None) => Ok(out),
        _ => Err(Error::ParseError(format!(
            "{what} requires exactly one of {}",
            names.join(", ")
        ))),
    }
}

impl TransformNode {
    fn build<const N: usize>(
        &self,
        ctx: &Context,
    ) -> Result<Arc<dyn Transform<N>>, Error>
    where
        Const<N>: Dimension<N>,
    {
        log::trace!("building {} transform", <&'static str>::from(self));
        let out: Arc<dyn Transform<N>> = match self {
            TransformNode::Translation { vector: v } => {
                let v = vector::<N>(v, "translation vector")?;
                Arc::new(Translation::new(v))
            }
            TransformNode::Scale { factors, center } => Arc::new(Scale::new(
                vector::<N>(factors, "scale factors")?,
                optional_vector(center, "scale center")?,
            )),
            TransformNode::Rotation {
                angle,
                center,
                axis,
            } => <Const<N> as Dimension<N>>::rotation(
                *angle,
                optional_vector(center, "rotation center")?,
                axis.as_deref(),
            )?,
            TransformNode::Compose { transforms } => {
                let ts = transforms
                    .iter()
                    .map(|t| t.build::<N>(ctx))
                    .collect::<Result<Vec<_>, _>>()?;
                left_chain("compose", ts, |a, b| {
                    Ok(Arc::new(Compose::new(a, b)) as Arc<dyn Transform<N>>)
                })?
            }
            TransformNode::Polyline {
                points,
                points_file,
                follow_tangent,
            } => {
                let (_, src) = one_of(
                    "polyline",
                    [
                        ("points", points.as_deref().map(Points::Inline)),
                        (
                            "points_file",
                            points_file.as_deref().map(Points::File),
                        ),
                    ],
                )?;
                let points = src.load::<N>(ctx, "polyline point")?;
                Arc::new(Polyline::<N>::new(points, *follow_tangent)?)
            }
            TransformNode::Polybezier {
                control_points,
                control_points_file,
                sample_points,
                sample_points_file,
                follow_tangent,
            } => {
                let (i, src) = one_of(
                    "polybezier",
                    [
                        (
                            "control_points",
                            control_points.as_deref().map(Points::Inline),
                        ),
                        (
                            "control_points_file",
                            control_points_file.as_deref().map(Points::File),
                        ),
                        (
                            "sample_points",
                            sample_points.as_deref().map(Points::Inline),
                        ),
                        (
                            "sample_points_file",
                            sample_points_file.as_deref().map(Points::File),
                        ),
                    ],
                )?;
                let points = src.load::<N>(ctx, "polybezier point")?;
                let curve = if i < 2 {
                    PolyBezier::<N>::new(points, *follow_tangent)?
                } else {
                    PolyBezier::from_samples(points, *follow_tangent)?
                };
                Arc::new(curve)
            }
        };
        Ok(out)
    }
}
