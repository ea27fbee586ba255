//! `stf` is a library of differentiable space-time functions: implicit
//! surfaces that move through space over a normalized time parameter.
//!
//! An **implicit surface** is a function `f(p)`, where `p` is a position in 2D
//! or 3D space.  By convention, if `f(p) < 0`, then that position is
//! **inside** the shape; if it's `> 0`, then that position is **outside** the
//! shape; otherwise, it's on the boundary of the shape.
//!
//! A **space-time function** adds a time parameter `t ∈ [0, 1]`, so `f(p, t)`
//! describes a shape which moves, grows, or morphs over time.  This is useful
//! for describing swept volumes: a tool dragged along a path, a shape which
//! blends into another, and so on.
//!
//! Every function in this crate reports its derivatives **analytically**,
//! computed with the chain rule from the derivatives of its children.
//! Downstream consumers (meshers, slicers, solvers) can rely on exact
//! gradients for root-finding and surface normals.
//!
//! # Building blocks
//! There are three capabilities, each represented by a trait:
//!
//! - [`ImplicitFunction`] is a time-independent field with a gradient, e.g.
//!   a [`Ball`](implicit::Ball) or an RBF surface
//!   ([`Duchon`](implicit::Duchon), [`Vipss`](implicit::Vipss)).
//! - [`Transform`] is a time-varying coordinate map, reporting its velocity
//!   and spatial Jacobian, e.g. a [`Translation`](transform::Translation) or
//!   a curve transport ([`PolyBezier`](transform::PolyBezier)) which moves
//!   along a path with a twist-free frame.
//! - [`SpaceTimeFunction`] is a field over space and time, reporting its time
//!   derivative and its full space-time gradient ([`Grad`]).
//!
//! A [`Sweep`](space_time::Sweep) ties the first two together:
//! ```
//! use nalgebra::Vector3;
//! use std::sync::Arc;
//! use stf::{
//!     SpaceTimeFunction,
//!     implicit::Ball,
//!     space_time::Sweep,
//!     transform::Translation,
//! };
//!
//! let ball = Ball::new(1.0, Vector3::zeros())?;
//! let sweep = Sweep::new(
//!     Arc::new(ball),
//!     Arc::new(Translation::new(Vector3::new(-2.0, 0.0, 0.0))),
//! );
//!
//! // At t = 0.5, the ball has moved to (1, 0, 0)
//! let p = Vector3::new(1.0, 0.0, 0.0);
//! assert_eq!(sweep.value(&p, 0.5)?, -1.0);
//!
//! // The surface point at (2, 0, 0) is moving outwards at 2 units per second
//! let g = sweep.gradient(&Vector3::new(2.0, 0.0, 0.0), 0.5)?;
//! assert_eq!(g.spatial, Vector3::new(1.0, 0.0, 0.0));
//! assert_eq!(g.dt, -2.0);
//! # Ok::<(), stf::Error>(())
//! ```
//!
//! Space-time functions are then combined with
//! [`Union`](space_time::Union), [`Interpolate`](space_time::Interpolate), and
//! [`Offset`](space_time::Offset).  Children are shared through [`Arc`], so
//! the same subtree may appear in several places.
//!
//! [`Arc`]: std::sync::Arc
//!
//! # Dimensions
//! Dimension is a const generic parameter `N`, and everything is implemented
//! for `N = 2` and `N = 3`.  A few types only make sense in 3D (e.g.
//! [`Torus`](implicit::Torus)), and only implement the 3D traits.
//!
//! # Checking derivatives
//! Each trait has a `finite_difference_*` method which estimates its
//! derivatives with central differences (see the [`fd`] module).  These are
//! far too slow and imprecise for production use, but are a useful oracle
//! when writing a new implementation.
//!
//! # Descriptions
//! With the `describe` feature, function trees can be built from a JSON
//! description; see the [`describe`] module for details.
//!
//! # Feature flags
#![doc = document_features::document_features!()]
#![warn(missing_docs)]

pub mod blend;
pub mod fd;
pub mod grad;
pub mod implicit;
pub mod load;
pub mod maths;
pub mod space_time;
pub mod transform;

#[cfg(feature = "describe")]
pub mod describe;

mod error;
pub use error::{Error, ErrorKind};

pub use grad::Grad;
pub use implicit::ImplicitFunction;
pub use space_time::SpaceTimeFunction;
pub use transform::Transform;

mod assertions {
    use crate::{implicit::*, space_time::*, transform::*};
    use static_assertions::assert_impl_all;

    assert_impl_all!(Ball<2>: Send, Sync, Clone);
    assert_impl_all!(Capsule<3>: Send, Sync, Clone);
    assert_impl_all!(Torus: Send, Sync);
    assert_impl_all!(Duchon: Send, Sync);
    assert_impl_all!(Vipss: Send, Sync);
    assert_impl_all!(GenericFunction<3>: Send, Sync);
    assert_impl_all!(ImplicitUnion<2>: Send, Sync);

    assert_impl_all!(Translation<3>: Send, Sync);
    assert_impl_all!(Scale<3>: Send, Sync);
    assert_impl_all!(Rotation<2>: Send, Sync);
    assert_impl_all!(Rotation<3>: Send, Sync);
    assert_impl_all!(Compose<3>: Send, Sync);
    assert_impl_all!(Polyline<2>: Send, Sync);
    assert_impl_all!(PolyBezier<3>: Send, Sync);

    assert_impl_all!(Sweep<3>: Send, Sync);
    assert_impl_all!(Union<3>: Send, Sync);
    assert_impl_all!(Interpolate<2>: Send, Sync);
    assert_impl_all!(Offset<2>: Send, Sync);
    assert_impl_all!(ExplicitForm<3>: Send, Sync);
    assert_impl_all!(Profile: Send, Sync, Clone);
}
