//! Module containing the universal error type
use thiserror::Error;

/// Universal error type for space-time functions
#[derive(Error, Debug)]
pub enum Error {
    /// Two parallel arrays have different lengths
    #[error("mismatched lengths: {2} ({0} != {1})")]
    MismatchedLengths(usize, usize, &'static str),

    /// A point set was empty
    #[error("at least one control point is required")]
    EmptyPoints,

    /// Too few points were provided for a curve
    #[error("{what} requires at least {expected} points (got {actual})")]
    TooFewPoints {
        /// Name of the object being built
        what: &'static str,
        /// Minimum number of points
        expected: usize,
        /// Number of points provided
        actual: usize,
    },

    /// Piecewise-cubic control points must come in `3n + 1` groups
    #[error("control point count must be of the form 3n + 1 (got {0})")]
    BadControlPointCount(usize),

    /// A radius or scale factor is too close to zero
    #[error("{what} must be non-zero (got {value})")]
    ZeroScale {
        /// Name of the parameter
        what: &'static str,
        /// Value provided
        value: f64,
    },

    /// A length parameter must be positive
    #[error("{what} must be positive (got {value})")]
    NonPositive {
        /// Name of the parameter
        what: &'static str,
        /// Value provided
        value: f64,
    },

    /// A sequence of times went backwards
    #[error("{what} must be non-decreasing ({value} < {previous})")]
    Decreasing {
        /// Name of the sequence
        what: &'static str,
        /// Earlier value in the sequence
        previous: f64,
        /// Later value, which is smaller
        value: f64,
    },

    /// Smoothing distance is negative
    #[error("smooth distance must be non-negative (got {0})")]
    NegativeSmoothDistance(f64),

    /// A required callable was not provided
    #[error("{0} cannot be empty")]
    MissingCallable(&'static str),

    /// The requested dimension is not supported by this object
    #[error("unsupported dimension {0}")]
    UnsupportedDimension(usize),

    /// Tried to normalize a vector with (nearly) zero length
    #[error("zero-length vector")]
    ZeroLength,

    /// A description was written for a different dimension
    #[error("description is {actual}D, but {expected}D was requested")]
    DimensionMismatch {
        /// Dimension requested by the caller
        expected: usize,
        /// Dimension declared in the description
        actual: usize,
    },

    /// IO error; see inner code for details
    #[error("io error: {0}")]
    IoError(#[from] std::io::Error),

    /// A data file could not be parsed
    #[error("parse error: {0}")]
    ParseError(String),

    /// A description could not be deserialized
    #[cfg(feature = "describe")]
    #[error("description error: {0}")]
    DescriptionError(#[from] serde_json::Error),
}

/// Broad classification of an [`Error`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Invalid or inconsistent construction parameters
    Construction,
    /// Degenerate geometry encountered during evaluation
    DegenerateGeometry,
    /// Failure while reading external data or descriptions
    Load,
}

impl Error {
    /// Returns the broad class of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ZeroLength => ErrorKind::DegenerateGeometry,
            Error::IoError(..)
            | Error::ParseError(..)
            | Error::DimensionMismatch { .. } => ErrorKind::Load,
            #[cfg(feature = "describe")]
            Error::DescriptionError(..) => ErrorKind::Load,
            _ => ErrorKind::Construction,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn error_kinds() {
        assert_eq!(Error::ZeroLength.kind(), ErrorKind::DegenerateGeometry);
        assert_eq!(Error::EmptyPoints.kind(), ErrorKind::Construction);
        assert_eq!(
            Error::NegativeSmoothDistance(-1.0).kind(),
            ErrorKind::Construction
        );
        assert_eq!(
            Error::ParseError("bad".to_owned()).kind(),
            ErrorKind::Load
        );
    }

    #[test]
    fn error_messages() {
        let e = Error::MismatchedLengths(3, 4, "points and coefficients");
        assert_eq!(
            e.to_string(),
            "mismatched lengths: points and coefficients (3 != 4)"
        );
        let e = Error::TooFewPoints {
            what: "polyline",
            expected: 2,
            actual: 1,
        };
        assert_eq!(
            e.to_string(),
            "polyline requires at least 2 points (got 1)"
        );
    }
}
