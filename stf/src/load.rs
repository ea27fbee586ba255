//! Readers for point-cloud and coefficient text files
//!
//! Point clouds use a simple whitespace-delimited format: a header containing
//! the dimension, followed by one point per line.
//!
//! ```text
//! 3
//! 0.0 0.0 0.0
//! 1.0 0.0 0.5
//! ```
//!
//! Coefficient files (as written by RBF fitting tools) store one column of
//! per-point coefficients after another, followed by the affine terms.
use crate::{Error, maths::Vector};
use nalgebra::Vector4;
use std::path::Path;

fn parse_number(s: &str) -> Result<f64, Error> {
    s.parse::<f64>()
        .map_err(|e| Error::ParseError(format!("bad number {s:?}: {e}")))
}

fn parse_numbers(text: &str) -> Result<Vec<f64>, Error> {
    text.split_whitespace().map(parse_number).collect()
}

/// Parses a point cloud from a string
///
/// Returns an error if the header dimension doesn't match `N`, if the number
/// of coordinates isn't a multiple of `N`, or if there are no points.
pub fn parse_xyz<const N: usize>(text: &str) -> Result<Vec<Vector<N>>, Error> {
    let mut words = text.split_whitespace();
    let header = words
        .next()
        .ok_or_else(|| Error::ParseError("missing dimension header".into()))?;
    let dim = header.parse::<usize>().map_err(|e| {
        Error::ParseError(format!("bad dimension header {header:?}: {e}"))
    })?;
    if dim != N {
        return Err(Error::ParseError(format!(
            "expected {N}D points, got dimension {dim}"
        )));
    }

    let coords = words.map(parse_number).collect::<Result<Vec<_>, _>>()?;
    if coords.len() % N != 0 {
        return Err(Error::ParseError(format!(
            "{} coordinates do not form {N}D points",
            coords.len()
        )));
    }
    if coords.is_empty() {
        return Err(Error::EmptyPoints);
    }
    Ok(coords
        .chunks_exact(N)
        .map(Vector::<N>::from_column_slice)
        .collect())
}

/// Reads a point cloud from a file
pub fn read_xyz<const N: usize, P: AsRef<Path>>(
    path: P,
) -> Result<Vec<Vector<N>>, Error> {
    let path = path.as_ref();
    let text = std::fs::read_to_string(path)?;
    let out = parse_xyz(&text)?;
    log::debug!("loaded {} points from {}", out.len(), path.display());
    Ok(out)
}

/// Parses RBF coefficients for `n` points from a string
///
/// The input holds `4n` per-point values in column-major order (`a` for every
/// point, then `bx`, `by`, and `bz`), followed by the four affine coefficients.
pub fn parse_coefficients(
    text: &str,
    n: usize,
) -> Result<(Vec<Vector4<f64>>, Vector4<f64>), Error> {
    let values = parse_numbers(text)?;
    let expected = 4 * n + 4;
    if values.len() != expected {
        return Err(Error::MismatchedLengths(
            expected,
            values.len(),
            "expected and actual coefficient counts",
        ));
    }
    let coeffs = (0..n)
        .map(|i| {
            Vector4::new(
                values[i],
                values[n + i],
                values[2 * n + i],
                values[3 * n + i],
            )
        })
        .collect();
    let affine = Vector4::from_column_slice(&values[4 * n..]);
    Ok((coeffs, affine))
}

/// Reads RBF coefficients for `n` points from a file
pub fn read_coefficients<P: AsRef<Path>>(
    path: P,
    n: usize,
) -> Result<(Vec<Vector4<f64>>, Vector4<f64>), Error> {
    let text = std::fs::read_to_string(path)?;
    parse_coefficients(&text, n)
}
