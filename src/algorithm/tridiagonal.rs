//! # Symmetric tridiagonalization
//!
//! Reduce a symmetric matrix `M` to a tridiagonal `T = UᵗMU` with Householder reflections, one
//! column at a time, accumulating the reflections in the orthogonal `U`.
use crate::algorithm::Hints;
use crate::algorithm::reflector::householder;
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::precision::euclidean_norm;
use crate::error::{Error, Result};
use crate::operator::Operator;
use crate::operator::tag::{Assumed, IsSymmetric};

/// Factors `M = UTUᵗ` of a symmetric matrix.
#[derive(Clone, Debug)]
pub struct Tridiagonalization {
    /// `T`, tagged `Tridiagonal`.
    pub tridiagonal: Matrix,
    /// `U`, tagged `Orthogonal`.
    pub orthogonal: Matrix,
    /// Number of reflections applied.
    pub reflections: usize,
}

/// Tridiagonalize the matrix of `hints`.
///
/// The matrix should be tagged `Symmetric` (or a refinement). If it isn't, its values are checked
/// once.
///
/// # Errors
///
/// `TagMismatch` if the matrix isn't symmetric within the margin.
pub fn tridiagonalize(hints: &Hints) -> Result<Tridiagonalization> {
    let matrix = hints.matrix;
    if !Operator::Symmetric.matches(matrix) && !Operator::Symmetric.allows(matrix, hints.margin) {
        return Err(Error::TagMismatch { required: Operator::Symmetric, actual: matrix.operator() });
    }

    reduce(matrix, hints.margin)
}

/// Tridiagonalize a matrix known to be symmetric.
///
/// # Errors
///
/// Only if an intermediate product fails, which doesn't happen for square input.
pub fn tridiagonalize_symmetric<T: IsSymmetric>(matrix: &Assumed<T>, margin: f64) -> Result<Tridiagonalization> {
    reduce(matrix, margin)
}

fn reduce(matrix: &Matrix, margin: f64) -> Result<Tridiagonalization> {
    let n = matrix.rows();
    let mut tridiagonal = matrix.clone().with_operator(Operator::Symmetric);
    let mut orthogonal = Matrix::identity(n);
    let mut reflections = 0;

    for k in 0..n.saturating_sub(2) {
        let mut column = tridiagonal.column(k);
        let below = euclidean_norm(((k + 2)..n).map(|i| column.get(i)));
        if below <= margin {
            log::trace!("column {} is already reduced", k);
            continue;
        }

        for i in 0..=k {
            column.set(i, 0_f64);
        }
        let reflection = householder(&column, k + 1)?;
        tridiagonal = reflection.multiply(&tridiagonal)?.multiply(&reflection)?;
        orthogonal = orthogonal.multiply(&reflection)?;
        reflections += 1;
    }

    for i in 0..n {
        for j in 0..n {
            if i.abs_diff(j) > 1 {
                tridiagonal.set(i, j, 0_f64);
            }
        }
    }
    log::debug!("tridiagonalized a {0} x {0} matrix with {1} reflections", n, reflections);

    Ok(Tridiagonalization {
        tridiagonal: tridiagonal.with_operator(Operator::Tridiagonal),
        orthogonal: orthogonal.with_operator(Operator::Orthogonal),
        reflections,
    })
}
