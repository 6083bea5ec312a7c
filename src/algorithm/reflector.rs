//! # Elementary orthogonal transformations
//!
//! Householder reflections and Givens rotations, used to eliminate values one column (or row) or
//! one value at a time.
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_algebra::vector::Vector;
use crate::data::precision::{euclidean_norm, rotation, sign};
use crate::error::{Error, Result};
use crate::operator::Operator;
use crate::operator::operation::Side;

/// Reflection that maps `vector` onto a multiple of the standard basis vector at `index`.
///
/// # Arguments
///
/// * `vector`: Vector to reflect.
/// * `index`: Index of the value that is kept; all others become zero.
///
/// # Return value
///
/// A matrix `H` tagged `Reflection` such that `H · vector` is zero except at `index`, or the
/// identity if that was already the case.
///
/// # Errors
///
/// If `index` is out of range.
pub fn householder(vector: &Vector, index: usize) -> Result<Matrix> {
    let n = vector.len();
    if index >= n {
        return Err(Error::InvalidArgument {
            argument: "index",
            reason: format!("index {} out of range for a vector of length {}", index, n),
        });
    }

    let others = euclidean_norm(vector.values().enumerate().filter(|&(i, _)| i != index).map(|(_, value)| value));
    if others == 0_f64 {
        return Ok(Matrix::identity(n));
    }

    // Opposite sign of the kept value, the subtraction below never cancels
    let alpha = -sign(vector.get(index)) * vector.norm();
    let mut direction = vector.clone();
    direction.set(index, vector.get(index) - alpha);

    let direction = direction.as_matrix();
    let length_squared = direction.dot(direction)?;
    let outer = direction.multiply(&direction.transpose())?;
    let reflection = Matrix::identity(n).add(&outer.scale(-2_f64 / length_squared))?;
    Ok(reflection.with_operator(Operator::Reflection))
}

/// Rotation in the plane of `row` and `column` that eliminates the value at (`row`, `column`).
///
/// # Arguments
///
/// * `matrix`: Matrix with the value to eliminate.
/// * `row`, `column`: Coordinate of that value.
/// * `side`: With `Side::Left`, `G · matrix` has a zero at the coordinate and the diagonal value in
/// `column` is the pivot. With `Side::Right`, `matrix · G` has the zero and the diagonal value in
/// `row` is the pivot.
///
/// # Return value
///
/// An identity matrix with a two by two rotation embedded, tagged `Orthogonal`.
///
/// # Errors
///
/// If the coordinate is on the diagonal or outside the matrix, or the pivot is.
pub fn givens(matrix: &Matrix, row: usize, column: usize, side: Side) -> Result<Matrix> {
    let (rows, columns) = matrix.shape();
    let pivot_in_range = match side {
        Side::Left => column < rows,
        Side::Right => row < columns,
    };
    if row == column || row >= rows || column >= columns || !pivot_in_range {
        return Err(Error::InvalidArgument {
            argument: "coordinate",
            reason: format!("can't rotate ({}, {}) of a {} x {} matrix from the {:?}", row, column, rows, columns, side),
        });
    }

    let (i, j) = (row, column);
    let (size, a, b) = match side {
        Side::Left => (rows, matrix.get(j, j), matrix.get(i, j)),
        Side::Right => (columns, matrix.get(i, i), matrix.get(i, j)),
    };
    let (c, s) = rotation(a, b);

    let mut embedded = Matrix::identity(size);
    match side {
        Side::Left => {
            embedded.set(j, j, c);
            embedded.set(j, i, -s);
            embedded.set(i, j, s);
            embedded.set(i, i, c);
        },
        Side::Right => {
            embedded.set(i, i, c);
            embedded.set(j, j, c);
            embedded.set(i, j, s);
            embedded.set(j, i, -s);
        },
    }
    Ok(embedded.with_operator(Operator::Orthogonal))
}
