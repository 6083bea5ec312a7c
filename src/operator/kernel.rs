//! # Loop kernels
//!
//! The loops behind the dispatched operations. Each kernel visits only the entries that the layout
//! of the driving operand says can be nonzero; the other entries are assumed to be exactly zero.
//!
//! All kernels that sum products do so in ascending order of the shared index, so that a
//! computation driven by either operand produces the same floating point result.
use std::ops::Range;

use crate::data::linear_algebra::matrix::Matrix;

/// Which entries of a matrix can be nonzero, as seen by the loops.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Layout {
    /// Every entry.
    Dense,
    /// At most `lower` rows below and `upper` columns right of the diagonal.
    #[allow(missing_docs)]
    Banded { lower: usize, upper: usize },
    /// Only the diagonal, which holds ones.
    Identity,
}

impl Layout {
    /// Columns that can be nonzero in a row.
    pub fn row_range(self, row: usize, (rows, columns): (usize, usize)) -> Range<usize> {
        debug_assert!(row < rows);

        match self {
            Layout::Dense => 0..columns,
            Layout::Banded { lower, upper } => {
                let end = columns.min(row.saturating_add(upper).saturating_add(1));
                row.saturating_sub(lower).min(end)..end
            },
            Layout::Identity => row.min(columns)..(row + 1).min(columns),
        }
    }

    /// Rows that can be nonzero in a column.
    pub fn column_range(self, column: usize, (rows, columns): (usize, usize)) -> Range<usize> {
        debug_assert!(column < columns);

        match self {
            Layout::Dense => 0..rows,
            Layout::Banded { lower, upper } => {
                let end = rows.min(column.saturating_add(lower).saturating_add(1));
                column.saturating_sub(upper).min(end)..end
            },
            Layout::Identity => column.min(rows)..(column + 1).min(rows),
        }
    }

    /// Number of entries visited.
    pub fn cells(self, shape: (usize, usize)) -> usize {
        match self {
            Layout::Dense => shape.0 * shape.1,
            _ => (0..shape.0).map(|row| self.row_range(row, shape).len()).sum(),
        }
    }

    /// Coordinates of the entries visited, row by row.
    pub fn entries(self, shape: (usize, usize)) -> impl Iterator<Item=(usize, usize)> {
        (0..shape.0).flat_map(move |row| self.row_range(row, shape).map(move |column| (row, column)))
    }
}

/// Add the entries of `addend` visited by `layout` to `target`.
pub fn accumulate(target: &mut Matrix, addend: &Matrix, layout: Layout) {
    debug_assert_eq!(target.shape(), addend.shape());

    for (i, j) in layout.entries(addend.shape()) {
        let value = addend.get(i, j);
        if value != 0_f64 {
            target.set(i, j, target.get(i, j) + value);
        }
    }
}

/// Multiply the entries visited by `layout` by a constant.
pub fn scale(matrix: &mut Matrix, factor: f64, layout: Layout) {
    for (i, j) in layout.entries(matrix.shape()) {
        let value = matrix.get(i, j);
        if value != 0_f64 {
            matrix.set(i, j, factor * value);
        }
    }
}

/// Sum of products of corresponding entries, visiting those of `driver` allowed by `layout`.
pub fn dot(driver: &Matrix, other: &Matrix, layout: Layout) -> f64 {
    debug_assert_eq!(driver.shape(), other.shape());

    layout.entries(driver.shape())
        .map(|(i, j)| (driver.get(i, j), other.get(i, j)))
        .filter(|&(value, _)| value != 0_f64)
        .map(|(value, other)| value * other)
        .fold(0_f64, |total, product| total + product)
}

/// Product `left · right`, looping over the entries of `left` allowed by `layout`.
pub fn multiply_left(left: &Matrix, right: &Matrix, layout: Layout) -> Matrix {
    debug_assert_eq!(left.columns(), right.rows());

    let (rows, columns) = (left.rows(), right.columns());
    let mut values = vec![0_f64; rows * columns];
    for i in 0..rows {
        for k in layout.row_range(i, left.shape()) {
            let value = left.get(i, k);
            if value == 0_f64 {
                continue;
            }
            for j in 0..columns {
                values[i * columns + j] += value * right.get(k, j);
            }
        }
    }

    Matrix::from_dense(rows, columns, values)
}

/// Product `left · right`, looping over the entries of `right` allowed by `layout`.
pub fn multiply_right(left: &Matrix, right: &Matrix, layout: Layout) -> Matrix {
    debug_assert_eq!(left.columns(), right.rows());

    let (rows, columns) = (left.rows(), right.columns());
    let mut values = vec![0_f64; rows * columns];
    for j in 0..columns {
        for k in layout.column_range(j, right.shape()) {
            let value = right.get(k, j);
            if value == 0_f64 {
                continue;
            }
            for i in 0..rows {
                values[i * columns + j] += left.get(i, k) * value;
            }
        }
    }

    Matrix::from_dense(rows, columns, values)
}

/// New matrix holding the transpose of the entries allowed by `layout`.
pub fn transpose(matrix: &Matrix, layout: Layout) -> Matrix {
    let (rows, columns) = matrix.shape();
    let mut values = vec![0_f64; rows * columns];
    for (i, j) in layout.entries(matrix.shape()) {
        values[j * rows + i] = matrix.get(i, j);
    }

    Matrix::from_dense(columns, rows, values)
}

/// Transpose a square matrix by swapping its values.
pub fn transpose_in_place(matrix: &mut Matrix) {
    debug_assert!(matrix.is_square());

    let size = matrix.rows();
    let values = matrix.dense_values_mut();
    for i in 0..size {
        for j in (i + 1)..size {
            values.swap(i * size + j, j * size + i);
        }
    }
}
