//! # LU decomposition
//!
//! Doolittle elimination with partial pivoting. Decompose a square matrix `M` into `PM = LU`
//! where
//!
//! * `P` is a row permutation
//! * `L` is lower triangular with `1`'s on the diagonal
//! * `U` is upper triangular
use std::borrow::Cow;
use std::fmt;

use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_algebra::vector::Vector;
use crate::error::{Error, Result};
use crate::operator::{Operator, Triangle};
use crate::operator::tag::{Assumed, IsSquare};

pub use permutation::{FullPermutation, Permutation};

mod permutation;

/// Factors of a pivoted LU decomposition.
///
/// A pivot within the margin of zero doesn't stop the decomposition; it is recorded, and solving
/// or inverting reports it.
#[derive(Clone, Debug, PartialEq)]
pub struct LowerUpper {
    size: usize,
    /// Row major, `L` strictly below the diagonal and `U` on and above it.
    values: Vec<f64>,
    /// Row `i` of `PM` is row `forward(i)` of `M`.
    permutation: FullPermutation,
    /// First pivot that was within the margin of zero, with its index.
    degenerate: Option<(usize, f64)>,
    margin: f64,
}

impl LowerUpper {
    /// Decompose a square matrix.
    ///
    /// # Arguments
    ///
    /// * `matrix`: Matrix to decompose. An owned destructible matrix is decomposed in its own
    /// storage, anything else is copied first.
    /// * `margin`: Pivots with an absolute value at most this large are considered zero.
    ///
    /// # Errors
    ///
    /// If the matrix is not square.
    pub fn new<'a>(matrix: impl Into<Cow<'a, Matrix>>, margin: f64) -> Result<Self> {
        let matrix = matrix.into();
        if !matrix.is_square() {
            return Err(Error::TagMismatch { required: Operator::Square, actual: matrix.operator() });
        }

        let size = matrix.rows();
        let values = match matrix {
            Cow::Owned(matrix) if matrix.is_destructible() => matrix.into_dense_values(),
            matrix => matrix.values().collect(),
        };
        Ok(Self::decompose(size, values, margin))
    }

    /// Decompose a matrix that is known to be square.
    pub fn of<T: IsSquare>(matrix: &Assumed<T>, margin: f64) -> Self {
        Self::decompose(matrix.rows(), matrix.values().collect(), margin)
    }

    fn decompose(size: usize, mut values: Vec<f64>, margin: f64) -> Self {
        debug_assert_eq!(values.len(), size * size);
        debug_assert!(margin >= 0_f64);

        let n = size;
        let mut permutation = FullPermutation::identity(n);
        let mut degenerate = None;

        for k in 0..n {
            let pivot_row = (k..n).fold(k, |best, i| {
                if values[i * n + k].abs() > values[best * n + k].abs() { i } else { best }
            });
            if pivot_row != k {
                for j in 0..n {
                    values.swap(k * n + j, pivot_row * n + j);
                }
                permutation.swap(k, pivot_row);
            }

            let pivot = values[k * n + k];
            if pivot.abs() <= margin && degenerate.is_none() {
                log::debug!("degenerate pivot {:e} at index {} of {}", pivot, k, n);
                degenerate = Some((k, pivot));
            }
            if pivot == 0_f64 {
                // The whole remaining column is zero
                continue;
            }

            for i in (k + 1)..n {
                let factor = values[i * n + k] / pivot;
                values[i * n + k] = factor;
                if factor != 0_f64 {
                    for j in (k + 1)..n {
                        values[i * n + j] -= factor * values[k * n + j];
                    }
                }
            }
        }

        Self { size, values, permutation, degenerate, margin }
    }

    /// Number of rows and columns of the decomposed matrix.
    pub fn size(&self) -> usize {
        self.size
    }

    /// Row permutation `P`.
    pub fn permutation(&self) -> &FullPermutation {
        &self.permutation
    }

    /// Whether all pivots are larger than the margin.
    pub fn is_invertible(&self) -> bool {
        self.degenerate.is_none()
    }

    /// Unit lower triangular factor `L`.
    pub fn lower(&self) -> Matrix {
        let n = self.size;
        let values = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| match i.cmp(&j) {
                std::cmp::Ordering::Greater => self.values[i * n + j],
                std::cmp::Ordering::Equal => 1_f64,
                std::cmp::Ordering::Less => 0_f64,
            })
            .collect();
        Matrix::from_dense(n, n, values).with_operator(Operator::Triangular(Triangle::Lower))
    }

    /// Upper triangular factor `U`.
    pub fn upper(&self) -> Matrix {
        let n = self.size;
        let values = (0..n)
            .flat_map(|i| (0..n).map(move |j| (i, j)))
            .map(|(i, j)| if i <= j { self.values[i * n + j] } else { 0_f64 })
            .collect();
        Matrix::from_dense(n, n, values).with_operator(Operator::Triangular(Triangle::Upper))
    }

    /// Product of the pivots, with the sign of the row permutation.
    ///
    /// Close to zero, rather than an error, for a singular matrix.
    pub fn determinant(&self) -> f64 {
        let n = self.size;
        let sign = if self.permutation.is_even() { 1_f64 } else { -1_f64 };
        sign * (0..n).map(|k| self.values[k * n + k]).product::<f64>()
    }

    /// Solve `MX = B` for `X`, column by column.
    ///
    /// # Errors
    ///
    /// If `B` doesn't have as many rows as `M`, or if `M` is singular within the margin.
    pub fn solve(&self, rhs: &Matrix) -> Result<Matrix> {
        let n = self.size;
        if rhs.rows() != n {
            return Err(Error::dimensions("solve", &[n, n], &[rhs.rows(), rhs.columns()]));
        }
        self.check_invertible()?;

        let columns = rhs.columns();
        let mut solution = vec![0_f64; n * columns];
        for j in 0..columns {
            let column = (0..n).map(|i| rhs.get(i, j)).collect::<Vec<_>>();
            let mut x = self.permutation.gather(&column);
            self.substitute(&mut x);

            for (i, value) in x.into_iter().enumerate() {
                solution[i * columns + j] = value;
            }
        }

        Ok(Matrix::from_dense(n, columns, solution).with_operator(Operator::shaped((n, columns))))
    }

    /// Solve `Mx = b` for `x`.
    ///
    /// # Errors
    ///
    /// See `solve`.
    pub fn solve_vector(&self, rhs: &Vector) -> Result<Vector> {
        Vector::try_from(self.solve(rhs.as_matrix())?)
    }

    /// Inverse of the decomposed matrix.
    ///
    /// # Errors
    ///
    /// If the matrix is singular within the margin.
    pub fn inverse(&self) -> Result<Matrix> {
        self.solve(&Matrix::identity(self.size))
    }

    fn check_invertible(&self) -> Result<()> {
        match self.degenerate {
            Some((index, pivot)) => Err(Error::NotInvertible { index, pivot, margin: self.margin }),
            None => Ok(()),
        }
    }

    /// Forward substitution with `L`, then back substitution with `U`, in place.
    fn substitute(&self, x: &mut [f64]) {
        let n = self.size;
        for i in 0..n {
            let sum = (0..i).map(|k| self.values[i * n + k] * x[k]).sum::<f64>();
            x[i] -= sum;
        }
        for i in (0..n).rev() {
            let sum = ((i + 1)..n).map(|k| self.values[i * n + k] * x[k]).sum::<f64>();
            x[i] = (x[i] - sum) / self.values[i * n + i];
        }
    }
}

impl fmt::Display for LowerUpper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Row permutation: {}", self.permutation)?;
        writeln!(f, "Lower:")?;
        write!(f, "{}", self.lower())?;
        writeln!(f, "Upper:")?;
        write!(f, "{}", self.upper())
    }
}

#[cfg(test)]
mod test {
    use crate::algorithm::lower_upper::{LowerUpper, Permutation};
    use crate::data::linear_algebra::matrix::Matrix;
    use crate::data::linear_algebra::vector::Vector;
    use crate::error::Error;
    use crate::operator::{Operator, Triangle};
    use crate::operator::tag;

    const MARGIN: f64 = 1e-10;

    fn permuted(lu: &LowerUpper, matrix: &Matrix) -> Matrix {
        let n = matrix.rows();
        let rows = (0..n)
            .map(|i| (0..n).map(|j| matrix.get(lu.permutation().forward(i), j)).collect())
            .collect();
        Matrix::from_rows(rows).unwrap()
    }

    #[test]
    fn two_by_two() {
        let matrix = Matrix::from_rows(vec![vec![2_f64, 1_f64], vec![1_f64, 2_f64]]).unwrap();
        let lu = LowerUpper::new(&matrix, MARGIN).unwrap();
        assert!(lu.is_invertible());
        assert_relative_eq!(lu.determinant(), 3_f64);

        let inverse = lu.inverse().unwrap();
        let expected = Matrix::from_rows(vec![
            vec![2_f64 / 3_f64, -1_f64 / 3_f64],
            vec![-1_f64 / 3_f64, 2_f64 / 3_f64],
        ]).unwrap();
        assert!(inverse.approximately_equals(&expected, 1e-12));
    }

    #[test]
    fn pivots() {
        let matrix = Matrix::from_rows(vec![
            vec![0_f64, 2_f64, 1_f64],
            vec![1_f64, 1_f64, 0_f64],
            vec![4_f64, 3_f64, 3_f64],
        ]).unwrap();
        let lu = LowerUpper::new(&matrix, MARGIN).unwrap();
        assert_eq!(lu.permutation().forward(0), 2);

        let product = lu.lower().multiply(&lu.upper()).unwrap();
        assert!(product.approximately_equals(&permuted(&lu, &matrix), 1e-12));
        assert_eq!(lu.lower().operator(), Operator::Triangular(Triangle::Lower));
        assert!(Operator::Triangular(Triangle::Upper).allows(&lu.upper(), 0_f64));
        // Multipliers are bounded by one
        assert!(lu.lower().values().all(|value| value.abs() <= 1_f64));

        assert_relative_eq!(lu.determinant(), -7_f64, max_relative = 1e-12);
    }

    #[test]
    fn solve() {
        let matrix = Matrix::seeded(5, 5, 21);
        let rhs = Matrix::seeded(5, 3, 22);
        let lu = LowerUpper::new(&matrix, MARGIN).unwrap();

        let x = lu.solve(&rhs).unwrap();
        assert!(matrix.multiply(&x).unwrap().approximately_equals(&rhs, 1e-9));

        let b = Vector::new(vec![1_f64, 2_f64, 3_f64, 4_f64, 5_f64]);
        let x = lu.solve_vector(&b).unwrap();
        let check = matrix.multiply(x.as_matrix()).unwrap();
        assert!(check.approximately_equals(b.as_matrix(), 1e-9));
    }

    #[test]
    fn singular() {
        let matrix = Matrix::from_rows(vec![
            vec![1_f64, 2_f64, 3_f64],
            vec![2_f64, 4_f64, 6_f64],
            vec![1_f64, 0_f64, 1_f64],
        ]).unwrap();
        let lu = LowerUpper::new(&matrix, MARGIN).unwrap();
        assert!(!lu.is_invertible());
        assert_abs_diff_eq!(lu.determinant(), 0_f64, epsilon = 1e-12);
        assert!(matches!(lu.inverse(), Err(Error::NotInvertible { .. })));
        assert!(matches!(lu.solve(&Matrix::zeros(3, 1)), Err(Error::NotInvertible { .. })));
    }

    #[test]
    fn dimensions() {
        let lu = LowerUpper::new(&Matrix::identity(3), MARGIN).unwrap();
        assert!(matches!(lu.solve(&Matrix::zeros(2, 2)), Err(Error::DimensionMismatch { .. })));
        assert_eq!(
            LowerUpper::new(&Matrix::zeros(2, 3), MARGIN).unwrap_err(),
            Error::TagMismatch { required: Operator::Square, actual: Operator::General },
        );
    }

    #[test]
    fn destructible_and_typed() {
        let matrix = Matrix::seeded(4, 4, 8);
        let borrowed = LowerUpper::new(&matrix, MARGIN).unwrap();
        let owned = LowerUpper::new(matrix.clone().destructible(), MARGIN).unwrap();
        assert_eq!(borrowed, owned);

        let assumed = matrix.assume(tag::Square, MARGIN).unwrap();
        assert_eq!(LowerUpper::of(&assumed, MARGIN), borrowed);
    }
}
