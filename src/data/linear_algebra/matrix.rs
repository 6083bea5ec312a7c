//! # Matrices
//!
//! Tensors of order two. Algebraic operations on matrices are dispatched through the operator tag
//! of the operands, see `operator::operation`.
use std::borrow::Cow;
use std::fmt;

use rand::{Rng, SeedableRng};
use rand::rngs::StdRng;

use crate::data::linear_algebra::tensor::storage::{ArrayData, Storage};
use crate::data::linear_algebra::tensor::Tensor;
use crate::data::linear_algebra::vector::Vector;
use crate::error::{Error, Result};
use crate::operator::Operator;
use crate::operator::operation;
use crate::operator::tag::{Assumed, Tag};

/// Dense or structured matrix, indices start at `0`.
#[derive(Clone, Debug)]
pub struct Matrix {
    tensor: Tensor,
}

impl Matrix {
    /// Create a matrix of zeros of dimension `rows` x `columns`.
    pub fn zeros(rows: usize, columns: usize) -> Self {
        debug_assert!(rows > 0);
        debug_assert!(columns > 0);

        Self::from_dense(rows, columns, vec![0_f64; rows * columns])
    }

    /// Create a matrix from its coefficients, listed row by row.
    ///
    /// # Errors
    ///
    /// If a dimension is zero or the number of coefficients is not `rows * columns`.
    pub fn from_coefficients(rows: usize, columns: usize, coefficients: Vec<f64>) -> Result<Self> {
        Tensor::from_values(&[rows, columns], coefficients).map(|tensor| Self { tensor })
    }

    /// Create a matrix from a list of rows.
    ///
    /// # Errors
    ///
    /// If there are no rows, the rows are empty or the rows differ in length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let nr_rows = rows.len();
        let nr_columns = rows.first().map_or(0, Vec::len);
        if let Some(row) = rows.iter().find(|row| row.len() != nr_columns) {
            return Err(Error::InvalidArgument {
                argument: "rows",
                reason: format!("first row has length {}, another has length {}", nr_columns, row.len()),
            });
        }

        Self::from_coefficients(nr_rows, nr_columns, rows.into_iter().flatten().collect())
    }

    /// Wrap row-major values, the caller guarantees that the dimensions agree.
    pub(crate) fn from_dense(rows: usize, columns: usize, values: Vec<f64>) -> Self {
        debug_assert_eq!(rows * columns, values.len());

        Self {
            tensor: Tensor::with_storage(Storage::Array(ArrayData::from_values(&[rows, columns], values))),
        }
    }

    /// Create a square identity matrix of size `size`, tagged `Identity`.
    pub fn identity(size: usize) -> Self {
        debug_assert!(size > 0);

        let mut tensor = Tensor::diagonal(&[size, size], 1_f64);
        tensor.assign(Operator::Identity);
        Self { tensor }
    }

    /// Create a square diagonal matrix, tagged `Diagonal`.
    pub fn diagonal(values: &[f64]) -> Self {
        debug_assert!(!values.is_empty());

        let size = values.len();
        let mut tensor = Tensor::diagonal(&[size, size], 0_f64);
        for (i, &value) in values.iter().enumerate() {
            tensor.set(&[i, i], value);
        }
        tensor.assign(Operator::Diagonal);
        Self { tensor }
    }

    /// Create a matrix with values drawn uniformly from `[-1, 1)`.
    pub fn random<R: Rng + ?Sized>(rows: usize, columns: usize, rng: &mut R) -> Self {
        debug_assert!(rows > 0);
        debug_assert!(columns > 0);

        let values = (0..rows * columns)
            .map(|_| rng.random_range(-1_f64..1_f64))
            .collect();
        Self::from_dense(rows, columns, values)
    }

    /// Create a random matrix from a seed, see `random`.
    pub fn seeded(rows: usize, columns: usize, seed: u64) -> Self {
        Self::random(rows, columns, &mut StdRng::seed_from_u64(seed))
    }

    /// Wrap a tensor of order two.
    ///
    /// # Errors
    ///
    /// If the tensor doesn't have order two.
    pub fn from_tensor(tensor: Tensor) -> Result<Self> {
        if tensor.order() == 2 {
            Ok(Self { tensor })
        } else {
            Err(Error::InvalidArgument {
                argument: "tensor",
                reason: format!("a matrix has order 2, got order {}", tensor.order()),
            })
        }
    }

    /// The underlying tensor.
    pub fn tensor(&self) -> &Tensor {
        &self.tensor
    }

    /// Number of rows.
    pub fn rows(&self) -> usize {
        self.tensor.dimensions()[0]
    }

    /// Number of columns.
    pub fn columns(&self) -> usize {
        self.tensor.dimensions()[1]
    }

    /// Number of rows and columns.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows(), self.columns())
    }

    /// Whether there are as many rows as columns.
    pub fn is_square(&self) -> bool {
        self.rows() == self.columns()
    }

    /// Get the value at coordinate (`i`, `j`).
    pub fn get(&self, i: usize, j: usize) -> f64 {
        debug_assert!(i < self.rows());
        debug_assert!(j < self.columns());

        self.tensor.get(&[i, j])
    }

    /// Set the value at coordinate (`i`, `j`) to `value`.
    ///
    /// Doesn't change the operator tag.
    pub fn set(&mut self, i: usize, j: usize, value: f64) {
        debug_assert!(i < self.rows());
        debug_assert!(j < self.columns());

        self.tensor.set(&[i, j], value);
    }

    /// Currently assigned operator tag.
    pub fn operator(&self) -> Operator {
        self.tensor.operator()
    }

    /// Assign a tag without verifying it, see `Tensor::assign`.
    pub fn assign(&mut self, operator: Operator) {
        self.tensor.assign(operator);
    }

    /// Assign a tag without verifying it, by value.
    #[must_use]
    pub fn with_operator(mut self, operator: Operator) -> Self {
        self.assign(operator);
        self
    }

    /// Verify the structure of this matrix once and assign the matching tag.
    ///
    /// # Errors
    ///
    /// `NotQualified` if the values don't have the structure within `margin`.
    pub fn assume<T: Tag>(mut self, tag: T, margin: f64) -> Result<Assumed<T>> {
        let operator = tag.operator();
        if operator.allows(&self, margin) {
            self.assign(operator);
            Ok(Assumed::new(self, tag))
        } else {
            Err(Error::NotQualified { operator, margin })
        }
    }

    /// Allow consuming operations to overwrite this matrix.
    #[must_use]
    pub fn destructible(mut self) -> Self {
        self.tensor.set_destructible(true);
        self
    }

    /// Whether consuming operations may overwrite this matrix.
    pub fn is_destructible(&self) -> bool {
        self.tensor.is_destructible()
    }

    /// Row-major values, converting the storage to a full array if it isn't one.
    pub(crate) fn dense_values_mut(&mut self) -> &mut [f64] {
        self.tensor.storage_mut().make_dense().values_mut()
    }

    /// Take the row-major values.
    pub(crate) fn into_dense_values(self) -> Vec<f64> {
        self.tensor.into_storage().into_array().into_values()
    }

    /// Copy of column `j`.
    pub fn column(&self, j: usize) -> Vector {
        debug_assert!(j < self.columns());

        Vector::new((0..self.rows()).map(|i| self.get(i, j)).collect())
    }

    /// Copy of row `i`, as a column vector.
    pub fn row(&self, i: usize) -> Vector {
        debug_assert!(i < self.rows());

        Vector::new((0..self.columns()).map(|j| self.get(i, j)).collect())
    }

    /// Overwrite column `j`.
    pub fn set_column(&mut self, j: usize, column: &Vector) {
        debug_assert!(j < self.columns());
        debug_assert_eq!(column.len(), self.rows());

        for i in 0..self.rows() {
            self.set(i, j, column.get(i));
        }
    }

    /// Maximum over the columns of the sum of absolute values.
    pub fn one_norm(&self) -> f64 {
        (0..self.columns())
            .map(|j| (0..self.rows()).map(|i| self.get(i, j).abs()).sum::<f64>())
            .fold(0_f64, f64::max)
    }

    /// Square root of the sum of all squared values.
    pub fn frobenius_norm(&self) -> f64 {
        self.values().map(|value| value * value).sum::<f64>().sqrt()
    }

    /// Iterate over all values, row by row.
    pub fn values(&self) -> impl Iterator<Item=f64> + '_ {
        (0..self.rows()).flat_map(move |i| (0..self.columns()).map(move |j| self.get(i, j)))
    }

    /// Sum, computed by the cheaper of the two operand-driven operations.
    ///
    /// # Errors
    ///
    /// If the shapes differ.
    pub fn add(&self, other: &Matrix) -> Result<Matrix> {
        operation::add(self, other)
    }

    /// Difference `self - other`.
    ///
    /// # Errors
    ///
    /// If the shapes differ.
    pub fn subtract(&self, other: &Matrix) -> Result<Matrix> {
        let mut difference = operation::add_to(other.scale(-1_f64).destructible(), self)?;
        difference.tensor.set_destructible(false);
        Ok(difference)
    }

    /// Product `self · other`, computed by the cheaper of the two operand-driven operations.
    ///
    /// # Errors
    ///
    /// If the number of columns of `self` differs from the number of rows of `other`.
    pub fn multiply(&self, other: &Matrix) -> Result<Matrix> {
        operation::multiply(self, other)
    }

    /// Sum of the products of corresponding values.
    ///
    /// # Errors
    ///
    /// If the shapes differ.
    pub fn dot(&self, other: &Matrix) -> Result<f64> {
        operation::dot(self, other)
    }

    /// Scalar multiple.
    pub fn scale(&self, factor: f64) -> Matrix {
        operation::scale(Cow::Borrowed(self), factor)
    }

    /// Transpose.
    pub fn transpose(&self) -> Matrix {
        operation::transpose(Cow::Borrowed(self))
    }

    /// Inverse, using the cheapest method the tag allows.
    ///
    /// # Errors
    ///
    /// If the matrix isn't square or a pivot is within `margin` of zero.
    pub fn inverse(&self, margin: f64) -> Result<Matrix> {
        operation::inverse(self, margin)
    }

    /// Whether all values are within `margin` of those of `other`.
    pub fn approximately_equals(&self, other: &Matrix, margin: f64) -> bool {
        self.shape() == other.shape()
            && self.values().zip(other.values()).all(|(left, right)| (left - right).abs() <= margin)
    }
}

impl AsRef<Tensor> for Matrix {
    fn as_ref(&self) -> &Tensor {
        &self.tensor
    }
}

impl<'a> From<&'a Matrix> for Cow<'a, Matrix> {
    fn from(matrix: &'a Matrix) -> Self {
        Cow::Borrowed(matrix)
    }
}

impl From<Matrix> for Cow<'_, Matrix> {
    fn from(matrix: Matrix) -> Self {
        Cow::Owned(matrix)
    }
}

impl PartialEq for Matrix {
    /// Equal shapes and values, regardless of tags and storage.
    fn eq(&self, other: &Self) -> bool {
        self.shape() == other.shape() && self.values().eq(other.values())
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = 10;
        let column_width = 3;

        writeln!(f, "{} ({} x {}):", self.operator(), self.rows(), self.columns())?;
        write!(f, "{:>width$} |", "", width = column_width)?;
        for j in 0..self.columns() {
            write!(f, "{0:^width$}", j, width = width)?;
        }
        writeln!(f)?;
        let total_width = column_width + 1 + 1 + self.columns() * width;
        writeln!(f, "{}", "-".repeat(total_width))?;

        for i in 0..self.rows() {
            write!(f, "{0:>width$} |", i, width = column_width)?;
            for j in 0..self.columns() {
                write!(f, "{0:^width$}", format!("{:.4}", self.get(i, j)), width = width)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
