//! # Vectors
//!
//! Column vectors, stored as matrices with a single column so that they take part in the same
//! dispatched operations.
use std::fmt;

use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_algebra::tensor::Tensor;
use crate::data::precision::euclidean_norm;
use crate::error::{Error, Result};

/// Column vector.
#[derive(Clone, Debug, PartialEq)]
pub struct Vector {
    matrix: Matrix,
}

impl Vector {
    /// Create a vector from its values.
    pub fn new(values: Vec<f64>) -> Self {
        debug_assert!(!values.is_empty());

        Self { matrix: Matrix::from_dense(values.len(), 1, values) }
    }

    /// Vector of zeros.
    pub fn zeros(len: usize) -> Self {
        Self { matrix: Matrix::zeros(len, 1) }
    }

    /// Vector with a one at index `i` and zeros elsewhere.
    pub fn standard_basis_vector(i: usize, len: usize) -> Self {
        debug_assert!(i < len);

        let mut vector = Self::zeros(len);
        vector.set(i, 1_f64);
        vector
    }

    /// Number of values.
    pub fn len(&self) -> usize {
        self.matrix.rows()
    }

    /// Whether there are no values, never the case.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Value at index `i`.
    pub fn get(&self, i: usize) -> f64 {
        self.matrix.get(i, 0)
    }

    /// Overwrite the value at index `i`.
    pub fn set(&mut self, i: usize, value: f64) {
        self.matrix.set(i, 0, value);
    }

    /// All values in order.
    pub fn values(&self) -> impl Iterator<Item=f64> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }

    /// Euclidean norm.
    pub fn norm(&self) -> f64 {
        euclidean_norm(self.values())
    }

    /// Vector of the same direction with norm one.
    ///
    /// A zero vector is returned as it is.
    #[must_use]
    pub fn normalized(&self) -> Self {
        let norm = self.norm();
        if norm == 0_f64 {
            self.clone()
        } else {
            self.scale(1_f64 / norm)
        }
    }

    /// Inner product.
    ///
    /// # Errors
    ///
    /// If the lengths differ.
    pub fn dot(&self, other: &Vector) -> Result<f64> {
        self.matrix.dot(&other.matrix)
    }

    /// Scalar multiple.
    #[must_use]
    pub fn scale(&self, factor: f64) -> Self {
        Self { matrix: self.matrix.scale(factor) }
    }

    /// Difference `self - other`.
    ///
    /// # Errors
    ///
    /// If the lengths differ.
    pub fn subtract(&self, other: &Vector) -> Result<Self> {
        self.matrix.subtract(&other.matrix).map(|matrix| Self { matrix })
    }

    /// View as a matrix with one column.
    pub fn as_matrix(&self) -> &Matrix {
        &self.matrix
    }

    /// Convert into a matrix with one column.
    pub fn into_matrix(self) -> Matrix {
        self.matrix
    }
}

impl TryFrom<Matrix> for Vector {
    type Error = Error;

    fn try_from(matrix: Matrix) -> Result<Self> {
        if matrix.columns() == 1 {
            Ok(Self { matrix })
        } else {
            Err(Error::InvalidArgument {
                argument: "matrix",
                reason: format!("a vector has one column, got {}", matrix.columns()),
            })
        }
    }
}

impl AsRef<Tensor> for Vector {
    fn as_ref(&self) -> &Tensor {
        self.matrix.tensor()
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:.4}", value)?;
        }
        f.write_str("]")
    }
}
