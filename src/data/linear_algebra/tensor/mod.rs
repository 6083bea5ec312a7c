//! # Tensors
//!
//! A tensor owns its storage exclusively and carries the operator tag that describes its
//! structure. Matrices and vectors are tensors of order two.
use crate::data::linear_algebra::tensor::storage::{ArrayData, DiagonalData, Storage, TensorData};
use crate::error::{Error, Result};
use crate::operator::Operator;

pub mod storage;

/// Multi-dimensional container of floats.
///
/// The dimensions of the storage always equal the declared dimensions.
#[derive(Debug)]
pub struct Tensor {
    dimensions: Vec<usize>,
    storage: Storage,
    operator: Operator,
    /// Whether a consuming operation may overwrite the storage instead of allocating.
    destructible: bool,
}

impl Tensor {
    /// Create a tensor with all values zero.
    ///
    /// # Errors
    ///
    /// If there are no axes, or any axis has length zero.
    pub fn zeros(dimensions: &[usize]) -> Result<Self> {
        validate(dimensions)?;

        Ok(Self::with_storage(Storage::Array(ArrayData::zeros(dimensions))))
    }

    /// Create a tensor from row-major values.
    ///
    /// # Errors
    ///
    /// If the dimensions are invalid or don't match the number of values.
    pub fn from_values(dimensions: &[usize], values: Vec<f64>) -> Result<Self> {
        validate(dimensions)?;
        let size = dimensions.iter().product::<usize>();
        if values.len() != size {
            return Err(Error::InvalidArgument {
                argument: "values",
                reason: format!("expected {} values for dimensions {:?}, got {}", size, dimensions, values.len()),
            });
        }

        Ok(Self::with_storage(Storage::Array(ArrayData::from_values(dimensions, values))))
    }

    /// Create a tensor that stores only its diagonal, with a constant value on it.
    pub(crate) fn diagonal(dimensions: &[usize], value: f64) -> Self {
        debug_assert!(validate(dimensions).is_ok());

        Self::with_storage(Storage::Diagonal(DiagonalData::constant(dimensions, value)))
    }

    pub(crate) fn with_storage(storage: Storage) -> Self {
        Self {
            dimensions: storage.dimensions().to_vec(),
            storage,
            operator: Operator::General,
            destructible: false,
        }
    }

    /// Number of axes.
    pub fn order(&self) -> usize {
        self.dimensions.len()
    }

    /// Length of each axis.
    pub fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    /// Number of values represented, the product of the dimensions.
    pub fn size(&self) -> usize {
        self.dimensions.iter().product()
    }

    /// Value at a coordinate.
    pub fn get(&self, coordinates: &[usize]) -> f64 {
        debug_assert_eq!(coordinates.len(), self.order());

        self.storage.get(coordinates)
    }

    /// Change the value at a coordinate.
    ///
    /// The operator tag is left as it is.
    pub fn set(&mut self, coordinates: &[usize], value: f64) {
        debug_assert_eq!(coordinates.len(), self.order());

        self.storage.put(coordinates, value);
    }

    /// Backing store.
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    pub(crate) fn storage_mut(&mut self) -> &mut Storage {
        &mut self.storage
    }

    /// Take the backing store.
    pub fn into_storage(self) -> Storage {
        self.storage
    }

    /// Number of values that might be nonzero, possibly an overestimate.
    pub fn non_zero_count(&self) -> usize {
        self.storage.non_zero_count()
    }

    /// Currently assigned operator tag.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// Assign an operator tag without checking it.
    ///
    /// This is a trust boundary: a wrong tag makes dispatched operations compute wrong results.
    /// Use `Operator::allows` or `Matrix::assume` to verify first.
    pub fn assign(&mut self, operator: Operator) {
        self.operator = operator;
    }

    /// Whether a consuming operation may overwrite this tensor's storage.
    pub fn is_destructible(&self) -> bool {
        self.destructible
    }

    /// Grant or revoke permission to overwrite the storage in place.
    pub fn set_destructible(&mut self, destructible: bool) {
        self.destructible = destructible;
    }
}

impl Clone for Tensor {
    /// Deep copy.
    ///
    /// The copy is a fresh value and is not destructible.
    fn clone(&self) -> Self {
        Self {
            dimensions: self.dimensions.clone(),
            storage: self.storage.clone(),
            operator: self.operator,
            destructible: false,
        }
    }
}

fn validate(dimensions: &[usize]) -> Result<()> {
    if dimensions.is_empty() || dimensions.contains(&0) {
        Err(Error::InvalidArgument {
            argument: "dimensions",
            reason: format!("every axis needs a positive length, got {:?}", dimensions),
        })
    } else {
        Ok(())
    }
}
