//! # Tensor storage
//!
//! Backing stores that map integer coordinate tuples to values. The algorithms working on tensors
//! never look at which store is used; they only rely on the `TensorData` contract.
use std::fmt::Debug;

use itertools::Itertools;

/// Maps coordinates to values.
///
/// Coordinates that were never written, or that were removed, read as zero.
pub trait TensorData: Clone + Debug {
    /// Length of each axis.
    fn dimensions(&self) -> &[usize];
    /// Value at a coordinate.
    fn get(&self, coordinates: &[usize]) -> f64;
    /// Whether this store can hold `value` at `coordinates` without changing representation.
    fn accepts(&self, coordinates: &[usize], value: f64) -> bool;
    /// Write a value.
    ///
    /// Callers should check `accepts` first.
    fn put(&mut self, coordinates: &[usize], value: f64);
    /// Reset the value at a coordinate to zero.
    fn remove(&mut self, coordinates: &[usize]);
    /// Reset all values to zero.
    fn clear(&mut self);
    /// Coordinates of all values that are not zero.
    fn populated(&self) -> Vec<Vec<usize>>;
    /// Number of values that might be nonzero.
    ///
    /// May overestimate. Only used to rank the cost of algorithms, never for correctness.
    fn non_zero_count(&self) -> usize;
}

/// Every coordinate has a slot, stored in row-major order.
#[derive(Clone, Debug, PartialEq)]
pub struct ArrayData {
    dimensions: Vec<usize>,
    strides: Vec<usize>,
    values: Vec<f64>,
}

impl ArrayData {
    /// All zero.
    pub fn zeros(dimensions: &[usize]) -> Self {
        let strides = strides(dimensions);
        let size = dimensions.iter().product();

        Self {
            dimensions: dimensions.to_vec(),
            strides,
            values: vec![0_f64; size],
        }
    }

    /// Wrap row-major values.
    pub fn from_values(dimensions: &[usize], values: Vec<f64>) -> Self {
        debug_assert_eq!(dimensions.iter().product::<usize>(), values.len());

        Self {
            dimensions: dimensions.to_vec(),
            strides: strides(dimensions),
            values,
        }
    }

    /// Row-major values.
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Row-major values, mutable.
    pub fn values_mut(&mut self) -> &mut [f64] {
        &mut self.values
    }

    /// Take the row-major values.
    pub fn into_values(self) -> Vec<f64> {
        self.values
    }

    fn offset(&self, coordinates: &[usize]) -> usize {
        debug_assert_eq!(coordinates.len(), self.dimensions.len());
        debug_assert!(coordinates.iter().zip(&self.dimensions).all(|(i, n)| i < n));

        coordinates.iter().zip(&self.strides).map(|(i, stride)| i * stride).sum()
    }
}

impl TensorData for ArrayData {
    fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    fn get(&self, coordinates: &[usize]) -> f64 {
        self.values[self.offset(coordinates)]
    }

    fn accepts(&self, _coordinates: &[usize], _value: f64) -> bool {
        true
    }

    fn put(&mut self, coordinates: &[usize], value: f64) {
        let offset = self.offset(coordinates);
        self.values[offset] = value;
    }

    fn remove(&mut self, coordinates: &[usize]) {
        self.put(coordinates, 0_f64);
    }

    fn clear(&mut self) {
        self.values.iter_mut().for_each(|value| *value = 0_f64);
    }

    fn populated(&self) -> Vec<Vec<usize>> {
        self.dimensions.iter()
            .map(|&n| 0..n)
            .multi_cartesian_product()
            .zip(&self.values)
            .filter(|&(_, &value)| value != 0_f64)
            .map(|(coordinates, _)| coordinates)
            .collect()
    }

    fn non_zero_count(&self) -> usize {
        self.values.len()
    }
}

/// Only the coordinates with all indices equal have a slot.
#[derive(Clone, Debug, PartialEq)]
pub struct DiagonalData {
    dimensions: Vec<usize>,
    values: Vec<f64>,
}

impl DiagonalData {
    /// All zero.
    pub fn zeros(dimensions: &[usize]) -> Self {
        let length = dimensions.iter().copied().min().unwrap_or(0);

        Self {
            dimensions: dimensions.to_vec(),
            values: vec![0_f64; length],
        }
    }

    /// Diagonal with a constant value.
    pub fn constant(dimensions: &[usize], value: f64) -> Self {
        let mut data = Self::zeros(dimensions);
        data.values.iter_mut().for_each(|slot| *slot = value);
        data
    }

    fn diagonal_index(coordinates: &[usize]) -> Option<usize> {
        match coordinates.split_first() {
            Some((&first, rest)) if rest.iter().all(|&i| i == first) => Some(first),
            _ => None,
        }
    }

    fn to_array(&self) -> ArrayData {
        let mut array = ArrayData::zeros(&self.dimensions);
        let order = self.dimensions.len();
        for (i, &value) in self.values.iter().enumerate() {
            array.put(&vec![i; order], value);
        }
        array
    }
}

impl TensorData for DiagonalData {
    fn dimensions(&self) -> &[usize] {
        &self.dimensions
    }

    fn get(&self, coordinates: &[usize]) -> f64 {
        debug_assert_eq!(coordinates.len(), self.dimensions.len());
        debug_assert!(coordinates.iter().zip(&self.dimensions).all(|(i, n)| i < n));

        match Self::diagonal_index(coordinates) {
            Some(i) => self.values[i],
            None => 0_f64,
        }
    }

    fn accepts(&self, coordinates: &[usize], value: f64) -> bool {
        value == 0_f64 || Self::diagonal_index(coordinates).is_some()
    }

    fn put(&mut self, coordinates: &[usize], value: f64) {
        debug_assert!(self.accepts(coordinates, value));

        if let Some(i) = Self::diagonal_index(coordinates) {
            self.values[i] = value;
        }
    }

    fn remove(&mut self, coordinates: &[usize]) {
        if let Some(i) = Self::diagonal_index(coordinates) {
            self.values[i] = 0_f64;
        }
    }

    fn clear(&mut self) {
        self.values.iter_mut().for_each(|value| *value = 0_f64);
    }

    fn populated(&self) -> Vec<Vec<usize>> {
        let order = self.dimensions.len();
        self.values.iter()
            .enumerate()
            .filter(|&(_, &value)| value != 0_f64)
            .map(|(i, _)| vec![i; order])
            .collect()
    }

    fn non_zero_count(&self) -> usize {
        self.values.len()
    }
}

/// The store owned by a tensor.
///
/// A diagonal store that is asked to hold an off-diagonal nonzero converts itself into a full
/// array first.
#[derive(Clone, Debug, PartialEq)]
pub enum Storage {
    #[allow(missing_docs)]
    Array(ArrayData),
    #[allow(missing_docs)]
    Diagonal(DiagonalData),
}

impl Storage {
    /// Convert to a full array if necessary and expose it.
    pub fn make_dense(&mut self) -> &mut ArrayData {
        if let Storage::Diagonal(diagonal) = self {
            let array = diagonal.to_array();
            *self = Storage::Array(array);
        }

        match self {
            Storage::Array(array) => array,
            Storage::Diagonal(_) => unreachable!("converted above"),
        }
    }

    /// Convert to a full array.
    pub fn into_array(self) -> ArrayData {
        match self {
            Storage::Array(array) => array,
            Storage::Diagonal(diagonal) => diagonal.to_array(),
        }
    }

    /// Whether only the diagonal is stored.
    pub fn is_diagonal(&self) -> bool {
        matches!(self, Storage::Diagonal(_))
    }
}

impl TensorData for Storage {
    fn dimensions(&self) -> &[usize] {
        match self {
            Storage::Array(data) => data.dimensions(),
            Storage::Diagonal(data) => data.dimensions(),
        }
    }

    fn get(&self, coordinates: &[usize]) -> f64 {
        match self {
            Storage::Array(data) => data.get(coordinates),
            Storage::Diagonal(data) => data.get(coordinates),
        }
    }

    fn accepts(&self, _coordinates: &[usize], _value: f64) -> bool {
        true
    }

    fn put(&mut self, coordinates: &[usize], value: f64) {
        if let Storage::Diagonal(data) = self {
            if data.accepts(coordinates, value) {
                data.put(coordinates, value);
                return;
            }
        }

        self.make_dense().put(coordinates, value);
    }

    fn remove(&mut self, coordinates: &[usize]) {
        match self {
            Storage::Array(data) => data.remove(coordinates),
            Storage::Diagonal(data) => data.remove(coordinates),
        }
    }

    fn clear(&mut self) {
        match self {
            Storage::Array(data) => data.clear(),
            Storage::Diagonal(data) => data.clear(),
        }
    }

    fn populated(&self) -> Vec<Vec<usize>> {
        match self {
            Storage::Array(data) => data.populated(),
            Storage::Diagonal(data) => data.populated(),
        }
    }

    fn non_zero_count(&self) -> usize {
        match self {
            Storage::Array(data) => data.non_zero_count(),
            Storage::Diagonal(data) => data.non_zero_count(),
        }
    }
}

fn strides(dimensions: &[usize]) -> Vec<usize> {
    let mut strides = vec![1; dimensions.len()];
    for axis in (0..dimensions.len().saturating_sub(1)).rev() {
        strides[axis] = strides[axis + 1] * dimensions[axis + 1];
    }
    strides
}
