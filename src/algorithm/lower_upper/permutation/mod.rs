//! # Row permutations
//!
//! The row exchanges made while pivoting, kept as a permutation so that right hand sides can be
//! reordered in the same way.
pub use full::Full as FullPermutation;

mod full;

/// A bijection on the indices `0..len()`.
pub trait Permutation {
    /// Original index of the value that ends up at position `i`.
    fn forward(&self, i: usize) -> usize;
    /// Position that original index `i` ends up at, the inverse of `forward`.
    fn backward(&self, i: usize) -> usize;
    /// Number of indices.
    fn len(&self) -> usize;

    /// Reorder values such that position `i` holds the value at `forward(i)`.
    ///
    /// # Arguments
    ///
    /// * `values`: One value per index.
    fn gather<T: Copy>(&self, values: &[T]) -> Vec<T> {
        debug_assert_eq!(values.len(), self.len());

        (0..self.len()).map(|i| values[self.forward(i)]).collect()
    }

    /// Undo `gather`.
    fn scatter<T: Copy>(&self, values: &[T]) -> Vec<T> {
        debug_assert_eq!(values.len(), self.len());

        (0..self.len()).map(|j| values[self.backward(j)]).collect()
    }

    /// Whether the permutation is a product of an even number of exchanges.
    fn is_even(&self) -> bool {
        let n = self.len();
        let mut visited = vec![false; n];
        let mut cycles = 0;
        for start in 0..n {
            if visited[start] {
                continue;
            }
            cycles += 1;
            let mut i = start;
            while !visited[i] {
                visited[i] = true;
                i = self.forward(i);
            }
        }

        (n - cycles) % 2 == 0
    }
}
