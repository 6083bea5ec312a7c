//! # Stored permutation
//!
//! Both directions are kept in a table, so that both are constant time.
use std::fmt;

use crate::algorithm::lower_upper::permutation::Permutation;

/// Permutation with both directions tabulated.
///
/// Position `i` holds original index `forward[i]`, and original index `j` is found at position
/// `backward[j]`.
#[derive(Eq, PartialEq, Clone, Debug)]
pub struct Full {
    forward: Vec<usize>,
    backward: Vec<usize>,
}

impl Full {
    /// Create a permutation from the original index at each position.
    pub fn new(forward: Vec<usize>) -> Self {
        let mut backward = vec![0; forward.len()];
        for (position, &original) in forward.iter().enumerate() {
            backward[original] = position;
        }
        debug_assert!(backward.iter().enumerate().all(|(original, &position)| forward[position] == original));

        Self { forward, backward }
    }

    /// Leave every index where it is.
    pub fn identity(n: usize) -> Self {
        Self {
            forward: (0..n).collect(),
            backward: (0..n).collect(),
        }
    }

    /// Exchange the values at positions `i` and `j`.
    pub fn swap(&mut self, i: usize, j: usize) {
        debug_assert!(i < self.len() && j < self.len());

        self.forward.swap(i, j);
        self.backward[self.forward[i]] = i;
        self.backward[self.forward[j]] = j;
    }
}

impl Permutation for Full {
    fn forward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        self.forward[i]
    }

    fn backward(&self, i: usize) -> usize {
        debug_assert!(i < self.len());

        self.backward[i]
    }

    fn len(&self) -> usize {
        self.forward.len()
    }
}

impl fmt::Display for Full {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.forward.iter().map(usize::to_string).collect::<Vec<_>>().join(" "))
    }
}
