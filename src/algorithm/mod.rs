//! # Algorithms
//!
//! Factorizations and iterative solvers built on the dispatched matrix operations.
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_algebra::vector::Vector;

pub mod eigen;
pub mod lower_upper;
pub mod polar;
pub mod reflector;
pub mod tridiagonal;

/// Values within this distance of each other are considered equal, unless configured otherwise.
pub const DEFAULT_MARGIN: f64 = 1e-4;
/// Iteration cap of the iterative solvers, unless configured otherwise.
pub const DEFAULT_MAX_LOOPS: u64 = 10_000;

/// A matrix to work on, together with the tolerances to use.
#[derive(Copy, Clone, Debug)]
pub struct Hints<'a> {
    /// The matrix that the algorithm is applied to.
    pub matrix: &'a Matrix,
    /// Values within this distance of each other are considered equal.
    pub margin: f64,
    /// Iterative solvers stop after this many steps, returning their last estimate.
    pub max_loops: u64,
}

impl<'a> Hints<'a> {
    /// Hints with the default margin and iteration cap.
    pub fn new(matrix: &'a Matrix) -> Self {
        Self {
            matrix,
            margin: DEFAULT_MARGIN,
            max_loops: DEFAULT_MAX_LOOPS,
        }
    }

    /// Use another error margin.
    #[must_use]
    pub fn with_margin(mut self, margin: f64) -> Self {
        debug_assert!(margin >= 0_f64);

        self.margin = margin;
        self
    }

    /// Use another iteration cap.
    #[must_use]
    pub fn with_max_loops(mut self, max_loops: u64) -> Self {
        debug_assert!(max_loops > 0);

        self.max_loops = max_loops;
        self
    }
}

/// Approximate eigenvector and eigenvalue.
#[derive(Clone, Debug, PartialEq)]
pub struct EigenPair {
    /// Eigenvector, of norm one when produced by a solver.
    pub vector: Vector,
    /// Eigenvalue.
    pub value: f64,
}

impl EigenPair {
    /// Create a new pair.
    pub fn new(vector: Vector, value: f64) -> Self {
        Self { vector, value }
    }
}

/// Outcome of an iterative solver together with how it got there.
#[derive(Clone, Debug, PartialEq)]
pub struct Iterated<T> {
    /// Final estimate.
    pub value: T,
    /// Number of steps taken.
    pub iterations: u64,
    /// Measure of the remaining error in the final estimate, solver specific.
    pub residual: f64,
    /// Whether the solver stopped because the estimate was good enough, rather than hitting a cap.
    pub converged: bool,
}

#[cfg(test)]
mod test {
    use crate::algorithm::{DEFAULT_MARGIN, DEFAULT_MAX_LOOPS, Hints};
    use crate::data::linear_algebra::matrix::Matrix;

    #[test]
    fn hints() {
        let matrix = Matrix::identity(2);
        let hints = Hints::new(&matrix);
        assert_eq!(hints.margin, DEFAULT_MARGIN);
        assert_eq!(hints.max_loops, DEFAULT_MAX_LOOPS);

        let hints = hints.with_margin(1e-8).with_max_loops(5);
        assert_eq!(hints.margin, 1e-8);
        assert_eq!(hints.max_loops, 5);
    }
}
