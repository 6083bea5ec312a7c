//! # Qualification
//!
//! Checking whether the values of a matrix actually have the structure a tag describes. A check for
//! a tag first checks all of its ancestors in the lattice and then adds its own test, so a derived
//! tag never relies on a predicate it didn't verify.
//!
//! The checks never look at the tag that is currently assigned to the matrix, they always work on
//! the values directly.
use crate::data::linear_algebra::matrix::Matrix;
use crate::data::precision::{close, within};
use crate::error::Result;
use crate::operator::{Operator, TagKind};
use crate::operator::cost::{self, Cost, CostModel};
use crate::operator::kernel::{self, Layout};
use crate::operator::operation::Operation;

/// Check of the structure of a matrix against a tag.
#[derive(Clone, Debug)]
pub struct Qualification<'a> {
    operator: Operator,
    matrix: &'a Matrix,
    margin: f64,
    model: CostModel,
}

impl<'a> Qualification<'a> {
    /// Create a check with the default cost model.
    pub fn new(operator: Operator, matrix: &'a Matrix, margin: f64) -> Self {
        debug_assert!(margin >= 0_f64);

        Self {
            operator,
            matrix,
            margin,
            model: CostModel::default(),
        }
    }

    /// Use other fixed costs per check.
    #[must_use]
    pub fn with_model(mut self, model: CostModel) -> Self {
        self.model = model;
        self
    }

    /// Run the check.
    pub fn holds(&self) -> bool {
        self.check(self.operator)
    }

    fn check(&self, operator: Operator) -> bool {
        let shape = self.matrix.shape();
        operator.parents(shape).into_iter().all(|parent| self.check(parent))
            && self.own_check(operator)
    }

    /// The test a tag adds to those of its ancestors.
    fn own_check(&self, operator: Operator) -> bool {
        let (rows, columns) = self.matrix.shape();
        match operator {
            Operator::Wide => rows <= columns,
            Operator::Tall => rows >= columns,
            Operator::Symmetric => (0..rows)
                .all(|i| ((i + 1)..columns).all(|j| {
                    close(self.matrix.get(i, j), self.matrix.get(j, i), self.margin)
                })),
            Operator::Banded { lower, upper } => {
                let band = Layout::Banded { lower, upper };
                (0..rows).all(|i| {
                    let inside = band.row_range(i, (rows, columns));
                    (0..columns)
                        .filter(|j| !inside.contains(j))
                        .all(|j| within(self.matrix.get(i, j), self.margin))
                })
            },
            Operator::Identity => (0..rows).all(|i| close(self.matrix.get(i, i), 1_f64, self.margin)),
            Operator::Orthogonal => {
                let transposed = kernel::transpose(self.matrix, Layout::Dense);
                let product = kernel::multiply_left(self.matrix, &transposed, Layout::Dense);
                is_identity(&product, self.margin)
            },
            Operator::Involutory => {
                let square = kernel::multiply_left(self.matrix, self.matrix, Layout::Dense);
                is_identity(&square, self.margin)
            },
            Operator::General
            | Operator::Square
            | Operator::Triangular(_)
            | Operator::Tridiagonal
            | Operator::Diagonal
            | Operator::Reflection => true,
        }
    }

    /// Work of the check for `operator`, including the checks of all ancestors.
    fn cost_of(&self, operator: Operator) -> Cost {
        let shape = self.matrix.shape();
        let ancestors = operator.parents(shape).into_iter().map(|parent| self.cost_of(parent));
        cost::total(ancestors.chain([self.model.qualification(operator.kind()), own_cost(operator, shape)]))
    }
}

/// Work done on the values by the test a tag adds to those of its ancestors.
fn own_cost(operator: Operator, (rows, columns): (usize, usize)) -> Cost {
    let n = rows;
    match operator.kind() {
        TagKind::Symmetric => n * n.saturating_sub(1) / 2,
        TagKind::Banded => rows * columns - operator.layout((rows, columns)).cells((rows, columns)),
        TagKind::Identity => n,
        TagKind::Orthogonal | TagKind::Involutory => n * n * n + n * n,
        _ => 0,
    }
}

/// Whether all values are within `margin` of those of the identity matrix.
fn is_identity(matrix: &Matrix, margin: f64) -> bool {
    (0..matrix.rows()).all(|i| (0..matrix.columns()).all(|j| {
        let expected = if i == j { 1_f64 } else { 0_f64 };
        close(matrix.get(i, j), expected, margin)
    }))
}

impl Operation for Qualification<'_> {
    type Output = bool;

    fn cost(&self) -> Cost {
        self.cost_of(self.operator)
    }

    fn result(self) -> Result<bool> {
        Ok(self.holds())
    }
}
