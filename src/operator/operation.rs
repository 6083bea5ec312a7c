//! # Operations
//!
//! Every algebraic operation is a value that knows what it will cost before it is computed. When
//! both operands of a binary operation could drive the loops, an operation is built from the tag of
//! each of them and only the cheaper one is computed. Both must produce the same values.
//!
//! Unary operations take their operand as a `Cow`. An owned operand that is marked destructible
//! is used as the buffer for the result; any other operand is copied first.
use std::borrow::Cow;

use crate::algorithm::lower_upper::LowerUpper;
use crate::data::linear_algebra::matrix::Matrix;
use crate::error::{Error, Result};
use crate::operator::cost::{Cost, INCOMPATIBLE};
use crate::operator::kernel::{self, Layout};
use crate::operator::Operator;

/// A computation with a work estimate.
pub trait Operation {
    /// Type of the computed value.
    type Output;

    /// Estimated work, `INCOMPATIBLE` if the operands can't be combined.
    fn cost(&self) -> Cost;

    /// Do the computation.
    ///
    /// # Errors
    ///
    /// If the operands can't be combined, or the computation breaks down numerically.
    fn result(self) -> Result<Self::Output>;
}

/// The operation with the lowest cost, `first` on a tie.
pub fn cheaper<O: Operation>(first: O, second: O) -> O {
    if second.cost() < first.cost() {
        second
    } else {
        first
    }
}

/// Which side of a product the driving operand is on.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Side {
    Left,
    Right,
}

/// A tag bound to a matrix, supplying the operations specialized for that tag.
///
/// The tag doesn't need to be the one assigned to the matrix.
#[derive(Copy, Clone, Debug)]
pub struct Instance<'a> {
    operator: Operator,
    matrix: &'a Matrix,
}

impl Operator {
    /// Bind this tag to a matrix.
    pub fn instance(self, matrix: &Matrix) -> Instance<'_> {
        Instance { operator: self, matrix }
    }
}

impl<'a> Instance<'a> {
    /// The bound tag.
    pub fn operator(&self) -> Operator {
        self.operator
    }

    /// The bound matrix.
    pub fn matrix(&self) -> &'a Matrix {
        self.matrix
    }

    fn layout(&self) -> Layout {
        layout_of(self.operator, self.matrix)
    }

    /// Sum with `other`, looping over this matrix.
    pub fn addition(self, other: &'a Matrix) -> Addition<'a> {
        Addition { driver: self, other }
    }

    /// Dot product with `other`, looping over this matrix.
    pub fn dot_product(self, other: &'a Matrix) -> DotProduct<'a> {
        DotProduct { driver: self, other }
    }

    /// Product `self · right`, looping over this matrix.
    pub fn left_multiply(self, right: &'a Matrix) -> Multiplication<'a> {
        Multiplication { driver: self, other: right, side: Side::Left }
    }

    /// Product `left · self`, looping over this matrix.
    pub fn right_multiply(self, left: &'a Matrix) -> Multiplication<'a> {
        Multiplication { driver: self, other: left, side: Side::Right }
    }

    /// Scalar multiple.
    pub fn scalar_product(self, factor: f64) -> ScalarProduct<'a> {
        ScalarProduct { matrix: Cow::Borrowed(self.matrix), operator: self.operator, factor }
    }

    /// Transpose.
    pub fn transpose(self) -> Transpose<'a> {
        Transpose { matrix: Cow::Borrowed(self.matrix), operator: self.operator }
    }

    /// Inverse, treating values within `margin` of zero as zero.
    pub fn inverse(self, margin: f64) -> Inverse<'a> {
        Inverse {
            driver: self,
            margin,
            strategy: InverseStrategy::for_operator(self.operator),
        }
    }
}

/// Matrix sum.
#[derive(Debug)]
pub struct Addition<'a> {
    driver: Instance<'a>,
    other: &'a Matrix,
}

impl Operation for Addition<'_> {
    type Output = Matrix;

    fn cost(&self) -> Cost {
        let shape = self.driver.matrix.shape();
        if shape == self.other.shape() {
            self.driver.layout().cells(shape)
        } else {
            INCOMPATIBLE
        }
    }

    fn result(self) -> Result<Matrix> {
        let Self { driver, other } = self;
        let shape = driver.matrix.shape();
        if shape != other.shape() {
            return Err(Error::dimensions("addition", &[shape.0, shape.1], &[other.rows(), other.columns()]));
        }

        let mut target = other.clone();
        kernel::accumulate(&mut target, driver.matrix, driver.layout());
        target.assign(driver.operator.sum(other.operator(), shape));
        Ok(target)
    }
}

/// Sum of the products of corresponding values.
#[derive(Debug)]
pub struct DotProduct<'a> {
    driver: Instance<'a>,
    other: &'a Matrix,
}

impl Operation for DotProduct<'_> {
    type Output = f64;

    fn cost(&self) -> Cost {
        let shape = self.driver.matrix.shape();
        if shape == self.other.shape() {
            self.driver.layout().cells(shape)
        } else {
            INCOMPATIBLE
        }
    }

    fn result(self) -> Result<f64> {
        let shape = self.driver.matrix.shape();
        if shape != self.other.shape() {
            return Err(Error::dimensions("dot product", &[shape.0, shape.1], &[self.other.rows(), self.other.columns()]));
        }

        Ok(kernel::dot(self.driver.matrix, self.other, self.driver.layout()))
    }
}

/// Matrix product, driven by either factor.
#[derive(Debug)]
pub struct Multiplication<'a> {
    driver: Instance<'a>,
    other: &'a Matrix,
    side: Side,
}

impl<'a> Multiplication<'a> {
    fn factors(&self) -> (&'a Matrix, &'a Matrix) {
        match self.side {
            Side::Left => (self.driver.matrix, self.other),
            Side::Right => (self.other, self.driver.matrix),
        }
    }

    /// Side of the product that drives the loops.
    pub fn side(&self) -> Side {
        self.side
    }
}

impl Operation for Multiplication<'_> {
    type Output = Matrix;

    fn cost(&self) -> Cost {
        let (left, right) = self.factors();
        if left.columns() != right.rows() {
            return INCOMPATIBLE;
        }

        match (self.driver.layout(), self.side) {
            (Layout::Identity, Side::Left) => left.rows(),
            (Layout::Identity, Side::Right) => right.columns(),
            (layout, Side::Left) => layout.cells(left.shape()).saturating_mul(right.columns()),
            (layout, Side::Right) => left.rows().saturating_mul(layout.cells(right.shape())),
        }
    }

    fn result(self) -> Result<Matrix> {
        let (left, right) = self.factors();
        if left.columns() != right.rows() {
            return Err(Error::dimensions("multiplication", &[left.rows(), left.columns()], &[right.rows(), right.columns()]));
        }

        let (left_operator, right_operator) = match self.side {
            Side::Left => (self.driver.operator, self.other.operator()),
            Side::Right => (self.other.operator(), self.driver.operator),
        };
        let mut product = match (self.driver.layout(), self.side) {
            (Layout::Identity, _) => self.other.clone(),
            (layout, Side::Left) => kernel::multiply_left(left, right, layout),
            (layout, Side::Right) => kernel::multiply_right(left, right, layout),
        };
        product.assign(left_operator.product(right_operator, left.shape(), right.shape()));
        Ok(product)
    }
}

/// Multiplication of all values by a constant.
#[derive(Debug)]
pub struct ScalarProduct<'a> {
    matrix: Cow<'a, Matrix>,
    operator: Operator,
    factor: f64,
}

impl<'a> ScalarProduct<'a> {
    /// Scale a matrix, driven by its assigned tag.
    pub fn new(matrix: Cow<'a, Matrix>, factor: f64) -> Self {
        let operator = matrix.operator();
        Self { matrix, operator, factor }
    }

    fn compute(self) -> Matrix {
        let layout = layout_of(self.operator, &self.matrix);
        let mut result = buffer(self.matrix);
        kernel::scale(&mut result, self.factor, layout);
        result.assign(self.operator.scaled(self.factor));
        result
    }
}

impl Operation for ScalarProduct<'_> {
    type Output = Matrix;

    fn cost(&self) -> Cost {
        layout_of(self.operator, &self.matrix).cells(self.matrix.shape())
    }

    fn result(self) -> Result<Matrix> {
        Ok(self.compute())
    }
}

/// Transpose.
#[derive(Debug)]
pub struct Transpose<'a> {
    matrix: Cow<'a, Matrix>,
    operator: Operator,
}

impl<'a> Transpose<'a> {
    /// Transpose a matrix, driven by its assigned tag.
    pub fn new(matrix: Cow<'a, Matrix>) -> Self {
        let operator = matrix.operator();
        Self { matrix, operator }
    }

    fn is_own_transpose(&self) -> bool {
        self.operator.implies(Operator::Symmetric, self.matrix.shape())
    }

    fn compute(self) -> Matrix {
        let layout = layout_of(self.operator, &self.matrix);
        let operator = self.operator.transposed();

        let mut result = if self.is_own_transpose() {
            buffer(self.matrix)
        } else {
            match self.matrix {
                Cow::Owned(mut matrix) if matrix.is_destructible() && matrix.is_square() => {
                    kernel::transpose_in_place(&mut matrix);
                    matrix
                },
                matrix => kernel::transpose(&matrix, layout),
            }
        };
        result.assign(operator);
        result
    }
}

impl Operation for Transpose<'_> {
    type Output = Matrix;

    fn cost(&self) -> Cost {
        let shape = self.matrix.shape();
        if self.is_own_transpose() {
            shape.0
        } else {
            layout_of(self.operator, &self.matrix).cells(shape)
        }
    }

    fn result(self) -> Result<Matrix> {
        Ok(self.compute())
    }
}

/// How an inverse is computed, chosen from the tag.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum InverseStrategy {
    /// The identity is its own inverse.
    Identity,
    /// Invert each value on the diagonal.
    Diagonal,
    /// The transpose is the inverse.
    Transpose,
    /// The matrix is its own inverse.
    Involution,
    /// Factorize and solve against the identity.
    Factorize,
}

impl InverseStrategy {
    fn for_operator(operator: Operator) -> Self {
        match operator {
            Operator::Identity => InverseStrategy::Identity,
            Operator::Diagonal => InverseStrategy::Diagonal,
            Operator::Orthogonal | Operator::Reflection => InverseStrategy::Transpose,
            Operator::Involutory => InverseStrategy::Involution,
            _ => InverseStrategy::Factorize,
        }
    }
}

/// Matrix inverse.
#[derive(Debug)]
pub struct Inverse<'a> {
    driver: Instance<'a>,
    margin: f64,
    strategy: InverseStrategy,
}

impl Inverse<'_> {
    /// The method that will be used.
    pub fn strategy(&self) -> InverseStrategy {
        self.strategy
    }
}

impl Operation for Inverse<'_> {
    type Output = Matrix;

    fn cost(&self) -> Cost {
        let (rows, columns) = self.driver.matrix.shape();
        if rows != columns {
            return INCOMPATIBLE;
        }

        let n = rows;
        match self.strategy {
            InverseStrategy::Identity | InverseStrategy::Diagonal => n,
            InverseStrategy::Transpose | InverseStrategy::Involution => n * n,
            InverseStrategy::Factorize => n.saturating_mul(n).saturating_mul(n),
        }
    }

    fn result(self) -> Result<Matrix> {
        let Self { driver, margin, strategy } = self;
        let matrix = driver.matrix;
        if !matrix.is_square() {
            return Err(Error::TagMismatch { required: Operator::Square, actual: driver.operator });
        }

        let inverse = match strategy {
            InverseStrategy::Identity | InverseStrategy::Involution => matrix.clone(),
            InverseStrategy::Diagonal => {
                let values = (0..matrix.rows())
                    .map(|i| {
                        let pivot = matrix.get(i, i);
                        if pivot.abs() <= margin {
                            Err(Error::NotInvertible { index: i, pivot, margin })
                        } else {
                            Ok(1_f64 / pivot)
                        }
                    })
                    .collect::<Result<Vec<_>>>()?;
                Matrix::diagonal(&values)
            },
            InverseStrategy::Transpose => Transpose { matrix: Cow::Borrowed(matrix), operator: driver.operator }.compute(),
            InverseStrategy::Factorize => LowerUpper::new(matrix, margin)?.inverse()?,
        };

        Ok(inverse.with_operator(driver.operator.inverted()))
    }
}

/// Entries of `matrix` that can be nonzero under `operator`, narrowed to the diagonal when the
/// storage holds nothing else.
fn layout_of(operator: Operator, matrix: &Matrix) -> Layout {
    let shape = matrix.shape();
    let layout = operator.layout(shape);
    let tensor = matrix.tensor();
    if tensor.storage().is_diagonal() && tensor.non_zero_count() < layout.cells(shape) {
        Layout::Banded { lower: 0, upper: 0 }
    } else {
        layout
    }
}

/// Reuse a destructible owned operand, copy anything else.
fn buffer(matrix: Cow<'_, Matrix>) -> Matrix {
    match matrix {
        Cow::Owned(matrix) if matrix.is_destructible() => matrix,
        matrix => matrix.as_ref().clone(),
    }
}

/// Sum of two matrices, driven by the cheaper operand.
///
/// # Errors
///
/// If the shapes differ.
pub fn add(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    let operation = cheaper(
        left.operator().instance(left).addition(right),
        right.operator().instance(right).addition(left),
    );
    log::trace!("addition driven by {}", operation.driver.operator);
    operation.result()
}

/// Add `addend` to `target`, overwriting `target` if it is destructible.
///
/// # Errors
///
/// If the shapes differ.
pub fn add_to(mut target: Matrix, addend: &Matrix) -> Result<Matrix> {
    if !target.is_destructible() {
        return add(&target, addend);
    }

    let shape = target.shape();
    if shape != addend.shape() {
        return Err(Error::dimensions("addition", &[shape.0, shape.1], &[addend.rows(), addend.columns()]));
    }

    kernel::accumulate(&mut target, addend, layout_of(addend.operator(), addend));
    let operator = target.operator().sum(addend.operator(), shape);
    target.assign(operator);
    Ok(target)
}

/// Product `left · right`, driven by the cheaper factor.
///
/// # Errors
///
/// If the number of columns of `left` differs from the number of rows of `right`.
pub fn multiply(left: &Matrix, right: &Matrix) -> Result<Matrix> {
    let operation = cheaper(
        left.operator().instance(left).left_multiply(right),
        right.operator().instance(right).right_multiply(left),
    );
    log::trace!("multiplication driven by the {:?} factor, {}", operation.side, operation.driver.operator);
    operation.result()
}

/// Dot product, driven by the cheaper operand.
///
/// # Errors
///
/// If the shapes differ.
pub fn dot(left: &Matrix, right: &Matrix) -> Result<f64> {
    cheaper(
        left.operator().instance(left).dot_product(right),
        right.operator().instance(right).dot_product(left),
    ).result()
}

/// Scalar multiple.
pub fn scale(matrix: Cow<'_, Matrix>, factor: f64) -> Matrix {
    ScalarProduct::new(matrix, factor).compute()
}

/// Transpose.
pub fn transpose(matrix: Cow<'_, Matrix>) -> Matrix {
    Transpose::new(matrix).compute()
}

/// Inverse, using the cheapest method the assigned tag allows.
///
/// # Errors
///
/// If the matrix isn't square or turns out to be singular within `margin`.
pub fn inverse(matrix: &Matrix, margin: f64) -> Result<Matrix> {
    let operation = matrix.operator().instance(matrix).inverse(margin);
    log::trace!("inverse of {} using {:?}", matrix.operator(), operation.strategy);
    operation.result()
}
