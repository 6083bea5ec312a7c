//! # Typed tags
//!
//! Compile time counterparts of the `Operator` tags. Each capability is a marker trait, and each
//! concrete tag implements exactly the capabilities it refines, so that an algorithm can state
//! what structure it needs in its signature.
//!
//! A matrix only gets a typed tag through `Matrix::assume`, which checks the values once.
use std::fmt::Debug;
use std::ops::Deref;

use crate::data::linear_algebra::matrix::Matrix;
use crate::data::linear_algebra::tensor::Tensor;
use crate::operator::{Operator, Triangle};

/// A tag known at compile time.
pub trait Tag: Copy + Debug {
    /// The runtime tag.
    fn operator(&self) -> Operator;
}

/// As many rows as columns.
pub trait IsSquare: Tag {}
/// Equal to the transpose.
pub trait IsSymmetric: IsSquare {}
/// Transpose is the inverse.
pub trait IsOrthogonal: IsSquare {}
/// Its own inverse.
pub trait IsInvolutory: IsSquare {}
/// Nonzeros restricted to bands around the diagonal.
pub trait IsBanded: IsSquare {}

macro_rules! tags {
    ($($(#[$meta:meta])* $name:ident => $operator:expr, [$($capability:ident),*];)*) => {
        $(
            $(#[$meta])*
            #[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
            pub struct $name;

            impl Tag for $name {
                fn operator(&self) -> Operator {
                    $operator
                }
            }

            $(impl $capability for $name {})*
        )*
    };
}

tags! {
    /// No known structure.
    General => Operator::General, [];
    /// At most as many rows as columns.
    Wide => Operator::Wide, [];
    /// At least as many rows as columns.
    Tall => Operator::Tall, [];
    /// As many rows as columns.
    Square => Operator::Square, [IsSquare];
    /// Equal to its transpose.
    Symmetric => Operator::Symmetric, [IsSquare, IsSymmetric];
    /// Transpose is the inverse.
    Orthogonal => Operator::Orthogonal, [IsSquare, IsOrthogonal];
    /// Its own inverse.
    Involutory => Operator::Involutory, [IsSquare, IsInvolutory];
    /// Zero below the diagonal.
    UpperTriangular => Operator::Triangular(Triangle::Upper), [IsSquare, IsBanded];
    /// Zero above the diagonal.
    LowerTriangular => Operator::Triangular(Triangle::Lower), [IsSquare, IsBanded];
    /// One band on both sides of the diagonal.
    Tridiagonal => Operator::Tridiagonal, [IsSquare, IsBanded];
    /// Zero outside the diagonal.
    Diagonal => Operator::Diagonal, [IsSquare, IsBanded, IsSymmetric];
    /// The identity.
    Identity => Operator::Identity, [IsSquare, IsBanded, IsSymmetric, IsOrthogonal, IsInvolutory];
    /// A Householder reflection.
    Reflection => Operator::Reflection, [IsSquare, IsSymmetric, IsOrthogonal, IsInvolutory];
}

/// Nonzeros at most `lower` rows below and `upper` columns right of the diagonal.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Banded {
    pub lower: usize,
    pub upper: usize,
}

impl Tag for Banded {
    fn operator(&self) -> Operator {
        Operator::Banded { lower: self.lower, upper: self.upper }
    }
}

impl IsSquare for Banded {}
impl IsBanded for Banded {}

/// A matrix whose values were checked to have the structure of `T`.
#[derive(Clone, Debug)]
pub struct Assumed<T> {
    matrix: Matrix,
    tag: T,
}

impl<T: Tag> Assumed<T> {
    pub(crate) fn new(matrix: Matrix, tag: T) -> Self {
        debug_assert_eq!(matrix.operator(), tag.operator());

        Self { matrix, tag }
    }

    /// The checked tag.
    pub fn tag(&self) -> T {
        self.tag
    }

    /// Release the matrix, which keeps its assigned tag.
    pub fn into_inner(self) -> Matrix {
        self.matrix
    }
}

impl<T> Deref for Assumed<T> {
    type Target = Matrix;

    fn deref(&self) -> &Matrix {
        &self.matrix
    }
}

impl<T> AsRef<Matrix> for Assumed<T> {
    fn as_ref(&self) -> &Matrix {
        &self.matrix
    }
}

impl<T> AsRef<Tensor> for Assumed<T> {
    fn as_ref(&self) -> &Tensor {
        self.matrix.tensor()
    }
}
