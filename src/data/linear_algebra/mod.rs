//! # Linear algebra primitives
//!
//! Tensors of any order, with matrices and vectors as thin views of order two.

pub mod matrix;
pub mod tensor;
pub mod vector;
