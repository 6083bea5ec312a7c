//! # Structured matrix operations
//!
//! Matrices carry an operator tag describing their structure, such as symmetric, banded or
//! orthogonal. Operations between tagged matrices are dispatched to the operand whose structure
//! makes them cheapest, and the algorithms (LU factorization, eigenvalue refinement, polar
//! decomposition and tridiagonalization) use the tags to skip work.
#![warn(missing_docs)]

pub mod algorithm;
pub mod data;
pub mod error;
pub mod operator;

#[cfg(test)]
#[macro_use]
extern crate approx;

#[cfg(test)]
mod tests;
