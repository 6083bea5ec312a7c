//! # Storing of matrices in memory
//!
//! This module provides the data structures used to represent tensors, matrices and vectors in
//! memory, together with the floating point comparisons used throughout the crate.

pub mod linear_algebra;
pub mod precision;
