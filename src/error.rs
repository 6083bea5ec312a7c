//! # Error reporting
//!
//! All failures that can be detected while combining, qualifying or factorizing tensors.
//!
//! Reaching an iteration cap is not an error: solvers then return their best estimate.
use thiserror::Error;

use crate::operator::Operator;

/// Result type alias using the crate's `Error`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that are surfaced to the caller at the point of detection.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Shapes of the operands can't be combined for the requested operation.
    ///
    /// Never resolved by resizing either operand.
    #[error("Dimension mismatch in {operation}: {left:?} and {right:?}")]
    DimensionMismatch {
        /// Name of the operation that was attempted.
        operation: &'static str,
        /// Dimensions of the first operand.
        left: Vec<usize>,
        /// Dimensions of the second operand.
        right: Vec<usize>,
    },

    /// A pivot or diagonal value was within the error margin of zero.
    #[error("Not invertible: pivot {pivot} at index {index} is within margin {margin} of zero")]
    NotInvertible {
        /// Row (or diagonal) index at which the degenerate pivot was found.
        index: usize,
        /// The degenerate value.
        pivot: f64,
        /// Margin the pivot was compared against.
        margin: f64,
    },

    /// An operation required a capability that the assigned tag doesn't provide.
    #[error("Tag mismatch: operation requires {required}, tensor is tagged {actual}")]
    TagMismatch {
        /// Tag the operation needs (or a refinement of it).
        required: Operator,
        /// Tag currently assigned to the tensor.
        actual: Operator,
    },

    /// The numeric contents of a tensor don't satisfy a tag it was supposed to carry.
    #[error("Tensor doesn't qualify as {operator} within margin {margin}")]
    NotQualified {
        /// Tag that was checked.
        operator: Operator,
        /// Margin used in the check.
        margin: f64,
    },

    /// Malformed input to a constructor.
    #[error("Invalid argument '{argument}': {reason}")]
    InvalidArgument {
        /// Name of the argument.
        argument: &'static str,
        /// What's wrong with it.
        reason: String,
    },
}

impl Error {
    pub(crate) fn dimensions(operation: &'static str, left: &[usize], right: &[usize]) -> Self {
        Self::DimensionMismatch {
            operation,
            left: left.to_vec(),
            right: right.to_vec(),
        }
    }
}
