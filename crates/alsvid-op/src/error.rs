//! Error types for the operator algebra crate.

use thiserror::Error;

/// Errors produced when building or combining operators.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum OpError {
    /// Sequential composition requires both operands to act on the same
    /// number of qubits.
    #[error("operator arity mismatch: left acts on {left} qubits, right on {right}")]
    ArityMismatch {
        /// Arity of the left operand.
        left: u32,
        /// Arity of the right operand.
        right: u32,
    },

    /// Matrix is not square with a power-of-two dimension ≥ 2.
    #[error("matrix of shape {rows}×{cols} is not a 2^k × 2^k operator")]
    BadDimension {
        /// Number of rows supplied.
        rows: usize,
        /// Number of columns supplied.
        cols: usize,
    },
}

/// Result type for operator algebra operations.
pub type OpResult<T> = Result<T, OpError>;
