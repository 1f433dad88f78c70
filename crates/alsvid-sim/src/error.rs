//! Error types for the state store and engines.

use thiserror::Error;

/// Errors surfaced by register, addressing, application and measurement
/// operations.
///
/// Failures are reported before any amplitude mutation: an operation either
/// fully succeeds or leaves every register unchanged.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// A register literal may only contain the bits 0 and 1.
    #[error("invalid bit literal: element {value} at position {position} is not 0 or 1")]
    InvalidBitLiteral {
        /// The offending element.
        value: u8,
        /// Its position in the literal.
        position: usize,
    },

    /// Registers and selections must span at least one qubit.
    #[error("invalid qubit count: {0} (must be at least 1)")]
    InvalidQubitCount(usize),

    /// The name is already bound in the register/view namespace.
    #[error("name '{0}' is already in use")]
    DuplicateName(String),

    /// No register or view is bound to this name.
    #[error("unknown register or selection '{0}'")]
    UnknownRegister(String),

    /// No operator is bound to this name.
    #[error("unknown operator '{0}'")]
    UnknownOperator(String),

    /// `SELECT` range exceeds the source width.
    #[error(
        "selection [{start}, {start}+{len}) is out of bounds for a {num_qubits}-qubit source"
    )]
    RangeOutOfBounds {
        /// First selected slot.
        start: usize,
        /// Number of selected slots.
        len: usize,
        /// Width of the source register or view.
        num_qubits: usize,
    },

    /// Operator arity does not match the target's qubit count.
    #[error("operator acts on {operator} qubits but target '{target}' has {target_qubits}")]
    ArityMismatch {
        /// Arity of the operator.
        operator: u32,
        /// Name of the target register or view.
        target: String,
        /// Qubit count of the target.
        target_qubits: usize,
    },

    /// The view's backing register was reinitialized or replaced after the
    /// view was created.
    #[error("selection '{view}' is dangling: register '{register}' was reinitialized")]
    DanglingView {
        /// Name of the stale view.
        view: String,
        /// Name of the backing register.
        register: String,
    },

    /// The sampled outcome carries exactly zero probability. Unreachable for
    /// a normalized state; treated as an internal invariant violation.
    #[error("measurement outcome has zero probability — state norm invariant violated")]
    ZeroProbabilityCollapse,

    /// Operator algebra error (combinator arity or shape).
    #[error(transparent)]
    Op(#[from] alsvid_op::OpError),
}

/// Result type for simulation operations.
pub type SimResult<T> = Result<T, SimError>;
