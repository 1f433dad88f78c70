//! The [`Operator`] type: an immutable unitary matrix with a declared arity.

use ndarray::Array2;
use ndarray::linalg::kron;
use num_complex::Complex64;

use crate::error::{OpError, OpResult};

/// A k-qubit operator: a 2^k × 2^k complex matrix.
///
/// Basis indexing is MSB-first in operator-qubit order: operator qubit 0 is
/// the most significant bit of the row/column index. This matches the CNOT
/// convention where the first qubit is the control.
///
/// Operators are never mutated after construction; combinators return new
/// values.
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    matrix: Array2<Complex64>,
    num_qubits: u32,
}

impl Operator {
    /// Build an operator from an explicit matrix.
    ///
    /// The matrix must be square with dimension 2^k for some k ≥ 1.
    /// Unitarity is *not* enforced here: the order-finding construction in
    /// [`crate::gates::modular_pow`] is a partial isometry on part of its
    /// domain and still needs to be representable. Use [`Operator::is_unitary`]
    /// to check when it matters.
    pub fn from_matrix(matrix: Array2<Complex64>) -> OpResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols || rows < 2 || !rows.is_power_of_two() {
            return Err(OpError::BadDimension { rows, cols });
        }
        Ok(Self {
            matrix,
            num_qubits: rows.trailing_zeros(),
        })
    }

    /// Number of qubits this operator acts on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Matrix dimension (2^k).
    #[inline]
    pub fn dim(&self) -> usize {
        self.matrix.nrows()
    }

    /// Borrow the underlying matrix.
    #[inline]
    pub fn matrix(&self) -> &Array2<Complex64> {
        &self.matrix
    }

    /// Sequential composition: apply `other` first, then `self`.
    ///
    /// The result is `matrix(self) · matrix(other)`. Both operands must have
    /// equal arity.
    pub fn concat(&self, other: &Operator) -> OpResult<Operator> {
        if self.num_qubits != other.num_qubits {
            return Err(OpError::ArityMismatch {
                left: self.num_qubits,
                right: other.num_qubits,
            });
        }
        Ok(Operator {
            matrix: self.matrix.dot(&other.matrix),
            num_qubits: self.num_qubits,
        })
    }

    /// Parallel composition with arity `k_self + k_other`.
    ///
    /// The result is `kron(matrix(other), matrix(self))`: the *right* operand
    /// occupies the more significant qubit block, so `self` ends up acting on
    /// the less significant qubits. The operand order is deliberate and part
    /// of the instruction set contract — callers must not "fix" it.
    pub fn tensor(&self, other: &Operator) -> Operator {
        Operator {
            matrix: kron(&other.matrix, &self.matrix),
            num_qubits: self.num_qubits + other.num_qubits,
        }
    }

    /// Hermitian adjoint (conjugate transpose).
    ///
    /// For a unitary operator this is the true multiplicative inverse.
    pub fn inverse(&self) -> Operator {
        Operator {
            matrix: self.matrix.t().mapv(|z| z.conj()),
            num_qubits: self.num_qubits,
        }
    }

    /// Whether `U · U†` is the identity within `tol` (entrywise).
    pub fn is_unitary(&self, tol: f64) -> bool {
        let product = self.matrix.dot(&self.inverse().matrix);
        let eye = Array2::<Complex64>::eye(self.dim());
        product
            .iter()
            .zip(eye.iter())
            .all(|(a, b)| (a - b).norm() <= tol)
    }

    /// Entrywise approximate equality within `tol`.
    pub fn approx_eq(&self, other: &Operator, tol: f64) -> bool {
        self.num_qubits == other.num_qubits
            && self
                .matrix
                .iter()
                .zip(other.matrix.iter())
                .all(|(a, b)| (a - b).norm() <= tol)
    }
}
