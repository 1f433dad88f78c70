//! Quantum register: an owned amplitude vector over n qubit slots.

use num_complex::Complex64;

use crate::error::{SimError, SimResult};

/// An n-qubit register owning its 2^n amplitude vector.
///
/// Basis indexing is MSB-first: qubit slot 0 is the most significant bit of
/// the amplitude index. Outside a running `APPLY` the vector always has unit
/// L2 norm.
#[derive(Debug, Clone, PartialEq)]
pub struct Register {
    amplitudes: Vec<Complex64>,
    num_qubits: u32,
}

impl Register {
    /// A register of `num_qubits` qubits in |0…0⟩.
    pub fn zero(num_qubits: u32) -> SimResult<Self> {
        if num_qubits == 0 {
            return Err(SimError::InvalidQubitCount(0));
        }
        Ok(Self::basis_state(num_qubits, 0))
    }

    /// A register in the computational basis state named by `bits`,
    /// MSB-first: `[1, 0]` is |10⟩, amplitude index 2.
    pub fn from_bits(bits: &[u8]) -> SimResult<Self> {
        if bits.is_empty() {
            return Err(SimError::InvalidQubitCount(0));
        }
        let mut index = 0usize;
        for (position, &value) in bits.iter().enumerate() {
            if value > 1 {
                return Err(SimError::InvalidBitLiteral { value, position });
            }
            index = index << 1 | value as usize;
        }
        Ok(Self::basis_state(bits.len() as u32, index))
    }

    pub(crate) fn basis_state(num_qubits: u32, index: usize) -> Self {
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); 1 << num_qubits];
        amplitudes[index] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Number of qubit slots.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Amplitude vector length (2^n).
    #[inline]
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    /// The amplitude vector, basis-index order.
    #[inline]
    pub fn amplitudes(&self) -> &[Complex64] {
        &self.amplitudes
    }

    #[inline]
    pub(crate) fn amplitudes_mut(&mut self) -> &mut [Complex64] {
        &mut self.amplitudes
    }

    /// Squared L2 norm of the amplitude vector.
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    /// Born-rule probability of observing basis state `index` on a full
    /// measurement.
    pub fn probability(&self, index: usize) -> f64 {
        self.amplitudes[index].norm_sqr()
    }
}
