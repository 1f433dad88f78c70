//! Born-rule measurement and state collapse.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{SimError, SimResult};
use crate::register::Register;

/// The classical outcome of a measurement: one bit per measured qubit,
/// MSB-first in the target's qubit order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Measurement {
    bits: Vec<u8>,
}

impl Measurement {
    pub(crate) fn from_index(index: usize, num_bits: usize) -> Self {
        let bits = (0..num_bits)
            .rev()
            .map(|b| (index >> b & 1) as u8)
            .collect();
        Self { bits }
    }

    /// The outcome bits, MSB-first.
    pub fn bits(&self) -> &[u8] {
        &self.bits
    }

    /// Number of measured qubits.
    pub fn num_bits(&self) -> usize {
        self.bits.len()
    }

    /// The outcome as a basis index.
    pub fn basis_index(&self) -> usize {
        self.bits.iter().fold(0, |acc, &b| acc << 1 | b as usize)
    }

    /// The outcome as a "0"/"1" string, MSB-first.
    pub fn bitstring(&self) -> String {
        self.bits
            .iter()
            .map(|&b| if b == 1 { '1' } else { '0' })
            .collect()
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.bitstring())
    }
}

/// Measure the register slots named by `qubits`, collapsing the state.
///
/// Computes the Born-rule marginal over the active bits (summing |amp|² over
/// spectator patterns), draws one outcome from it, zeroes every amplitude
/// inconsistent with the outcome and rescales the survivors by 1/√p. The
/// probabilities are computed before any mutation, so a failure leaves the
/// register untouched.
pub(crate) fn measure_qubits<R: Rng>(
    register: &mut Register,
    qubits: &[usize],
    rng: &mut R,
) -> SimResult<Measurement> {
    let n = register.num_qubits() as usize;
    let k = qubits.len();
    let weights: Vec<usize> = qubits.iter().map(|&slot| 1 << (n - 1 - slot)).collect();

    // Marginal distribution over the 2^k active-bit patterns.
    let mut probabilities = vec![0.0f64; 1 << k];
    for (index, amplitude) in register.amplitudes().iter().enumerate() {
        probabilities[active_pattern(index, &weights)] += amplitude.norm_sqr();
    }

    let outcome = draw(&probabilities, rng)?;
    let probability = probabilities[outcome];
    if probability <= 0.0 {
        return Err(SimError::ZeroProbabilityCollapse);
    }

    // Collapse: keep only amplitudes whose active bits match the outcome.
    let scale = 1.0 / probability.sqrt();
    for (index, amplitude) in register.amplitudes_mut().iter_mut().enumerate() {
        if active_pattern(index, &weights) == outcome {
            *amplitude *= scale;
        } else {
            *amplitude = num_complex::Complex64::new(0.0, 0.0);
        }
    }

    Ok(Measurement::from_index(outcome, k))
}

/// Active-bit pattern of a basis index, MSB-first in operator-qubit order.
#[inline]
fn active_pattern(index: usize, weights: &[usize]) -> usize {
    weights.iter().fold(0, |acc, &weight| {
        acc << 1 | usize::from(index & weight != 0)
    })
}

/// Sample an index from the distribution by one uniform draw.
fn draw<R: Rng>(probabilities: &[f64], rng: &mut R) -> SimResult<usize> {
    let r: f64 = rng.r#gen();
    let mut cumulative = 0.0;
    for (index, &p) in probabilities.iter().enumerate() {
        cumulative += p;
        if r < cumulative {
            return Ok(index);
        }
    }
    // Rounding can leave the cumulative sum a hair under 1.0; fall back to
    // the last outcome that carries any probability.
    probabilities
        .iter()
        .rposition(|&p| p > 0.0)
        .ok_or(SimError::ZeroProbabilityCollapse)
}
