//! Primitive gate constructors.
//!
//! Every constructor returns a fresh [`Operator`]; callers that want a named,
//! reusable entry register the result in their context table.

use ndarray::{Array2, array};
use num_complex::Complex64;
use std::f64::consts::PI;

use crate::operator::Operator;

/// Identity on `num_qubits` qubits (`G_I` and its wider `G_I_n` variants).
///
/// # Panics
///
/// Panics if `num_qubits` is 0.
pub fn identity(num_qubits: u32) -> Operator {
    assert!(num_qubits >= 1, "identity needs at least one qubit");
    let dim = 1usize << num_qubits;
    Operator::from_matrix(Array2::eye(dim)).expect("identity dimension is a power of two")
}

/// Hadamard gate: |0⟩ → (|0⟩+|1⟩)/√2, |1⟩ → (|0⟩−|1⟩)/√2.
pub fn hadamard() -> Operator {
    let h = Complex64::new(1.0 / 2.0_f64.sqrt(), 0.0);
    Operator::from_matrix(array![[h, h], [h, -h]]).expect("2x2 is a valid operator shape")
}

/// Diagonal phase gate diag(1, e^{iθ}): identity on |0⟩, phase θ on |1⟩.
pub fn phase_shift(theta: f64) -> Operator {
    let one = Complex64::new(1.0, 0.0);
    let zero = Complex64::new(0.0, 0.0);
    Operator::from_matrix(array![[one, zero], [zero, Complex64::from_polar(1.0, theta)]])
        .expect("2x2 is a valid operator shape")
}

/// The `G_R_k` family: a phase of π/k on |1⟩. `r_k(2)` is the S gate,
/// `r_k(4)` the T gate.
pub fn r_k(k: u32) -> Operator {
    assert!(k >= 1, "phase divisor must be at least 1");
    phase_shift(PI / f64::from(k))
}

/// Controlled-NOT. The first (more significant) qubit is the control, the
/// second the target: |10⟩ ↔ |11⟩, |00⟩ and |01⟩ untouched.
pub fn cnot() -> Operator {
    let o = Complex64::new(1.0, 0.0);
    let z = Complex64::new(0.0, 0.0);
    Operator::from_matrix(array![
        [o, z, z, z],
        [z, o, z, z],
        [z, z, z, o],
        [z, z, o, z],
    ])
    .expect("4x4 is a valid operator shape")
}

/// Quantum Fourier transform on `num_qubits` qubits:
/// F[j][k] = ω^{jk} / √dim with ω = e^{2πi/dim}.
pub fn qft(num_qubits: u32) -> Operator {
    assert!(num_qubits >= 1, "QFT needs at least one qubit");
    let dim = 1usize << num_qubits;
    let scale = 1.0 / (dim as f64).sqrt();
    let matrix = Array2::from_shape_fn((dim, dim), |(j, k)| {
        Complex64::from_polar(scale, 2.0 * PI * ((j * k) % dim) as f64 / dim as f64)
    });
    Operator::from_matrix(matrix).expect("QFT dimension is a power of two")
}

/// Inverse quantum Fourier transform (`G_QFTI_n`), the adjoint of [`qft`].
pub fn qft_inverse(num_qubits: u32) -> Operator {
    qft(num_qubits).inverse()
}

/// Order-finding unitary `G_Uf_a_n` for Shor-style circuits:
/// |i⟩|0⟩ → |i⟩|a^i mod n⟩.
///
/// The target block is ⌈log2(n+1)⌉ qubits wide and the exponent block twice
/// that, so the operator arity is 3·⌈log2(n+1)⌉. Only the |0⟩-target columns
/// are populated; the matrix is a partial isometry, not a full unitary.
pub fn modular_pow(a: u64, n: u64) -> Operator {
    assert!(n >= 2, "modulus must be at least 2");
    let target_bits = min_bit_size(n);
    let exponent_bits = target_bits * 2;

    let dim = 1usize << (target_bits + exponent_bits);
    let target_dim = 1u64 << target_bits;
    let exponent_dim = 1u64 << exponent_bits;

    let mut matrix = Array2::zeros((dim, dim));
    for i in 0..exponent_dim {
        let f = mod_power(a, i, n);
        let base = (i * target_dim) as usize;
        matrix[(base + f as usize, base)] = Complex64::new(1.0, 0.0);
    }
    Operator::from_matrix(matrix).expect("modular_pow dimension is a power of two")
}

/// Number of bits needed to hold values 0..=n.
fn min_bit_size(n: u64) -> u32 {
    64 - n.leading_zeros()
}

/// a^x mod n by square-and-multiply.
fn mod_power(a: u64, mut x: u64, n: u64) -> u64 {
    let mut base = a % n;
    let mut result = 1u64;
    while x > 0 {
        if x & 1 == 1 {
            result = result * base % n;
        }
        base = base * base % n;
        x >>= 1;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOL: f64 = 1e-12;

    #[test]
    fn test_hadamard_is_self_inverse() {
        let h = hadamard();
        assert!(h.concat(&h).unwrap().approx_eq(&identity(1), TOL));
    }

    #[test]
    fn test_phase_gates() {
        // G_R_2 puts e^{iπ/2} = i on |1⟩, G_R_4 puts e^{iπ/4}.
        let s = r_k(2);
        assert!((s.matrix()[(1, 1)] - Complex64::new(0.0, 1.0)).norm() < TOL);

        let t = r_k(4);
        let expected = Complex64::from_polar(1.0, PI / 4.0);
        assert!((t.matrix()[(1, 1)] - expected).norm() < TOL);

        // T² = S.
        assert!(t.concat(&t).unwrap().approx_eq(&s, TOL));
    }

    #[test]
    fn test_cnot_permutes_controlled_block() {
        let cx = cnot();
        let m = cx.matrix();
        assert_eq!(m[(2, 3)], Complex64::new(1.0, 0.0));
        assert_eq!(m[(3, 2)], Complex64::new(1.0, 0.0));
        assert_eq!(m[(0, 0)], Complex64::new(1.0, 0.0));
        assert_eq!(m[(2, 2)], Complex64::new(0.0, 0.0));
    }

    #[test]
    fn test_qft_single_qubit_is_hadamard() {
        assert!(qft(1).approx_eq(&hadamard(), TOL));
    }

    #[test]
    fn test_qft_inverse_roundtrip() {
        for n in 1..=3 {
            let roundtrip = qft(n).concat(&qft_inverse(n)).unwrap();
            assert!(roundtrip.approx_eq(&identity(n), 1e-10));
        }
    }

    #[test]
    fn test_modular_pow_layout() {
        // a = 2, n = 3: two target bits, four exponent bits, 6-qubit operator.
        let u = modular_pow(2, 3);
        assert_eq!(u.num_qubits(), 6);
        let m = u.matrix();
        // |0⟩|00⟩ → |0⟩|2^0 mod 3⟩ = |0⟩|01⟩.
        assert_eq!(m[(1, 0)], Complex64::new(1.0, 0.0));
        // |15⟩|00⟩ → |15⟩|2^15 mod 3⟩ = |15⟩|10⟩.
        assert_eq!(m[(62, 60)], Complex64::new(1.0, 0.0));
    }

    #[test]
    fn test_min_bit_size() {
        assert_eq!(min_bit_size(1), 1);
        assert_eq!(min_bit_size(2), 2);
        assert_eq!(min_bit_size(15), 4);
        assert_eq!(min_bit_size(100), 7);
    }

    #[test]
    fn test_mod_power() {
        assert_eq!(mod_power(2, 10, 1000), 24);
        assert_eq!(mod_power(3, 0, 7), 1);
        assert_eq!(mod_power(5, 3, 13), 8);
    }
}
