//! The application kernel: a k-qubit operator acting on k of n qubits.

use num_complex::Complex64;

use alsvid_op::Operator;

use crate::register::Register;

/// Apply `op` in place to the register slots named by `qubits`.
///
/// `qubits[j]` is the register slot addressed by operator qubit j, so the
/// list order defines the operator's row/column layout (MSB-first, matching
/// the CNOT control-first convention).
///
/// The 2^n basis indices split into 2^(n−k) classes by spectator-bit
/// pattern. Each class holds 2^k amplitudes — one per active-bit pattern —
/// and is replaced by `matrix(op) ·` (that 2^k-vector). Only 2^k-sized
/// scratch buffers are allocated; the full 2^n × 2^n expansion never
/// materializes. Unitary `op` preserves the global norm exactly.
///
/// # Panics
///
/// Panics if `qubits.len()` differs from the operator arity, a slot is out
/// of range, or a slot repeats. [`crate::Context::apply`] validates these
/// and reports errors instead.
pub fn apply_to_qubits(register: &mut Register, op: &Operator, qubits: &[usize]) {
    let n = register.num_qubits() as usize;
    let k = qubits.len();
    assert_eq!(k, op.num_qubits() as usize, "operator arity mismatch");
    assert!(qubits.iter().all(|&slot| slot < n), "qubit slot out of range");
    let class_dim = 1usize << k;

    // Register-index weight of each operator qubit (slot 0 = MSB).
    let weights: Vec<usize> = qubits.iter().map(|&slot| 1 << (n - 1 - slot)).collect();
    let active_mask: usize = weights.iter().sum();
    assert_eq!(active_mask.count_ones() as usize, k, "duplicate qubit slot");

    // Bit positions of the spectator qubits, low to high.
    let spectators: Vec<usize> = (0..n).filter(|b| active_mask & (1 << b) == 0).collect();

    let matrix = op.matrix();
    let amplitudes = register.amplitudes_mut();
    let mut indices = vec![0usize; class_dim];
    let mut input = vec![Complex64::new(0.0, 0.0); class_dim];

    for class in 0..1usize << (n - k) {
        // Scatter the class number into the spectator bit positions.
        let mut base = 0usize;
        for (t, &position) in spectators.iter().enumerate() {
            if class & (1 << t) != 0 {
                base |= 1 << position;
            }
        }

        // Gather the class amplitudes, indexed by active-bit pattern.
        for active in 0..class_dim {
            let mut index = base;
            for (j, &weight) in weights.iter().enumerate() {
                if active & (1 << (k - 1 - j)) != 0 {
                    index |= weight;
                }
            }
            indices[active] = index;
            input[active] = amplitudes[index];
        }

        // Scatter matrix(op) · input back into the state vector.
        for row in 0..class_dim {
            let mut acc = Complex64::new(0.0, 0.0);
            for col in 0..class_dim {
                acc += matrix[(row, col)] * input[col];
            }
            amplitudes[indices[row]] = acc;
        }
    }
}
