//! Sub-register views: named, non-owning qubit selections.

/// A named selection of qubit slots inside a backing register.
///
/// The view owns no amplitudes. It records the backing register's name, the
/// *absolute* slot indices it covers (today always a contiguous run, stored
/// as an explicit list so non-contiguous selection stays possible), and the
/// register generation observed at creation. A reinitialized register bumps
/// its generation, turning every older view dangling; dangling views fail
/// fast instead of silently addressing a replaced state vector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct View {
    pub(crate) register: String,
    pub(crate) qubits: Vec<usize>,
    pub(crate) generation: u64,
}

impl View {
    /// Name of the backing register.
    pub fn register(&self) -> &str {
        &self.register
    }

    /// Absolute qubit slots of the backing register, in selection order.
    pub fn qubits(&self) -> &[usize] {
        &self.qubits
    }

    /// Number of selected qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }
}
