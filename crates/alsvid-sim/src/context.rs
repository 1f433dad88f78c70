//! The caller-owned context: named registers, views and operators.
//!
//! The original design kept process-wide mutable tables; here every table
//! lives in an explicit [`Context`] value owned by the front-end, so creation
//! and teardown are scoped and two contexts never interfere.

use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::debug;

use alsvid_op::Operator;

use crate::error::{SimError, SimResult};
use crate::kernel;
use crate::measure::{self, Measurement};
use crate::register::Register;
use crate::view::View;

/// A stored register plus its generation counter. Reinitialization bumps the
/// generation, invalidating every view created against the old state.
struct RegisterEntry {
    state: Arc<RwLock<Register>>,
    generation: u64,
}

/// Named tables for one assembler session.
///
/// Registers and views share a namespace (both appear as register operands in
/// instructions); operators have their own. All methods take `&self`:
/// each register sits behind its own lock, so `APPLY`s on distinct backing
/// registers run in parallel while operations on the same register
/// serialize. The measurement draw happens under the register's write lock,
/// so it is atomic with respect to concurrent `APPLY`s.
pub struct Context {
    registers: RwLock<FxHashMap<String, RegisterEntry>>,
    views: RwLock<FxHashMap<String, View>>,
    operators: RwLock<FxHashMap<String, Arc<Operator>>>,
    rng: Mutex<StdRng>,
}

impl Context {
    /// A context with an entropy-seeded random source.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    /// A context with a fixed seed, for reproducible measurement sequences.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            registers: RwLock::new(FxHashMap::default()),
            views: RwLock::new(FxHashMap::default()),
            operators: RwLock::new(FxHashMap::default()),
            rng: Mutex::new(rng),
        }
    }

    // =========================================================================
    // Register/state store
    // =========================================================================

    /// `INITIALIZE name [b0, b1, …]` — a fresh register in the basis state
    /// named by the bits, MSB-first.
    pub fn initialize_from_bits(&self, name: &str, bits: &[u8]) -> SimResult<()> {
        let register = Register::from_bits(bits)?;
        self.insert_register(name, register)
    }

    /// `INITIALIZE name n` — a fresh register of n qubits in |0…0⟩.
    pub fn initialize_zero(&self, name: &str, num_qubits: u32) -> SimResult<()> {
        let register = Register::zero(num_qubits)?;
        self.insert_register(name, register)
    }

    /// Replace an existing register with a basis state from a bit literal.
    /// Every view derived from it becomes dangling.
    pub fn reinitialize_from_bits(&self, name: &str, bits: &[u8]) -> SimResult<()> {
        self.replace_register(name, Register::from_bits(bits)?)
    }

    /// Replace an existing register with |0…0⟩ of `num_qubits` qubits.
    /// Every view derived from it becomes dangling.
    pub fn reinitialize_zero(&self, name: &str, num_qubits: u32) -> SimResult<()> {
        self.replace_register(name, Register::zero(num_qubits)?)
    }

    /// Snapshot of a register's current state.
    pub fn register(&self, name: &str) -> SimResult<Register> {
        let registers = read(&self.registers);
        let entry = registers
            .get(name)
            .ok_or_else(|| SimError::UnknownRegister(name.to_string()))?;
        Ok(read(&entry.state).clone())
    }

    /// Qubit count of a register or view.
    pub fn num_qubits(&self, name: &str) -> SimResult<usize> {
        let (_, qubits) = self.resolve_target(name)?;
        Ok(qubits.len())
    }

    /// The absolute qubit slots a view addresses in its backing register.
    pub fn view_qubits(&self, name: &str) -> SimResult<Vec<usize>> {
        let views = read(&self.views);
        views
            .get(name)
            .map(|v| v.qubits.clone())
            .ok_or_else(|| SimError::UnknownRegister(name.to_string()))
    }

    fn insert_register(&self, name: &str, register: Register) -> SimResult<()> {
        self.check_name_free(name)?;
        let mut registers = write(&self.registers);
        if registers.contains_key(name) {
            return Err(SimError::DuplicateName(name.to_string()));
        }
        registers.insert(
            name.to_string(),
            RegisterEntry {
                state: Arc::new(RwLock::new(register)),
                generation: 0,
            },
        );
        Ok(())
    }

    fn replace_register(&self, name: &str, register: Register) -> SimResult<()> {
        let mut registers = write(&self.registers);
        let entry = registers
            .get_mut(name)
            .ok_or_else(|| SimError::UnknownRegister(name.to_string()))?;
        entry.state = Arc::new(RwLock::new(register));
        entry.generation += 1;
        debug!(register = name, generation = entry.generation, "reinitialized");
        Ok(())
    }

    fn check_name_free(&self, name: &str) -> SimResult<()> {
        if read(&self.registers).contains_key(name) || read(&self.views).contains_key(name) {
            return Err(SimError::DuplicateName(name.to_string()));
        }
        Ok(())
    }

    // =========================================================================
    // Addressing
    // =========================================================================

    /// `SELECT to from start numqbits` — a named view over a contiguous run
    /// of `from`'s qubits. `from` may itself be a view; the selection is
    /// resolved through it to absolute slots of the backing register.
    pub fn select(&self, to: &str, from: &str, start: usize, num_qbits: usize) -> SimResult<()> {
        self.check_name_free(to)?;
        if num_qbits == 0 {
            return Err(SimError::InvalidQubitCount(0));
        }

        let registers = read(&self.registers);
        let (backing, source_qubits, generation) = if let Some(entry) = registers.get(from) {
            let n = read(&entry.state).num_qubits() as usize;
            (from.to_string(), (0..n).collect::<Vec<_>>(), entry.generation)
        } else {
            let views = read(&self.views);
            let view = views
                .get(from)
                .ok_or_else(|| SimError::UnknownRegister(from.to_string()))?;
            self.check_view_fresh(&registers, from, view)?;
            (view.register.clone(), view.qubits.clone(), view.generation)
        };

        if start + num_qbits > source_qubits.len() {
            return Err(SimError::RangeOutOfBounds {
                start,
                len: num_qbits,
                num_qubits: source_qubits.len(),
            });
        }

        let qubits = source_qubits[start..start + num_qbits].to_vec();
        debug!(view = to, register = %backing, ?qubits, "selected");
        write(&self.views).insert(
            to.to_string(),
            View {
                register: backing,
                qubits,
                generation,
            },
        );
        Ok(())
    }

    // =========================================================================
    // Operator table
    // =========================================================================

    /// Bind an operator value to a name.
    pub fn define_operator(&self, name: &str, operator: Operator) -> SimResult<()> {
        let mut operators = write(&self.operators);
        if operators.contains_key(name) {
            return Err(SimError::DuplicateName(name.to_string()));
        }
        operators.insert(name.to_string(), Arc::new(operator));
        Ok(())
    }

    /// Look up a named operator.
    pub fn operator(&self, name: &str) -> SimResult<Arc<Operator>> {
        read(&self.operators)
            .get(name)
            .cloned()
            .ok_or_else(|| SimError::UnknownOperator(name.to_string()))
    }

    /// `dst CONCAT u1 u2` — sequential composition, u2 applied first.
    pub fn concat(&self, dst: &str, u1: &str, u2: &str) -> SimResult<()> {
        let rhs = self.operator(u2)?;
        let result = self.operator(u1)?.concat(&rhs)?;
        self.define_operator(dst, result)
    }

    /// `dst TENSOR u1 u2` — parallel composition; u2 lands in the more
    /// significant qubit block (see [`Operator::tensor`]).
    pub fn tensor(&self, dst: &str, u1: &str, u2: &str) -> SimResult<()> {
        let rhs = self.operator(u2)?;
        let result = self.operator(u1)?.tensor(&rhs);
        self.define_operator(dst, result)
    }

    /// `dst INVERSE u1` — Hermitian adjoint.
    pub fn inverse(&self, dst: &str, u1: &str) -> SimResult<()> {
        let result = self.operator(u1)?.inverse();
        self.define_operator(dst, result)
    }

    // =========================================================================
    // Application engine
    // =========================================================================

    /// `APPLY op target` — mutate the target's backing register in place.
    pub fn apply(&self, op_name: &str, target: &str) -> SimResult<()> {
        let operator = self.operator(op_name)?;
        self.apply_operator(&operator, target)
    }

    /// Apply an operator value (named or not) to a register or view.
    pub fn apply_operator(&self, operator: &Operator, target: &str) -> SimResult<()> {
        let (state, qubits) = self.resolve_target(target)?;
        if qubits.len() != operator.num_qubits() as usize {
            return Err(SimError::ArityMismatch {
                operator: operator.num_qubits(),
                target: target.to_string(),
                target_qubits: qubits.len(),
            });
        }
        let mut register = write(&state);
        debug!(target, ?qubits, arity = operator.num_qubits(), "apply");
        kernel::apply_to_qubits(&mut register, operator, &qubits);
        Ok(())
    }

    // =========================================================================
    // Measurement engine
    // =========================================================================

    /// `MEASURE target res` — draw an outcome from the Born-rule marginal
    /// over the target's qubits, collapse the backing register, and bind the
    /// outcome bits to a new classical register `res`.
    pub fn measure(&self, target: &str, res_name: &str) -> SimResult<Measurement> {
        self.check_name_free(res_name)?;
        let (state, qubits) = self.resolve_target(target)?;

        let outcome = {
            let mut register = write(&state);
            // The draw happens under the register's write lock so concurrent
            // applies never observe a torn state vector.
            let mut rng = self
                .rng
                .lock()
                .unwrap_or_else(PoisonError::into_inner);
            measure::measure_qubits(&mut register, &qubits, &mut *rng)?
        };
        debug!(target, result = %outcome, "measured");

        self.insert_register(res_name, Register::from_bits(outcome.bits())?)?;
        Ok(outcome)
    }

    // =========================================================================
    // Name resolution
    // =========================================================================

    /// Resolve a register-or-view operand to its backing state plus the
    /// absolute qubit slots it addresses.
    fn resolve_target(&self, name: &str) -> SimResult<(Arc<RwLock<Register>>, Vec<usize>)> {
        let registers = read(&self.registers);
        if let Some(entry) = registers.get(name) {
            let n = read(&entry.state).num_qubits() as usize;
            return Ok((entry.state.clone(), (0..n).collect()));
        }

        let views = read(&self.views);
        let view = views
            .get(name)
            .ok_or_else(|| SimError::UnknownRegister(name.to_string()))?;
        let entry = self.check_view_fresh(&registers, name, view)?;
        Ok((entry.state.clone(), view.qubits.clone()))
    }

    /// Fail with `DanglingView` unless the view still matches its backing
    /// register's generation.
    fn check_view_fresh<'a>(
        &self,
        registers: &'a FxHashMap<String, RegisterEntry>,
        view_name: &str,
        view: &View,
    ) -> SimResult<&'a RegisterEntry> {
        let entry = registers
            .get(&view.register)
            .ok_or_else(|| SimError::DanglingView {
                view: view_name.to_string(),
                register: view.register.clone(),
            })?;
        if entry.generation != view.generation {
            return Err(SimError::DanglingView {
                view: view_name.to_string(),
                register: view.register.clone(),
            });
        }
        Ok(entry)
    }
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

fn read<T>(lock: &RwLock<T>) -> std::sync::RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> std::sync::RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}

#[cfg(test)]
mod tests {
    use super::*;
    use alsvid_op::gates;

    #[test]
    fn test_initialize_and_duplicate_names() {
        let ctx = Context::with_seed(0);
        ctx.initialize_zero("R", 2).unwrap();
        assert!(matches!(
            ctx.initialize_zero("R", 3),
            Err(SimError::DuplicateName(name)) if name == "R"
        ));
        assert!(matches!(
            ctx.initialize_from_bits("R", &[0, 1]),
            Err(SimError::DuplicateName(_))
        ));

        let r = ctx.register("R").unwrap();
        assert_eq!(r.num_qubits(), 2);
        assert_eq!(r.probability(0), 1.0);
    }

    #[test]
    fn test_unknown_names() {
        let ctx = Context::with_seed(0);
        assert!(matches!(
            ctx.register("missing"),
            Err(SimError::UnknownRegister(_))
        ));
        assert!(matches!(
            ctx.apply("U", "missing"),
            Err(SimError::UnknownOperator(_))
        ));
        ctx.define_operator("U", gates::hadamard()).unwrap();
        assert!(matches!(
            ctx.apply("U", "missing"),
            Err(SimError::UnknownRegister(_))
        ));
    }

    #[test]
    fn test_select_resolves_absolute_slots() {
        let ctx = Context::with_seed(0);
        ctx.initialize_zero("R", 8).unwrap();
        ctx.select("S", "R", 2, 3).unwrap();
        assert_eq!(ctx.view_qubits("S").unwrap(), vec![2, 3, 4]);
        assert_eq!(ctx.num_qubits("S").unwrap(), 3);

        // Selecting from a view resolves through the parent chain.
        ctx.select("S2", "S", 1, 2).unwrap();
        assert_eq!(ctx.view_qubits("S2").unwrap(), vec![3, 4]);
    }

    #[test]
    fn test_select_range_boundaries() {
        let ctx = Context::with_seed(0);
        ctx.initialize_zero("R", 8).unwrap();
        // start + numqbits == n is the last valid selection.
        ctx.select("S_ok", "R", 6, 2).unwrap();
        // One past the end must fail.
        assert!(matches!(
            ctx.select("S_far", "R", 6, 3),
            Err(SimError::RangeOutOfBounds {
                start: 6,
                len: 3,
                num_qubits: 8
            })
        ));
        assert!(matches!(
            ctx.select("S_none", "R", 0, 0),
            Err(SimError::InvalidQubitCount(0))
        ));
    }

    #[test]
    fn test_apply_through_view_leaves_spectators() {
        let ctx = Context::with_seed(0);
        ctx.initialize_from_bits("R", &[1, 0, 0]).unwrap();
        ctx.select("S", "R", 1, 1).unwrap();
        ctx.define_operator("H", gates::hadamard()).unwrap();
        ctx.apply("H", "S").unwrap();

        let r = ctx.register("R").unwrap();
        // Slot 0 still reads 1; slot 1 is in superposition.
        assert!((r.probability(0b100) - 0.5).abs() < 1e-12);
        assert!((r.probability(0b110) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_apply_arity_mismatch() {
        let ctx = Context::with_seed(0);
        ctx.initialize_zero("R", 3).unwrap();
        ctx.define_operator("CX", gates::cnot()).unwrap();
        assert!(matches!(
            ctx.apply("CX", "R"),
            Err(SimError::ArityMismatch {
                operator: 2,
                target_qubits: 3,
                ..
            })
        ));
        // The state was not touched.
        assert_eq!(ctx.register("R").unwrap().probability(0), 1.0);
    }

    #[test]
    fn test_named_combinators() {
        let ctx = Context::with_seed(0);
        ctx.define_operator("H", gates::hadamard()).unwrap();
        ctx.define_operator("I", gates::identity(1)).unwrap();
        ctx.concat("HH", "H", "H").unwrap();
        assert!(ctx.operator("HH").unwrap().approx_eq(&gates::identity(1), 1e-12));

        // TENSOR: the right operand takes the more significant block, so
        // kron(H, I) puts Hadamard on slot 0.
        ctx.tensor("U", "I", "H").unwrap();
        assert_eq!(ctx.operator("U").unwrap().num_qubits(), 2);

        ctx.inverse("Hd", "H").unwrap();
        assert!(ctx.operator("Hd").unwrap().approx_eq(&gates::hadamard(), 1e-12));

        assert!(matches!(
            ctx.concat("bad", "H", "missing"),
            Err(SimError::UnknownOperator(_))
        ));
        assert!(matches!(
            ctx.define_operator("H", gates::hadamard()),
            Err(SimError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_concat_arity_mismatch_propagates() {
        let ctx = Context::with_seed(0);
        ctx.define_operator("H", gates::hadamard()).unwrap();
        ctx.define_operator("CX", gates::cnot()).unwrap();
        assert!(matches!(
            ctx.concat("bad", "H", "CX"),
            Err(SimError::Op(alsvid_op::OpError::ArityMismatch { .. }))
        ));
    }

    #[test]
    fn test_reinitialize_dangles_views() {
        let ctx = Context::with_seed(0);
        ctx.initialize_zero("R", 4).unwrap();
        ctx.select("S", "R", 0, 2).unwrap();
        ctx.define_operator("I2", gates::identity(2)).unwrap();
        ctx.apply("I2", "S").unwrap();

        ctx.reinitialize_zero("R", 4).unwrap();
        assert!(matches!(
            ctx.apply("I2", "S"),
            Err(SimError::DanglingView { view, register })
                if view == "S" && register == "R"
        ));
        assert!(matches!(
            ctx.measure("S", "RES"),
            Err(SimError::DanglingView { .. })
        ));
        // A fresh selection against the new state works again.
        ctx.select("S_new", "R", 0, 2).unwrap();
        ctx.apply("I2", "S_new").unwrap();
    }

    #[test]
    fn test_reinitialize_requires_existing_register() {
        let ctx = Context::with_seed(0);
        assert!(matches!(
            ctx.reinitialize_zero("R", 2),
            Err(SimError::UnknownRegister(_))
        ));
    }

    #[test]
    fn test_measure_writes_result_register() {
        let ctx = Context::with_seed(0);
        ctx.initialize_from_bits("R", &[1, 1]).unwrap();
        let m = ctx.measure("R", "RES").unwrap();
        assert_eq!(m.bits(), &[1, 1]);

        let res = ctx.register("RES").unwrap();
        assert_eq!(res.num_qubits(), 2);
        assert_eq!(res.probability(3), 1.0);

        // The result name is now taken.
        assert!(matches!(
            ctx.measure("R", "RES"),
            Err(SimError::DuplicateName(_))
        ));
    }

    #[test]
    fn test_seeded_measurements_reproduce() {
        let run = |seed: u64| -> Vec<String> {
            let ctx = Context::with_seed(seed);
            ctx.define_operator("H", gates::hadamard()).unwrap();
            (0..10)
                .map(|i| {
                    let reg = format!("R{i}");
                    let res = format!("RES{i}");
                    ctx.initialize_zero(&reg, 1).unwrap();
                    ctx.apply("H", &reg).unwrap();
                    ctx.measure(&reg, &res).unwrap().bitstring()
                })
                .collect()
        };
        assert_eq!(run(1234), run(1234));
    }
}
