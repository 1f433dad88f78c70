//! `alsvid-sim` — register state store, operator application and measurement
//! for the Alsvid quantum assembler.
//!
//! A front-end (parser, REPL — not part of this crate) drives a [`Context`]
//! through the instruction surface:
//!
//! | Instruction                    | Call                                  |
//! |--------------------------------|---------------------------------------|
//! | `INITIALIZE R <bits \| n>`     | [`Context::initialize_from_bits`] / [`Context::initialize_zero`] |
//! | `SELECT TO FROM START NUM`     | [`Context::select`]                   |
//! | `U3 CONCAT U1 U2`              | [`Context::concat`]                   |
//! | `U3 TENSOR U1 U2`              | [`Context::tensor`]                   |
//! | `U2 INVERSE U1`                | [`Context::inverse`]                  |
//! | `APPLY U R`                    | [`Context::apply`]                    |
//! | `MEASURE R RES`                | [`Context::measure`]                  |
//!
//! Registers own 2^n-amplitude state vectors (slot 0 = most significant
//! index bit); views address a subset of a register's slots without copying
//! amplitudes; applying a k-qubit operator touches only the addressed
//! amplitudes via the class-partition kernel in [`kernel`]; measurement
//! draws from the Born-rule marginal and collapses the backing state.
//!
//! # Quick start: a Bell pair
//!
//! ```rust
//! use alsvid_op::gates;
//! use alsvid_sim::Context;
//!
//! let ctx = Context::with_seed(7);
//! ctx.initialize_zero("R", 2)?;
//!
//! // Hadamard on slot 0: TENSOR puts the right operand in the more
//! // significant block, so I ⊗-combined with H is kron(H, I).
//! ctx.define_operator("I", gates::identity(1))?;
//! ctx.define_operator("H", gates::hadamard())?;
//! ctx.tensor("H0", "I", "H")?;
//! ctx.apply("H0", "R")?;
//!
//! ctx.define_operator("CX", gates::cnot())?;
//! ctx.apply("CX", "R")?;
//!
//! // Both qubits agree, whichever way the coin lands.
//! let outcome = ctx.measure("R", "RES")?;
//! assert!(outcome.bitstring() == "00" || outcome.bitstring() == "11");
//! # Ok::<(), alsvid_sim::SimError>(())
//! ```

pub mod context;
pub mod error;
pub mod kernel;
pub mod measure;
pub mod register;
pub mod view;

pub use context::Context;
pub use error::{SimError, SimResult};
pub use measure::Measurement;
pub use register::Register;
pub use view::View;
