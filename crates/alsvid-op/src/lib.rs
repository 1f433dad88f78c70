//! `alsvid-op` — unitary operator algebra for the Alsvid quantum assembler.
//!
//! Operators are immutable 2^k × 2^k complex matrices together with their
//! declared arity k. They are pure values: building one never touches any
//! register state, so combinator evaluation is freely parallelisable and a
//! single operator can back any number of applications.
//!
//! Three combinators mirror the assembler surface:
//!
//! - [`Operator::concat`] — sequential composition (left operand last)
//! - [`Operator::tensor`] — parallel composition; the *right* operand lands
//!   in the more significant qubit block (see the method docs — this
//!   operand order is part of the instruction set contract)
//! - [`Operator::inverse`] — Hermitian adjoint
//!
//! # Quick start
//!
//! ```rust
//! use alsvid_op::{Operator, gates};
//!
//! // H then H is the identity.
//! let h = gates::hadamard();
//! let hh = h.concat(&h).unwrap();
//! assert!(hh.approx_eq(&gates::identity(1), 1e-12));
//!
//! // CNOT is self-inverse.
//! let cx = gates::cnot();
//! assert!(cx.inverse().approx_eq(&cx, 1e-12));
//! ```

pub mod error;
pub mod gates;
pub mod operator;

pub use error::{OpError, OpResult};
pub use operator::Operator;
