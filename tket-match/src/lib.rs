//! Streaming pattern matching and local rewriting of quantum circuits.
//!
//! Patterns are described by [`CircuitMatcher`]s: small state machines that
//! are fed the operations of a circuit one at a time, in topological order.
//! Every candidate occurrence of a pattern (an "attempt") carries its own
//! state, and the matcher decides for each operation whether the attempt
//! proceeds, skips the operation, stops or completes.
//!
//! Completed matches are handed to a [`CircuitReplacer`], which proposes
//! equivalent replacement fragments. Replacers built on local resynthesis
//! are protected by an [`EquivalenceGuard`] that refuses replacements
//! permuting the qubits of the fragment.
//!
//! The [`gadgets`] module contains a library of ready-made rewriters.
//!
//! # Example
//!
//! ```
//! use tket_match::circuit::build_simple_circuit;
//! use tket_match::gadgets::cx_gadget;
//! use tket_match::{Rewriter, TketOp};
//!
//! let circ = build_simple_circuit(3, |circ| {
//!     circ.append(TketOp::CX, [0, 1])?;
//!     circ.append(TketOp::CX, [1, 2])?;
//!     circ.append(TketOp::CX, [0, 2])?;
//!     Ok(())
//! })
//! .unwrap();
//!
//! let rewrites = cx_gadget().get_rewrites(&circ).unwrap();
//! assert_eq!(rewrites.len(), 1);
//! assert_eq!(rewrites[0].node_count_delta(), -1);
//! ```
//!
//! [`CircuitMatcher`]: rewrite::matcher::CircuitMatcher
//! [`CircuitReplacer`]: rewrite::replacer::CircuitReplacer
//! [`EquivalenceGuard`]: rewrite::guard::EquivalenceGuard

pub mod circuit;
pub mod gadgets;
pub(crate) mod ops;
pub mod passes;
pub mod rewrite;
pub mod subcircuit;

mod utils;

pub use circuit::{Circuit, LineScope};
pub use ops::{parse_op, NotTketOp, TketOp};
pub use rewrite::matcher::LOG_TARGET;
pub use rewrite::{CircuitRewrite, Rewriter, REWRITE_TARGET};
pub use subcircuit::Subcircuit;
