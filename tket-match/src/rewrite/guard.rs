//! Refuse rewrites that silently permute qubit identity.
//!
//! Replacements are compared to the fragment they replace after rebasing both
//! to the canonical gate set {CX, Rz, Rx}. A replacement is refused if it
//! contains a swap-like permutation, or if its ordered list of boundary qubits
//! differs from the original one.

use derive_more::{Display, Error};
use itertools::Itertools;

use super::REWRITE_TARGET;
use crate::circuit::{Circuit, LineScope, QubitIndex};
use crate::passes::rebase_to_canonical;
use crate::TketOp;

/// Reasons for refusing a replacement.
#[derive(Debug, Clone, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum GuardViolation {
    /// Three CX gates swap the state of two qubits.
    #[display("replacement swaps qubits {a} and {b}")]
    SwapLikePermutation {
        /// The first swapped qubit.
        a: QubitIndex,
        /// The second swapped qubit.
        b: QubitIndex,
    },
    /// The boundary qubits were reordered or changed.
    #[display("boundary qubits changed from {expected:?} to {actual:?}")]
    BoundaryMismatch {
        /// The boundary of the original fragment.
        expected: Vec<QubitIndex>,
        /// The boundary of the replacement.
        actual: Vec<QubitIndex>,
    },
}

/// Checks that replacements keep the qubit identity of the fragment they
/// replace.
#[derive(Debug, Clone, Copy, Default)]
pub struct EquivalenceGuard;

impl EquivalenceGuard {
    /// Check a replacement against the original fragment.
    pub fn check(&self, original: &Circuit, replacement: &Circuit) -> Result<(), GuardViolation> {
        let original = rebase_to_canonical(original);
        let replacement = rebase_to_canonical(replacement);

        if let Some((a, b)) = find_swap(&replacement) {
            return Err(GuardViolation::SwapLikePermutation { a, b });
        }
        if original.qubits() != replacement.qubits() {
            return Err(GuardViolation::BoundaryMismatch {
                expected: original.qubits().to_vec(),
                actual: replacement.qubits().to_vec(),
            });
        }
        Ok(())
    }

    /// Keep the candidate replacements that pass [`EquivalenceGuard::check`].
    ///
    /// Refused candidates are logged at debug level.
    pub fn guarded(&self, original: &Circuit, candidates: Vec<Circuit>) -> Vec<Circuit> {
        candidates
            .into_iter()
            .filter(|candidate| match self.check(original, candidate) {
                Ok(()) => true,
                Err(violation) => {
                    tracing::debug!(target: REWRITE_TARGET, %violation, "refusing replacement");
                    false
                }
            })
            .collect_vec()
    }
}

/// Find CX(a, b) CX(b, a) CX(a, b) with the three gates consecutive on both
/// qubits.
fn find_swap(circ: &Circuit) -> Option<(QubitIndex, QubitIndex)> {
    let scope = LineScope::new(circ);
    let is_cx_on = |node: usize, ctrl: QubitIndex, tgt: QubitIndex| {
        let cmd = &circ.commands()[node];
        cmd.op() == TketOp::CX && cmd.qubits() == [ctrl, tgt]
    };
    let next_on_both = |node: usize, a: QubitIndex, b: QubitIndex| {
        let next = scope.next_on_line(node, a)?;
        (scope.next_on_line(node, b)? == next).then_some(next)
    };

    circ.commands()
        .iter()
        .enumerate()
        .filter(|(_, cmd)| cmd.op() == TketOp::CX)
        .find_map(|(node, cmd)| {
            let [a, b] = [cmd.qubits()[0], cmd.qubits()[1]];
            let second = next_on_both(node, a, b).filter(|&n| is_cx_on(n, b, a))?;
            next_on_both(second, a, b)
                .filter(|&n| is_cx_on(n, a, b))
                .map(|_| (a, b))
        })
}
