//! A library of small rewrite rules.
//!
//! Each gadget pairs a [`CircuitMatcher`] with a [`CircuitReplacer`] in a
//! [`MatchReplaceRewriter`]:
//!
//!  - [`cx_gadget`] cancels one CX out of a `CX(c, m) CX(m, t) CX(c, t)` triple,
//!  - [`zzphase_flip`] merges `CX Rz CX` into a single `ZZPhase`,
//!  - [`kak_gadget`] resynthesises the gates between two CX on the same pair of
//!    qubits,
//!  - [`squash3_gadget`] resynthesises blocks acting on three qubits.
//!
//! [`CircuitMatcher`]: crate::rewrite::matcher::CircuitMatcher

pub mod cx_gadget;
pub mod kak;
pub mod three_qubit;
pub mod zz_phase;

pub use cx_gadget::{CXGadgetMatcher, CXGadgetReplacer};
pub use kak::TwoQubitSquashMatcher;
pub use three_qubit::ThreeQubitBoundaryMatcher;
pub use zz_phase::{ZZPhaseMatcher, ZZPhaseReplacer};

use crate::circuit::{Circuit, QubitIndex};
use crate::passes::{PeepholeSquash, Resynthesise, SquashOptions};
use crate::rewrite::guard::EquivalenceGuard;
use crate::rewrite::replacer::CircuitReplacer;
use crate::rewrite::{MatchReplaceRewriter, Rewriter};

/// Replace a fragment by its resynthesised versions.
///
/// Only candidates with fewer multi-qubit gates, or as many multi-qubit gates
/// and fewer gates overall, are kept. They must then pass the
/// [`EquivalenceGuard`].
#[derive(Debug, Clone, Default)]
pub struct SquashReplacer<R = PeepholeSquash> {
    resynthesiser: R,
    guard: EquivalenceGuard,
}

impl SquashReplacer {
    /// A replacer using the [`PeepholeSquash`] pass.
    pub fn new() -> Self {
        Self::default()
    }

    /// A replacer using the [`PeepholeSquash`] pass with the given options.
    pub fn with_options(options: SquashOptions) -> Self {
        Self::with_resynthesiser(PeepholeSquash::new(options))
    }
}

impl<R: Resynthesise> SquashReplacer<R> {
    /// A replacer using a custom resynthesis.
    pub fn with_resynthesiser(resynthesiser: R) -> Self {
        Self {
            resynthesiser,
            guard: EquivalenceGuard,
        }
    }

    fn squash(&self, fragment: &Circuit) -> Vec<Circuit> {
        let candidates = self
            .resynthesiser
            .resynthesise(fragment)
            .into_iter()
            .filter(|cand| gate_counts(cand) < gate_counts(fragment))
            .collect();
        self.guard.guarded(fragment, candidates)
    }
}

impl<R: Resynthesise> CircuitReplacer<(QubitIndex, QubitIndex)> for SquashReplacer<R> {
    fn replace_match(
        &self,
        fragment: &Circuit,
        (ctrl, tgt): (QubitIndex, QubitIndex),
    ) -> Vec<Circuit> {
        if !fragment.qubits().contains(&ctrl) || !fragment.qubits().contains(&tgt) {
            return Vec::new();
        }
        self.squash(fragment)
    }
}

impl<R: Resynthesise> CircuitReplacer<[QubitIndex; 3]> for SquashReplacer<R> {
    fn replace_match(&self, fragment: &Circuit, ports: [QubitIndex; 3]) -> Vec<Circuit> {
        if fragment.qubits() != ports {
            return Vec::new();
        }
        self.squash(fragment)
    }
}

/// Number of multi-qubit operations and total number of operations.
fn gate_counts(circ: &Circuit) -> (usize, usize) {
    (circ.num_multi_qubit_operations(), circ.num_operations())
}

/// Rewriter cancelling one CX out of a CX triple.
pub fn cx_gadget() -> MatchReplaceRewriter<CXGadgetMatcher, CXGadgetReplacer> {
    MatchReplaceRewriter::new(CXGadgetMatcher, CXGadgetReplacer).with_name("CX gadget")
}

/// Rewriter merging `CX Rz CX` into `ZZPhase`.
pub fn zzphase_flip() -> MatchReplaceRewriter<ZZPhaseMatcher, ZZPhaseReplacer> {
    MatchReplaceRewriter::new(ZZPhaseMatcher, ZZPhaseReplacer).with_name("ZZPhase flip")
}

/// Rewriter resynthesising two-qubit blocks bracketed by CX gates.
pub fn kak_gadget() -> MatchReplaceRewriter<TwoQubitSquashMatcher, SquashReplacer> {
    MatchReplaceRewriter::new(TwoQubitSquashMatcher, SquashReplacer::new())
        .with_name("2-qubit squash")
}

/// Rewriter resynthesising three-qubit blocks.
pub fn squash3_gadget() -> MatchReplaceRewriter<ThreeQubitBoundaryMatcher, SquashReplacer> {
    MatchReplaceRewriter::new(ThreeQubitBoundaryMatcher, SquashReplacer::new())
        .with_name("3-qubit squash")
}

/// All the rewriters of the library.
pub fn all_gadgets() -> Vec<Box<dyn Rewriter + Send + Sync>> {
    vec![
        Box::new(cx_gadget()),
        Box::new(zzphase_flip()),
        Box::new(kak_gadget()),
        Box::new(squash3_gadget()),
    ]
}
