//! Transform circuits using rewrite rules.

pub mod guard;
pub mod matcher;
pub mod replacer;

use derive_more::{Display, Error};
use itertools::Itertools;
use smol_str::SmolStr;

use matcher::{CircuitMatcher, MatchError, MatchingOptions};
use replacer::CircuitReplacer;

use crate::circuit::{Circuit, LineScope, QubitIndex};
pub use crate::Subcircuit;

/// Tracing target for rewrite construction events.
pub const REWRITE_TARGET: &str = "tket_match::rewrite";

/// A rewrite rule for circuits.
///
/// The following invariants hold:
///  - the subcircuit is not empty
///  - the subcircuit is convex
///  - the replacement acts on the qubits of the subcircuit, in the order in
///    which the subcircuit first acts on them
#[derive(Debug, Clone, PartialEq)]
pub struct CircuitRewrite {
    subcircuit: Subcircuit,
    replacement: Circuit,
    name: SmolStr,
}

impl CircuitRewrite {
    /// Create a new rewrite rule.
    pub fn try_new(
        subcircuit: Subcircuit,
        scope: &LineScope,
        replacement: Circuit,
    ) -> Result<Self, InvalidRewrite> {
        if subcircuit.is_empty() {
            return Err(InvalidRewrite::EmptySubcircuit);
        }
        if !scope.is_convex(&subcircuit) {
            return Err(InvalidRewrite::NonConvexSubcircuit);
        }
        let expected = subcircuit.qubits(scope);
        if expected != replacement.qubits() {
            return Err(InvalidRewrite::BoundaryMismatch {
                expected,
                actual: replacement.qubits().to_vec(),
            });
        }
        Ok(Self {
            subcircuit,
            replacement,
            name: SmolStr::default(),
        })
    }

    /// Set the name of the rule that produced the rewrite.
    pub fn with_name(self, name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Number of nodes added or removed by the rewrite.
    ///
    /// The difference between the new number of nodes minus the old. A positive
    /// number is an increase in node count, a negative number is a decrease.
    pub fn node_count_delta(&self) -> isize {
        self.replacement.num_operations() as isize - self.subcircuit.node_count() as isize
    }

    /// The subcircuit that is replaced.
    pub fn subcircuit(&self) -> &Subcircuit {
        &self.subcircuit
    }

    /// The replacement subcircuit.
    pub fn replacement(&self) -> &Circuit {
        &self.replacement
    }

    /// The name of the rule that produced the rewrite.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns a set of nodes referenced by the rewrite. Modifying any these
    /// nodes will invalidate it.
    ///
    /// Two `CircuitRewrite`s can be composed if their invalidation sets are
    /// disjoint.
    #[inline]
    pub fn invalidation_set(&self) -> impl Iterator<Item = usize> + '_ {
        self.subcircuit.nodes()
    }
}

/// Generate rewrite rules for circuits.
pub trait Rewriter {
    /// Get the rewrite rules for a circuit.
    fn get_rewrites(&self, circ: &Circuit) -> Result<Vec<CircuitRewrite>, MatchError>;
}

/// An error that can occur when constructing a rewrite rule.
#[derive(Debug, Clone, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum InvalidRewrite {
    /// The LHS subcircuit is not convex.
    #[display("The LHS subcircuit is not convex.")]
    NonConvexSubcircuit,
    /// The LHS subcircuit is empty.
    #[display("The LHS subcircuit is empty.")]
    EmptySubcircuit,
    /// The left and right hand sides act on different qubits.
    #[display("The left and right hand sides have mismatched boundaries: expected {expected:?}, got {actual:?}.")]
    BoundaryMismatch {
        /// The qubits of the subcircuit.
        expected: Vec<QubitIndex>,
        /// The qubits of the replacement.
        actual: Vec<QubitIndex>,
    },
}

/// A rewriter made of a [`CircuitMatcher`] and a [`CircuitReplacer`].
///
/// The [`CircuitMatcher`] is used to find matches in the circuit, and the
/// [`CircuitReplacer`] is used to create [`CircuitRewrite`]s for each match.
#[derive(Clone, Debug)]
pub struct MatchReplaceRewriter<C, R> {
    matcher: C,
    replacer: R,
    name: SmolStr,
    options: MatchingOptions,
}

impl<C, R> MatchReplaceRewriter<C, R> {
    /// Create a new [`MatchReplaceRewriter`].
    pub fn new(matcher: C, replacement: R) -> Self {
        Self {
            matcher,
            replacer: replacement,
            name: SmolStr::default(),
            options: MatchingOptions::default(),
        }
    }

    /// Name the rewriter. The name is attached to every rewrite it produces.
    pub fn with_name(self, name: impl Into<SmolStr>) -> Self {
        Self {
            name: name.into(),
            ..self
        }
    }

    /// Set the options used to find matches.
    pub fn with_options(self, options: MatchingOptions) -> Self {
        Self { options, ..self }
    }

    /// The name of the rewriter.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The matcher of the rewriter.
    pub fn matcher(&self) -> &C {
        &self.matcher
    }

    /// The replacer of the rewriter.
    pub fn replacer(&self) -> &R {
        &self.replacer
    }
}

impl<C, R> Rewriter for MatchReplaceRewriter<C, R>
where
    C: CircuitMatcher + Sync,
    C::PartialMatchInfo: Send,
    C::MatchInfo: Send,
    R: CircuitReplacer<C::MatchInfo>,
{
    fn get_rewrites(&self, circ: &Circuit) -> Result<Vec<CircuitRewrite>, MatchError> {
        let scope = LineScope::new(circ);
        let matches = self
            .matcher
            .as_circuit_matcher()
            .get_all_matches(circ, &self.options)?;
        let rewrites = matches
            .into_iter()
            .flat_map(|m| {
                let subcirc = m.subcircuit;
                let scope = &scope;
                self.replacer
                    .replace_match(&m.fragment, m.match_info)
                    .into_iter()
                    .filter_map(move |repl| {
                        match CircuitRewrite::try_new(subcirc.clone(), scope, repl) {
                            Ok(ok) => Some(ok.with_name(self.name.clone())),
                            Err(err) => {
                                tracing::debug!(
                                    target: REWRITE_TARGET,
                                    rewriter = %self.name,
                                    %err,
                                    "failed to create rewrite, skipping"
                                );
                                None
                            }
                        }
                    })
            })
            .collect_vec();
        tracing::debug!(
            target: REWRITE_TARGET,
            rewriter = %self.name,
            n_rewrites = rewrites.len(),
            "found rewrites"
        );
        Ok(rewrites)
    }
}
