use std::cmp::Reverse;
use std::collections::BTreeSet;

use fxhash::FxHashMap;
use itertools::Itertools;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{CircuitMatcher, MatchContext, MatchError, MatchOutcome, OpArg, LOG_TARGET};
use crate::circuit::{Circuit, LineScope};
use crate::Subcircuit;

/// An adaptor for [`CircuitMatcher`]s that matches patterns in concrete
/// circuits.
///
/// The circuit commands are walked once, in topological order. Every command
/// is fed to all live match attempts and to a fresh attempt starting at that
/// command.
pub struct CircuitMatchAdapter<'m, M: ?Sized> {
    matcher: &'m M,
}

impl<'m, M: ?Sized> CircuitMatchAdapter<'m, M> {
    /// Create a new [`CircuitMatchAdapter`].
    pub fn new(matcher: &'m M) -> Self {
        Self { matcher }
    }
}

/// Options for matching circuits with [`CircuitMatchAdapter`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
#[non_exhaustive]
pub struct MatchingOptions {
    /// If set, will discard all non-maximal matches.
    ///
    /// This may be an expensive operation: it may take time up to quadratic in
    /// the total number of matches (and linear in the size of the largest
    /// match).
    pub only_maximal_matches: bool,
    /// Step the live attempts in parallel.
    pub parallel: bool,
    /// Discard attempts once the current command is more than this many
    /// commands after their first command.
    ///
    /// Permissive matchers may otherwise keep attempts alive until the end of
    /// the circuit.
    pub max_attempt_span: Option<usize>,
}

impl MatchingOptions {
    /// Only return maximal matches.
    ///
    /// In other words, never return matches that are fully contained within
    /// another match.
    pub fn only_maximal_matches(self) -> Self {
        Self {
            only_maximal_matches: true,
            ..self
        }
    }

    /// Step live attempts in parallel.
    pub fn parallel(self) -> Self {
        Self {
            parallel: true,
            ..self
        }
    }

    /// Bound the number of commands an attempt may span.
    pub fn with_max_attempt_span(self, span: usize) -> Self {
        Self {
            max_attempt_span: Some(span),
            ..self
        }
    }
}

/// A complete match found by a [`CircuitMatchAdapter`].
#[derive(Debug, Clone, PartialEq)]
pub struct CompletedMatch<MatchInfo> {
    /// The command the attempt started at.
    pub start_node: usize,
    /// The matched commands.
    pub subcircuit: Subcircuit,
    /// The matched commands as a circuit fragment, over the qubits touched
    /// by the attempt in first-seen order.
    pub fragment: Circuit,
    /// The payload reported by the matcher.
    pub match_info: MatchInfo,
}

/// A live match attempt.
#[derive(Debug, Clone)]
struct Attempt<PartialMatchInfo> {
    /// The first command offered to the attempt.
    start_node: usize,
    /// The commands matched so far.
    subcircuit: Subcircuit,
    /// Context of the current partial match.
    match_info: PartialMatchInfo,
}

/// The result of feeding a command to an attempt.
enum Step<PartialMatchInfo, MatchInfo> {
    Live(Attempt<PartialMatchInfo>),
    Dropped,
    Completed(CompletedMatch<MatchInfo>),
}

impl<M> CircuitMatchAdapter<'_, M>
where
    M: CircuitMatcher + Sync + ?Sized,
    M::PartialMatchInfo: Send,
    M::MatchInfo: Send,
{
    /// Get all matching subcircuits within the circuit.
    ///
    /// Matches are returned in the order in which they are completed. Matches
    /// that are not convex are discarded.
    pub fn get_all_matches(
        &self,
        circ: &Circuit,
        options: &MatchingOptions,
    ) -> Result<Vec<CompletedMatch<M::MatchInfo>>, MatchError> {
        let scope = LineScope::new(circ);
        let mut live: Vec<Attempt<M::PartialMatchInfo>> = Vec::new();
        let mut all_matches = Vec::new();

        for node in 0..circ.num_operations() {
            if let Some(span) = options.max_attempt_span {
                live.retain(|attempt| node - attempt.start_node <= span);
            }
            live.push(Attempt {
                start_node: node,
                subcircuit: Subcircuit::new_empty(),
                match_info: M::PartialMatchInfo::default(),
            });

            let steps: Vec<_> = if options.parallel {
                live.into_par_iter()
                    .map(|attempt| self.step(attempt, node, &scope))
                    .collect::<Result<_, _>>()?
            } else {
                live.into_iter()
                    .map(|attempt| self.step(attempt, node, &scope))
                    .collect::<Result<_, _>>()?
            };

            live = Vec::with_capacity(steps.len());
            for step in steps {
                match step {
                    Step::Live(attempt) => live.push(attempt),
                    Step::Dropped => {}
                    Step::Completed(m) => all_matches.push(m),
                }
            }
        }

        tracing::debug!(
            target: LOG_TARGET,
            n_commands = circ.num_operations(),
            n_matches = all_matches.len(),
            n_unfinished = live.len(),
            "matching finished"
        );

        if options.only_maximal_matches {
            remove_non_maximal_matches(&mut all_matches);
        }

        Ok(all_matches)
    }

    /// Feed the command at `node` to an attempt.
    fn step(
        &self,
        attempt: Attempt<M::PartialMatchInfo>,
        node: usize,
        scope: &LineScope,
    ) -> Result<Step<M::PartialMatchInfo, M::MatchInfo>, MatchError> {
        let Some(cmd) = scope.circuit().command(node) else {
            return Ok(Step::Live(attempt));
        };

        let Ok(extension) = attempt.subcircuit.extension(node, scope) else {
            // the op cannot be added to the attempt without breaking a line
            return Ok(Step::Live(attempt));
        };

        let Some(qubit_args) = cmd
            .qubits()
            .iter()
            .map(|&qb| OpArg::relative_to(qb, node, &attempt.subcircuit, scope))
            .collect::<Option<Vec<_>>>()
        else {
            return Ok(Step::Live(attempt));
        };
        let op_args = qubit_args
            .into_iter()
            .chain(cmd.params().iter().map(|p| OpArg::Const(p.as_f64())))
            .collect_vec();

        let match_context = MatchContext {
            match_info: attempt.match_info.clone(),
            op_node: node,
        };

        let extend = |mut subcircuit: Subcircuit| {
            subcircuit.apply(extension);
            subcircuit
        };

        let step = match self
            .matcher
            .match_tket_op(cmd.op(), &op_args, match_context)?
        {
            MatchOutcome::Proceed(match_info) => Step::Live(Attempt {
                start_node: attempt.start_node,
                subcircuit: extend(attempt.subcircuit),
                match_info,
            }),
            MatchOutcome::Skip => {
                // do not keep "skip"s if nothing was matched yet
                // (it's equivalent to starting at a later op)
                if attempt.subcircuit.is_empty() {
                    Step::Dropped
                } else {
                    Step::Live(attempt)
                }
            }
            MatchOutcome::Stop => {
                tracing::trace!(
                    target: LOG_TARGET,
                    start = attempt.start_node,
                    node,
                    op = %cmd.op(),
                    "attempt stopped"
                );
                Step::Dropped
            }
            MatchOutcome::Complete(match_info) => {
                let new_subcircuit = extend(attempt.subcircuit);
                if !scope.is_convex(&new_subcircuit) {
                    tracing::debug!(
                        target: LOG_TARGET,
                        start = attempt.start_node,
                        node,
                        "discarding non-convex match"
                    );
                    return Ok(Step::Dropped);
                }
                tracing::trace!(
                    target: LOG_TARGET,
                    start = attempt.start_node,
                    node,
                    n_nodes = new_subcircuit.node_count(),
                    "attempt completed"
                );
                Step::Completed(CompletedMatch {
                    start_node: attempt.start_node,
                    fragment: new_subcircuit.to_circuit(scope),
                    subcircuit: new_subcircuit,
                    match_info,
                })
            }
        };
        Ok(step)
    }
}

/// Remove non-maximal subgraphs (i.e. subgraphs fully contained within another
/// subgraph) from the list of matches.
///
/// This may be an expensive operation: it may take time up to quadratic in
/// the total number of matches (and linear in the size of the largest match).
fn remove_non_maximal_matches<MatchInfo>(all_matches: &mut Vec<CompletedMatch<MatchInfo>>) {
    // Sort matches from largest to smallest. Thus if A \subseteq B then B is
    // processed before A.
    all_matches.sort_by_key(|m| Reverse(m.subcircuit.node_count()));

    // A map from node indices to the set of matches that contain that node.
    let mut node_to_matches: FxHashMap<usize, BTreeSet<usize>> = FxHashMap::default();
    // A counter to assign unique indices to each match.
    let mut match_ind = 0;

    all_matches.retain(|m| {
        // Find a match that covers all nodes of the subcircuit
        let match_all_nodes = m
            .subcircuit
            .nodes()
            .fold(None, |acc: Option<BTreeSet<usize>>, n| {
                let matches = node_to_matches.get(&n).cloned().unwrap_or_default();
                match acc {
                    Some(acc) => Some(acc.intersection(&matches).copied().collect()),
                    None => Some(matches),
                }
            })
            .unwrap_or_default();
        if match_all_nodes.is_empty() {
            // A maximal match. Keep this match and store it in the map
            for n in m.subcircuit.nodes() {
                node_to_matches.entry(n).or_default().insert(match_ind);
            }
            match_ind += 1;
            true
        } else {
            false
        }
    });
}
