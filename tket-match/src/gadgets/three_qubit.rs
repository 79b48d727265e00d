//! Blocks of canonical gates acting on exactly three qubits.

use crate::circuit::QubitIndex;
use crate::rewrite::matcher::{
    qubit_indices, succeeds_previous_op, CircuitMatcher, MatchContext, MatchError, MatchOutcome,
    OpArg,
};
use crate::TketOp;

/// The qubits seen by a [`ThreeQubitBoundaryMatcher`] attempt, in first-seen
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Collecting(pub Vec<QubitIndex>);

/// Collects CX, Rx and Rz gates until they span exactly three qubits.
///
/// The match info is the three qubits, in the order in which the matched
/// operations first act on them. This is the qubit order of the matched
/// fragment.
///
/// Gates on qubits disjoint from the ones seen so far are added to the match
/// like any other. Any other kind of operation stops a started attempt.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreeQubitBoundaryMatcher;

impl CircuitMatcher for ThreeQubitBoundaryMatcher {
    type PartialMatchInfo = Collecting;
    type MatchInfo = [QubitIndex; 3];

    fn match_tket_op(
        &self,
        op: TketOp,
        op_args: &[OpArg],
        match_context: MatchContext<Self::PartialMatchInfo>,
    ) -> Result<MatchOutcome<Self::PartialMatchInfo, Self::MatchInfo>, MatchError> {
        let qubits = qubit_indices(op, op_args)?;
        let Collecting(mut ports) = match_context.match_info;

        if !succeeds_previous_op(op_args) {
            return Ok(MatchOutcome::skip());
        }
        if !matches!(op, TketOp::CX | TketOp::Rx | TketOp::Rz) {
            return Ok(if ports.is_empty() {
                MatchOutcome::skip()
            } else {
                MatchOutcome::stop()
            });
        }

        for qb in qubits {
            if !ports.contains(&qb) {
                ports.push(qb);
            }
        }
        let outcome = match ports.len() {
            0..=2 => MatchOutcome::proceed(Collecting(ports)),
            3 => MatchOutcome::complete([ports[0], ports[1], ports[2]]),
            _ => MatchOutcome::stop(),
        };
        Ok(outcome)
    }
}
