//! Cancel one CX out of a CX triple.
//!
//! The fragment `CX(c, m) CX(m, t) CX(c, t)` implements the same linear map as
//! `CX(m, t) CX(c, m)`.

use crate::circuit::{Circuit, Command, QubitIndex};
use crate::rewrite::matcher::{
    qubit_indices, succeeds_previous_op, CircuitMatcher, MatchContext, MatchError, MatchOutcome,
    OpArg,
};
use crate::rewrite::replacer::CircuitReplacer;
use crate::TketOp;

/// State of a [`CXGadgetMatcher`] attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum CXGadgetState {
    /// No CX has been found yet.
    #[default]
    Empty,
    /// One CX has been found already.
    FirstCX(QubitIndex, QubitIndex),
    /// The first two CX gates have been found. The qubits are the control of
    /// the first CX and the target of the second.
    SecondCX(QubitIndex, QubitIndex),
}

/// Matches `CX(c, m) CX(m, t) CX(c, t)`.
///
/// The match info is the `(c, t)` pair of the last CX.
#[derive(Debug, Clone, Copy, Default)]
pub struct CXGadgetMatcher;

impl CircuitMatcher for CXGadgetMatcher {
    type PartialMatchInfo = CXGadgetState;
    type MatchInfo = (QubitIndex, QubitIndex);

    fn match_tket_op(
        &self,
        op: TketOp,
        op_args: &[OpArg],
        match_context: MatchContext<Self::PartialMatchInfo>,
    ) -> Result<MatchOutcome<Self::PartialMatchInfo, Self::MatchInfo>, MatchError> {
        let qubits = qubit_indices(op, op_args)?;

        let outcome = match match_context.match_info {
            CXGadgetState::Empty => match op {
                TketOp::CX => MatchOutcome::proceed(CXGadgetState::FirstCX(qubits[0], qubits[1])),
                _ => MatchOutcome::stop(),
            },
            CXGadgetState::FirstCX(ctrl, tgt) => {
                if !succeeds_previous_op(op_args) {
                    MatchOutcome::skip()
                } else if op != TketOp::CX {
                    MatchOutcome::stop()
                } else if qubits[1] == ctrl || qubits[1] == tgt {
                    MatchOutcome::skip()
                } else if qubits[0] == tgt {
                    MatchOutcome::proceed(CXGadgetState::SecondCX(ctrl, qubits[1]))
                } else {
                    MatchOutcome::skip()
                }
            }
            CXGadgetState::SecondCX(ctrl, tgt) => {
                if succeeds_previous_op(op_args) && op == TketOp::CX && qubits == [ctrl, tgt] {
                    MatchOutcome::complete((ctrl, tgt))
                } else {
                    MatchOutcome::skip()
                }
            }
        };
        Ok(outcome)
    }
}

/// Replaces `CX(c, m) CX(m, t) CX(c, t)` with `CX(m, t) CX(c, m)`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CXGadgetReplacer;

impl CircuitReplacer<(QubitIndex, QubitIndex)> for CXGadgetReplacer {
    fn replace_match(
        &self,
        fragment: &Circuit,
        (ctrl, tgt): (QubitIndex, QubitIndex),
    ) -> Vec<Circuit> {
        let Some(mid) = fragment.qubits().iter().copied().find(|&q| q != ctrl && q != tgt) else {
            return Vec::new();
        };
        let expected = [[ctrl, mid], [mid, tgt], [ctrl, tgt]];
        let is_gadget = fragment.num_operations() == 3
            && fragment
                .commands()
                .iter()
                .zip(expected)
                .all(|(cmd, qbs)| cmd.op() == TketOp::CX && cmd.qubits() == qbs);
        if !is_gadget {
            return Vec::new();
        }

        let cx = |a, b| Command::new_unchecked(TketOp::CX, vec![a, b], vec![]);
        vec![Circuit::with_commands(
            fragment.qubits().to_vec(),
            vec![cx(mid, tgt), cx(ctrl, mid)],
        )]
    }
}
