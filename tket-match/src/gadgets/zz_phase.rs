//! Merge a `CX Rz CX` sandwich into a single `ZZPhase` gate.

use crate::circuit::{Circuit, Command, QubitIndex};
use crate::rewrite::matcher::{
    const_angle, qubit_indices, succeeds_previous_op, CircuitMatcher, LinearPos, MatchContext,
    MatchError, MatchOutcome, OpArg,
};
use crate::rewrite::replacer::CircuitReplacer;
use crate::TketOp;

/// State of a [`ZZPhaseMatcher`] attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum ZZPhaseState {
    /// Nothing matched yet.
    #[default]
    Empty,
    /// The opening CX.
    FirstCX(QubitIndex, QubitIndex),
    /// The opening CX and the rotation on its target.
    Rotation(QubitIndex, QubitIndex, f64),
}

/// Matches `CX(c, t) Rz(t, a) CX(c, t)` for a constant angle `a`.
///
/// The match info is the angle, in half-turns.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZZPhaseMatcher;

impl CircuitMatcher for ZZPhaseMatcher {
    type PartialMatchInfo = ZZPhaseState;
    type MatchInfo = f64;

    fn match_tket_op(
        &self,
        op: TketOp,
        op_args: &[OpArg],
        match_context: MatchContext<Self::PartialMatchInfo>,
    ) -> Result<MatchOutcome<Self::PartialMatchInfo, Self::MatchInfo>, MatchError> {
        let qubits = qubit_indices(op, op_args)?;

        let outcome = match match_context.match_info {
            ZZPhaseState::Empty => {
                let unconstrained = op_args
                    .iter()
                    .filter_map(OpArg::linear_pos)
                    .all(|pos| pos == LinearPos::Unconstrained);
                if op == TketOp::CX && unconstrained {
                    MatchOutcome::proceed(ZZPhaseState::FirstCX(qubits[0], qubits[1]))
                } else {
                    MatchOutcome::stop()
                }
            }
            _ if !succeeds_previous_op(op_args) => MatchOutcome::skip(),
            ZZPhaseState::FirstCX(ctrl, tgt) => match (op, const_angle(op, op_args)) {
                (TketOp::Rz, Some(angle)) if qubits[0] == tgt => {
                    MatchOutcome::proceed(ZZPhaseState::Rotation(ctrl, tgt, angle))
                }
                _ => MatchOutcome::skip(),
            },
            ZZPhaseState::Rotation(ctrl, tgt, angle) => {
                if op == TketOp::CX && qubits == [ctrl, tgt] {
                    MatchOutcome::complete(angle)
                } else {
                    MatchOutcome::skip()
                }
            }
        };
        Ok(outcome)
    }
}

/// Replaces a `CX Rz CX` sandwich with `ZZPhase`.
///
/// The angle is taken from the rotation of the fragment, so that symbolic
/// expressions are kept untouched.
#[derive(Debug, Clone, Copy, Default)]
pub struct ZZPhaseReplacer;

impl CircuitReplacer<f64> for ZZPhaseReplacer {
    fn replace_match(&self, fragment: &Circuit, _angle: f64) -> Vec<Circuit> {
        let [first, rot, last] = fragment.commands() else {
            return Vec::new();
        };
        let [ctrl, tgt] = first.qubits() else {
            return Vec::new();
        };
        let is_sandwich = first.op() == TketOp::CX
            && last.op() == TketOp::CX
            && last.qubits() == first.qubits()
            && rot.op() == TketOp::Rz
            && rot.qubits() == [*tgt];
        if !is_sandwich {
            return Vec::new();
        }

        let zz = Command::new_unchecked(TketOp::ZZPhase, vec![*ctrl, *tgt], rot.params().to_vec());
        vec![Circuit::with_commands(fragment.qubits().to_vec(), vec![zz])]
    }
}
