//! Two-qubit blocks bracketed by CX gates.
//!
//! The matcher only recognises the skeleton `CX (1q gates)* CX` on a pair of
//! qubits. The actual resynthesis is left to the replacer, see
//! [`SquashReplacer`](super::SquashReplacer).

use crate::circuit::QubitIndex;
use crate::rewrite::matcher::{
    qubit_indices, succeeds_previous_op, CircuitMatcher, MatchContext, MatchError, MatchOutcome,
    OpArg,
};
use crate::TketOp;

/// State of a [`TwoQubitSquashMatcher`] attempt.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TwoQubitSquashState {
    /// No CX has been found yet.
    #[default]
    Empty,
    /// The opening CX has been found. The flag records whether a
    /// single-qubit gate has been matched since.
    Open {
        /// Control of the opening CX.
        ctrl: QubitIndex,
        /// Target of the opening CX.
        tgt: QubitIndex,
        /// Whether a single-qubit gate was matched.
        saw_local: bool,
    },
}

/// Matches a CX, any number of single-qubit gates on its qubits, and a closing
/// CX on the same pair of qubits, in either orientation.
///
/// Operations that do not start the pattern, and operations touching other
/// qubits once it is started, are skipped rather than stopping the attempt.
/// Skipping an operation on one of the two qubits prevents any further
/// operation on that qubit from being matched, so the closing CX will never be
/// found in that case.
///
/// The match info is the `(control, target)` pair of the opening CX.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwoQubitSquashMatcher;

impl CircuitMatcher for TwoQubitSquashMatcher {
    type PartialMatchInfo = TwoQubitSquashState;
    type MatchInfo = (QubitIndex, QubitIndex);

    fn match_tket_op(
        &self,
        op: TketOp,
        op_args: &[OpArg],
        match_context: MatchContext<Self::PartialMatchInfo>,
    ) -> Result<MatchOutcome<Self::PartialMatchInfo, Self::MatchInfo>, MatchError> {
        let qubits = qubit_indices(op, op_args)?;

        let TwoQubitSquashState::Open { ctrl, tgt, .. } = match_context.match_info else {
            return Ok(match op {
                TketOp::CX => MatchOutcome::proceed(TwoQubitSquashState::Open {
                    ctrl: qubits[0],
                    tgt: qubits[1],
                    saw_local: false,
                }),
                _ => MatchOutcome::skip(),
            });
        };

        if !succeeds_previous_op(op_args) {
            return Ok(MatchOutcome::skip());
        }
        let on_pair = |qb: &QubitIndex| *qb == ctrl || *qb == tgt;

        let outcome = match qubits.as_slice() {
            [a, b] if op == TketOp::CX && on_pair(a) && on_pair(b) => {
                MatchOutcome::complete((ctrl, tgt))
            }
            [qb] if op.is_quantum() && on_pair(qb) => {
                MatchOutcome::proceed(TwoQubitSquashState::Open {
                    ctrl,
                    tgt,
                    saw_local: true,
                })
            }
            _ => MatchOutcome::skip(),
        };
        Ok(outcome)
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;

    use super::*;
    use crate::circuit::{build_simple_circuit, Circuit};
    use crate::rewrite::matcher::LinearPos;
    use crate::rewrite::Rewriter;
    use crate::utils::test::{assert_equivalent, feed, qarg};

    fn qb(i: usize) -> QubitIndex {
        QubitIndex::new(i)
    }

    fn open(saw_local: bool) -> TwoQubitSquashState {
        TwoQubitSquashState::Open {
            ctrl: qb(0),
            tgt: qb(1),
            saw_local,
        }
    }

    #[test]
    fn reversed_closing_cx() {
        let circ = build_simple_circuit(2, |circ| {
            circ.append(TketOp::CX, [0, 1])?;
            circ.append(TketOp::CX, [1, 0])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(
            feed(&TwoQubitSquashMatcher, &circ),
            vec![
                MatchOutcome::Proceed(open(false)),
                MatchOutcome::Complete((qb(0), qb(1))),
            ]
        );
    }

    #[test]
    fn local_gates() {
        let circ = build_simple_circuit(2, |circ| {
            circ.append(TketOp::CX, [0, 1])?;
            circ.append(TketOp::H, [1])?;
            circ.append_with_params(TketOp::Rz, [0], [0.2])?;
            circ.append(TketOp::CX, [0, 1])?;
            Ok(())
        })
        .unwrap();
        assert_eq!(
            feed(&TwoQubitSquashMatcher, &circ),
            vec![
                MatchOutcome::Proceed(open(false)),
                MatchOutcome::Proceed(open(true)),
                MatchOutcome::Proceed(open(true)),
                MatchOutcome::Complete((qb(0), qb(1))),
            ]
        );
    }

    #[rstest]
    #[case::leading_local(TwoQubitSquashState::Empty, TketOp::H, vec![qarg(0, LinearPos::Unconstrained)])]
    #[case::leading_measure(TwoQubitSquashState::Empty, TketOp::Measure, vec![qarg(0, LinearPos::Unconstrained)])]
    #[case::before(open(false), TketOp::H, vec![qarg(0, LinearPos::Before)])]
    #[case::disjoint(open(false), TketOp::H, vec![qarg(2, LinearPos::Unconstrained)])]
    #[case::disjoint_cx(
        open(false),
        TketOp::CX,
        vec![qarg(2, LinearPos::Unconstrained), qarg(3, LinearPos::Unconstrained)]
    )]
    #[case::outside_pair(
        open(true),
        TketOp::CX,
        vec![qarg(0, LinearPos::After), qarg(2, LinearPos::Unconstrained)]
    )]
    #[case::other_two_qubit_gate(
        open(false),
        TketOp::CZ,
        vec![qarg(0, LinearPos::After), qarg(1, LinearPos::After)]
    )]
    #[case::measure_on_pair(open(false), TketOp::Measure, vec![qarg(1, LinearPos::After)])]
    fn permissive_skips(
        #[case] state: TwoQubitSquashState,
        #[case] op: TketOp,
        #[case] args: Vec<OpArg>,
    ) {
        let ctx = MatchContext {
            match_info: state,
            op_node: 3,
        };
        assert_eq!(
            TwoQubitSquashMatcher.match_tket_op(op, &args, ctx),
            Ok(MatchOutcome::Skip)
        );
    }

    #[test]
    fn squash_cx_rz_cx() {
        let circ = build_simple_circuit(2, |circ| {
            circ.append(TketOp::CX, [0, 1])?;
            circ.append_with_params(TketOp::Rz, [0], [0.4])?;
            circ.append(TketOp::CX, [0, 1])?;
            Ok(())
        })
        .unwrap();
        let rewrites = crate::gadgets::kak_gadget().get_rewrites(&circ).unwrap();
        assert_eq!(rewrites.len(), 1);
        assert_eq!(rewrites[0].name(), "2-qubit squash");
        assert_eq!(rewrites[0].node_count_delta(), -2);
        assert_equivalent(&circ, rewrites[0].replacement());
    }

    #[test]
    fn outside_gates_keep_pattern_convex() {
        // CX(0, 1) CX(1, 2) CX(0, 1): the middle CX is skipped, which blocks
        // qubit 1
        let circ = build_simple_circuit(3, |circ| {
            circ.append(TketOp::CX, [0, 1])?;
            circ.append(TketOp::CX, [1, 2])?;
            circ.append(TketOp::CX, [0, 1])?;
            Ok(())
        })
        .unwrap();
        let rewrites = crate::gadgets::kak_gadget().get_rewrites(&circ).unwrap();
        assert!(rewrites.is_empty());

        let unrelated = build_simple_circuit(3, |circ| {
            circ.append(TketOp::CX, [0, 1])?;
            circ.append(TketOp::H, [2])?;
            circ.append(TketOp::CX, [0, 1])?;
            Ok(())
        })
        .unwrap();
        let rewrites = crate::gadgets::kak_gadget()
            .get_rewrites(&unrelated)
            .unwrap();
        assert_eq!(rewrites.len(), 1);
        assert_eq!(
            rewrites[0].replacement(),
            &Circuit::with_qubits([qb(0), qb(1)])
        );
    }
}
