//! Rebase circuits to the canonical gate set {CX, Rz, Rx}.
//!
//! Decompositions are exact up to a global phase. Angles are in half-turns.

use crate::circuit::{Circuit, Command, Param, QubitIndex};
use crate::TketOp;

/// Rebase a circuit to the canonical gate set {CX, Rz, Rx}.
///
/// Non-unitary operations are kept as they are. The qubits of the circuit are
/// preserved.
pub fn rebase_to_canonical(circ: &Circuit) -> Circuit {
    let mut commands = Vec::with_capacity(circ.num_operations());
    for cmd in circ.commands() {
        canonical_commands(cmd, &mut commands);
    }
    Circuit::with_commands(circ.qubits().to_vec(), commands)
}

/// Append the canonical decomposition of `cmd` to `out`.
fn canonical_commands(cmd: &Command, out: &mut Vec<Command>) {
    use TketOp::*;

    let mut b = Decomposer { out };
    let qbs = cmd.qubits();
    let angle = || cmd.params()[0].clone();

    match cmd.op() {
        CX | Rz | Rx | Measure | Reset => b.out.push(cmd.clone()),
        H => b.h(qbs[0]),
        X => b.rx(qbs[0], 1.),
        Y => {
            b.rx(qbs[0], 1.);
            b.rz(qbs[0], 1.);
        }
        Z => b.rz(qbs[0], 1.),
        S => b.rz(qbs[0], 0.5),
        Sdg => b.rz(qbs[0], -0.5),
        T => b.rz(qbs[0], 0.25),
        Tdg => b.rz(qbs[0], -0.25),
        V => b.rx(qbs[0], 0.5),
        Vdg => b.rx(qbs[0], -0.5),
        Ry => {
            b.rz(qbs[0], -0.5);
            b.rx(qbs[0], angle());
            b.rz(qbs[0], 0.5);
        }
        CY => {
            b.rz(qbs[1], -0.5);
            b.cx(qbs[0], qbs[1]);
            b.rz(qbs[1], 0.5);
        }
        CZ => {
            b.h(qbs[1]);
            b.cx(qbs[0], qbs[1]);
            b.h(qbs[1]);
        }
        CRz => {
            let half = angle().scaled(0.5);
            b.rz(qbs[1], half.clone());
            b.cx(qbs[0], qbs[1]);
            b.rz(qbs[1], half.negated());
            b.cx(qbs[0], qbs[1]);
        }
        ZZPhase => {
            b.cx(qbs[0], qbs[1]);
            b.rz(qbs[1], angle());
            b.cx(qbs[0], qbs[1]);
        }
        SWAP => {
            b.cx(qbs[0], qbs[1]);
            b.cx(qbs[1], qbs[0]);
            b.cx(qbs[0], qbs[1]);
        }
        CCX => {
            let [a, c, t] = [qbs[0], qbs[1], qbs[2]];
            b.h(t);
            b.cx(c, t);
            b.rz(t, -0.25);
            b.cx(a, t);
            b.rz(t, 0.25);
            b.cx(c, t);
            b.rz(t, -0.25);
            b.cx(a, t);
            b.rz(c, 0.25);
            b.rz(t, 0.25);
            b.h(t);
            b.cx(a, c);
            b.rz(a, 0.25);
            b.rz(c, -0.25);
            b.cx(a, c);
        }
    }
}

/// Emits canonical gates.
struct Decomposer<'a> {
    out: &'a mut Vec<Command>,
}

impl Decomposer<'_> {
    fn cx(&mut self, ctrl: QubitIndex, tgt: QubitIndex) {
        self.out
            .push(Command::new_unchecked(TketOp::CX, vec![ctrl, tgt], vec![]));
    }

    fn rz(&mut self, qb: QubitIndex, angle: impl Into<Param>) {
        self.out
            .push(Command::new_unchecked(TketOp::Rz, vec![qb], vec![angle.into()]));
    }

    fn rx(&mut self, qb: QubitIndex, angle: impl Into<Param>) {
        self.out
            .push(Command::new_unchecked(TketOp::Rx, vec![qb], vec![angle.into()]));
    }

    fn h(&mut self, qb: QubitIndex) {
        self.rz(qb, 0.5);
        self.rx(qb, 0.5);
        self.rz(qb, 0.5);
    }
}

#[cfg(test)]
mod test {
    use rstest::rstest;
    use strum::IntoEnumIterator;

    use super::*;
    use crate::circuit::build_simple_circuit;
    use crate::utils::test::assert_equivalent;

    fn single_op(op: TketOp) -> Circuit {
        let n_qubits = op.qubit_count();
        build_simple_circuit(n_qubits, |circ| {
            let params = (0..op.param_count()).map(|_| 0.37);
            circ.append_with_params(op, 0..n_qubits, params)?;
            Ok(())
        })
        .unwrap()
    }

    #[test]
    fn rebase_all_unitary_ops() {
        for op in TketOp::iter().filter(TketOp::is_quantum) {
            let circ = single_op(op);
            let rebased = rebase_to_canonical(&circ);

            assert_eq!(rebased.qubits(), circ.qubits(), "{op}");
            assert!(
                rebased.commands().iter().all(|cmd| cmd.op().is_canonical()),
                "{op}"
            );
            assert_equivalent(&circ, &rebased);
        }
    }

    #[rstest]
    #[case(TketOp::SWAP, 3)]
    #[case(TketOp::CCX, 6)]
    #[case(TketOp::ZZPhase, 2)]
    #[case(TketOp::CZ, 1)]
    fn cx_counts(#[case] op: TketOp, #[case] n_cx: usize) {
        let rebased = rebase_to_canonical(&single_op(op));
        assert_eq!(rebased.num_multi_qubit_operations(), n_cx);
    }

    #[test]
    fn keep_non_unitary_and_symbols() {
        let circ = build_simple_circuit(2, |circ| {
            circ.append(TketOp::Measure, [0])?;
            circ.append_with_params(TketOp::CRz, [0, 1], ["a"])?;
            Ok(())
        })
        .unwrap();
        let rebased = rebase_to_canonical(&circ);
        let ops = rebased.commands().iter().map(|cmd| cmd.op()).collect::<Vec<_>>();
        assert_eq!(
            ops,
            vec![TketOp::Measure, TketOp::Rz, TketOp::CX, TketOp::Rz, TketOp::CX]
        );
        assert_eq!(
            rebased.commands()[1].params(),
            &[Param::Symbol("(a)*0.5".into())]
        );
    }
}
