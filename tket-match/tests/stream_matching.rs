//! Matching the gadget library against small circuits.

use itertools::Itertools;
use rstest::{fixture, rstest};
use tket_match::circuit::build_simple_circuit;
use tket_match::gadgets::{all_gadgets, cx_gadget, zzphase_flip, CXGadgetMatcher};
use tket_match::rewrite::matcher::{
    qubit_indices, CircuitMatchAdapter, CircuitMatcher, MatchContext, MatchError, MatchOutcome,
    MatchingOptions, OpArg,
};
use tket_match::rewrite::replacer::CircuitReplacer;
use tket_match::rewrite::MatchReplaceRewriter;
use tket_match::{Circuit, LineScope, Rewriter, TketOp};

/// A `CX Rz CX` sandwich on qubits 0 and 1, followed by a cancellable CX
/// triple on qubits 2, 3 and 4.
#[fixture]
fn two_gadgets() -> Circuit {
    two_gadgets_circuit()
}

fn two_gadgets_circuit() -> Circuit {
    let json = r#"{
        "qubits": [0, 1, 2, 3, 4],
        "commands": [
            {"op": "CX", "qubits": [0, 1], "params": []},
            {"op": "Rz", "qubits": [1], "params": [{"Const": 0.3}]},
            {"op": "CX", "qubits": [0, 1], "params": []},
            {"op": "CX", "qubits": [2, 3], "params": []},
            {"op": "CX", "qubits": [3, 4], "params": []},
            {"op": "CX", "qubits": [2, 4], "params": []}
        ]
    }"#;
    serde_json::from_str(json).unwrap()
}

#[rstest]
fn all_gadgets_on_circuit(two_gadgets: Circuit) {
    let scope = LineScope::new(&two_gadgets);
    let rewrites = all_gadgets()
        .iter()
        .flat_map(|rewriter| rewriter.get_rewrites(&two_gadgets).unwrap())
        .collect_vec();

    let names = rewrites.iter().map(|rw| rw.name()).collect_vec();
    assert_eq!(names, vec!["CX gadget", "ZZPhase flip"]);

    for rw in &rewrites {
        assert!(scope.is_convex(rw.subcircuit()));
        assert_eq!(
            rw.subcircuit().qubits(&scope),
            rw.replacement().qubits().to_vec()
        );
    }
    let deltas = rewrites.iter().map(|rw| rw.node_count_delta()).collect_vec();
    assert_eq!(deltas, vec![-1, -2]);

    // The two rewrites can be applied together
    let cx_nodes = rewrites[0].invalidation_set().collect_vec();
    let zz_nodes = rewrites[1].invalidation_set().collect_vec();
    assert_eq!(cx_nodes, vec![3, 4, 5]);
    assert_eq!(zz_nodes, vec![0, 1, 2]);
}

/// CX gates down a ladder of qubits and back up.
fn cx_ladder(n_qubits: usize) -> Circuit {
    build_simple_circuit(n_qubits, |circ| {
        for i in 0..n_qubits - 1 {
            circ.append(TketOp::CX, [i, i + 1])?;
        }
        for i in (1..n_qubits).rev() {
            circ.append(TketOp::CX, [i, i - 1])?;
        }
        Ok(())
    })
    .unwrap()
}

/// A CX ladder with single-qubit rotations between the rungs.
fn rotated_ladder(n_qubits: usize) -> Circuit {
    build_simple_circuit(n_qubits, |circ| {
        for i in 0..n_qubits - 1 {
            circ.append(TketOp::CX, [i, i + 1])?;
            circ.append_with_params(TketOp::Rz, [i + 1], [0.25])?;
            circ.append(TketOp::CX, [i, i + 1])?;
        }
        Ok(())
    })
    .unwrap()
}

#[rstest]
#[case::two_gadgets(two_gadgets_circuit(), true)]
#[case::cx_ladder_3(cx_ladder(3), false)]
#[case::cx_ladder_5(cx_ladder(5), false)]
#[case::rotated_ladder(rotated_ladder(4), true)]
fn matched_operations_follow_each_other(#[case] circ: Circuit, #[case] expect_rewrites: bool) {
    let scope = LineScope::new(&circ);
    let rewrites = all_gadgets()
        .iter()
        .flat_map(|rewriter| rewriter.get_rewrites(&circ).unwrap())
        .collect_vec();
    if expect_rewrites {
        assert!(!rewrites.is_empty());
    }

    for rw in &rewrites {
        let nodes = rw.subcircuit().nodes().collect_vec();
        for &qb in circ.qubits() {
            // Matched operations on a wire are consecutive, each one after
            // the previous
            let positions = nodes
                .iter()
                .filter_map(|&node| scope.position(node, qb))
                .collect_vec();
            assert!(
                positions.iter().tuple_windows().all(|(a, b)| a + 1 == *b),
                "{}: nodes {nodes:?} are not ordered on {qb}",
                rw.name()
            );
        }
    }
}

#[test]
fn malformed_circuit_is_rejected() {
    let json = r#"{
        "qubits": [0, 1, 2],
        "commands": [
            {"op": "CX", "qubits": [0, 0], "params": []},
            {"op": "Rz", "qubits": [1], "params": [{"Const": 0.3}]},
            {"op": "Rz", "qubits": [2], "params": [{"Const": 0.3}]}
        ]
    }"#;
    let err = serde_json::from_str::<Circuit>(json).unwrap_err();
    assert!(err.to_string().contains("applied twice"), "{err}");

    let missing_angle = r#"{
        "qubits": [0],
        "commands": [{"op": "Ry", "qubits": [0], "params": []}]
    }"#;
    assert!(serde_json::from_str::<Circuit>(missing_angle).is_err());
}

#[rstest]
fn parallel_matching(two_gadgets: Circuit) {
    let sequential = cx_gadget().get_rewrites(&two_gadgets).unwrap();
    let parallel = cx_gadget()
        .with_options(MatchingOptions::default().parallel())
        .get_rewrites(&two_gadgets)
        .unwrap();
    assert_eq!(sequential, parallel);

    let bounded = zzphase_flip()
        .with_options(MatchingOptions::default().with_max_attempt_span(1))
        .get_rewrites(&two_gadgets)
        .unwrap();
    assert!(bounded.is_empty());
}

#[rstest]
fn matcher_is_deterministic(two_gadgets: Circuit) {
    let matcher = CircuitMatchAdapter::new(&CXGadgetMatcher);
    let options = MatchingOptions::default();
    let first = matcher.get_all_matches(&two_gadgets, &options).unwrap();
    let second = matcher.get_all_matches(&two_gadgets, &options).unwrap();
    assert_eq!(first, second);
}

/// A matcher that reads every operation as a CX.
struct AssumesCX;

impl CircuitMatcher for AssumesCX {
    type PartialMatchInfo = ();
    type MatchInfo = ();

    fn match_tket_op(
        &self,
        _op: TketOp,
        op_args: &[OpArg],
        _match_context: MatchContext<()>,
    ) -> Result<MatchOutcome<(), ()>, MatchError> {
        qubit_indices(TketOp::CX, op_args)?;
        Ok(MatchOutcome::complete(()))
    }
}

struct NoReplacement;

impl CircuitReplacer<()> for NoReplacement {
    fn replace_match(&self, _fragment: &Circuit, _match_info: ()) -> Vec<Circuit> {
        Vec::new()
    }
}

#[test]
fn malformed_arguments_are_reported() {
    let circ = build_simple_circuit(2, |circ| {
        circ.append(TketOp::CX, [0, 1])?;
        circ.append(TketOp::H, [1])?;
        Ok(())
    })
    .unwrap();
    let rewriter = MatchReplaceRewriter::new(AssumesCX, NoReplacement);
    assert_eq!(
        rewriter.get_rewrites(&circ),
        Err(MatchError::InvalidArity {
            op: TketOp::CX,
            expected: 2,
            found: 1
        })
    );
}
