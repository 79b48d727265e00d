//! Peephole resynthesis over the canonical gate set.
//!
//! Fragments are rebased to {CX, Rz, Rx}, then the following reductions are
//! applied until none is left:
//!  - rotations by a multiple of two half-turns are removed,
//!  - consecutive rotations about the same axis on a qubit are merged,
//!  - two identical CX gates cancel if they are only separated by Rz gates
//!    on their control and Rx gates on their target.

use serde::{Deserialize, Serialize};

use super::{rebase_to_canonical, Resynthesise};
use crate::circuit::{Circuit, Command, LineScope, Param, QubitIndex};
use crate::TketOp;

/// Options for [`PeepholeSquash`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SquashOptions {
    /// Rotation angles within this distance of a multiple of two half-turns
    /// are considered to be the identity.
    pub tolerance: f64,
}

impl Default for SquashOptions {
    fn default() -> Self {
        Self { tolerance: 1e-9 }
    }
}

impl SquashOptions {
    /// Set the angle tolerance.
    pub fn with_tolerance(self, tolerance: f64) -> Self {
        Self { tolerance }
    }
}

/// Squash rotations and cancel CX pairs in a circuit fragment.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PeepholeSquash {
    options: SquashOptions,
}

/// A local reduction of a circuit.
enum Reduction {
    /// Remove the given commands.
    Remove(Vec<usize>),
    /// Replace the angle of the first command and remove the second.
    Merge(usize, usize, Param),
}

impl PeepholeSquash {
    /// Create a new squash pass with the given options.
    pub fn new(options: SquashOptions) -> Self {
        Self { options }
    }

    /// Rebase `circ` to the canonical gate set and squash it.
    ///
    /// The qubits of the circuit are preserved.
    pub fn squash(&self, circ: &Circuit) -> Circuit {
        let mut circ = rebase_to_canonical(circ);
        while let Some(reduction) = self.find_reduction(&LineScope::new(&circ)) {
            circ = apply_reduction(circ, reduction);
        }
        circ
    }

    fn is_identity(&self, angle: &Param) -> bool {
        angle.as_f64().is_some_and(|a| {
            let rem = a.rem_euclid(2.);
            rem.min(2. - rem) <= self.options.tolerance
        })
    }

    fn find_reduction(&self, scope: &LineScope) -> Option<Reduction> {
        for (node, cmd) in scope.circuit().commands().iter().enumerate() {
            match cmd.op() {
                TketOp::Rz | TketOp::Rx => {
                    let qb = cmd.qubits()[0];
                    if self.is_identity(&cmd.params()[0]) {
                        return Some(Reduction::Remove(vec![node]));
                    }
                    let Some(next) = scope.next_on_line(node, qb) else {
                        continue;
                    };
                    let next_cmd = &scope.circuit().commands()[next];
                    if next_cmd.op() == cmd.op() {
                        let angle = cmd.params()[0].sum(&next_cmd.params()[0]);
                        return Some(Reduction::Merge(node, next, angle));
                    }
                }
                TketOp::CX => {
                    let [ctrl, tgt] = [cmd.qubits()[0], cmd.qubits()[1]];
                    let (Some(next), Some(next_tgt)) = (
                        next_non_commuting(scope, node, ctrl, TketOp::Rz),
                        next_non_commuting(scope, node, tgt, TketOp::Rx),
                    ) else {
                        continue;
                    };
                    let next_cmd = &scope.circuit().commands()[next];
                    if next == next_tgt && next_cmd.qubits() == cmd.qubits() {
                        return Some(Reduction::Remove(vec![node, next]));
                    }
                }
                _ => {}
            }
        }
        None
    }
}

/// The next command on the line of `qubit` after `node`, skipping over
/// commands of kind `commuting`.
fn next_non_commuting(
    scope: &LineScope,
    node: usize,
    qubit: QubitIndex,
    commuting: TketOp,
) -> Option<usize> {
    let mut next = scope.next_on_line(node, qubit)?;
    while scope.circuit().command(next)?.op() == commuting {
        next = scope.next_on_line(next, qubit)?;
    }
    Some(next)
}

fn apply_reduction(circ: Circuit, reduction: Reduction) -> Circuit {
    let qubits = circ.qubits().to_vec();
    let commands = circ
        .into_commands()
        .into_iter()
        .enumerate()
        .filter_map(|(node, cmd)| match &reduction {
            Reduction::Remove(nodes) if nodes.contains(&node) => None,
            Reduction::Merge(_, removed, _) if *removed == node => None,
            Reduction::Merge(kept, _, angle) if *kept == node => Some(Command::new_unchecked(
                cmd.op(),
                cmd.qubits().to_vec(),
                vec![angle.clone()],
            )),
            _ => Some(cmd),
        })
        .collect();
    Circuit::with_commands(qubits, commands)
}

impl Resynthesise for PeepholeSquash {
    fn resynthesise(&self, fragment: &Circuit) -> Vec<Circuit> {
        vec![self.squash(fragment)]
    }
}
