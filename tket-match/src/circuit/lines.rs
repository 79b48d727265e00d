//! Per-wire views of a circuit.
//!
//! A [`LineScope`] precomputes, for every qubit wire, the ordered list of
//! commands acting on it (its "line") and, for every command, its position
//! along each of its lines. Subcircuits are expressed as intervals on these
//! lines.

use fxhash::FxHashMap;
use itertools::Itertools;

use super::{Circuit, QubitIndex};
use crate::subcircuit::Subcircuit;

/// A circuit together with the commands on each of its qubit lines.
#[derive(Debug, Clone)]
pub struct LineScope<'c> {
    circuit: &'c Circuit,
    /// The commands on each qubit line, in topological order.
    lines: FxHashMap<QubitIndex, Vec<usize>>,
    /// For each command, its position on the line of each of its qubits (in
    /// argument order).
    positions: Vec<Vec<usize>>,
}

impl<'c> LineScope<'c> {
    /// Compute the lines of a circuit.
    pub fn new(circuit: &'c Circuit) -> Self {
        let mut lines: FxHashMap<QubitIndex, Vec<usize>> = FxHashMap::default();
        let positions = circuit
            .commands()
            .iter()
            .enumerate()
            .map(|(node, cmd)| {
                cmd.qubits()
                    .iter()
                    .map(|&qb| {
                        let line = lines.entry(qb).or_default();
                        line.push(node);
                        line.len() - 1
                    })
                    .collect_vec()
            })
            .collect();
        Self {
            circuit,
            lines,
            positions,
        }
    }

    /// The underlying circuit.
    #[inline]
    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    /// The commands acting on `qubit`, in topological order.
    pub fn line(&self, qubit: QubitIndex) -> &[usize] {
        self.lines.get(&qubit).map_or(&[][..], Vec::as_slice)
    }

    /// The position of `node` on the line of `qubit`.
    ///
    /// Returns `None` if the node does not act on the qubit.
    pub fn position(&self, node: usize, qubit: QubitIndex) -> Option<usize> {
        let cmd = self.circuit.command(node)?;
        let arg = cmd.qubits().iter().position(|&qb| qb == qubit)?;
        Some(self.positions[node][arg])
    }

    /// The command following `node` on the line of `qubit`.
    pub fn next_on_line(&self, node: usize, qubit: QubitIndex) -> Option<usize> {
        let pos = self.position(node, qubit)?;
        self.line(qubit).get(pos + 1).copied()
    }

    /// The command preceding `node` on the line of `qubit`.
    pub fn prev_on_line(&self, node: usize, qubit: QubitIndex) -> Option<usize> {
        let pos = self.position(node, qubit)?;
        self.line(qubit).get(pos.checked_sub(1)?).copied()
    }

    /// Check if the given subcircuit is convex.
    ///
    /// A subcircuit is convex if no path leaves the subcircuit and re-enters
    /// it. Commands are visited in topological order between the first and
    /// last node of the subcircuit, tracking which wires carry a path coming
    /// out of the subcircuit through an outside command.
    pub fn is_convex(&self, subcircuit: &Subcircuit) -> bool {
        let (Some(first), Some(last)) = (subcircuit.nodes().next(), subcircuit.nodes().last())
        else {
            // An empty subcircuit is convex
            return true;
        };

        #[derive(Default, Clone, Copy)]
        struct WireState {
            /// There is a path from the subcircuit to the wire.
            reached: bool,
            /// There is a path from the subcircuit to the wire through an
            /// outside command.
            escaped: bool,
        }
        let mut wires: FxHashMap<QubitIndex, WireState> = FxHashMap::default();

        for (node, cmd) in (first..=last).filter_map(|n| Some((n, self.circuit.command(n)?))) {
            if subcircuit.contains(node) {
                if cmd
                    .qubits()
                    .iter()
                    .any(|qb| wires.get(qb).is_some_and(|s| s.escaped))
                {
                    return false;
                }
                for &qb in cmd.qubits() {
                    wires.entry(qb).or_default().reached = true;
                }
            } else if cmd
                .qubits()
                .iter()
                .any(|qb| wires.get(qb).is_some_and(|s| s.reached))
            {
                for &qb in cmd.qubits() {
                    wires.insert(
                        qb,
                        WireState {
                            reached: true,
                            escaped: true,
                        },
                    );
                }
            }
        }

        true
    }
}
