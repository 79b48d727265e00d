//! Subcircuits of circuits.
//!
//! Subcircuits are sets of commands of a circuit, expressed in terms of
//! intervals on the qubit lines of a [`LineScope`].

use std::collections::{BTreeMap, BTreeSet};

use derive_more::{Display, Error};
use itertools::Itertools;

use crate::circuit::{Circuit, LineScope, QubitIndex};

/// A non-empty interval on a qubit line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Interval {
    qubit: QubitIndex,
    /// Start and end positions on the line (inclusive).
    positions: [usize; 2],
}

impl Interval {
    /// Create an interval for a single position.
    pub fn singleton(qubit: QubitIndex, pos: usize) -> Self {
        Self {
            qubit,
            positions: [pos, pos],
        }
    }

    /// The qubit of the line.
    pub fn qubit(&self) -> QubitIndex {
        self.qubit
    }

    /// First position of the interval.
    pub fn start_pos(&self) -> usize {
        self.positions[0]
    }

    /// Last position of the interval.
    pub fn end_pos(&self) -> usize {
        self.positions[1]
    }

    /// Number of commands in the interval.
    pub fn len(&self) -> usize {
        self.positions[1] - self.positions[0] + 1
    }

    /// Intervals are never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The interval extended by one position, if `pos` is adjacent to it.
    ///
    /// Returns `None` if `pos` is neither just before nor just after the
    /// interval.
    fn extended(self, pos: usize) -> Option<Self> {
        let [start, end] = self.positions;
        if pos + 1 == start {
            Some(Self {
                positions: [pos, end],
                ..self
            })
        } else if pos == end + 1 {
            Some(Self {
                positions: [start, pos],
                ..self
            })
        } else {
            None
        }
    }
}

/// The intervals of a [`Subcircuit`] that change when a node is added to it.
///
/// Computed by [`Subcircuit::extension`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extension {
    node: usize,
    intervals: Vec<Interval>,
}

/// A subgraph within a [`LineScope`].
///
/// Store subgraphs as the set of their commands together with one interval
/// per qubit line they touch. Every line of a subcircuit is contiguous, but
/// the subcircuit as a whole may not be convex; see [`LineScope::is_convex`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Subcircuit {
    nodes: BTreeSet<usize>,
    intervals: BTreeMap<QubitIndex, Interval>,
}

/// Errors that can occur when creating a [`Subcircuit`].
#[derive(Debug, Clone, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum InvalidSubcircuit {
    /// The node is not a command of the circuit.
    #[display("node {_0} is not a command of the circuit")]
    UnknownNode(#[error(not(source))] usize),
    /// The node is not contiguous with the subcircuit.
    #[display("node {_0} is not contiguous with the subcircuit")]
    NotContiguous(#[error(not(source))] usize),
    /// There is a path leaving the subcircuit and coming back into it.
    #[display("subcircuit is not convex")]
    NotConvex,
}

impl Subcircuit {
    /// Create a new empty subcircuit.
    pub fn new_empty() -> Self {
        Self::default()
    }

    /// Create a new subcircuit induced from a set of nodes.
    ///
    /// Fails if the nodes on some qubit line are not contiguous.
    pub fn try_from_nodes(
        nodes: impl IntoIterator<Item = usize>,
        scope: &LineScope,
    ) -> Result<Self, InvalidSubcircuit> {
        let nodes: BTreeSet<usize> = nodes.into_iter().collect();

        // For each line, the interval spanning all nodes and the number of
        // nodes on it.
        let mut intervals: BTreeMap<QubitIndex, (Interval, usize)> = BTreeMap::new();
        for &node in &nodes {
            let cmd = scope
                .circuit()
                .command(node)
                .ok_or(InvalidSubcircuit::UnknownNode(node))?;
            for &qb in cmd.qubits() {
                let pos = scope
                    .position(node, qb)
                    .ok_or(InvalidSubcircuit::UnknownNode(node))?;
                let (interval, count) = intervals
                    .entry(qb)
                    .or_insert((Interval::singleton(qb, pos), 0));
                interval.positions[1] = pos;
                *count += 1;
            }
        }

        // Check that all intervals are full
        if let Some((interval, _)) = intervals.values().find(|(i, count)| i.len() != *count) {
            let node = scope.line(interval.qubit)[interval.start_pos()];
            return Err(InvalidSubcircuit::NotContiguous(node));
        }

        Ok(Self {
            nodes,
            intervals: intervals
                .into_iter()
                .map(|(qb, (interval, _))| (qb, interval))
                .collect(),
        })
    }

    /// Extend the subcircuit to include the given node.
    ///
    /// Return whether the subcircuit was modified, i.e. `false` if the node
    /// was already in the subcircuit. If the node is not contiguous with the
    /// subcircuit on one of its lines, the subcircuit is left unchanged and
    /// an error is returned.
    pub fn try_extend(
        &mut self,
        node: usize,
        scope: &LineScope,
    ) -> Result<bool, InvalidSubcircuit> {
        if self.nodes.contains(&node) {
            return Ok(false);
        }
        let extension = self.extension(node, scope)?;
        self.apply(extension);
        Ok(true)
    }

    /// Compute the changes required to add `node` to the subcircuit, without
    /// modifying it.
    ///
    /// Fails if the node is not contiguous with the subcircuit on one of its
    /// lines.
    pub fn extension(
        &self,
        node: usize,
        scope: &LineScope,
    ) -> Result<Extension, InvalidSubcircuit> {
        let cmd = scope
            .circuit()
            .command(node)
            .ok_or(InvalidSubcircuit::UnknownNode(node))?;
        let intervals = cmd
            .qubits()
            .iter()
            .map(|&qb| {
                let pos = scope
                    .position(node, qb)
                    .ok_or(InvalidSubcircuit::UnknownNode(node))?;
                match self.get_interval(qb) {
                    Some(interval) => interval
                        .extended(pos)
                        .ok_or(InvalidSubcircuit::NotContiguous(node)),
                    None => Ok(Interval::singleton(qb, pos)),
                }
            })
            .collect::<Result<_, _>>()?;
        Ok(Extension { node, intervals })
    }

    /// Add a node to the subcircuit, using an [`Extension`] computed on this
    /// subcircuit.
    pub fn apply(&mut self, extension: Extension) {
        self.intervals.extend(
            extension
                .intervals
                .into_iter()
                .map(|interval| (interval.qubit, interval)),
        );
        self.nodes.insert(extension.node);
    }

    /// Whether the node is part of the subcircuit.
    #[inline]
    pub fn contains(&self, node: usize) -> bool {
        self.nodes.contains(&node)
    }

    /// The nodes of the subcircuit, in topological order.
    pub fn nodes(&self) -> impl DoubleEndedIterator<Item = usize> + '_ {
        self.nodes.iter().copied()
    }

    /// Number of nodes in the subcircuit.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the subcircuit is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the interval of the subcircuit on the given qubit line, if any.
    pub fn get_interval(&self, qubit: QubitIndex) -> Option<Interval> {
        self.intervals.get(&qubit).copied()
    }

    /// The intervals of the subcircuit, one per qubit line.
    pub fn intervals(&self) -> impl Iterator<Item = Interval> + '_ {
        self.intervals.values().copied()
    }

    /// The qubits of the subcircuit, in the order in which they are first
    /// acted on.
    pub fn qubits(&self, scope: &LineScope) -> Vec<QubitIndex> {
        self.nodes
            .iter()
            .filter_map(|&n| scope.circuit().command(n))
            .flat_map(|cmd| cmd.qubits().iter().copied())
            .unique()
            .collect()
    }

    /// Extract the subcircuit as a standalone circuit fragment.
    ///
    /// The qubits of the fragment are the qubits of the subcircuit, in the
    /// order in which they are first acted on.
    pub fn to_circuit(&self, scope: &LineScope) -> Circuit {
        Circuit::from_commands(
            self.nodes
                .iter()
                .filter_map(|&n| scope.circuit().command(n))
                .cloned(),
        )
    }

    /// Check that the subcircuit is convex.
    pub fn validate(&self, scope: &LineScope) -> Result<(), InvalidSubcircuit> {
        if scope.is_convex(self) {
            Ok(())
        } else {
            Err(InvalidSubcircuit::NotConvex)
        }
    }
}

#[cfg(test)]
mod test {
    use cool_asserts::assert_matches;
    use rstest::rstest;

    use super::*;
    use crate::circuit::lines::test::cx_ladder;
    use crate::TketOp;

    fn qb(i: usize) -> QubitIndex {
        QubitIndex::new(i)
    }

    #[test]
    fn from_nodes() {
        let circ = cx_ladder(5);
        let scope = LineScope::new(&circ);

        let subcirc = Subcircuit::try_from_nodes([1, 0, 2], &scope).unwrap();
        assert_eq!(subcirc.node_count(), 3);
        assert_eq!(subcirc.nodes().collect_vec(), vec![0, 1, 2]);
        assert_eq!(subcirc.qubits(&scope), vec![qb(0), qb(1), qb(2), qb(3)]);
        assert_eq!(subcirc.get_interval(qb(1)).map(|i| i.len()), Some(2));
        assert_eq!(subcirc.get_interval(qb(4)), None);

        // q1 line is [0, 1, 6, 7]
        assert_matches!(
            Subcircuit::try_from_nodes([0, 6], &scope),
            Err(InvalidSubcircuit::NotContiguous(0))
        );
        assert_matches!(
            Subcircuit::try_from_nodes([0, 42], &scope),
            Err(InvalidSubcircuit::UnknownNode(42))
        );
    }

    #[rstest]
    #[case::extend_right(vec![0], 1, Ok(true))]
    #[case::extend_left(vec![1], 0, Ok(true))]
    #[case::already_present(vec![0, 1], 1, Ok(false))]
    #[case::new_line(vec![3], 2, Ok(true))]
    #[case::gap(vec![0], 6, Err(InvalidSubcircuit::NotContiguous(6)))]
    fn extend(
        #[case] nodes: Vec<usize>,
        #[case] new_node: usize,
        #[case] expected: Result<bool, InvalidSubcircuit>,
    ) {
        let circ = cx_ladder(5);
        let scope = LineScope::new(&circ);
        let mut subcirc = Subcircuit::try_from_nodes(nodes, &scope).unwrap();
        let before = subcirc.clone();

        if !before.contains(new_node) {
            assert_eq!(subcirc.extension(new_node, &scope).is_ok(), expected.is_ok());
        }
        assert_eq!(subcirc.try_extend(new_node, &scope), expected);
        match expected {
            Err(_) => assert_eq!(subcirc, before),
            Ok(_) => {
                assert!(subcirc.contains(new_node));
                assert_eq!(
                    subcirc,
                    Subcircuit::try_from_nodes(subcirc.nodes().collect_vec(), &scope).unwrap()
                );
            }
        }
    }

    #[test]
    fn extension_is_deferred() {
        let circ = cx_ladder(4);
        let scope = LineScope::new(&circ);
        let mut subcirc = Subcircuit::try_from_nodes([1], &scope).unwrap();
        let before = subcirc.clone();

        let extension = subcirc.extension(2, &scope).unwrap();
        assert_eq!(subcirc, before);
        assert_eq!(
            subcirc.extension(5, &scope),
            Err(InvalidSubcircuit::NotContiguous(5))
        );

        subcirc.apply(extension);
        assert_eq!(subcirc, Subcircuit::try_from_nodes([1, 2], &scope).unwrap());
    }

    #[test]
    fn extract_fragment() {
        let circ = cx_ladder(4);
        let scope = LineScope::new(&circ);
        // CX(1, 2), CX(2, 3), CX(3, 2)
        let subcirc = Subcircuit::try_from_nodes([1, 2, 3], &scope).unwrap();
        let fragment = subcirc.to_circuit(&scope);

        assert_eq!(fragment.qubits(), &[qb(1), qb(2), qb(3)]);
        assert_eq!(fragment.num_operations(), 3);
        assert!(fragment.commands().iter().all(|cmd| cmd.op() == TketOp::CX));
        assert_eq!(subcirc.validate(&scope), Ok(()));

        let non_convex = Subcircuit::try_from_nodes([0, 2], &scope).unwrap();
        assert_eq!(non_convex.validate(&scope), Err(InvalidSubcircuit::NotConvex));
    }
}
