//! Quantum circuits as topologically ordered streams of commands.
//!
//! A [`Circuit`] is a read-only view of a fragment of a host program: an
//! ordered list of qubit wires (its boundary ports) and the commands applied
//! to them, in topological order. It is the representation handed to
//! matchers, replacers and the equivalence guard. Storing and mutating the
//! full host program is left to the optimisation engine.

mod builder;
pub mod lines;
pub mod units;

pub use builder::{build_simple_circuit, BuildError, CircuitBuilder};
pub use lines::LineScope;
pub use units::{Param, QubitIndex};

use itertools::Itertools;
use serde::{Deserialize, Serialize};

use crate::TketOp;

/// An operation applied to specific qubit wires.
///
/// The number of qubits and parameters always matches the arity of the
/// operation, and no qubit is repeated. Deserialised commands are checked in
/// the same way as [`Command::try_new`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SerialCommand")]
pub struct Command {
    op: TketOp,
    qubits: Vec<QubitIndex>,
    params: Vec<Param>,
}

impl Command {
    /// Create a new command, checking the number of qubits and parameters
    /// against the operation's arity.
    pub fn try_new(
        op: TketOp,
        qubits: impl IntoIterator<Item = QubitIndex>,
        params: impl IntoIterator<Item = Param>,
    ) -> Result<Self, BuildError> {
        let qubits = qubits.into_iter().collect_vec();
        let params = params.into_iter().collect_vec();
        if qubits.len() != op.qubit_count() || params.len() != op.param_count() {
            return Err(BuildError::InvalidArity {
                op,
                qubits: qubits.len(),
                params: params.len(),
            });
        }
        if !qubits.iter().all_unique() {
            return Err(BuildError::RepeatedQubit { op });
        }
        Ok(Self { op, qubits, params })
    }

    /// Create a new command without checking its arity.
    pub(crate) fn new_unchecked(op: TketOp, qubits: Vec<QubitIndex>, params: Vec<Param>) -> Self {
        debug_assert_eq!(qubits.len(), op.qubit_count());
        debug_assert_eq!(params.len(), op.param_count());
        Self { op, qubits, params }
    }

    /// The operation of the command.
    #[inline]
    pub fn op(&self) -> TketOp {
        self.op
    }

    /// The qubit wires the command acts on, in argument order.
    #[inline]
    pub fn qubits(&self) -> &[QubitIndex] {
        &self.qubits
    }

    /// The angle parameters of the command.
    #[inline]
    pub fn params(&self) -> &[Param] {
        &self.params
    }
}

/// Unchecked serialised form of a [`Command`].
#[derive(Deserialize)]
struct SerialCommand {
    op: TketOp,
    qubits: Vec<QubitIndex>,
    params: Vec<Param>,
}

impl TryFrom<SerialCommand> for Command {
    type Error = BuildError;

    fn try_from(value: SerialCommand) -> Result<Self, Self::Error> {
        Command::try_new(value.op, value.qubits, value.params)
    }
}

/// A quantum circuit fragment.
///
/// The qubits of the circuit are its boundary ports: the n-th qubit is the
/// n-th input and the n-th output of the fragment. All commands act on
/// qubits of the circuit.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "SerialCircuit")]
pub struct Circuit {
    qubits: Vec<QubitIndex>,
    commands: Vec<Command>,
}

/// Unchecked serialised form of a [`Circuit`].
#[derive(Deserialize)]
struct SerialCircuit {
    qubits: Vec<QubitIndex>,
    commands: Vec<Command>,
}

impl TryFrom<SerialCircuit> for Circuit {
    type Error = BuildError;

    fn try_from(value: SerialCircuit) -> Result<Self, Self::Error> {
        if let Some(qubit) = value.qubits.iter().duplicates().next() {
            return Err(BuildError::RepeatedBoundaryQubit { qubit: *qubit });
        }
        let mut circ = Circuit {
            qubits: value.qubits,
            commands: Vec::with_capacity(value.commands.len()),
        };
        for cmd in value.commands {
            circ.append(cmd)?;
        }
        Ok(circ)
    }
}

impl Circuit {
    /// Create an empty circuit over the given qubits.
    pub fn with_qubits(qubits: impl IntoIterator<Item = QubitIndex>) -> Self {
        Self {
            qubits: qubits.into_iter().unique().collect(),
            commands: Vec::new(),
        }
    }

    /// Create an empty circuit over qubits `0..num_qubits`.
    pub fn with_qubit_count(num_qubits: usize) -> Self {
        Self::with_qubits((0..num_qubits).map(QubitIndex::new))
    }

    /// Create a circuit from a sequence of commands.
    ///
    /// The qubits of the circuit are the qubits of the commands, in the order
    /// in which they are first used.
    pub fn from_commands(commands: impl IntoIterator<Item = Command>) -> Self {
        let commands = commands.into_iter().collect_vec();
        let qubits = commands
            .iter()
            .flat_map(|cmd| cmd.qubits().iter().copied())
            .unique()
            .collect();
        Self { qubits, commands }
    }

    /// Create a circuit from its qubits and commands, without checking that
    /// the commands only act on the given qubits.
    pub(crate) fn with_commands(qubits: Vec<QubitIndex>, commands: Vec<Command>) -> Self {
        debug_assert!(commands
            .iter()
            .all(|cmd| cmd.qubits().iter().all(|qb| qubits.contains(qb))));
        Self { qubits, commands }
    }

    /// Append a command at the end of the circuit.
    pub fn append(&mut self, command: Command) -> Result<(), BuildError> {
        if let Some(&qb) = command.qubits().iter().find(|&&qb| !self.qubits.contains(&qb)) {
            return Err(BuildError::UnknownQubit {
                op: command.op(),
                qubit: qb,
            });
        }
        self.commands.push(command);
        Ok(())
    }

    /// The qubits of the circuit, in port order.
    #[inline]
    pub fn qubits(&self) -> &[QubitIndex] {
        &self.qubits
    }

    /// Return the number of qubits in the circuit.
    #[inline]
    pub fn qubit_count(&self) -> usize {
        self.qubits.len()
    }

    /// The commands of the circuit, in topological order.
    #[inline]
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// The command at the given node index.
    #[inline]
    pub fn command(&self, node: usize) -> Option<&Command> {
        self.commands.get(node)
    }

    /// Returns the number of operations in the circuit.
    #[inline]
    pub fn num_operations(&self) -> usize {
        self.commands.len()
    }

    /// Returns the number of operations acting on two or more qubits.
    pub fn num_multi_qubit_operations(&self) -> usize {
        self.commands
            .iter()
            .filter(|cmd| cmd.qubits().len() >= 2)
            .count()
    }

    /// The qubits that are acted on by at least one command, in the order in
    /// which they are first used.
    pub fn used_qubits(&self) -> Vec<QubitIndex> {
        self.commands
            .iter()
            .flat_map(|cmd| cmd.qubits().iter().copied())
            .unique()
            .collect()
    }

    /// Consume the circuit, returning its commands.
    pub fn into_commands(self) -> Vec<Command> {
        self.commands
    }
}
