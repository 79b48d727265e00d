//! Utilities for building simple qubit-only circuits.

use derive_more::{Display, Error};

use super::{Circuit, Command, Param, QubitIndex};
use crate::TketOp;

/// Error while building a [`Circuit`] or a [`Command`].
#[derive(Debug, Clone, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum BuildError {
    /// The number of qubits or parameters does not match the operation.
    #[display("{op} expects {} qubits and {} parameters, got {qubits} and {params}", op.qubit_count(), op.param_count())]
    InvalidArity {
        /// The operation being added.
        op: TketOp,
        /// The number of qubits provided.
        qubits: usize,
        /// The number of parameters provided.
        params: usize,
    },
    /// The same qubit is passed twice to an operation.
    #[display("{op} is applied twice to the same qubit")]
    RepeatedQubit {
        /// The operation being added.
        op: TketOp,
    },
    /// The operation acts on a qubit that is not part of the circuit.
    #[display("{op} acts on {qubit}, which is not a qubit of the circuit")]
    UnknownQubit {
        /// The operation being added.
        op: TketOp,
        /// The unknown qubit.
        qubit: QubitIndex,
    },
    /// The same qubit appears twice in the boundary of a circuit.
    #[display("{qubit} appears twice in the circuit qubits")]
    RepeatedBoundaryQubit {
        /// The repeated qubit.
        qubit: QubitIndex,
    },
}

/// A builder appending operations to a [`Circuit`].
#[derive(Debug, Clone, Default)]
pub struct CircuitBuilder {
    circuit: Circuit,
}

impl CircuitBuilder {
    /// Create a builder for a circuit on qubits `0..num_qubits`.
    pub fn new(num_qubits: usize) -> Self {
        Self {
            circuit: Circuit::with_qubit_count(num_qubits),
        }
    }

    /// Append an operation without parameters.
    pub fn append(
        &mut self,
        op: TketOp,
        qubits: impl IntoIterator<Item = usize>,
    ) -> Result<&mut Self, BuildError> {
        self.append_with_params(op, qubits, std::iter::empty::<Param>())
    }

    /// Append an operation with angle parameters.
    pub fn append_with_params<P: Into<Param>>(
        &mut self,
        op: TketOp,
        qubits: impl IntoIterator<Item = usize>,
        params: impl IntoIterator<Item = P>,
    ) -> Result<&mut Self, BuildError> {
        let command = Command::try_new(
            op,
            qubits.into_iter().map(QubitIndex::new),
            params.into_iter().map(Into::into),
        )?;
        self.circuit.append(command)?;
        Ok(self)
    }

    /// Finish building, returning the circuit.
    pub fn finish(self) -> Circuit {
        self.circuit
    }
}

/// Utility for building simple qubit-only circuits.
pub fn build_simple_circuit<F>(num_qubits: usize, f: F) -> Result<Circuit, BuildError>
where
    F: FnOnce(&mut CircuitBuilder) -> Result<(), BuildError>,
{
    let mut builder = CircuitBuilder::new(num_qubits);
    f(&mut builder)?;
    Ok(builder.finish())
}
