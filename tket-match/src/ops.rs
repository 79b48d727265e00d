use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString, IntoStaticStr};

#[derive(
    Clone,
    Copy,
    Debug,
    Serialize,
    Deserialize,
    Hash,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    EnumIter,
    IntoStaticStr,
    EnumString,
    strum::Display,
)]
#[non_exhaustive]
/// Simple enum of the quantum operations understood by the matchers.
///
/// Rotation angles are expressed in half-turns.
//
// When adding new operations, make sure to also edit:
// - `TketOp::qubit_count` and `TketOp::param_count` in this same file
// - `passes::rebase::canonical_commands`: for the canonical decomposition
pub enum TketOp {
    // Single-qubit gates
    /// Hadamard gate
    H,
    /// Pauli X gate
    X,
    /// Pauli Y gate
    Y,
    /// Pauli Z gate
    Z,
    /// S gate
    S,
    /// Inverse S gate
    Sdg,
    /// T gate
    T,
    /// Inverse T gate
    Tdg,
    /// V gate
    V,
    /// Inverse V gate
    Vdg,
    /// X rotation with an angle parameter in half-turns
    Rx,
    /// Y rotation with an angle parameter in half-turns
    Ry,
    /// Z rotation with an angle parameter in half-turns
    Rz,

    // Two-qubit gates
    /// Controlled X gate
    CX,
    /// Controlled Y gate
    CY,
    /// Controlled Z gate
    CZ,
    /// Controlled Z rotation with an angle parameter in half-turns
    CRz,
    /// ZZPhase gate, with a parameter in half-turns
    ///
    /// ZZPhase(α) = CX · Rz(α) · CX, with the rotation on the target.
    ZZPhase,
    /// Swap two qubits
    SWAP,

    // Three-qubit gates
    /// Toffoli gate, or double-controlled X gate
    CCX,

    // Non unitary operations
    /// Measurement
    Measure,
    /// Reset qubit to |0>
    Reset,
}

impl TketOp {
    /// The number of qubits the operation acts on.
    pub fn qubit_count(&self) -> usize {
        use TketOp::*;
        match self {
            H | X | Y | Z | S | Sdg | T | Tdg | V | Vdg | Rx | Ry | Rz | Measure | Reset => 1,
            CX | CY | CZ | CRz | ZZPhase | SWAP => 2,
            CCX => 3,
        }
    }

    /// The number of angle parameters of the operation.
    pub fn param_count(&self) -> usize {
        use TketOp::*;
        match self {
            Rx | Ry | Rz | CRz | ZZPhase => 1,
            _ => 0,
        }
    }

    /// Check if this op is a unitary quantum op.
    pub fn is_quantum(&self) -> bool {
        !matches!(self, TketOp::Measure | TketOp::Reset)
    }

    /// Whether the op belongs to the canonical gate set {CX, Rz, Rx} that
    /// circuits are normalised to before comparison.
    pub fn is_canonical(&self) -> bool {
        matches!(self, TketOp::CX | TketOp::Rz | TketOp::Rx)
    }

    /// The name of the operation.
    pub fn exposed_name(&self) -> &'static str {
        self.into()
    }
}

/// Error returned when parsing an unknown operation name.
#[derive(Debug, Display, Error, PartialEq, Clone)]
#[display("{name} is not a TketOp.")]
pub struct NotTketOp {
    /// The offending operation name.
    pub name: String,
}

/// Parse an operation from its name.
pub fn parse_op(name: &str) -> Result<TketOp, NotTketOp> {
    name.parse().map_err(|_| NotTketOp {
        name: name.to_string(),
    })
}
