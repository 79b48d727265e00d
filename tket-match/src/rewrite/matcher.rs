//! Pattern matching in circuits.
//!
//! A [`CircuitMatcher`] is a state machine that is fed the operations of a
//! circuit one at a time, in topological order. Every candidate match (an
//! "attempt") carries its own [`CircuitMatcher::PartialMatchInfo`], starting
//! from the default value. For each operation, the matcher decides whether
//! the attempt proceeds, skips the operation, stops or completes; see
//! [`MatchOutcome`].

use derive_more::{Display, Error};
use itertools::Itertools;

use crate::circuit::{LineScope, QubitIndex};
use crate::subcircuit::Subcircuit;
use crate::TketOp;

mod adapter;
pub use adapter::{CircuitMatchAdapter, CompletedMatch, MatchingOptions};

/// Tracing target for match attempt events.
pub const LOG_TARGET: &str = "tket_match::matcher";

/// Position of an operation on a qubit line, relative to the operations of
/// the current attempt on that line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinearPos {
    /// The operation is before the first matched operation on the qubit.
    Before,
    /// The operation is after the last matched operation on the qubit.
    After,
    /// No operation on the qubit has been matched yet.
    Unconstrained,
}

/// An argument to a Tket operation.
///
/// The qubit arguments of an operation come first, in argument order,
/// followed by its angle parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OpArg {
    /// Argument is on the provided qubit index, at the given position
    /// relative to the current attempt.
    Qubit(QubitIndex, LinearPos),
    /// Argument is a constant value. The value is known only if it could be
    /// statically decoded as a floating point number.
    Const(Option<f64>),
    /// An argument that cannot be interpreted.
    Opaque,
}

impl OpArg {
    /// The qubit of a qubit argument.
    pub fn qubit(&self) -> Option<QubitIndex> {
        match self {
            OpArg::Qubit(qb, _) => Some(*qb),
            _ => None,
        }
    }

    /// The relative position of a qubit argument.
    pub fn linear_pos(&self) -> Option<LinearPos> {
        match self {
            OpArg::Qubit(_, pos) => Some(*pos),
            _ => None,
        }
    }

    /// The value of a statically known constant argument.
    pub fn const_f64(&self) -> Option<f64> {
        match self {
            OpArg::Const(v) => *v,
            _ => None,
        }
    }

    /// Compute the argument for `qubit` of operation `node`, relative to the
    /// current `subcircuit`.
    ///
    /// Returns `None` if the node is neither before nor after the subcircuit on
    /// the qubit line.
    pub(crate) fn relative_to(
        qubit: QubitIndex,
        node: usize,
        subcircuit: &Subcircuit,
        scope: &LineScope,
    ) -> Option<OpArg> {
        let pos = scope.position(node, qubit)?;
        let Some(interval) = subcircuit.get_interval(qubit) else {
            // Unknown qubit line, cannot specify relative position.
            return Some(OpArg::Qubit(qubit, LinearPos::Unconstrained));
        };

        if pos < interval.start_pos() {
            Some(OpArg::Qubit(qubit, LinearPos::Before))
        } else if pos > interval.end_pos() {
            Some(OpArg::Qubit(qubit, LinearPos::After))
        } else {
            None
        }
    }
}

/// The result of feeding an operation to a match attempt.
///
/// Exactly one outcome is reported for every operation.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome<PartialMatchInfo, MatchInfo> {
    /// The op was successfully matched: add it to the attempt and continue
    /// matching with the new state.
    Proceed(PartialMatchInfo),
    /// The op is irrelevant to the attempt: continue matching without it,
    /// with an unchanged state.
    Skip,
    /// The attempt is invalidated and must be discarded.
    Stop,
    /// The pattern is fully matched: add the op to the attempt and report the
    /// match. The attempt is finished.
    Complete(MatchInfo),
}

impl<PartialMatchInfo, MatchInfo> MatchOutcome<PartialMatchInfo, MatchInfo> {
    /// Stop matching.
    #[must_use]
    pub fn stop() -> Self {
        Self::Stop
    }

    /// Skip the current op and continue matching.
    #[must_use]
    pub fn skip() -> Self {
        Self::Skip
    }

    /// Report a partial match: add current op to the match and continue matching.
    #[must_use]
    pub fn proceed(partial_match: PartialMatchInfo) -> Self {
        Self::Proceed(partial_match)
    }

    /// Report a complete match: add current op to the match and report it to the user.
    #[must_use]
    pub fn complete(match_info: MatchInfo) -> Self {
        Self::Complete(match_info)
    }

    /// Whether the outcome ends the attempt.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Stop | Self::Complete(_))
    }

    /// Map the match outcome to new types.
    #[must_use]
    pub fn map<NewPartialMatchInfo, NewMatchInfo>(
        self,
        f: impl FnOnce(PartialMatchInfo) -> NewPartialMatchInfo,
        g: impl FnOnce(MatchInfo) -> NewMatchInfo,
    ) -> MatchOutcome<NewPartialMatchInfo, NewMatchInfo> {
        match self {
            Self::Proceed(p) => MatchOutcome::Proceed(f(p)),
            Self::Skip => MatchOutcome::Skip,
            Self::Stop => MatchOutcome::Stop,
            Self::Complete(m) => MatchOutcome::Complete(g(m)),
        }
    }
}

/// Context of a partial match, passed to [`CircuitMatcher::match_tket_op`].
#[derive(Debug, Clone)]
pub struct MatchContext<PartialMatchInfo> {
    /// The current partial match info.
    pub match_info: PartialMatchInfo,
    /// The node of the current operation.
    pub op_node: usize,
}

/// Errors caused by malformed operation arguments.
#[derive(Debug, Clone, PartialEq, Display, Error)]
#[non_exhaustive]
pub enum MatchError {
    /// The number of arguments does not match the operation.
    #[display("{op} expects {expected} arguments, got {found}")]
    InvalidArity {
        /// The operation.
        op: TketOp,
        /// The expected number of arguments.
        expected: usize,
        /// The number of arguments received.
        found: usize,
    },
    /// A qubit argument was expected.
    #[display("argument {position} of {op} is not a qubit")]
    ExpectedQubit {
        /// The operation.
        op: TketOp,
        /// The position of the offending argument.
        position: usize,
    },
    /// The same qubit is passed twice to an operation.
    #[display("{op} is applied twice to {qubit}")]
    RepeatedQubit {
        /// The operation.
        op: TketOp,
        /// The repeated qubit.
        qubit: QubitIndex,
    },
}

/// A trait for pattern matching in circuits.
///
/// Implementations must be pure: the outcome only depends on the operation,
/// its arguments and the partial match info.
pub trait CircuitMatcher {
    /// Context of a partial match.
    type PartialMatchInfo: Clone + Default;

    /// Description of a full match.
    type MatchInfo;

    /// Whether to match a (quantum) operation and expand the match.
    fn match_tket_op(
        &self,
        op: TketOp,
        op_args: &[OpArg],
        match_context: MatchContext<Self::PartialMatchInfo>,
    ) -> Result<MatchOutcome<Self::PartialMatchInfo, Self::MatchInfo>, MatchError>;

    /// Convert the matcher to a [`CircuitMatchAdapter`], specialised in
    /// matching patterns in concrete circuits.
    fn as_circuit_matcher(&self) -> CircuitMatchAdapter<'_, Self> {
        CircuitMatchAdapter::new(self)
    }
}

/// Whether all qubit arguments come after the operations matched so far.
///
/// Qubits that have not been matched yet impose no constraint.
pub fn succeeds_previous_op(op_args: &[OpArg]) -> bool {
    op_args
        .iter()
        .filter_map(OpArg::linear_pos)
        .all(|pos| pos != LinearPos::Before)
}

/// Check the arguments of `op` and return its qubits, in argument order.
///
/// The qubits must be distinct.
pub fn qubit_indices(op: TketOp, op_args: &[OpArg]) -> Result<Vec<QubitIndex>, MatchError> {
    let expected = op.qubit_count() + op.param_count();
    if op_args.len() != expected {
        return Err(MatchError::InvalidArity {
            op,
            expected,
            found: op_args.len(),
        });
    }
    let qubits = op_args[..op.qubit_count()]
        .iter()
        .enumerate()
        .map(|(position, arg)| arg.qubit().ok_or(MatchError::ExpectedQubit { op, position }))
        .collect::<Result<Vec<_>, _>>()?;
    if let Some(&qubit) = qubits.iter().duplicates().next() {
        return Err(MatchError::RepeatedQubit { op, qubit });
    }
    Ok(qubits)
}

/// The statically known value of the first angle parameter of `op`.
pub fn const_angle(op: TketOp, op_args: &[OpArg]) -> Option<f64> {
    if op.param_count() == 0 {
        return None;
    }
    op_args.get(op.qubit_count())?.const_f64()
}
