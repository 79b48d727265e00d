//! Providing replacements for pattern matches.

use crate::Circuit;

/// Provide possible replacements for a pattern match.
///
/// Returning no replacement refuses the rewrite.
pub trait CircuitReplacer<MatchInfo> {
    /// Get the possible replacements for a pattern match.
    ///
    /// The order of the qubits of the returned circuits must match the order
    /// of the qubits of `fragment`.
    fn replace_match(&self, fragment: &Circuit, match_info: MatchInfo) -> Vec<Circuit>;
}
