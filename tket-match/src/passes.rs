//! Local circuit transformations used by the replacers and the equivalence
//! guard.

pub mod rebase;
pub use rebase::rebase_to_canonical;

pub mod squash;
pub use squash::{PeepholeSquash, SquashOptions};

use crate::Circuit;

/// Resynthesise a circuit fragment into equivalent candidate fragments.
///
/// The candidates must act on the same qubits as the input, in the same
/// order.
pub trait Resynthesise {
    /// Get the candidate resyntheses of `fragment`.
    fn resynthesise(&self, fragment: &Circuit) -> Vec<Circuit>;
}
