//! The units an operation is applied to.
//!
//! A [`QubitIndex`] is the stable identity of one qubit wire (its "linear
//! index"), tracked along the whole circuit. A [`Param`] is an angle argument,
//! either a known constant or a symbolic expression.

use derive_more::{Display, From, Into};
use serde::{Deserialize, Serialize};
use smol_str::{format_smolstr, SmolStr};

/// The linear index of a qubit wire.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Display,
    From,
    Into,
    Serialize,
    Deserialize,
)]
#[display("q{_0}")]
#[serde(transparent)]
pub struct QubitIndex(usize);

impl QubitIndex {
    /// Creates a new [`QubitIndex`].
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// Returns the index of this [`QubitIndex`].
    pub fn index(&self) -> usize {
        self.0
    }
}

/// An angle parameter, in half-turns.
#[derive(Clone, Debug, PartialEq, Display, Serialize, Deserialize)]
pub enum Param {
    /// A statically known angle.
    #[display("{_0}")]
    Const(f64),
    /// A symbolic angle expression.
    #[display("{_0}")]
    Symbol(SmolStr),
}

impl Param {
    /// The decoded value of the angle, if statically known.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Param::Const(v) => Some(*v),
            Param::Symbol(_) => None,
        }
    }

    /// Multiply the angle by a constant factor.
    pub fn scaled(&self, factor: f64) -> Param {
        match self {
            Param::Const(v) => Param::Const(v * factor),
            Param::Symbol(s) => Param::Symbol(format_smolstr!("({s})*{factor}")),
        }
    }

    /// The opposite angle.
    pub fn negated(&self) -> Param {
        self.scaled(-1.)
    }

    /// Sum of two angles.
    pub fn sum(&self, other: &Param) -> Param {
        match (self, other) {
            (Param::Const(a), Param::Const(b)) => Param::Const(a + b),
            (a, b) => Param::Symbol(format_smolstr!("({a}) + ({b})")),
        }
    }
}

impl From<f64> for Param {
    fn from(value: f64) -> Self {
        Param::Const(value)
    }
}

impl From<&str> for Param {
    fn from(value: &str) -> Self {
        Param::Symbol(value.into())
    }
}
