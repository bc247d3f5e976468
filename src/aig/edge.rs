//! An [`AigEdge`] points at a [`Gate`] and can be complemented (indicates the presence of a NOT gate).
//!
//! [`Gate`]: crate::Gate

use std::{fmt, ops::Not};

use crate::GateId;

/// An AIGER literal, ie `2 * id + complement`.
pub type Literal = usize;

/// A directed edge between two gates.
///
/// The same type is used on both sides of a connection: a fanin edge stores the
/// driving gate, a fanout edge stores the consuming gate. The edge can carry an
/// inverter according to the value of `complement`.
///
/// ```rust
/// use fraigkit::AigEdge;
/// let e = AigEdge::new(3, false);
/// assert_eq!(e.literal(), 6);
/// assert_eq!(!e, AigEdge::from_literal(7));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AigEdge {
    /// The gate the edge is referring to.
    pub(crate) id: GateId,
    /// Set to true if signal should be inverted.
    pub(crate) complement: bool,
}

impl Not for AigEdge {
    type Output = Self;

    fn not(mut self) -> Self::Output {
        self.complement = !self.complement;
        self
    }
}

impl fmt::Display for AigEdge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.complement {
            write!(f, "!")?;
        }
        write!(f, "{}", self.id)
    }
}

impl AigEdge {
    pub fn new(id: GateId, complement: bool) -> Self {
        AigEdge { id, complement }
    }

    /// Decodes an AIGER literal.
    pub fn from_literal(lit: Literal) -> Self {
        AigEdge {
            id: lit >> 1,
            complement: lit & 1 != 0,
        }
    }

    pub fn literal(&self) -> Literal {
        (self.id << 1) | self.complement as usize
    }

    pub fn get_id(&self) -> GateId {
        self.id
    }

    pub fn get_complement(&self) -> bool {
        self.complement
    }

    /// Returns the same edge with its polarity flipped if `flip` is set.
    pub fn xor(self, flip: bool) -> Self {
        AigEdge {
            id: self.id,
            complement: self.complement ^ flip,
        }
    }

    pub fn is_cst_false(&self) -> bool {
        self.id == 0 && !self.complement
    }

    pub fn is_cst_true(&self) -> bool {
        self.id == 0 && self.complement
    }

    pub fn is_complement_of(&self, other: &AigEdge) -> bool {
        self.id == other.id && self.complement ^ other.complement
    }
}
