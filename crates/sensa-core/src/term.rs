//! Symbolic terms: atoms and temporal sequences
//!
//! A term is either an atomic symbol or a binary `&/` (then) compound.
//! Sequences built by chaining events are left-nested oldest-first, so
//! `a, b, g` becomes `((a &/ b) &/ g)`. Equality is structural and exact;
//! any fuzziness in matching belongs to the decision layer, not here.

use std::fmt;
use std::sync::Arc;

/// An immutable symbolic term. Clones are cheap (shared leaves).
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Term {
    Atom(Arc<str>),
    Sequence(Arc<Term>, Arc<Term>),
}

impl Term {
    pub fn atom(name: impl Into<String>) -> Self {
        Term::Atom(Arc::from(name.into()))
    }

    /// `a &/ b`: a happened, then b.
    pub fn sequence(first: &Term, second: &Term) -> Self {
        Term::Sequence(Arc::new(first.clone()), Arc::new(second.clone()))
    }

    pub fn is_atom(&self) -> bool {
        matches!(self, Term::Atom(_))
    }

    /// Number of leaf symbols, in order. A left-nested sequence of n events
    /// has length n; an atom has length 1.
    pub fn length(&self) -> usize {
        match self {
            Term::Atom(_) => 1,
            Term::Sequence(a, b) => a.length() + b.length(),
        }
    }
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Atom(name) => write!(f, "{}", name),
            Term::Sequence(a, b) => write!(f, "({} &/ {})", a, b),
        }
    }
}

impl From<&str> for Term {
    fn from(s: &str) -> Self {
        Term::atom(s)
    }
}
