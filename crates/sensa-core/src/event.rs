//! Timestamped events flowing through the engine.

use std::fmt;

use crate::stamp::Stamp;
use crate::term::Term;
use crate::truth::Truth;

/// Whether an event reports something observed or something wanted.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EventKind {
    Belief,
    Goal,
}

/// A term attached to a truth value, evidence stamp and occurrence time.
#[derive(Clone, Debug)]
pub struct Event {
    pub term: Term,
    pub kind: EventKind,
    pub truth: Truth,
    pub stamp: Stamp,
    pub occurrence_time: u64,
}

impl Event {
    pub fn belief(term: Term, truth: Truth, stamp: Stamp, occurrence_time: u64) -> Self {
        Event {
            term,
            kind: EventKind::Belief,
            truth,
            stamp,
            occurrence_time,
        }
    }

    pub fn goal(term: Term, truth: Truth, stamp: Stamp, occurrence_time: u64) -> Self {
        Event {
            term,
            kind: EventKind::Goal,
            truth,
            stamp,
            occurrence_time,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let punct = match self.kind {
            EventKind::Belief => ".",
            EventKind::Goal => "!",
        };
        write!(
            f,
            "{}{} :|: %{:.2};{:.2}% @{}",
            self.term, punct, self.truth.frequency, self.truth.confidence, self.occurrence_time
        )
    }
}
