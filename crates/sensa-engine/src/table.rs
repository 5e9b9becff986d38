//! Implication tables
//!
//! Each table collects procedural implications sharing a consequent and an
//! operation, ranked by expectation so the most useful entry is always
//! first. Tables are bounded; the weakest entry makes room for a stronger
//! newcomer.

use std::cmp::Ordering;

use sensa_core::{Stamp, Term, Truth};
use sensa_core::truth::c2w;

/// A learned temporal implication: when `antecedent` held and this table's
/// operation ran, the table's consequent followed after roughly
/// `occurrence_offset` cycles.
#[derive(Clone, Debug)]
pub struct Implication {
    pub antecedent: Term,
    pub truth: Truth,
    pub stamp: Stamp,
    /// Learned delay between operation and consequent, in cycles.
    pub occurrence_offset: f64,
}

impl Implication {
    fn rank(&self, other: &Implication) -> Ordering {
        other
            .truth
            .expectation()
            .total_cmp(&self.truth.expectation())
            .then(other.truth.confidence.total_cmp(&self.truth.confidence))
    }
}

pub struct ImplicationTable {
    entries: Vec<Implication>,
    capacity: usize,
}

impl ImplicationTable {
    pub fn new(capacity: usize) -> Self {
        ImplicationTable {
            entries: Vec::new(),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Implication] {
        &self.entries
    }

    pub fn find(&self, antecedent: &Term) -> Option<&Implication> {
        self.entries.iter().find(|e| &e.antecedent == antecedent)
    }

    /// Insert keeping rank order. Returns the entry dropped to stay within
    /// capacity, which is the new one when it ranks below everything held.
    pub fn add(&mut self, implication: Implication) -> Option<Implication> {
        let at = self
            .entries
            .partition_point(|e| e.rank(&implication) != Ordering::Greater);
        self.entries.insert(at, implication);
        if self.entries.len() > self.capacity {
            self.entries.pop()
        } else {
            None
        }
    }

    /// Merge new evidence into the entry with the same antecedent, or add a
    /// fresh entry when there is none. Overlapping stamps mean the evidence
    /// is not independent; the new observation is discarded and the entry
    /// stays unchanged.
    pub fn add_and_revise(&mut self, implication: Implication) -> Option<Implication> {
        match self
            .entries
            .iter()
            .position(|e| e.antecedent == implication.antecedent)
        {
            Some(i) => {
                if self.entries[i].stamp.overlaps(&implication.stamp) {
                    return None;
                }
                let existing = self.entries.remove(i);
                let w1 = c2w(existing.truth.confidence);
                let w2 = c2w(implication.truth.confidence);
                let offset = if w1 + w2 > 0.0 {
                    (w1 * existing.occurrence_offset + w2 * implication.occurrence_offset)
                        / (w1 + w2)
                } else {
                    existing.occurrence_offset
                };
                self.add(Implication {
                    antecedent: existing.antecedent,
                    truth: existing.truth.revise(&implication.truth),
                    stamp: Stamp::zip(&existing.stamp, &implication.stamp),
                    occurrence_offset: offset,
                })
            }
            None => self.add(implication),
        }
    }

    /// Apply evidence to an existing entry regardless of stamp overlap.
    /// Used for anticipation failures, where the negative evidence is the
    /// absence of an event and has no stamp of its own.
    pub fn punish(&mut self, antecedent: &Term, negative: Truth) {
        if let Some(i) = self
            .entries
            .iter()
            .position(|e| &e.antecedent == antecedent)
        {
            let mut entry = self.entries.remove(i);
            entry.truth = entry.truth.revise(&negative);
            self.add(entry);
        }
    }
}
