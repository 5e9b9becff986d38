//! Concept memory
//!
//! Bounded store of concepts keyed by term. Attention is recency-based:
//! touching a concept raises its priority, and when the store is full the
//! least recently used concept is evicted to admit a new one.

use sensa_core::Term;

use crate::concept::Concept;
use crate::queue::PriorityQueue;

pub struct Memory {
    concepts: PriorityQueue<Concept>,
    table_count: usize,
    table_capacity: usize,
}

impl Memory {
    pub fn new(concept_capacity: usize, table_count: usize, table_capacity: usize) -> Self {
        Memory {
            concepts: PriorityQueue::new(concept_capacity),
            table_count,
            table_capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.concepts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.concepts.is_empty()
    }

    pub fn contains(&self, term: &Term) -> bool {
        self.concepts.position(|c| &c.term == term).is_some()
    }

    pub fn get(&self, term: &Term) -> Option<&Concept> {
        let idx = self.concepts.position(|c| &c.term == term)?;
        self.concepts.get(idx).map(|item| &item.value)
    }

    /// Ensure a concept for the term exists, marking it used now. Returns
    /// the concept evicted to make room, if any.
    pub fn conceptualize(&mut self, term: &Term, now: u64) -> Option<Concept> {
        if let Some(idx) = self.concepts.position(|c| &c.term == term) {
            let at = self.concepts.reprioritize(idx, now as f64);
            if let Some(item) = self.concepts.get_mut(at) {
                item.value.last_used = now;
            }
            return None;
        }
        let concept = Concept::new(term.clone(), self.table_count, self.table_capacity, now);
        let feedback = self.concepts.push(now as f64, concept);
        if !feedback.added {
            // Ties on recency can make the push lose against the current
            // minimum; the newcomer still wins over the stalest concept.
            let evicted = self.concepts.pop_min();
            let concept = Concept::new(term.clone(), self.table_count, self.table_capacity, now);
            self.concepts.push(now as f64, concept);
            return evicted;
        }
        feedback.evicted.map(|i| i.value)
    }

    /// Mutable access that also refreshes the concept's recency.
    pub fn touch_mut(&mut self, term: &Term, now: u64) -> Option<&mut Concept> {
        let idx = self.concepts.position(|c| &c.term == term)?;
        let at = self.concepts.reprioritize(idx, now as f64);
        self.concepts.get_mut(at).map(|item| {
            item.value.last_used = now;
            &mut item.value
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Concept> {
        self.concepts.iter().map(|item| &item.value)
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut Concept> {
        self.concepts.iter_mut().map(|item| &mut item.value)
    }

    pub fn clear(&mut self) {
        self.concepts.clear();
    }
}
