//! Bounded event queue
//!
//! Holds the most recent events in arrival order, newest at index 0.
//! Compound sequences are built on demand from runs of consecutive
//! entries, so the queue is also the engine's short-term context.

use std::collections::VecDeque;

use sensa_core::{Event, Stamp, Term};

pub struct Fifo {
    events: VecDeque<Event>,
    capacity: usize,
}

impl Fifo {
    pub fn new(capacity: usize) -> Self {
        Fifo {
            events: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Add an event as the newest entry. Returns the oldest event when the
    /// queue was already full.
    pub fn push(&mut self, event: Event) -> Option<Event> {
        let evicted = if self.events.len() == self.capacity {
            self.events.pop_back()
        } else {
            None
        };
        self.events.push_front(event);
        evicted
    }

    /// The k-th most recent event; `kth_newest(0)` is the latest arrival.
    pub fn kth_newest(&self, k: usize) -> Option<&Event> {
        self.events.get(k)
    }

    /// Compound event covering `len` consecutive entries, the newest of
    /// which is the k-th most recent. The term nests left, oldest element
    /// first, so `(a &/ b) &/ c` reads in arrival order. Truth is the
    /// intersection of the components, the stamp their joint provenance,
    /// and the occurrence time that of the newest component.
    pub fn kth_newest_sequence(&self, k: usize, len: usize) -> Option<Event> {
        if len == 0 || k + len > self.events.len() {
            return None;
        }
        let oldest = &self.events[k + len - 1];
        let mut term = oldest.term.clone();
        let mut truth = oldest.truth;
        let mut stamp = oldest.stamp.clone();
        for i in (k..k + len - 1).rev() {
            let e = &self.events[i];
            term = Term::sequence(&term, &e.term);
            truth = truth.intersect(&e.truth);
            stamp = Stamp::zip(&stamp, &e.stamp);
        }
        let newest = &self.events[k];
        Some(Event {
            term,
            kind: newest.kind,
            truth,
            stamp,
            occurrence_time: newest.occurrence_time,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
