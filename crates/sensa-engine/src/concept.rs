//! Concepts
//!
//! A concept gathers everything learned about one term: how to bring it
//! about with each registered operation, and how it follows from other
//! events on its own.

use sensa_core::Term;

use crate::table::ImplicationTable;

pub struct Concept {
    pub term: Term,
    /// One implication table per registered operation, indexed by
    /// operation id. Index 0 holds implications with no operation.
    tables: Vec<ImplicationTable>,
    /// Cycle at which the concept was last touched; drives eviction.
    pub last_used: u64,
}

impl Concept {
    pub fn new(term: Term, table_count: usize, table_capacity: usize, now: u64) -> Self {
        Concept {
            term,
            tables: (0..table_count)
                .map(|_| ImplicationTable::new(table_capacity))
                .collect(),
            last_used: now,
        }
    }

    pub fn table(&self, op_index: usize) -> Option<&ImplicationTable> {
        self.tables.get(op_index)
    }

    pub fn table_mut(&mut self, op_index: usize) -> Option<&mut ImplicationTable> {
        self.tables.get_mut(op_index)
    }

    pub fn table_count(&self) -> usize {
        self.tables.len()
    }

    /// True when no table holds any implication yet.
    pub fn is_blank(&self) -> bool {
        self.tables.iter().all(|t| t.is_empty())
    }
}
