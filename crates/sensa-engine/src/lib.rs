//! sensa-engine - Bounded sensorimotor reasoning
//!
//! Learns temporal implications from event streams, tracks its own
//! predictions, and decides which registered operation serves a goal.
//! Everything is capacity-bounded: the event queue, each implication
//! table, and the concept store.

pub mod concept;
pub mod decision;
pub mod fifo;
pub mod memory;
pub mod queue;
pub mod reasoner;
pub mod table;

pub use concept::Concept;
pub use fifo::Fifo;
pub use memory::Memory;
pub use queue::{Item, PriorityQueue, PushFeedback};
pub use reasoner::{OperationCallback, OperationId, Reasoner};
pub use table::{Implication, ImplicationTable};
