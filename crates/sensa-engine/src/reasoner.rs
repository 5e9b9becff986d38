//! The reasoner
//!
//! Event intake, temporal induction, anticipation tracking and the cycle
//! loop. Beliefs queue up between cycles and are worked into the event
//! queue and concept memory in arrival order; goals are acted on
//! immediately so operation callbacks can fire without an intervening
//! cycle.

use std::collections::VecDeque;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use sensa_core::{Config, Error, Event, EventKind, Result, Stamp, Term, Truth};

use crate::concept::Concept;
use crate::decision;
use crate::fifo::Fifo;
use crate::memory::Memory;
use crate::table::Implication;

/// Motor callback, run when the reasoner decides to execute the operation.
pub type OperationCallback = Box<dyn FnMut()>;

/// Handle for a registered operation. Doubles as the index of the
/// operation's implication table within each concept; index 0 is reserved
/// for implications with no operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct OperationId(usize);

impl OperationId {
    pub fn index(self) -> usize {
        self.0
    }
}

struct Operation {
    term: Term,
    callback: OperationCallback,
}

/// An outstanding prediction: executing the operation under `antecedent`
/// should produce `outcome` by `deadline`.
struct Anticipation {
    outcome: Term,
    op_index: usize,
    antecedent: Term,
    deadline: u64,
}

pub struct Reasoner {
    config: Config,
    memory: Memory,
    fifo: Fifo,
    operations: Vec<Operation>,
    pending_inputs: VecDeque<Event>,
    /// Recent goal events, newest first; the newest one is the active goal
    /// while `goal_pending` holds.
    goals: Fifo,
    goal_pending: bool,
    anticipations: Vec<Anticipation>,
    rng: ChaCha8Rng,
    current_time: u64,
    next_stamp_id: u64,
    log_inputs: bool,
}

impl Reasoner {
    pub fn new(config: Config) -> Self {
        let memory = Memory::new(
            config.capacity.concept_capacity,
            config.capacity.max_operations + 1,
            config.capacity.table_size,
        );
        let fifo = Fifo::new(config.capacity.fifo_size);
        let goals = Fifo::new(config.capacity.fifo_size);
        let rng = ChaCha8Rng::seed_from_u64(config.decision.rng_seed);
        Reasoner {
            config,
            memory,
            fifo,
            operations: Vec::new(),
            pending_inputs: VecDeque::new(),
            goals,
            goal_pending: false,
            anticipations: Vec::new(),
            rng,
            current_time: 0,
            next_stamp_id: 0,
            log_inputs: false,
        }
    }

    /// Forget everything learned, keeping registered operations.
    pub fn reset(&mut self) {
        self.memory.clear();
        self.fifo.clear();
        self.pending_inputs.clear();
        self.goals.clear();
        self.goal_pending = false;
        self.anticipations.clear();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.decision.rng_seed);
        self.current_time = 0;
        self.next_stamp_id = 0;
    }

    /// Register a motor operation. The returned id is stable for the
    /// lifetime of the reasoner.
    pub fn add_operation(&mut self, term: Term, callback: OperationCallback) -> Result<OperationId> {
        if self.operations.iter().any(|op| op.term == term) {
            return Err(Error::DuplicateOperation(term.to_string()));
        }
        if self.operations.len() == self.config.capacity.max_operations {
            return Err(Error::OperationCapacity {
                capacity: self.config.capacity.max_operations,
            });
        }
        self.operations.push(Operation { term, callback });
        Ok(OperationId(self.operations.len()))
    }

    pub fn operation_id(&self, term: &Term) -> Option<OperationId> {
        self.operations
            .iter()
            .position(|op| &op.term == term)
            .map(|i| OperationId(i + 1))
    }

    pub fn current_time(&self) -> u64 {
        self.current_time
    }

    /// Echo every input event through the log.
    pub fn set_input_logging(&mut self, enabled: bool) {
        self.log_inputs = enabled;
    }

    pub fn concept(&self, term: &Term) -> Option<&Concept> {
        self.memory.get(term)
    }

    /// Expectation of the implication `precondition =/> goal` learned for
    /// the given operation, if one exists.
    pub fn best_expectation_for(
        &self,
        goal: &Term,
        op: OperationId,
        precondition: &Term,
    ) -> Option<f64> {
        self.memory
            .get(goal)?
            .table(op.index())?
            .find(precondition)
            .map(|e| e.truth.expectation())
    }

    /// Observe the term `offset` cycles from now, with the default input
    /// truth.
    pub fn add_input_belief(&mut self, term: Term, offset: u64) {
        self.add_input(term, EventKind::Belief, Truth::input_default(), offset);
    }

    /// Want the term to hold now. Queued beliefs are worked in first, then
    /// a decision is made immediately, so a learned reaction executes
    /// before this call returns.
    pub fn add_input_goal(&mut self, term: Term) {
        self.add_input(term, EventKind::Goal, Truth::input_default(), 0);
    }

    pub fn add_input(&mut self, term: Term, kind: EventKind, truth: Truth, offset: u64) {
        let stamp = self.fresh_stamp();
        let occurrence = self.current_time + offset;
        let event = match kind {
            EventKind::Belief => Event::belief(term, truth, stamp, occurrence),
            EventKind::Goal => Event::goal(term, truth, stamp, occurrence),
        };
        if self.log_inputs {
            info!("input: {}", event);
        }
        match kind {
            EventKind::Belief => self.pending_inputs.push_back(event),
            EventKind::Goal => {
                self.flush_inputs();
                self.goals.push(event);
                self.goal_pending = true;
                self.decide_pending();
            }
        }
    }

    /// Run the engine for `n` cycles: advance the clock, absorb queued
    /// beliefs, settle due anticipations and re-attempt the pending goal.
    pub fn cycles(&mut self, n: usize) {
        for _ in 0..n {
            self.current_time += 1;
            self.flush_inputs();
            self.expire_anticipations();
            self.decide_pending();
        }
    }

    fn fresh_stamp(&mut self) -> Stamp {
        self.next_stamp_id += 1;
        Stamp::from_id(self.next_stamp_id)
    }

    fn op_index_of(&self, term: &Term) -> Option<usize> {
        self.operations
            .iter()
            .position(|op| &op.term == term)
            .map(|i| i + 1)
    }

    fn flush_inputs(&mut self) {
        while let Some(event) = self.pending_inputs.pop_front() {
            self.process_belief(event);
        }
    }

    fn process_belief(&mut self, event: Event) {
        self.anticipations.retain(|a| a.outcome != event.term);
        match self.op_index_of(&event.term) {
            Some(op_index) => {
                self.anticipate(op_index, &event);
                self.memory.conceptualize(&event.term, self.current_time);
                self.fifo.push(event);
            }
            None => {
                self.memory.conceptualize(&event.term, self.current_time);
                self.fifo.push(event);
                self.conceptualize_sequences();
                self.induce();
            }
        }
    }

    /// Give compound sequences ending at the newest event their own
    /// concepts, so they can serve as goals and survive the event queue.
    fn conceptualize_sequences(&mut self) {
        for len in 2..=self.config.temporal.max_sequence_len {
            if let Some(seq) = self.fifo.kth_newest_sequence(0, len) {
                self.memory.conceptualize(&seq.term, self.current_time);
            }
        }
    }

    /// Temporal induction for the newest event in the queue.
    ///
    /// Preconditions are runs of operation-free consecutive events; an
    /// operation event both fences those runs and names the table the
    /// induced implication lands in. Only the operation nearest to the
    /// outcome is credited, and only when the outcome follows it within
    /// the event horizon.
    fn induce(&mut self) {
        let consequent = match self.fifo.kth_newest(0) {
            Some(e) => e.clone(),
            None => return,
        };
        let horizon = self.config.temporal.event_horizon;

        // No operation involved: the preceding events predict this one.
        let prev = self
            .fifo
            .kth_newest(1)
            .map(|e| (self.op_index_of(&e.term).is_none(), e.occurrence_time));
        if let Some((true, prev_time)) = prev {
            let gap = consequent.occurrence_time.saturating_sub(prev_time);
            if gap <= horizon {
                self.induce_at(0, 1, &consequent, gap);
            }
        }

        // Credit the nearest preceding operation.
        let nearest_op = self
            .fifo
            .iter()
            .enumerate()
            .skip(1)
            .find_map(|(j, e)| self.op_index_of(&e.term).map(|op| (j, op, e.occurrence_time)));
        if let Some((j, op_index, op_time)) = nearest_op {
            let gap = consequent.occurrence_time.saturating_sub(op_time);
            if gap <= horizon {
                self.induce_at(op_index, j + 1, &consequent, gap);
            }
        }
    }

    /// Induce implications with every op-free antecedent run ending at
    /// queue index `start`.
    fn induce_at(&mut self, table_index: usize, start: usize, consequent: &Event, offset: u64) {
        let mut antecedents = Vec::new();
        for len in 1..=self.config.temporal.max_sequence_len {
            let run_is_clear = (start..start + len).all(|i| {
                self.fifo
                    .kth_newest(i)
                    .is_some_and(|e| self.op_index_of(&e.term).is_none())
            });
            if !run_is_clear {
                break;
            }
            if let Some(seq) = self.fifo.kth_newest_sequence(start, len) {
                antecedents.push(seq);
            }
        }
        for antecedent in antecedents {
            if antecedent.stamp.overlaps(&consequent.stamp) {
                continue;
            }
            let implication = Implication {
                antecedent: antecedent.term.clone(),
                truth: Truth::induce(&antecedent.truth, &consequent.truth),
                stamp: Stamp::zip(&antecedent.stamp, &consequent.stamp),
                occurrence_offset: offset as f64,
            };
            debug!(
                "induced: {} =/> {} (table {}) %{:.2};{:.2}%",
                antecedent.term,
                consequent.term,
                table_index,
                implication.truth.frequency,
                implication.truth.confidence
            );
            if let Some(concept) = self.memory.touch_mut(&consequent.term, self.current_time) {
                if let Some(table) = concept.table_mut(table_index) {
                    table.add_and_revise(implication);
                }
            }
        }
    }

    /// On operation arrival, predict the outcomes its implications promise
    /// for the currently observed contexts. The queue has not absorbed the
    /// operation yet, so the contexts are exactly what preceded it.
    fn anticipate(&mut self, op_index: usize, op_event: &Event) {
        let contexts = self.current_contexts();
        let grace = self.config.temporal.anticipation_grace;
        let mut new = Vec::new();
        for concept in self.memory.iter() {
            if let Some(table) = concept.table(op_index) {
                for entry in table.entries() {
                    if contexts.contains(&entry.antecedent) {
                        new.push(Anticipation {
                            outcome: concept.term.clone(),
                            op_index,
                            antecedent: entry.antecedent.clone(),
                            deadline: op_event.occurrence_time
                                + entry.occurrence_offset.round() as u64
                                + grace,
                        });
                    }
                }
            }
        }
        self.anticipations.extend(new);
    }

    /// Anticipations past their deadline failed: the promised outcome never
    /// arrived, which is evidence against the implication that made the
    /// promise.
    fn expire_anticipations(&mut self) {
        let now = self.current_time;
        let confidence = self.config.temporal.anticipation_confidence;
        let mut kept = Vec::new();
        for anticipation in self.anticipations.drain(..) {
            if anticipation.deadline >= now {
                kept.push(anticipation);
                continue;
            }
            debug!(
                "anticipation failed: {} =/> {} (table {})",
                anticipation.antecedent, anticipation.outcome, anticipation.op_index
            );
            if let Some(concept) = self.memory.touch_mut(&anticipation.outcome, now) {
                if let Some(table) = concept.table_mut(anticipation.op_index) {
                    table.punish(&anticipation.antecedent, Truth::new(0.0, confidence));
                }
            }
        }
        self.anticipations = kept;
    }

    /// Operation-free runs of recent events, as matchable context terms.
    fn current_contexts(&self) -> Vec<Term> {
        let mut contexts = Vec::new();
        for len in 1..=self.config.temporal.max_sequence_len {
            let run_is_clear = (0..len).all(|i| {
                self.fifo
                    .kth_newest(i)
                    .is_some_and(|e| self.op_index_of(&e.term).is_none())
            });
            if !run_is_clear {
                break;
            }
            if let Some(seq) = self.fifo.kth_newest_sequence(0, len) {
                contexts.push(seq.term);
            }
        }
        contexts
    }

    fn goal_satisfied(&self, goal: &Event) -> bool {
        self.fifo.iter().any(|e| {
            e.kind == EventKind::Belief
                && e.term == goal.term
                && e.occurrence_time >= goal.occurrence_time
                && e.truth.expectation() > 0.5
        })
    }

    fn decide_pending(&mut self) {
        if !self.goal_pending {
            return;
        }
        let goal = match self.goals.kth_newest(0) {
            Some(g) => g.clone(),
            None => return,
        };
        if self.goal_satisfied(&goal) {
            debug!("goal satisfied: {}", goal.term);
            self.goal_pending = false;
            return;
        }
        let contexts = self.current_contexts();
        if let Some(chosen) = decision::choose(&self.memory, &contexts, &goal.term, &self.config.decision)
        {
            info!(
                "decision: execute op {} for {} given {} (exp {:.3})",
                chosen.op_index, chosen.outcome, chosen.antecedent, chosen.expectation
            );
            self.execute(chosen.op_index);
        } else if !self.operations.is_empty()
            && self.rng.gen::<f64>() < self.config.decision.motor_babbling_chance
        {
            let op_index = self.rng.gen_range(0..self.operations.len()) + 1;
            debug!("babble: execute op {}", op_index);
            self.execute(op_index);
        }
    }

    /// Run the operation's callback and feed the operation back in as an
    /// observed event, so the engine sees its own actions.
    fn execute(&mut self, op_index: usize) {
        let term = {
            let op = &mut self.operations[op_index - 1];
            (op.callback)();
            op.term.clone()
        };
        let stamp = self.fresh_stamp();
        let event = Event::belief(term, Truth::input_default(), stamp, self.current_time);
        self.process_belief(event);
    }
}
