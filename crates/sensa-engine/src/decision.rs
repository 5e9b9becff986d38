//! Decision making
//!
//! Given a goal and the currently observed contexts, find an operation
//! worth executing: either one whose learned precondition holds right now,
//! or one reached by chaining backwards through preconditions that can
//! themselves be brought about.

use std::collections::HashSet;

use sensa_core::config::DecisionConfig;
use sensa_core::Term;

use crate::memory::Memory;

/// An executable choice: run the operation because `antecedent` currently
/// holds and doing so is expected to bring about `outcome`.
#[derive(Clone, Debug)]
pub struct Chosen {
    pub op_index: usize,
    pub outcome: Term,
    pub antecedent: Term,
    pub expectation: f64,
}

/// Search for an operation serving the goal. Direct matches on the goal
/// itself win; otherwise preconditions of the goal's implications become
/// subgoals, up to the configured depth and branching. The visited set
/// keeps cyclic implication structures from looping.
pub fn choose(memory: &Memory, contexts: &[Term], goal: &Term, cfg: &DecisionConfig) -> Option<Chosen> {
    let mut visited = HashSet::new();
    visited.insert(goal.clone());
    search(memory, contexts, goal, cfg, cfg.max_subgoal_depth, &mut visited)
}

fn search(
    memory: &Memory,
    contexts: &[Term],
    goal: &Term,
    cfg: &DecisionConfig,
    depth: usize,
    visited: &mut HashSet<Term>,
) -> Option<Chosen> {
    if let Some(chosen) = direct_match(memory, contexts, goal, cfg.decision_threshold) {
        return Some(chosen);
    }
    if depth == 0 {
        return None;
    }
    let concept = memory.get(goal)?;
    let mut subgoals: Vec<(&Term, f64)> = Vec::new();
    for table_index in 0..concept.table_count() {
        if let Some(table) = concept.table(table_index) {
            for entry in table.entries() {
                let exp = entry.truth.expectation();
                if exp <= cfg.decision_threshold {
                    break;
                }
                subgoals.push((&entry.antecedent, exp));
            }
        }
    }
    subgoals.sort_by(|a, b| b.1.total_cmp(&a.1));
    subgoals.truncate(cfg.subgoal_branch);
    for (antecedent, _) in subgoals {
        if visited.insert(antecedent.clone()) {
            if let Some(chosen) = search(memory, contexts, antecedent, cfg, depth - 1, visited) {
                return Some(chosen);
            }
        }
    }
    None
}

/// Best implication for the goal whose precondition is currently observed.
/// Longer preconditions are more specific and take priority over higher
/// expectation.
fn direct_match(memory: &Memory, contexts: &[Term], goal: &Term, threshold: f64) -> Option<Chosen> {
    let concept = memory.get(goal)?;
    let mut best: Option<Chosen> = None;
    for op_index in 1..concept.table_count() {
        let table = match concept.table(op_index) {
            Some(t) => t,
            None => continue,
        };
        for entry in table.entries() {
            let exp = entry.truth.expectation();
            if exp <= threshold {
                break;
            }
            if !contexts.contains(&entry.antecedent) {
                continue;
            }
            let better = match &best {
                None => true,
                Some(b) => {
                    let (held, new) = (b.antecedent.length(), entry.antecedent.length());
                    new > held || (new == held && exp > b.expectation)
                }
            };
            if better {
                best = Some(Chosen {
                    op_index,
                    outcome: goal.clone(),
                    antecedent: entry.antecedent.clone(),
                    expectation: exp,
                });
            }
        }
    }
    best
}
