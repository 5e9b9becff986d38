//! Two-stimulus operant discrimination.
//!
//! Stimulus A rewards op_left, stimulus B rewards op_right. Progress is
//! reported every 20 episodes via the learned expectations for both
//! stimulus-operation pairings.

use std::cell::Cell;
use std::rc::Rc;

use sensa_core::{Config, Term};
use sensa_engine::Reasoner;

const OP_LEFT: u8 = 1;
const OP_RIGHT: u8 = 2;

pub struct Stats {
    pub success_a: u32,
    pub success_b: u32,
}

pub fn run(mut config: Config, episodes: u32) -> anyhow::Result<Stats> {
    println!(">>Simple discriminations demo start");
    config.decision.motor_babbling_chance = 0.3;
    let mut r = Reasoner::new(config);

    let term_a = Term::atom("A");
    let term_b = Term::atom("B");
    let term_g = Term::atom("G");

    let last_op = Rc::new(Cell::new(0u8));
    {
        let f = last_op.clone();
        r.add_operation(
            Term::atom("op_left"),
            Box::new(move || {
                f.set(OP_LEFT);
                println!("Executed: op_left");
            }),
        )?;
        let f = last_op.clone();
        r.add_operation(
            Term::atom("op_right"),
            Box::new(move || {
                f.set(OP_RIGHT);
                println!("Executed: op_right");
            }),
        )?;
    }
    let op_left = r.operation_id(&Term::atom("op_left")).ok_or_else(|| anyhow::anyhow!("op_left missing"))?;
    let op_right = r.operation_id(&Term::atom("op_right")).ok_or_else(|| anyhow::anyhow!("op_right missing"))?;

    let mut stats = Stats {
        success_a: 0,
        success_b: 0,
    };

    for episode in 0..episodes {
        let use_a = episode % 2 == 0;
        let stimulus = if use_a { &term_a } else { &term_b };
        last_op.set(0);

        println!("\nEpisode {} stimulus: {}", episode + 1, stimulus);
        r.add_input_belief(stimulus.clone(), 0);
        r.add_input_goal(term_g.clone());
        for _ in 0..32 {
            if last_op.get() != 0 {
                break;
            }
            r.cycles(1);
        }

        let rewarded = (use_a && last_op.get() == OP_LEFT) || (!use_a && last_op.get() == OP_RIGHT);
        if rewarded {
            if use_a {
                stats.success_a += 1;
            } else {
                stats.success_b += 1;
            }
            println!("Reward: G.");
            r.add_input_belief(term_g.clone(), 0);
        } else {
            println!("No reward given.");
        }
        r.cycles(4);

        if (episode + 1) % 20 == 0 {
            let exp_a = r.best_expectation_for(&term_g, op_left, &term_a).unwrap_or(0.0);
            let exp_b = r.best_expectation_for(&term_g, op_right, &term_b).unwrap_or(0.0);
            println!("After {} episodes:", episode + 1);
            println!("  Success A -> left: {}/{} (exp {:.3})", stats.success_a, (episode + 2) / 2, exp_a);
            println!("  Success B -> right: {}/{} (exp {:.3})", stats.success_b, (episode + 1) / 2, exp_b);
        }
    }

    let exp_a = r.best_expectation_for(&term_g, op_left, &term_a).unwrap_or(0.0);
    let exp_b = r.best_expectation_for(&term_g, op_right, &term_b).unwrap_or(0.0);
    println!("\nFinal report:");
    println!("  A -> op_left successes: {} / {}, expectation {:.3}", stats.success_a, (episodes + 1) / 2, exp_a);
    println!("  B -> op_right successes: {} / {}, expectation {:.3}", stats.success_b, episodes / 2, exp_b);
    println!("<<Simple discriminations demo end");
    Ok(stats)
}
