//! Operant conditioning experiments with per-trial CSV export.
//!
//! Both experiments present two stimuli on opposite sides and reward one
//! of two operations depending on where stimulus A1 sits. Experiment 2
//! reverses the contingency mid-run to track relearning.

use std::cell::Cell;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sensa_core::{Config, EventKind, Term, Truth};
use sensa_engine::{OperationId, Reasoner};

const BLOCK_TRIALS: u32 = 12;

const EXP1_BASELINE_BLOCKS: u32 = 3;
const EXP1_TRAINING_BLOCKS: u32 = 3;
const EXP1_TESTING_BLOCKS: u32 = 3;

const EXP2_BASELINE_BLOCKS: u32 = 2;
const EXP2_TRAINING1_BLOCKS: u32 = 4;
const EXP2_TESTING1_BLOCKS: u32 = 2;
const EXP2_TRAINING2_BLOCKS: u32 = 9;
const EXP2_TESTING2_BLOCKS: u32 = 2;

const OP_LEFT: u8 = 1;
const OP_RIGHT: u8 = 2;

struct Setup {
    a1_left: Term,
    a1_right: Term,
    a2_left: Term,
    a2_right: Term,
    /// Percept pair observed when A1 is on the left, as a sequence.
    pair_left: Term,
    /// Percept pair observed when A1 is on the right.
    pair_right: Term,
    goal: Term,
    op_left_term: Term,
    op_right_term: Term,
    op_left: OperationId,
    op_right: OperationId,
    last_op: Rc<Cell<u8>>,
}

fn setup(r: &mut Reasoner, prefix: &str) -> anyhow::Result<Setup> {
    let a1_left = Term::atom(&format!("{prefix}_A1_left"));
    let a1_right = Term::atom(&format!("{prefix}_A1_right"));
    let a2_left = Term::atom(&format!("{prefix}_A2_left"));
    let a2_right = Term::atom(&format!("{prefix}_A2_right"));
    let op_left_term = Term::atom(&format!("{prefix}_op_left"));
    let op_right_term = Term::atom(&format!("{prefix}_op_right"));
    let last_op = Rc::new(Cell::new(0u8));

    let f = last_op.clone();
    let op_left = r.add_operation(op_left_term.clone(), Box::new(move || f.set(OP_LEFT)))?;
    let f = last_op.clone();
    let op_right = r.add_operation(op_right_term.clone(), Box::new(move || f.set(OP_RIGHT)))?;

    Ok(Setup {
        pair_left: Term::sequence(&a1_left, &a2_right),
        pair_right: Term::sequence(&a1_right, &a2_left),
        a1_left,
        a1_right,
        a2_left,
        a2_right,
        goal: Term::atom(&format!("{prefix}_G")),
        op_left_term,
        op_right_term,
        op_left,
        op_right,
        last_op,
    })
}

fn log_trial(
    log: &mut impl Write,
    r: &Reasoner,
    s: &Setup,
    phase: &str,
    block: u32,
    trial: u32,
    a1_on_left: bool,
    chosen: u8,
    success: bool,
) -> anyhow::Result<()> {
    let exp = |op, pair: &Term| {
        r.best_expectation_for(&s.goal, op, pair).unwrap_or(0.0)
    };
    writeln!(
        log,
        "{},{},{},{},{},{},{:.6},{:.6},{:.6},{:.6}",
        phase,
        block + 1,
        trial + 1,
        a1_on_left as u8,
        chosen,
        success as u8,
        exp(s.op_left, &s.pair_left),
        exp(s.op_right, &s.pair_right),
        exp(s.op_left, &s.pair_right),
        exp(s.op_right, &s.pair_left),
    )?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
fn run_trial(
    r: &mut Reasoner,
    s: &Setup,
    fallback_rng: &mut ChaCha8Rng,
    a1_on_left: bool,
    provide_feedback: bool,
    expected: u8,
    phase: &str,
    block: u32,
    trial: u32,
    log: &mut BufWriter<File>,
) -> anyhow::Result<bool> {
    if a1_on_left {
        r.add_input_belief(s.a1_left.clone(), 0);
        r.add_input_belief(s.a2_right.clone(), 0);
    } else {
        r.add_input_belief(s.a1_right.clone(), 0);
        r.add_input_belief(s.a2_left.clone(), 0);
    }

    s.last_op.set(0);
    r.add_input_goal(s.goal.clone());
    for _ in 0..64 {
        if s.last_op.get() != 0 {
            break;
        }
        r.cycles(1);
    }
    // re-issue the goal a few times before falling back to a coin flip
    for _ in 0..4 {
        if s.last_op.get() != 0 {
            break;
        }
        r.add_input_goal(s.goal.clone());
        for _ in 0..64 {
            if s.last_op.get() != 0 {
                break;
            }
            r.cycles(1);
        }
    }
    if s.last_op.get() == 0 {
        let forced = if fallback_rng.gen_bool(0.5) { OP_LEFT } else { OP_RIGHT };
        s.last_op.set(forced);
        let term = if forced == OP_LEFT {
            s.op_left_term.clone()
        } else {
            s.op_right_term.clone()
        };
        r.add_input_belief(term, 0);
    }

    let chosen = s.last_op.get();
    let success = chosen == expected;
    if provide_feedback {
        if success {
            r.add_input_belief(s.goal.clone(), 0);
        } else {
            r.add_input(s.goal.clone(), EventKind::Belief, Truth::new(0.0, 0.9), 0);
        }
    }
    r.cycles(4);
    // inter-trial interval, long enough to decouple consecutive trials
    r.cycles(100);

    log_trial(log, r, s, phase, block, trial, a1_on_left, chosen, success)?;
    Ok(success)
}

/// Runs `blocks` blocks of alternating-side trials.
#[allow(clippy::too_many_arguments)]
fn run_phase(
    r: &mut Reasoner,
    s: &Setup,
    fallback_rng: &mut ChaCha8Rng,
    blocks: u32,
    provide_feedback: bool,
    a1_mapping: bool,
    phase: &str,
    log: &mut BufWriter<File>,
) -> anyhow::Result<()> {
    let mut correct = 0;
    let mut toggle = 0u32;
    for block in 0..blocks {
        for trial in 0..BLOCK_TRIALS {
            let a1_on_left = toggle % 2 == 0;
            toggle += 1;
            let expected = if a1_mapping == a1_on_left { OP_LEFT } else { OP_RIGHT };
            let success = run_trial(
                r,
                s,
                fallback_rng,
                a1_on_left,
                provide_feedback,
                expected,
                phase,
                block,
                trial,
                log,
            )?;
            if success {
                correct += 1;
            }
        }
    }
    tracing::info!(phase, correct, total = blocks * BLOCK_TRIALS, "phase complete");
    Ok(())
}

pub fn exp1_csv(config: Config, path: &Path) -> anyhow::Result<()> {
    let mut log = BufWriter::new(File::create(path)?);
    writeln!(
        log,
        "phase,block,trial,a1_left,chosen_op,correct,exp_a1_left,exp_a1_right,exp_a2_left,exp_a2_right"
    )?;
    let mut fallback_rng = ChaCha8Rng::seed_from_u64(config.decision.rng_seed);
    let mut r = Reasoner::new(config);
    let s = setup(&mut r, "exp1")?;

    run_phase(&mut r, &s, &mut fallback_rng, EXP1_BASELINE_BLOCKS, false, true, "baseline", &mut log)?;
    run_phase(&mut r, &s, &mut fallback_rng, EXP1_TRAINING_BLOCKS, true, true, "training", &mut log)?;
    run_phase(&mut r, &s, &mut fallback_rng, EXP1_TESTING_BLOCKS, false, true, "testing", &mut log)?;

    log.flush()?;
    Ok(())
}

pub fn exp2_csv(config: Config, path: &Path) -> anyhow::Result<()> {
    let mut log = BufWriter::new(File::create(path)?);
    writeln!(
        log,
        "phase,block,trial,a1_left,chosen_op,correct,exp_a1_left,exp_a1_right,exp_a2_left,exp_a2_right"
    )?;
    let mut fallback_rng = ChaCha8Rng::seed_from_u64(config.decision.rng_seed);
    let mut r = Reasoner::new(config);
    let s = setup(&mut r, "exp2")?;

    run_phase(&mut r, &s, &mut fallback_rng, EXP2_BASELINE_BLOCKS, false, true, "baseline", &mut log)?;
    run_phase(&mut r, &s, &mut fallback_rng, EXP2_TRAINING1_BLOCKS, true, true, "training1", &mut log)?;
    run_phase(&mut r, &s, &mut fallback_rng, EXP2_TESTING1_BLOCKS, false, true, "testing1", &mut log)?;
    run_phase(&mut r, &s, &mut fallback_rng, EXP2_TRAINING2_BLOCKS, true, false, "training2", &mut log)?;
    run_phase(&mut r, &s, &mut fallback_rng, EXP2_TESTING2_BLOCKS, false, false, "testing2", &mut log)?;

    log.flush()?;
    Ok(())
}
