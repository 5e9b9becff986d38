//! End-to-end learning scenarios: procedure acquisition, multi-step goal
//! pursuit, anticipation-driven unlearning, and context discrimination.

use std::cell::Cell;
use std::rc::Rc;

use sensa_core::{Config, Term};
use sensa_engine::Reasoner;

fn engine() -> Reasoner {
    Reasoner::new(Config::default().without_babbling())
}

fn counter_op(r: &mut Reasoner, name: &str) -> Rc<Cell<u32>> {
    let count = Rc::new(Cell::new(0));
    let c = count.clone();
    r.add_operation(Term::atom(name), Box::new(move || c.set(c.get() + 1)))
        .expect("operation registers");
    count
}

fn seq(a: &str, b: &str) -> Term {
    Term::sequence(&Term::atom(a), &Term::atom(b))
}

// ===========================================================================
// Procedure acquisition
// ===========================================================================

#[test]
fn procedure_learned_from_one_observation() {
    let mut r = engine();
    let executed = counter_op(&mut r, "^op");

    r.add_input_belief(Term::atom("a"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("^op"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("g"), 0);
    r.cycles(10);

    r.add_input_belief(Term::atom("a"), 0);
    r.add_input_goal(Term::atom("g"));

    assert_eq!(executed.get(), 1, "one observed a-^op-g episode suffices");
    let op = r.operation_id(&Term::atom("^op")).unwrap();
    let exp = r
        .best_expectation_for(&Term::atom("g"), op, &Term::atom("a"))
        .unwrap();
    assert!(exp > 0.501 && exp < 0.95);
}

#[test]
fn goal_without_matching_context_does_nothing() {
    let mut r = engine();
    let executed = counter_op(&mut r, "^op");

    r.add_input_belief(Term::atom("a"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("^op"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("g"), 0);
    r.cycles(10);

    r.add_input_belief(Term::atom("unrelated"), 0);
    r.add_input_goal(Term::atom("g"));
    r.cycles(5);

    assert_eq!(executed.get(), 0);
}

#[test]
fn satisfied_goal_triggers_nothing() {
    let mut r = engine();
    let executed = counter_op(&mut r, "^op");

    r.add_input_belief(Term::atom("a"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("^op"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("g"), 0);
    r.cycles(10);

    // g is already the case when the goal arrives
    r.add_input_belief(Term::atom("a"), 0);
    r.add_input_belief(Term::atom("g"), 0);
    r.add_input_goal(Term::atom("g"));
    r.cycles(5);

    assert_eq!(executed.get(), 0);
}

// ===========================================================================
// Reactive following, bootstrapped by motor babbling
// ===========================================================================

#[test]
fn babbling_bootstraps_a_reactive_policy() {
    let mut r = Reasoner::new(Config::default());
    let executed = counter_op(&mut r, "^op");

    let mut rewarded = 0u32;
    let mut last = 0;
    for _ in 0..100 {
        r.add_input_belief(Term::atom("a"), 0);
        r.add_input_goal(Term::atom("g"));
        if executed.get() > last {
            last = executed.get();
            rewarded += 1;
            r.add_input_belief(Term::atom("g"), 0);
        }
        r.cycles(1);
    }

    assert!(rewarded > 50, "policy should lock in well before 100 trials");
    let op = r.operation_id(&Term::atom("^op")).unwrap();
    let exp = r
        .best_expectation_for(&Term::atom("g"), op, &Term::atom("a"))
        .unwrap();
    assert!(exp > 0.8);
}

// ===========================================================================
// Multi-step goal pursuit
// ===========================================================================

#[test]
fn two_operation_chain_is_executed_step_by_step() {
    let mut r = engine();
    let goto = counter_op(&mut r, "^goto");
    let activate = counter_op(&mut r, "^activate");

    for _ in 0..5 {
        r.add_input_belief(Term::atom("start_at"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^goto"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("switch_at"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^activate"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("light_active"), 0);
        r.cycles(10);
    }

    r.add_input_belief(Term::atom("start_at"), 0);
    r.add_input_goal(Term::atom("light_active"));
    assert_eq!(goto.get(), 1, "unreachable goal should regress to its precondition");
    assert_eq!(activate.get(), 0);

    // the environment reacts to the movement
    r.add_input_belief(Term::atom("switch_at"), 0);
    r.cycles(1);
    assert_eq!(activate.get(), 1, "with the switch reached, the goal is directly servable");

    r.add_input_belief(Term::atom("light_active"), 0);
    r.cycles(5);
    assert_eq!(goto.get(), 1);
    assert_eq!(activate.get(), 1);
}

#[test]
fn chain_through_an_operation_free_link() {
    let mut r = engine();
    let executed = counter_op(&mut r, "^op");

    // ^op brings about m from s; g follows m on its own, far enough from
    // the operation that m is the only thing credited for it
    for _ in 0..5 {
        r.add_input_belief(Term::atom("s"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op"), 0);
        r.cycles(10);
        r.add_input_belief(Term::atom("m"), 0);
        r.cycles(15);
        r.add_input_belief(Term::atom("g"), 0);
        r.cycles(12);
    }

    r.add_input_belief(Term::atom("s"), 0);
    r.add_input_goal(Term::atom("g"));
    assert_eq!(executed.get(), 1, "g has no operation of its own; m is the subgoal");

    r.add_input_belief(Term::atom("m"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("g"), 0);
    r.cycles(5);
    assert_eq!(executed.get(), 1, "no further execution once the chain ran");
}

// ===========================================================================
// Anticipation: failed predictions weaken implications
// ===========================================================================

#[test]
fn failed_anticipation_weakens_the_implication() {
    let mut r = engine();
    let _op = counter_op(&mut r, "^op");
    let op = r.operation_id(&Term::atom("^op")).unwrap();

    for _ in 0..3 {
        r.add_input_belief(Term::atom("b"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("g"), 0);
        r.cycles(12);
    }
    let trained = r
        .best_expectation_for(&Term::atom("g"), op, &Term::atom("b"))
        .unwrap();

    // same context and operation, but the outcome stops coming
    for _ in 0..10 {
        r.add_input_belief(Term::atom("b"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op"), 0);
        r.cycles(12);
    }
    let punished = r
        .best_expectation_for(&Term::atom("g"), op, &Term::atom("b"))
        .unwrap();
    assert!(punished < trained);
}

#[test]
fn competing_operation_wins_after_unlearning() {
    let mut r = engine();
    let op1_count = counter_op(&mut r, "^op1");
    let op2_count = counter_op(&mut r, "^op2");
    let op1 = r.operation_id(&Term::atom("^op1")).unwrap();
    let op2 = r.operation_id(&Term::atom("^op2")).unwrap();

    // ^op1 under b once seemed to produce g
    for _ in 0..3 {
        r.add_input_belief(Term::atom("b"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op1"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("g"), 0);
        r.cycles(12);
    }
    // ...but stops delivering
    for _ in 0..60 {
        r.add_input_belief(Term::atom("b"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op1"), 0);
        r.cycles(12);
    }
    // ^op2 delivers reliably
    for _ in 0..3 {
        r.add_input_belief(Term::atom("b"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op2"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("g"), 0);
        r.cycles(12);
    }

    let via_op1 = r
        .best_expectation_for(&Term::atom("g"), op1, &Term::atom("b"))
        .unwrap();
    let via_op2 = r
        .best_expectation_for(&Term::atom("g"), op2, &Term::atom("b"))
        .unwrap();
    assert!(via_op2 > via_op1);

    r.add_input_belief(Term::atom("b"), 0);
    r.add_input_goal(Term::atom("g"));
    assert_eq!(op2_count.get(), 1);
    assert_eq!(op1_count.get(), 0);
}

// ===========================================================================
// Sequence contexts: longer preconditions are more specific
// ===========================================================================

#[test]
fn sequence_context_discriminates_where_single_event_fails() {
    let mut r = engine();
    let executed = counter_op(&mut r, "^op");
    let op = r.operation_id(&Term::atom("^op")).unwrap();

    // a then b, then the operation, produces g
    for _ in 0..3 {
        r.add_input_belief(Term::atom("a"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("b"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("g"), 0);
        r.cycles(12);
    }
    // x then b does not, however often tried
    for _ in 0..150 {
        r.add_input_belief(Term::atom("x"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("b"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("^op"), 0);
        r.cycles(12);
    }

    let on_pair = r
        .best_expectation_for(&Term::atom("g"), op, &seq("a", "b"))
        .unwrap();
    let on_single = r
        .best_expectation_for(&Term::atom("g"), op, &Term::atom("b"))
        .unwrap();
    assert!(on_pair > on_single);
    assert!(on_single <= 0.501, "the bare-b rule must fall below the decision bar");

    // wanting g after x, b stays passive
    r.add_input_belief(Term::atom("x"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("b"), 0);
    r.add_input_goal(Term::atom("g"));
    r.cycles(25);
    assert_eq!(executed.get(), 0);

    // after a, b the still-pending goal fires the operation
    r.add_input_belief(Term::atom("a"), 0);
    r.cycles(1);
    r.add_input_belief(Term::atom("b"), 0);
    r.cycles(1);
    assert_eq!(executed.get(), 1);
}

#[test]
fn compound_concepts_form_along_the_stream() {
    let mut r = engine();
    let _executed = counter_op(&mut r, "op_left");
    let op = r.operation_id(&Term::atom("op_left")).unwrap();

    for _ in 0..3 {
        r.add_input_belief(Term::atom("A"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("B"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("op_left"), 0);
        r.cycles(1);
        r.add_input_belief(Term::atom("G"), 0);
        r.cycles(10);
    }

    assert!(r.concept(&seq("A", "B")).is_some());
    let b_op_g = Term::sequence(&seq("B", "op_left"), &Term::atom("G"));
    assert!(r.concept(&b_op_g).is_some());

    let exp = r
        .best_expectation_for(&Term::atom("G"), op, &seq("A", "B"))
        .unwrap();
    assert!(exp > 0.5);
}

// ===========================================================================
// Stimulus discrimination with two operations
// ===========================================================================

#[test]
fn two_stimuli_map_to_their_rewarded_operations() {
    let mut r = Reasoner::new(Config::default());
    let op1_count = counter_op(&mut r, "^op1");
    let op2_count = counter_op(&mut r, "^op2");
    let op1 = r.operation_id(&Term::atom("^op1")).unwrap();
    let op2 = r.operation_id(&Term::atom("^op2")).unwrap();

    let mut last1 = 0;
    let mut last2 = 0;
    for trial in 0..200 {
        let stimulus = if trial % 2 == 0 { "s1" } else { "s2" };
        r.add_input_belief(Term::atom(stimulus), 0);
        r.add_input_goal(Term::atom("g"));
        let did1 = op1_count.get() > last1;
        let did2 = op2_count.get() > last2;
        last1 = op1_count.get();
        last2 = op2_count.get();
        let correct = (stimulus == "s1" && did1 && !did2) || (stimulus == "s2" && did2 && !did1);
        if correct {
            r.add_input_belief(Term::atom("g"), 0);
        }
        r.cycles(12);
        last1 = op1_count.get();
        last2 = op2_count.get();
    }

    let s1_correct = r.best_expectation_for(&Term::atom("g"), op1, &Term::atom("s1"));
    let s1_wrong = r.best_expectation_for(&Term::atom("g"), op2, &Term::atom("s1"));
    let s2_correct = r.best_expectation_for(&Term::atom("g"), op2, &Term::atom("s2"));
    let s2_wrong = r.best_expectation_for(&Term::atom("g"), op1, &Term::atom("s2"));
    assert!(s1_correct.unwrap() > s1_wrong.unwrap_or(0.0));
    assert!(s2_correct.unwrap() > s2_wrong.unwrap_or(0.0));

    // converged behavior: each stimulus now picks its operation outright
    r.add_input_belief(Term::atom("s1"), 0);
    r.add_input_goal(Term::atom("g"));
    assert!(op1_count.get() > last1);
    let last1 = op1_count.get();
    r.add_input_belief(Term::atom("g"), 0);
    r.cycles(30);

    let before2 = op2_count.get();
    r.add_input_belief(Term::atom("s2"), 0);
    r.add_input_goal(Term::atom("g"));
    assert!(op2_count.get() > before2);
    assert_eq!(op1_count.get(), last1);
}

// ===========================================================================
// Memory behavior under a long stream
// ===========================================================================

#[test]
fn long_stream_stays_within_concept_capacity() {
    let mut cfg = Config::default().without_babbling();
    cfg.capacity.concept_capacity = 32;
    let mut r = Reasoner::new(cfg);

    for round in 0..4 {
        for letter in b'a'..=b'z' {
            let name = format!("{}{}", letter as char, round % 2);
            r.add_input_belief(Term::atom(&name), 0);
            r.cycles(1);
        }
    }

    // recently seen terms kept their concepts, early ones were displaced
    assert!(r.concept(&Term::atom("z1")).is_some());
    assert!(r.concept(&Term::atom("a0")).is_none());
}
