//! Alien: line up with a target and shoot.
//!
//! Percepts tell the engine which side of the defender the alien is on
//! ("l0", "r0") or that it is centered ("c0"); shooting while centered
//! satisfies the standing "s0" goal and respawns the alien.

use std::cell::Cell;
use std::rc::Rc;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sensa_core::{Config, Term};
use sensa_engine::Reasoner;

pub struct Stats {
    pub shots: u32,
    pub hits: u32,
}

pub fn run(config: Config, steps: u64) -> anyhow::Result<Stats> {
    let seed = config.decision.rng_seed;
    let mut r = Reasoner::new(config);

    let left = Rc::new(Cell::new(false));
    let right = Rc::new(Cell::new(false));
    let shoot = Rc::new(Cell::new(false));
    {
        let f = left.clone();
        r.add_operation(Term::atom("op_left"), Box::new(move || f.set(true)))?;
        let f = right.clone();
        r.add_operation(Term::atom("op_right"), Box::new(move || f.set(true)))?;
        let f = shoot.clone();
        r.add_operation(Term::atom("op_shoot"), Box::new(move || f.set(true)))?;
    }

    let alien_width = 0.18;
    let mut alien_x: f64 = 0.5;
    let mut defender_x: f64 = 0.5;
    let mut stats = Stats { shots: 0, hits: 0 };
    let mut env_rng = ChaCha8Rng::seed_from_u64(seed);

    let mut t: u64 = 0;
    while steps == 0 || t < steps {
        t += 1;
        let alien_right = defender_x <= alien_x - alien_width;
        let alien_left = defender_x > alien_x + alien_width;
        if alien_right {
            r.add_input_belief(Term::atom("r0"), 0);
        } else if alien_left {
            r.add_input_belief(Term::atom("l0"), 0);
        } else {
            r.add_input_belief(Term::atom("c0"), 0);
        }
        r.add_input_goal(Term::atom("s0"));

        if shoot.replace(false) {
            stats.shots += 1;
            if !alien_right && !alien_left {
                stats.hits += 1;
                r.add_input_belief(Term::atom("s0"), 0);
                alien_x = env_rng.gen_range(0..1000) as f64 / 1000.0;
            }
        }
        if left.replace(false) {
            defender_x = (defender_x - 0.1).max(0.0);
        }
        if right.replace(false) {
            defender_x = (defender_x + 0.1).min(1.0);
        }

        r.cycles(1);

        let rate = stats.hits as f64 / stats.shots.max(1) as f64;
        println!(
            "shots={} hits={} rate={:.3} time={}",
            stats.shots,
            stats.hits,
            rate,
            r.current_time()
        );
    }
    Ok(stats)
}
