//! Pong: keep the bat under a bouncing ball.
//!
//! The engine sees only which side of the bat the ball is on and is asked
//! for "good" every frame; it has to discover that moving toward the ball
//! earns the reward.

use std::cell::Cell;
use std::rc::Rc;
use std::time::Duration;

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use sensa_core::{Config, Term};
use sensa_engine::Reasoner;

const FIELD_W: i32 = 50;
const FIELD_H: i32 = 20;

#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    /// Two operations, bat always drifts once pushed.
    Classic,
    /// Adds a stop operation and a dead-band "ball_equal" percept.
    WithStop,
}

pub struct Stats {
    pub hits: u32,
    pub misses: u32,
}

pub fn run(config: Config, variant: Variant, headless: bool, steps: u64) -> anyhow::Result<Stats> {
    let seed = config.decision.rng_seed;
    let mut r = Reasoner::new(config);
    r.set_input_logging(!headless);

    let left = Rc::new(Cell::new(false));
    let right = Rc::new(Cell::new(false));
    let stop = Rc::new(Cell::new(false));
    {
        let f = left.clone();
        r.add_operation(Term::atom("op_left"), Box::new(move || f.set(true)))?;
        let f = right.clone();
        r.add_operation(Term::atom("op_right"), Box::new(move || f.set(true)))?;
        if variant == Variant::WithStop {
            let f = stop.clone();
            r.add_operation(Term::atom("op_stop"), Box::new(move || f.set(true)))?;
        }
    }

    let bat_width: i32 = if variant == Variant::WithStop { 6 } else { 4 };
    let mut ball_x = FIELD_W / 2;
    let mut ball_y = FIELD_H / 5;
    let mut bat_x = 20;
    let mut bat_vx = 0;
    let mut vx = 1;
    let mut vy = 1;
    let mut stats = Stats { hits: 0, misses: 0 };
    let mut env_rng = ChaCha8Rng::seed_from_u64(seed);

    let mut t: u64 = 0;
    while steps == 0 || t < steps {
        t += 1;
        if !headless {
            render(ball_x, ball_y, bat_x, bat_width);
        }

        match variant {
            Variant::Classic => {
                if bat_x < ball_x {
                    r.add_input_belief(Term::atom("ball_right"), 0);
                }
                if ball_x < bat_x {
                    r.add_input_belief(Term::atom("ball_left"), 0);
                }
            }
            Variant::WithStop => {
                if bat_x <= ball_x - bat_width {
                    r.add_input_belief(Term::atom("ball_right"), 0);
                } else if ball_x + bat_width < bat_x {
                    r.add_input_belief(Term::atom("ball_left"), 0);
                } else {
                    r.add_input_belief(Term::atom("ball_equal"), 0);
                }
            }
        }
        r.add_input_goal(Term::atom("good"));

        if ball_x <= 0 {
            vx = 1;
        }
        if ball_x >= FIELD_W - 1 {
            vx = -1;
        }
        if ball_y <= 0 {
            vy = 1;
        }
        if ball_y >= FIELD_H - 1 {
            vy = -1;
        }
        if variant == Variant::Classic {
            ball_x += vx;
        }
        ball_y += vy;

        if ball_y == 0 {
            if (ball_x - bat_x).abs() <= bat_width {
                r.add_input_belief(Term::atom("good"), 0);
                stats.hits += 1;
                if !headless {
                    println!("good");
                }
            } else {
                stats.misses += 1;
                if !headless {
                    println!("bad");
                }
            }
        }
        if ball_y == 0 || ball_x == 0 || ball_x >= FIELD_W - 1 {
            ball_y = FIELD_H / 2 + env_rng.gen_range(0..FIELD_H / 2);
            ball_x = env_rng.gen_range(0..FIELD_W);
            vx = if env_rng.gen_bool(0.5) { 1 } else { -1 };
        }

        if left.replace(false) {
            bat_vx = -if variant == Variant::WithStop { 3 } else { 2 };
        }
        if right.replace(false) {
            bat_vx = if variant == Variant::WithStop { 3 } else { 2 };
        }
        if stop.replace(false) {
            bat_vx = 0;
        }
        let (lo, hi) = if variant == Variant::WithStop {
            (-bat_width * 2, FIELD_W - 1 + bat_width)
        } else {
            (0, FIELD_W - 1)
        };
        bat_x = (bat_x + bat_vx * bat_width / 2).clamp(lo, hi);

        r.cycles(1);

        let ratio = stats.hits as f64 / stats.misses.max(1) as f64;
        println!(
            "Hits={} misses={} ratio={:.3} time={}",
            stats.hits,
            stats.misses,
            ratio,
            r.current_time()
        );
        if !headless {
            std::thread::sleep(Duration::from_millis(20));
        }
    }
    Ok(stats)
}

fn render(ball_x: i32, ball_y: i32, bat_x: i32, bat_width: i32) {
    print!("\x1b[1;1H\x1b[2J");
    let pad = (bat_x - bat_width + 1).max(0) as usize;
    let bat = (bat_width * 2 - 1 + bat_x.min(0)).max(1) as usize;
    println!("{}{}", " ".repeat(pad), "@".repeat(bat));
    for row in 0..FIELD_H {
        if row == ball_y {
            println!("{}#{}|", " ".repeat(ball_x.max(0) as usize), " ".repeat((FIELD_W - ball_x - 1).max(0) as usize));
        } else {
            println!("{}|", " ".repeat(FIELD_W as usize));
        }
    }
}
