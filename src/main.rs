mod demos;
mod experiments;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use sensa_core::Config;

#[derive(Parser)]
#[command(
    name = "sensa",
    about = "Bounded sensorimotor reasoning engine: demos and experiments",
    version = env!("CARGO_PKG_VERSION")
)]
struct Cli {
    /// Path to a TOML config file; built-in defaults apply when absent
    #[arg(short, long, default_value = "sensa.toml", global = true)]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Keep a bat under a bouncing ball with left/right operations
    Pong {
        /// Skip rendering and frame delays
        #[arg(long, default_value_t = false)]
        headless: bool,
        /// Simulation steps to run; 0 runs until interrupted
        #[arg(long, default_value_t = 0)]
        steps: u64,
    },
    /// Pong variant with a stop operation and a dead-band sensor
    Pong2 {
        #[arg(long, default_value_t = false)]
        headless: bool,
        #[arg(long, default_value_t = 0)]
        steps: u64,
    },
    /// Line up with an alien and shoot it
    Alien {
        /// Simulation steps to run; 0 runs until interrupted
        #[arg(long, default_value_t = 0)]
        steps: u64,
    },
    /// Two-stimulus operant discrimination with periodic progress reports
    Discrimination {
        #[arg(long, default_value_t = 200)]
        episodes: u32,
    },
    /// Run discrimination experiment 1 and write its per-trial CSV
    Exp1Csv {
        #[arg(default_value = "exp1.csv")]
        path: PathBuf,
    },
    /// Experiment 2: like experiment 1, but the contingency reverses mid-run
    Exp2Csv {
        #[arg(default_value = "exp2.csv")]
        path: PathBuf,
    },
    /// Print the default configuration as TOML
    DefaultConfig,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = Config::load(&cli.config);

    match cli.command {
        Commands::Pong { headless, steps } => {
            demos::pong::run(config, demos::pong::Variant::Classic, headless, steps)?;
        }
        Commands::Pong2 { headless, steps } => {
            demos::pong::run(config, demos::pong::Variant::WithStop, headless, steps)?;
        }
        Commands::Alien { steps } => {
            demos::alien::run(config, steps)?;
        }
        Commands::Discrimination { episodes } => {
            demos::discrimination::run(config, episodes)?;
        }
        Commands::Exp1Csv { path } => {
            experiments::exp1_csv(config, &path)?;
            println!("Experiment 1 CSV written to {}", path.display());
        }
        Commands::Exp2Csv { path } => {
            experiments::exp2_csv(config, &path)?;
            println!("Experiment 2 CSV written to {}", path.display());
        }
        Commands::DefaultConfig => {
            print!("{}", Config::default().to_toml());
        }
    }

    Ok(())
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "sensa=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();
}
