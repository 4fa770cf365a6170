//! # Contagion Runner
//!
//! Headless runner: builds the network, seeds the infection and steps it,
//! logging progress through `tracing`.
//!
//! ```bash
//! contagion-run --config config/default.toml --steps 200
//!
//! # Per-node dump after the run (raises the default level to debug)
//! contagion-run --seed 42 --dump
//! ```

use std::process::ExitCode;

use contagion::cli::{RunArgs, USAGE};
use contagion::{SimulationController, SimulationError};
use tracing::{debug, error, info};
use tracing_subscriber::{fmt, EnvFilter};

/// Progress is logged at info every this many steps.
const PROGRESS_INTERVAL: u64 = 10;

fn main() -> ExitCode {
    let args = match RunArgs::parse(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(e) => {
            eprintln!("{e}");
            eprintln!("{USAGE}");
            return ExitCode::FAILURE;
        }
    };
    if args.help {
        println!("{USAGE}");
        return ExitCode::SUCCESS;
    }

    let default_level = if args.dump { "contagion=debug" } else { "contagion=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    fmt().with_env_filter(filter).with_target(true).compact().init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "run aborted");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &RunArgs) -> Result<(), SimulationError> {
    let config = args.load_config()?;
    info!(
        version = env!("CARGO_PKG_VERSION"),
        nodes = config.network.node_count,
        start_node = config.start_node,
        kernel = ?config.kernel,
        steps = args.steps,
        dt = config.dt,
        "starting contagion run"
    );

    let sim = SimulationController::from_config(&config)?;
    let results = sim.results();

    for _ in 0..args.steps {
        match sim.step(config.dt) {
            Ok(report) if report.step % PROGRESS_INTERVAL == 0 => {
                info!(
                    step = report.step,
                    infected_total = report.infected_total,
                    fully_infected = results.infected_count(config.start_node).unwrap_or(0),
                    "progress"
                );
            }
            Ok(_) => {}
            Err(e) if e.is_recoverable() => error!(error = %e, "step skipped"),
            Err(e) => return Err(e),
        }
    }

    let Some(snapshot) = results.read(config.start_node) else {
        return Ok(());
    };
    info!(
        steps = sim.steps_completed(),
        infected_total = snapshot.total_infected(),
        susceptible_total = snapshot.total_susceptible(),
        "run finished"
    );

    if args.dump {
        for (node, (s, i)) in snapshot.susceptible.iter().zip(&snapshot.infected).enumerate() {
            debug!(node, degree = sim.network().degree(node), s, i, "node state");
        }
    }
    Ok(())
}
