//! Command-line driver: run a simulation described by a TOML file.

use std::error::Error;
use std::process::ExitCode;
use std::str::FromStr;

use clap::Parser;
use espic::engine::{read_toml, Simulation};
use log::LevelFilter;

#[derive(Parser)]
#[clap(version, about = "Run a 1D electrostatic particle-in-cell simulation")]
pub struct CommandLineArguments {
    /// TOML configuration file
    #[clap(long, short)]
    config: String,
    /// Override the number of steps in the configuration
    #[clap(long, short)]
    steps: Option<u64>,
    /// Log level: error, warn, info, debug or trace
    #[clap(long, short, default_value = "info")]
    verbosity: String,
}

fn run(args: &CommandLineArguments) -> Result<(), Box<dyn Error>> {
    let mut config = read_toml(&args.config)?;
    if let Some(steps) = args.steps {
        config.steps = steps;
    }

    let mut simulation = Simulation::from_config(&config)?;
    let metrics = simulation.run()?;

    let steps = simulation.steps_completed().max(1);
    log::info!(
        "mean step {} us (push {} / deposit {} / solve {} / field {})",
        metrics.total_us / steps,
        metrics.push_us / steps,
        metrics.deposit_us / steps,
        metrics.solve_us / steps,
        metrics.field_us / steps
    );
    println!("{}", simulation.diagnostics());
    Ok(())
}

fn main() -> ExitCode {
    let args = CommandLineArguments::parse();

    let level = match LevelFilter::from_str(&args.verbosity) {
        Ok(level) => level,
        Err(e) => {
            eprintln!("invalid verbosity '{}': {e}", args.verbosity);
            return ExitCode::FAILURE;
        }
    };
    env_logger::builder()
        .format_timestamp_secs()
        .filter_level(level)
        .init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{e}");
            ExitCode::FAILURE
        }
    }
}
