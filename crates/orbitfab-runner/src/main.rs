//! Headless scenario runner for the orbital compute factory.
//!
//! Loads a scenario file (RON, TOML or JSON), ticks it to completion, and
//! prints a per-tick log followed by a bottleneck table.
//!
//! ```text
//! orbitfab-runner crates/orbitfab-data/scenarios/bootstrap.ron --ticks 60
//! RUST_LOG=orbitfab_core=debug orbitfab-runner scenario.toml --verify
//! ```

mod report;
mod run;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result, ensure};
use clap::Parser;
use orbitfab_core::tick::ThroughputTarget;
use orbitfab_data::load_scenario;
use tracing::{error, info};

use crate::report::{bottleneck_table, format_sig_figs, tick_line};
use crate::run::run_scenario;

#[derive(Parser, Debug)]
#[command(name = "orbitfab-runner", version, about = "Run an orbital factory scenario headlessly", long_about = None)]
struct Args {
    /// Scenario file (.ron, .toml or .json)
    scenario: PathBuf,

    /// Override the number of ticks
    #[arg(long)]
    ticks: Option<u32>,

    /// Override the days simulated per tick
    #[arg(long)]
    tick_days: Option<f64>,

    /// Override the target in units per month
    #[arg(long)]
    target: Option<f64>,

    /// Run twice and check both runs end in the same state
    #[arg(long)]
    verify: bool,

    /// Write a binary replay log of the run
    #[arg(long)]
    record: Option<PathBuf>,

    /// Print the final state as JSON instead of the report
    #[arg(long)]
    json: bool,
}

fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let args = Args::parse();

    let mut scenario = load_scenario(&args.scenario)
        .with_context(|| format!("Failed to load scenario {}", args.scenario.display()))?;
    if let Some(ticks) = args.ticks {
        scenario.ticks = ticks;
    }
    if let Some(days) = args.tick_days {
        ensure!(days > 0.0 && days.is_finite(), "--tick-days must be positive, got {days}");
        scenario.tick_days = days;
    }
    if let Some(target) = args.target {
        ensure!(target >= 0.0 && target.is_finite(), "--target must be non-negative, got {target}");
        scenario.target = ThroughputTarget::new(target);
    }

    info!(
        scenario = %scenario.name,
        ticks = scenario.ticks,
        tick_days = scenario.tick_days,
        "running"
    );
    let outcome = run_scenario(&scenario)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&outcome.final_state)?);
    } else {
        if !scenario.description.is_empty() {
            println!("{} -- {}", scenario.name, scenario.description);
        }
        for record in &outcome.records {
            println!("{}", tick_line(record));
        }
        println!();
        print!("{}", bottleneck_table(&outcome.bottlenecks));
        println!(
            "units built {}  ready on ground {}  state hash {:016x}",
            format_sig_figs(outcome.final_state.units_built_total),
            format_sig_figs(outcome.final_state.units_ready_on_ground),
            outcome.final_hash()
        );
    }

    if let Some(path) = &args.record {
        let bytes = outcome.log.serialize()?;
        std::fs::write(path, &bytes)
            .with_context(|| format!("Failed to write replay log to {}", path.display()))?;
        info!(path = %path.display(), bytes = bytes.len(), "replay log written");
    }

    if args.verify {
        let second = run_scenario(&scenario)?;
        let (a, b) = (outcome.final_hash(), second.final_hash());
        if a != b {
            error!(first = a, second = b, "determinism check FAILED");
            eprintln!("verify: FAILED (hash {a:016x} != {b:016x})");
            return Ok(ExitCode::FAILURE);
        }
        eprintln!("verify: OK (hash {a:016x})");
    }

    Ok(ExitCode::SUCCESS)
}
