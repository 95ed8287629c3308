#![deny(unsafe_code)]
//! TFPG reasoner binary.
//!
//! Loads a fault model and a scenario, replays the sample stream through
//! the reasoning core, and prints a diagnostic report for every sample
//! that yields at least one ranked hypothesis. An optional fourth argument
//! appends one machine-readable JSON record per reported sample.

mod error;
mod report;

use std::fs;
use std::path::PathBuf;

use clap::Parser;

use tfpg_ingest::ScenarioDocument;
use tfpg_model::FaultModel;
use tfpg_reason::Reasoner;

use error::CliError;
use report::LogWriter;

#[derive(Parser, Debug)]
#[command(name = "tfpg")]
#[command(about = "Diagnostic and prognostic reasoner over timed failure propagation graphs")]
#[command(version)]
struct Cli {
    /// Fault model JSON file
    model: PathBuf,

    /// Scenario JSON file with the sample stream
    scenario: PathBuf,

    /// Criticality threshold for the prognosis front
    #[arg(default_value_t = 5)]
    criticality_threshold: u8,

    /// Append one JSON record per reported sample to this file
    output_log: Option<PathBuf>,

    /// Enable debug tracing
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Keep argument errors on the same exit code as load errors.
            let _ = e.print();
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_target(false)
        .with_max_level(if cli.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::WARN
        })
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("[FATAL] {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), CliError> {
    let model_text = fs::read_to_string(&cli.model).map_err(|source| CliError::FileOpen {
        path: cli.model.clone(),
        source,
    })?;
    let model = FaultModel::from_json(&model_text)?;

    let scenario_text = fs::read_to_string(&cli.scenario).map_err(|source| CliError::FileOpen {
        path: cli.scenario.clone(),
        source,
    })?;
    let scenario = ScenarioDocument::from_json(&scenario_text)?;

    report::print_banner(&model, &scenario.scenario_id, cli.criticality_threshold);

    let mut log = cli
        .output_log
        .as_deref()
        .map(LogWriter::create)
        .transpose()?;

    let mut reasoner = Reasoner::new(&model, cli.criticality_threshold)?;
    for sample in scenario.samples() {
        let step = reasoner.step(sample)?;
        if step.diagnoses.is_empty() {
            continue;
        }
        report::print_step(&model, &reasoner, &step);
        if let Some(log) = log.as_mut() {
            log.append(&step)?;
        }
    }

    println!("Simulation complete.");
    Ok(())
}
