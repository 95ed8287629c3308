use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use tfpg_model::FaultModel;
use tfpg_reason::{Reasoner, StepReport};

use crate::error::CliError;

const RULE: &str =
    "==============================================================================";
const SUBRULE: &str =
    "------------------------------------------------------------------------------";

pub fn print_banner(model: &FaultModel, scenario_id: &str, threshold: u8) {
    println!("{}", RULE);
    println!(" TFPG reasoner  --  started {}", chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC"));
    println!("{}", RULE);
    println!(" Model      : {} (v{})", model.name(), model.version());
    println!(" Nodes      : {}", model.nodes().len());
    println!(" Signals    : {}", model.signals().len());
    println!(" Scenario   : {}", scenario_id);
    println!(" Criticality: >= {}", threshold);
    println!();
}

/// Per-sample diagnostic report, printed whenever the step yields at least
/// one ranked hypothesis.
pub fn print_step(model: &FaultModel, reasoner: &Reasoner<'_>, step: &StepReport) {
    println!("{}", RULE);
    println!("[Time: {}ms] DIAGNOSTIC REPORT", step.timestamp_ms);
    println!("{}", RULE);

    for diagnosis in &step.diagnoses {
        println!();
        println!(
            "Hypothesis [{}]: {} ({})",
            diagnosis.tier(),
            diagnosis.failure_mode_id,
            diagnosis.failure_mode_name
        );
        println!("{}", SUBRULE);
        println!(
            " * Plausibility: {:.1}% | Aggregate robustness: {:.4}",
            diagnosis.plausibility * 100.0,
            diagnosis.aggregate_robustness
        );

        let expected: Vec<&str> = diagnosis
            .expected_symptom_ids
            .iter()
            .map(String::as_str)
            .collect();
        println!(
            " * Expected discrepancies: {} ({})",
            expected.len(),
            expected.join(", ")
        );

        println!(
            " * Observed discrepancies: {}",
            diagnosis.consistent_symptom_ids.len()
        );
        for id in &diagnosis.consistent_symptom_ids {
            print_symptom_line(model, reasoner, diagnosis.symptom_values.get(id), id);
        }

        let missing: Vec<&str> = expected
            .iter()
            .copied()
            .filter(|id| !diagnosis.consistent_symptom_ids.iter().any(|c| c == id))
            .collect();
        if !missing.is_empty() {
            println!(" * Missing discrepancies: {}", missing.len());
            for id in missing {
                if let Some(status) = reasoner.symptom_status(id) {
                    println!("   - {}: {}", id, status);
                }
            }
        }
    }

    let unexplained = reasoner.unexplained_symptoms(&step.diagnoses);
    if !unexplained.is_empty() {
        println!();
        println!(" * Unexplained symptoms: {}", unexplained.join(", "));
    }

    println!();
    print_prognosis(step);
    println!("{}", RULE);
    println!();
}

fn print_symptom_line(
    model: &FaultModel,
    reasoner: &Reasoner<'_>,
    trigger_value: Option<&f64>,
    id: &str,
) {
    let Some(state) = reasoner.node_state(id) else {
        return;
    };
    print!("   - {}: activated at t={}ms", id, state.activation_time_ms);
    if let (Some(node), Some(value)) = (model.node(id), trigger_value) {
        if let Some(predicate) = node.predicate() {
            let signal_name = model
                .signal(&predicate.signal_ref)
                .map(|s| s.source_name.as_str())
                .unwrap_or(predicate.signal_ref.as_str());
            print!(
                " ({}: {} {} {})",
                signal_name, value, predicate.op, predicate.threshold
            );
        }
    }
    println!(".");
}

fn print_prognosis(step: &StepReport) {
    let p = &step.prognosis;
    println!(" * Prognosis:");
    if !p.is_finite() {
        println!("   - System appears stable; no critical failure path from this state.");
    } else if p.ttc_ms > 0.0 {
        println!(
            "   - WARNING: time-to-criticality is {} ms (next critical node: {}).",
            p.ttc_ms, p.critical_node_id
        );
    } else {
        println!(
            "   - CRITICAL: {} is due now.",
            p.critical_node_id
        );
    }
}

/// Appends one JSON record per reported sample.
pub struct LogWriter {
    path: PathBuf,
    file: File,
}

impl LogWriter {
    pub fn create(path: &Path) -> Result<Self, CliError> {
        let file = File::create(path).map_err(|source| CliError::LogWrite {
            path: path.to_owned(),
            source,
        })?;
        Ok(Self {
            path: path.to_owned(),
            file,
        })
    }

    pub fn append(&mut self, step: &StepReport) -> Result<(), CliError> {
        let line = serde_json::to_string(step).map_err(|e| CliError::LogWrite {
            path: self.path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        writeln!(self.file, "{}", line).map_err(|source| CliError::LogWrite {
            path: self.path.clone(),
            source,
        })
    }
}
