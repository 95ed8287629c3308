//! End-to-end scenarios: a full injection-to-prognosis pass through the
//! reasoner, exercising activation, hypothesis ranking, and forecasting
//! together.

mod common;

use common::{cascade_model, pump_valve_model};
use tfpg_ingest::DataSample;
use tfpg_reason::{DiagnosisTier, Reasoner, StepReport};

fn last_step(reasoner: &mut Reasoner<'_>, samples: Vec<DataSample>) -> StepReport {
    let mut reports = reasoner.run(samples).unwrap();
    reports.pop().unwrap()
}

#[test]
fn pump_burnout_cascade_confirms_the_injected_cause() {
    let model = pump_valve_model();
    let mut reasoner = Reasoner::new(&model, 5).unwrap();
    let step = last_step(
        &mut reasoner,
        vec![
            DataSample::injection(1000, "FM1", 1.0),
            DataSample::reading(1010, "current", 0.0),
            DataSample::reading(1250, "pressure", 8.0),
            DataSample::reading(1800, "flow", 0.0),
        ],
    );

    for id in ["D1", "D2", "D4"] {
        assert!(reasoner.node_state(id).unwrap().is_active, "{} inactive", id);
    }
    assert_eq!(step.diagnoses.len(), 1);
    let top = &step.diagnoses[0];
    assert_eq!(top.failure_mode_id, "FM1");
    assert_eq!(top.plausibility, 1.0);
    assert_eq!(top.tier(), DiagnosisTier::Tier1);
    assert_eq!(top.consistent_symptom_ids, vec!["D1", "D2", "D4"]);
}

#[test]
fn valve_stuck_cascade_excludes_the_pump_hypothesis() {
    let model = pump_valve_model();
    let mut reasoner = Reasoner::new(&model, 5).unwrap();
    let step = last_step(
        &mut reasoner,
        vec![
            DataSample::injection(2000, "FM2", 1.0),
            DataSample::reading(2150, "pressure", 120.0),
            DataSample::reading(2200, "current", 3.0),
            DataSample::reading(2600, "flow", 0.0),
        ],
    );

    assert_eq!(reasoner.node_state("D3").unwrap().activation_time_ms, 2150);
    assert_eq!(reasoner.node_state("D4").unwrap().activation_time_ms, 2600);
    assert!(!reasoner.node_state("D1").unwrap().is_active);

    // Backward traversal from D4 crosses only its active parent D3, so the
    // pump hypothesis never enters the candidate set.
    assert_eq!(step.diagnoses.len(), 1);
    assert_eq!(step.diagnoses[0].failure_mode_id, "FM2");
    assert_eq!(step.diagnoses[0].plausibility, 1.0);
}

#[test]
fn double_failure_and_gate_waits_for_both_parents() {
    let model = cascade_model();
    let mut reasoner = Reasoner::new(&model, 10).unwrap();

    reasoner
        .step(DataSample::reading(2200, "pressure", 120.0))
        .unwrap();
    // Predicate satisfied, but D5 is still inactive: the gate holds.
    reasoner
        .step(DataSample::reading(3000, "vibration", 6.0))
        .unwrap();
    assert!(!reasoner.node_state("D6").unwrap().is_active);

    reasoner
        .step(DataSample::reading(6500, "temperature", 95.0))
        .unwrap();
    reasoner
        .step(DataSample::reading(7500, "vibration", 6.0))
        .unwrap();

    let d6 = reasoner.node_state("D6").unwrap();
    assert!(d6.is_active);
    // Delay from the latest parent (D5 at 6500) is exactly 1000 ms.
    assert_eq!(d6.activation_time_ms, 7500);
}

#[test]
fn latent_risk_prognosis_targets_the_inactive_critical_node() {
    let model = cascade_model();
    let mut reasoner = Reasoner::new(&model, 10).unwrap();
    let step = reasoner
        .step(DataSample::reading(2200, "pressure", 120.0))
        .unwrap();

    // Only D3 is active; the fastest admissible path is D3 -> D6 at
    // 2200 + 1000.
    assert_eq!(step.prognosis.critical_node_id, "D6");
    assert_eq!(step.prognosis.ttc_ms, 1000.0);
}

#[test]
fn prognosis_never_reports_an_active_critical_node() {
    let model = cascade_model();
    let mut reasoner = Reasoner::new(&model, 10).unwrap();
    let step = last_step(
        &mut reasoner,
        vec![
            DataSample::reading(2200, "pressure", 120.0),
            DataSample::reading(6500, "temperature", 95.0),
            DataSample::reading(7500, "vibration", 6.0),
        ],
    );

    assert!(reasoner.node_state("D6").unwrap().is_active);
    // D6 is the only critical node and it has fired: the forecast must
    // skip it rather than restate the present with ttc <= 0.
    assert!(!step.prognosis.is_finite());
    assert!(step.prognosis.critical_node_id.is_empty());
}

#[test]
fn stalled_propagation_is_filtered_from_the_forecast() {
    let model = cascade_model();
    let mut reasoner = Reasoner::new(&model, 10).unwrap();

    reasoner
        .step(DataSample::reading(2200, "pressure", 120.0))
        .unwrap();
    // Well past 2200 + 5000: the D3 -> D6 path should have fired and did
    // not (D5 never came). The stale arrival at 3200 must not resurface
    // as an imminent prediction.
    let step = reasoner
        .step(DataSample::reading(8000, "pressure", 120.0))
        .unwrap();
    assert!(!step.prognosis.is_finite());
}

#[test]
fn full_stream_is_deterministic_end_to_end() {
    let stream = vec![
        DataSample::injection(1000, "FM1", 1.0),
        DataSample::reading(1010, "current", 0.0),
        DataSample::reading(1250, "pressure", 8.0),
        DataSample::reading(1800, "flow", 0.0),
    ];

    let model_a = pump_valve_model();
    let mut a = Reasoner::new(&model_a, 5).unwrap();
    let reports_a = a.run(stream.clone()).unwrap();

    let model_b = pump_valve_model();
    let mut b = Reasoner::new(&model_b, 5).unwrap();
    let reports_b = b.run(stream).unwrap();

    assert_eq!(reports_a, reports_b);
    assert_eq!(a.snapshot(), b.snapshot());
}
