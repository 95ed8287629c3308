//! Property suites over randomized sample streams: monotone activation,
//! AND-gate causality, plausibility bounds, determinism, and refinement
//! safety.

mod common;

use common::{cascade_model, pump_valve_model};
use proptest::prelude::*;
use tfpg_ingest::DataSample;
use tfpg_model::{
    FaultModel, GateType, ModelDocument, Node, Predicate, PredicateOp, Signal, SignalKind,
};
use tfpg_reason::{rank_hypotheses, ActivationEngine, Reasoner};
use tfpg_refine::{LabeledTrace, RefinementOptimizer};

/// Random non-decreasing sample stream over the given parameter names.
/// The last name is treated as an injection target.
fn arb_stream(params: &'static [&'static str], max_len: usize) -> impl Strategy<Value = Vec<DataSample>> {
    prop::collection::vec(
        (0u64..400, 0..params.len(), -50.0f64..250.0),
        0..max_len,
    )
    .prop_map(move |raw| {
        let mut t = 0u64;
        raw.into_iter()
            .map(|(dt, p, v)| {
                t += dt;
                let name = params[p];
                if p == params.len() - 1 {
                    DataSample::injection(t, name, 1.0)
                } else {
                    DataSample::reading(t, name, v)
                }
            })
            .collect()
    })
}

const PUMP_PARAMS: &[&str] = &["current", "pressure", "flow", "FM1"];
const CASCADE_PARAMS: &[&str] = &["pressure", "temperature", "vibration", "FM2"];

proptest! {
    /// Once a node activates, it stays active with a frozen activation time.
    #[test]
    fn activation_is_monotone(stream in arb_stream(PUMP_PARAMS, 40)) {
        let model = pump_valve_model();
        let mut engine = ActivationEngine::new(&model).unwrap();
        let mut first_seen: Vec<Option<u64>> = vec![None; model.nodes().len()];

        for sample in &stream {
            engine.apply(sample).unwrap();
            for (idx, state) in engine.states().iter().enumerate() {
                if let Some(t) = first_seen[idx] {
                    prop_assert!(state.is_active);
                    prop_assert_eq!(state.activation_time_ms, t);
                } else if state.is_active {
                    first_seen[idx] = Some(state.activation_time_ms);
                }
            }
        }
    }

    /// An AND-gated node only ever activates after all of its parents.
    #[test]
    fn and_gate_activation_is_causally_ordered(stream in arb_stream(CASCADE_PARAMS, 40)) {
        let model = cascade_model();
        let mut engine = ActivationEngine::new(&model).unwrap();
        for sample in &stream {
            engine.apply(sample).unwrap();
        }

        let d6 = engine.state("D6").unwrap();
        if d6.is_active {
            for parent in ["D3", "D5"] {
                let p = engine.state(parent).unwrap();
                prop_assert!(p.is_active, "{} must precede D6", parent);
                prop_assert!(p.activation_time_ms <= d6.activation_time_ms);
            }
        }
    }

    /// Plausibility lies in (0, 1] and is 1 exactly when every expected
    /// symptom is active; aggregate robustness stays clamped.
    #[test]
    fn plausibility_bounds_hold(stream in arb_stream(PUMP_PARAMS, 40)) {
        let model = pump_valve_model();
        let mut engine = ActivationEngine::new(&model).unwrap();
        for sample in &stream {
            engine.apply(sample).unwrap();
        }

        for diagnosis in rank_hypotheses(engine.graph(), engine.states()) {
            prop_assert!(diagnosis.plausibility > 0.0);
            prop_assert!(diagnosis.plausibility <= 1.0);
            prop_assert!(diagnosis.aggregate_robustness >= -1.0);
            prop_assert!(diagnosis.aggregate_robustness <= 1.0);
            let all_active =
                diagnosis.consistent_symptom_ids.len() == diagnosis.expected_symptom_ids.len();
            prop_assert_eq!(diagnosis.plausibility == 1.0, all_active);
        }
    }

    /// A fixed model and stream always produce identical reports.
    #[test]
    fn reasoning_is_deterministic(stream in arb_stream(PUMP_PARAMS, 30)) {
        let model_a = pump_valve_model();
        let mut a = Reasoner::new(&model_a, 5).unwrap();
        let reports_a = a.run(stream.clone()).unwrap();

        let model_b = pump_valve_model();
        let mut b = Reasoner::new(&model_b, 5).unwrap();
        let reports_b = b.run(stream).unwrap();

        prop_assert_eq!(reports_a, reports_b);
        prop_assert_eq!(a.snapshot(), b.snapshot());
    }

    /// With mutations judged against the target itself (no expansion
    /// pool), refinement keeps a change only when it strictly improves the
    /// target's diagnosis error; otherwise the model comes back untouched.
    #[test]
    fn refinement_is_safe(dataset in arb_dataset()) {
        let mut model = trainable_model();
        let original = model.clone();

        let de_before = RefinementOptimizer::new(&mut model)
            .diagnosis_error("P", &dataset)
            .unwrap();
        RefinementOptimizer::new(&mut model)
            .refine("P", &[], &dataset)
            .unwrap();
        let de_after = RefinementOptimizer::new(&mut model)
            .diagnosis_error("P", &dataset)
            .unwrap();

        prop_assert!(de_after <= de_before);
        if model != original {
            prop_assert!(de_after < de_before);
        }
    }
}

/// AND-gated target with one free upstream symptom and no edges.
fn trainable_model() -> FaultModel {
    FaultModel::from_document(ModelDocument {
        model_name: "trainable".into(),
        version: "1".into(),
        signals: vec![
            Signal {
                id: "SA".into(),
                source_name: "a".into(),
                kind: SignalKind::Continuous,
                units: None,
                range_min: 0.0,
                range_max: 1.0,
            },
            Signal {
                id: "SP".into(),
                source_name: "p".into(),
                kind: SignalKind::Continuous,
                units: None,
                range_min: 0.0,
                range_max: 1.0,
            },
        ],
        nodes: vec![
            Node::discrepancy(
                "DA",
                "Upstream symptom",
                GateType::Or,
                1,
                Predicate {
                    signal_ref: "SA".into(),
                    op: PredicateOp::Gt,
                    threshold: 0.5,
                },
            ),
            Node::discrepancy(
                "P",
                "Target symptom",
                GateType::And,
                5,
                Predicate {
                    signal_ref: "SP".into(),
                    op: PredicateOp::Gt,
                    threshold: 0.5,
                },
            ),
        ],
        edges: vec![],
    })
    .unwrap()
}

fn arb_dataset() -> impl Strategy<Value = Vec<LabeledTrace>> {
    let trace = (
        prop::collection::vec((0u64..100, 0..2usize, 0.0f64..1.5), 0..6),
        any::<bool>(),
    )
        .prop_map(|(raw, label)| {
            let mut t = 0u64;
            let samples = raw
                .into_iter()
                .map(|(dt, p, v)| {
                    t += dt;
                    DataSample::reading(t, ["a", "p"][p], v)
                })
                .collect();
            LabeledTrace::new(samples, label)
        });
    prop::collection::vec(trace, 1..5)
}
