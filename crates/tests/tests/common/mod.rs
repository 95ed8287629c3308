//! Shared fixtures: the hydraulic fault models the scenario and property
//! suites run against.

use tfpg_model::{
    Edge, FaultModel, GateType, ModelDocument, Node, Predicate, PredicateOp, Signal, SignalKind,
};

pub fn signal(id: &str, source: &str, max: f64) -> Signal {
    Signal {
        id: id.into(),
        source_name: source.into(),
        kind: SignalKind::Continuous,
        units: None,
        range_min: 0.0,
        range_max: max,
    }
}

pub fn pred(signal_ref: &str, op: PredicateOp, threshold: f64) -> Predicate {
    Predicate {
        signal_ref: signal_ref.into(),
        op,
        threshold,
    }
}

/// Two competing root causes over a shared flow sink:
///
/// ```text
/// FM1 -> D1 [0,20]          FM2 -> D3 [50,300]
/// FM1 -> D2 [100,500]       D3  -> D4 [200,1000]
/// D2  -> D4 [500,2000]
/// ```
pub fn pump_valve_model() -> FaultModel {
    FaultModel::from_document(ModelDocument {
        model_name: "hydraulic-loop".into(),
        version: "1.2".into(),
        signals: vec![
            signal("S1", "current", 10.0),
            signal("S2", "pressure", 200.0),
            signal("S3", "flow", 50.0),
        ],
        nodes: vec![
            Node::failure_mode("FM1", "Pump burnout"),
            Node::failure_mode("FM2", "Valve stuck"),
            Node::discrepancy("D1", "No motor current", GateType::Or, 2, pred("S1", PredicateOp::Lt, 0.5)),
            Node::discrepancy("D2", "Low line pressure", GateType::Or, 6, pred("S2", PredicateOp::Lt, 10.0)),
            Node::discrepancy("D3", "Overpressure", GateType::Or, 4, pred("S2", PredicateOp::Gt, 100.0)),
            Node::discrepancy("D4", "No flow", GateType::Or, 7, pred("S3", PredicateOp::Lt, 1.0)),
        ],
        edges: vec![
            Edge::new("FM1", "D1", 0, 20),
            Edge::new("FM1", "D2", 100, 500),
            Edge::new("D2", "D4", 500, 2000),
            Edge::new("FM2", "D3", 50, 300),
            Edge::new("D3", "D4", 200, 1000),
        ],
    })
    .unwrap()
}

/// An AND-gated, criticality-10 sink fed by two independent symptoms:
///
/// ```text
/// FM2 -> D3 [50,300],  D3 -> D6 [1000,5000],  D5 -> D6 [1000,5000]
/// ```
pub fn cascade_model() -> FaultModel {
    FaultModel::from_document(ModelDocument {
        model_name: "shaft-cascade".into(),
        version: "1.0".into(),
        signals: vec![
            signal("S2", "pressure", 200.0),
            signal("S4", "temperature", 150.0),
            signal("S5", "vibration", 20.0),
        ],
        nodes: vec![
            Node::failure_mode("FM2", "Valve stuck"),
            Node::discrepancy("D3", "Overpressure", GateType::Or, 4, pred("S2", PredicateOp::Gt, 100.0)),
            Node::discrepancy("D5", "Bearing overheat", GateType::Or, 3, pred("S4", PredicateOp::Gt, 90.0)),
            Node::discrepancy("D6", "Shaft damage", GateType::And, 10, pred("S5", PredicateOp::Gt, 5.0)),
        ],
        edges: vec![
            Edge::new("FM2", "D3", 50, 300),
            Edge::new("D3", "D6", 1000, 5000),
            Edge::new("D5", "D6", 1000, 5000),
        ],
    })
    .unwrap()
}
