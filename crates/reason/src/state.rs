use serde::Serialize;

use crate::graph::PropagationGraph;

/// Per-node runtime record maintained by the activation engine.
///
/// `activation_time_ms` and `trigger_value` are meaningful only while
/// `is_active`; once a node activates, both are frozen for the rest of the
/// run.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct NodeState {
    pub is_active: bool,
    pub activation_time_ms: u64,
    pub robustness: f64,
    pub trigger_value: f64,
}

/// Externally visible snapshot of one node's state.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct NodeStateRecord {
    pub node_id: String,
    pub is_active: bool,
    pub activation_time_ms: Option<u64>,
    pub robustness: f64,
    pub trigger_value: f64,
}

/// Snapshot of the whole state table, sorted by node id.
pub fn snapshot(graph: &PropagationGraph<'_>, states: &[NodeState]) -> Vec<NodeStateRecord> {
    let mut records: Vec<NodeStateRecord> = states
        .iter()
        .enumerate()
        .map(|(idx, state)| NodeStateRecord {
            node_id: graph.id(idx).to_owned(),
            is_active: state.is_active,
            activation_time_ms: state.is_active.then_some(state.activation_time_ms),
            robustness: state.robustness,
            trigger_value: state.trigger_value,
        })
        .collect();
    records.sort_by(|a, b| a.node_id.cmp(&b.node_id));
    records
}
