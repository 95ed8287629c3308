use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tfpg_model::NodeKind;
use tracing::debug;

use crate::graph::PropagationGraph;
use crate::state::NodeState;

/// A ranked root-cause candidate.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Diagnosis {
    pub failure_mode_id: String,
    pub failure_mode_name: String,
    /// Fraction of expected symptoms that are actually active, in [0, 1].
    pub plausibility: f64,
    /// Mean robustness over the expected symptoms, clamped to [-1, 1].
    pub aggregate_robustness: f64,
    pub expected_symptom_ids: BTreeSet<String>,
    pub consistent_symptom_ids: Vec<String>,
    /// Trigger value of each consistent symptom, keyed by node id.
    pub symptom_values: BTreeMap<String, f64>,
}

/// Reporting tier of a diagnosis with nonzero plausibility.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DiagnosisTier {
    /// Every expected symptom is active.
    Tier1,
    /// Some expected symptoms are still missing.
    Tier2,
}

impl std::fmt::Display for DiagnosisTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Tier1 => write!(f, "Tier 1"),
            Self::Tier2 => write!(f, "Tier 2"),
        }
    }
}

impl Diagnosis {
    pub fn tier(&self) -> DiagnosisTier {
        if self.plausibility >= 1.0 {
            DiagnosisTier::Tier1
        } else {
            DiagnosisTier::Tier2
        }
    }
}

/// Rank candidate failure modes against the current activation state.
///
/// Backward traversal from every active discrepancy enumerates candidates
/// under the temporal-window constraints; forward traversal per candidate
/// scores plausibility and aggregate robustness. The result is ordered by
/// plausibility, then aggregate robustness, then failure-mode id, so a
/// fixed model and stream always yield the same list.
pub fn rank_hypotheses(graph: &PropagationGraph<'_>, states: &[NodeState]) -> Vec<Diagnosis> {
    let mut candidates: BTreeSet<usize> = BTreeSet::new();
    for (idx, node) in graph.iter() {
        if node.is_discrepancy() && states[idx].is_active {
            trace_back(graph, states, idx, &mut candidates);
        }
    }
    debug!(candidates = candidates.len(), "backward propagation finished");

    let mut diagnoses = Vec::new();
    for fm in candidates {
        let expected = expected_symptoms(graph, fm);
        if let Some(diagnosis) = score(graph, states, fm, &expected) {
            diagnoses.push(diagnosis);
        }
    }

    diagnoses.sort_by(|a, b| {
        b.plausibility
            .partial_cmp(&a.plausibility)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| {
                b.aggregate_robustness
                    .partial_cmp(&a.aggregate_robustness)
                    .unwrap_or(std::cmp::Ordering::Equal)
            })
            .then_with(|| a.failure_mode_id.cmp(&b.failure_mode_id))
    });
    diagnoses
}

/// Active discrepancies not explained by any ranked candidate (tier 3),
/// sorted by id.
pub fn unexplained_symptoms(
    graph: &PropagationGraph<'_>,
    states: &[NodeState],
    diagnoses: &[Diagnosis],
) -> Vec<String> {
    let explained: BTreeSet<&str> = diagnoses
        .iter()
        .flat_map(|d| d.consistent_symptom_ids.iter().map(String::as_str))
        .collect();
    let mut unexplained: Vec<String> = graph
        .iter()
        .filter(|(idx, node)| {
            node.is_discrepancy() && states[*idx].is_active && !explained.contains(node.id.as_str())
        })
        .map(|(_, node)| node.id.clone())
        .collect();
    unexplained.sort();
    unexplained
}

/// Walk edges in reverse from an active symptom, collecting failure-mode
/// parents. A discrepancy parent is crossed only when it is active and the
/// observed child-parent delay fits the edge window; anything else is a
/// temporal contradiction that prunes the branch.
fn trace_back(
    graph: &PropagationGraph<'_>,
    states: &[NodeState],
    start: usize,
    candidates: &mut BTreeSet<usize>,
) {
    let mut visited = vec![false; graph.len()];
    visited[start] = true;
    let mut stack = vec![start];

    while let Some(current) = stack.pop() {
        let t_child = states[current].activation_time_ms;
        for edge in graph.incoming(current) {
            let parent = edge.node;
            match &graph.node(parent).kind {
                NodeKind::FailureMode => {
                    candidates.insert(parent);
                }
                NodeKind::Discrepancy { .. } => {
                    if visited[parent] || !states[parent].is_active {
                        continue;
                    }
                    let t_parent = states[parent].activation_time_ms;
                    if t_child < t_parent {
                        continue;
                    }
                    if edge.admits_delay(t_child - t_parent) {
                        visited[parent] = true;
                        stack.push(parent);
                    }
                }
            }
        }
    }
}

/// Discrepancies reachable forward from a candidate along the edge graph.
fn expected_symptoms(graph: &PropagationGraph<'_>, fm: usize) -> Vec<usize> {
    let mut visited = vec![false; graph.len()];
    visited[fm] = true;
    let mut queue = std::collections::VecDeque::from([fm]);
    let mut expected = Vec::new();

    while let Some(current) = queue.pop_front() {
        for edge in graph.outgoing(current) {
            if visited[edge.node] {
                continue;
            }
            visited[edge.node] = true;
            queue.push_back(edge.node);
            if graph.node(edge.node).is_discrepancy() {
                expected.push(edge.node);
            }
        }
    }
    expected
}

fn score(
    graph: &PropagationGraph<'_>,
    states: &[NodeState],
    fm: usize,
    expected: &[usize],
) -> Option<Diagnosis> {
    if expected.is_empty() {
        return None;
    }

    let mut expected_ids = BTreeSet::new();
    let mut consistent_ids = BTreeSet::new();
    let mut symptom_values = BTreeMap::new();
    let mut robustness_sum = 0.0;

    for &idx in expected {
        let id = graph.id(idx);
        expected_ids.insert(id.to_owned());
        robustness_sum += states[idx].robustness;
        if states[idx].is_active {
            consistent_ids.insert(id.to_owned());
            symptom_values.insert(id.to_owned(), states[idx].trigger_value);
        }
    }

    let plausibility = consistent_ids.len() as f64 / expected.len() as f64;
    if plausibility <= 0.0 {
        return None;
    }
    let aggregate_robustness = (robustness_sum / expected.len() as f64).clamp(-1.0, 1.0);

    let node = graph.node(fm);
    Some(Diagnosis {
        failure_mode_id: node.id.clone(),
        failure_mode_name: node.name.clone(),
        plausibility,
        aggregate_robustness,
        expected_symptom_ids: expected_ids,
        consistent_symptom_ids: consistent_ids.into_iter().collect(),
        symptom_values,
    })
}
