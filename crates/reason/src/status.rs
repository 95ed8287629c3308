use serde::Serialize;
use tfpg_model::{GateType, NodeKind};

use crate::graph::{EdgeRef, PropagationGraph};
use crate::state::NodeState;

/// Why an expected symptom is classified as missing.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum MissingCause {
    /// The propagation window has elapsed without activation.
    Overdue,
    /// The window admits activation now; the model and the measurements
    /// disagree.
    ShouldBeActive,
}

/// Classification of a discrepancy against the current time and the state
/// of its parents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum SymptomStatus {
    Confirmed,
    Pending,
    Missing(MissingCause),
    Unreachable,
}

impl std::fmt::Display for SymptomStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Confirmed => write!(f, "CONFIRMED"),
            Self::Pending => write!(f, "PENDING"),
            Self::Missing(MissingCause::Overdue) => write!(f, "MISSING (overdue)"),
            Self::Missing(MissingCause::ShouldBeActive) => write!(f, "MISSING (should be active)"),
            Self::Unreachable => write!(f, "UNREACHABLE"),
        }
    }
}

/// Classify a discrepancy at `now_ms`. Returns `None` for failure modes.
pub fn symptom_status(
    graph: &PropagationGraph<'_>,
    states: &[NodeState],
    idx: usize,
    now_ms: u64,
) -> Option<SymptomStatus> {
    let gate = match &graph.node(idx).kind {
        NodeKind::FailureMode => return None,
        NodeKind::Discrepancy { gate_type, .. } => *gate_type,
    };
    if states[idx].is_active {
        return Some(SymptomStatus::Confirmed);
    }
    Some(match gate {
        GateType::Or => classify_or(graph.incoming(idx), states, now_ms),
        GateType::And => classify_and(graph.incoming(idx), states, now_ms),
    })
}

fn classify_or(incoming: &[EdgeRef], states: &[NodeState], now_ms: u64) -> SymptomStatus {
    let mut any_active = false;
    let mut pending = false;
    let mut overdue = false;
    for edge in incoming {
        let parent = &states[edge.node];
        if !parent.is_active {
            continue;
        }
        any_active = true;
        let delta = now_ms.saturating_sub(parent.activation_time_ms);
        if delta < edge.time_min_ms {
            pending = true;
        } else if delta > edge.time_max_ms {
            overdue = true;
        }
    }
    if !any_active {
        SymptomStatus::Unreachable
    } else if pending {
        SymptomStatus::Pending
    } else if overdue {
        SymptomStatus::Missing(MissingCause::Overdue)
    } else {
        SymptomStatus::Missing(MissingCause::ShouldBeActive)
    }
}

fn classify_and(incoming: &[EdgeRef], states: &[NodeState], now_ms: u64) -> SymptomStatus {
    // The gate only opens once the last parent arrives, so the relevant
    // window is the latest-activated parent's edge.
    let mut latest: Option<(&EdgeRef, u64)> = None;
    for edge in incoming {
        let parent = &states[edge.node];
        if !parent.is_active {
            return SymptomStatus::Unreachable;
        }
        if latest.map_or(true, |(_, t)| parent.activation_time_ms > t) {
            latest = Some((edge, parent.activation_time_ms));
        }
    }
    let Some((edge, t_parent)) = latest else {
        return SymptomStatus::Unreachable;
    };
    let delta = now_ms.saturating_sub(t_parent);
    if delta < edge.time_min_ms {
        SymptomStatus::Pending
    } else if delta > edge.time_max_ms {
        SymptomStatus::Missing(MissingCause::Overdue)
    } else {
        SymptomStatus::Missing(MissingCause::ShouldBeActive)
    }
}
