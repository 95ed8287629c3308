use std::cmp::Reverse;
use std::collections::BinaryHeap;

use serde::Serialize;

use crate::graph::PropagationGraph;
use crate::state::NodeState;

/// Time-to-criticality forecast.
///
/// `ttc_ms` is the earliest physically admissible additional time until a
/// node at or above the criticality threshold activates; infinite when no
/// such node is reachable from the active frontier.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Prognosis {
    pub ttc_ms: f64,
    pub critical_node_id: String,
}

impl Prognosis {
    pub fn unreachable() -> Self {
        Self {
            ttc_ms: f64::INFINITY,
            critical_node_id: String::new(),
        }
    }

    pub fn is_finite(&self) -> bool {
        self.ttc_ms.is_finite()
    }
}

/// Shortest-time search from the active frontier to the criticality front.
///
/// Edges are weighted by their minimum propagation delay, giving an
/// optimistic (safety-oriented) lower bound. Two relaxations are rejected:
/// into nodes that are already active (observed times are never overridden)
/// and arrivals before `now_ms` (a cascade that should already have fired
/// but did not must not read as imminent).
pub fn forecast(
    graph: &PropagationGraph<'_>,
    states: &[NodeState],
    criticality_threshold: u8,
    now_ms: u64,
) -> Prognosis {
    let mut dist: Vec<Option<u64>> = vec![None; graph.len()];
    let mut heap: BinaryHeap<Reverse<(u64, usize)>> = BinaryHeap::new();

    for (idx, state) in states.iter().enumerate() {
        if state.is_active {
            dist[idx] = Some(state.activation_time_ms);
            heap.push(Reverse((state.activation_time_ms, idx)));
        }
    }

    while let Some(Reverse((d, u))) = heap.pop() {
        let node = graph.node(u);
        if node.criticality_level() >= criticality_threshold && !states[u].is_active {
            return Prognosis {
                ttc_ms: d.saturating_sub(now_ms) as f64,
                critical_node_id: node.id.clone(),
            };
        }
        if dist[u].is_some_and(|best| d > best) {
            continue;
        }
        for edge in graph.outgoing(u) {
            let v = edge.node;
            if states[v].is_active {
                continue;
            }
            let arrival = d + edge.time_min_ms;
            if arrival < now_ms {
                continue;
            }
            if dist[v].map_or(true, |best| arrival < best) {
                dist[v] = Some(arrival);
                heap.push(Reverse((arrival, v)));
            }
        }
    }

    Prognosis::unreachable()
}
