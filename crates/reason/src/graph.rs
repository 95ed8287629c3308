use std::collections::HashMap;

use tfpg_model::{FaultModel, Node, NodeKind};

use crate::error::ReasonError;

/// A directed edge resolved to arena indices.
#[derive(Clone, Copy, Debug)]
pub struct EdgeRef {
    pub node: usize,
    pub time_min_ms: u64,
    pub time_max_ms: u64,
}

impl EdgeRef {
    pub fn admits_delay(&self, delta_ms: u64) -> bool {
        delta_ms >= self.time_min_ms && delta_ms <= self.time_max_ms
    }
}

/// A discrepancy subscribed to a signal source, with the signal's range
/// resolved for robustness normalization.
#[derive(Clone, Copy, Debug)]
pub struct Listener {
    pub node: usize,
    pub range_min: f64,
    pub range_max: f64,
}

/// Index-handle view of a [`FaultModel`] for the traversal-heavy paths.
///
/// Nodes are addressed by their position in model order; string ids appear
/// only at the boundary (building the arena, emitting results).
pub struct PropagationGraph<'m> {
    nodes: Vec<&'m Node>,
    index: HashMap<&'m str, usize>,
    name_index: HashMap<&'m str, usize>,
    outgoing: Vec<Vec<EdgeRef>>,
    incoming: Vec<Vec<EdgeRef>>,
    listeners: HashMap<&'m str, Vec<Listener>>,
}

impl<'m> PropagationGraph<'m> {
    pub fn new(model: &'m FaultModel) -> Result<Self, ReasonError> {
        let nodes: Vec<&Node> = model.nodes().iter().collect();
        let mut index = HashMap::with_capacity(nodes.len());
        let mut name_index = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            index.insert(node.id.as_str(), i);
            // First occurrence wins when names collide.
            name_index.entry(node.name.as_str()).or_insert(i);
        }

        let mut outgoing = vec![Vec::new(); nodes.len()];
        let mut incoming = vec![Vec::new(); nodes.len()];
        for edge in model.edges() {
            let (from, to) = match (index.get(edge.from.as_str()), index.get(edge.to.as_str())) {
                (Some(&f), Some(&t)) => (f, t),
                _ => {
                    return Err(ReasonError::CorruptModel(format!(
                        "edge {} -> {} escaped integrity validation",
                        edge.from, edge.to
                    )))
                }
            };
            outgoing[from].push(EdgeRef {
                node: to,
                time_min_ms: edge.time_min_ms,
                time_max_ms: edge.time_max_ms,
            });
            incoming[to].push(EdgeRef {
                node: from,
                time_min_ms: edge.time_min_ms,
                time_max_ms: edge.time_max_ms,
            });
        }

        let mut listeners: HashMap<&str, Vec<Listener>> = HashMap::new();
        for (i, node) in nodes.iter().enumerate() {
            if let NodeKind::Discrepancy { predicate, .. } = &node.kind {
                let signal = model.signal(&predicate.signal_ref).ok_or_else(|| {
                    ReasonError::CorruptModel(format!(
                        "node {} references signal {} that escaped integrity validation",
                        node.id, predicate.signal_ref
                    ))
                })?;
                listeners
                    .entry(signal.source_name.as_str())
                    .or_default()
                    .push(Listener {
                        node: i,
                        range_min: signal.range_min,
                        range_max: signal.range_max,
                    });
            }
        }

        Ok(Self {
            nodes,
            index,
            name_index,
            outgoing,
            incoming,
            listeners,
        })
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, idx: usize) -> &'m Node {
        self.nodes[idx]
    }

    pub fn id(&self, idx: usize) -> &'m str {
        &self.nodes[idx].id
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    pub fn index_of_name(&self, name: &str) -> Option<usize> {
        self.name_index.get(name).copied()
    }

    pub fn outgoing(&self, idx: usize) -> &[EdgeRef] {
        &self.outgoing[idx]
    }

    pub fn incoming(&self, idx: usize) -> &[EdgeRef] {
        &self.incoming[idx]
    }

    /// Discrepancies whose predicate reads the given signal source.
    pub fn listeners(&self, source_name: &str) -> &[Listener] {
        self.listeners
            .get(source_name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &'m Node)> + '_ {
        self.nodes.iter().enumerate().map(|(i, n)| (i, *n))
    }
}
