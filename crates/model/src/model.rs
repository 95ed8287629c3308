use std::collections::HashMap;

use crate::error::ModelError;
use crate::types::{Edge, ModelDocument, Node, NodeKind, Signal};

/// The static timed failure propagation graph.
///
/// Built once from a [`ModelDocument`] and read-only during a reasoning run.
/// The refinement optimizer is the only caller of the mutators, and every
/// mutation it does not keep must be reverted through them.
#[derive(Clone, Debug)]
pub struct FaultModel {
    name: String,
    version: String,
    signals: Vec<Signal>,
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    node_index: HashMap<String, usize>,
    signal_index: HashMap<String, usize>,
}

impl FaultModel {
    /// Build and validate a model from a parsed document.
    pub fn from_document(doc: ModelDocument) -> Result<Self, ModelError> {
        let mut model = Self {
            name: doc.model_name,
            version: doc.version,
            signals: Vec::new(),
            nodes: Vec::new(),
            edges: Vec::new(),
            node_index: HashMap::new(),
            signal_index: HashMap::new(),
        };

        for signal in doc.signals {
            if model.signal_index.contains_key(&signal.id) {
                return Err(ModelError::DuplicateSignal(signal.id));
            }
            model.signal_index.insert(signal.id.clone(), model.signals.len());
            model.signals.push(signal);
        }

        for node in doc.nodes {
            if model.node_index.contains_key(&node.id) {
                return Err(ModelError::DuplicateNode(node.id));
            }
            model.node_index.insert(node.id.clone(), model.nodes.len());
            model.nodes.push(node);
        }

        model.edges = doc.edges;
        model.validate()?;
        Ok(model)
    }

    /// Parse and validate a model from its JSON document text.
    pub fn from_json(text: &str) -> Result<Self, ModelError> {
        let doc: ModelDocument = serde_json::from_str(text)?;
        Self::from_document(doc)
    }

    /// Integrity checks: edge endpoints exist, no self-loops, windows are
    /// ordered, predicates reference known signals, criticality in range.
    fn validate(&self) -> Result<(), ModelError> {
        for node in &self.nodes {
            if let NodeKind::Discrepancy {
                criticality_level,
                predicate,
                ..
            } = &node.kind
            {
                if *criticality_level > 10 {
                    return Err(ModelError::CriticalityOutOfRange {
                        node: node.id.clone(),
                        level: *criticality_level,
                    });
                }
                if !self.signal_index.contains_key(&predicate.signal_ref) {
                    return Err(ModelError::UnknownSignalRef {
                        node: node.id.clone(),
                        signal_ref: predicate.signal_ref.clone(),
                    });
                }
            }
        }

        for edge in &self.edges {
            if edge.from == edge.to {
                return Err(ModelError::SelfLoop {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                });
            }
            if edge.time_min_ms > edge.time_max_ms {
                return Err(ModelError::InvertedWindow {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    time_min_ms: edge.time_min_ms,
                    time_max_ms: edge.time_max_ms,
                });
            }
            for endpoint in [&edge.from, &edge.to] {
                if !self.node_index.contains_key(endpoint) {
                    return Err(ModelError::UnknownEdgeNode {
                        from: edge.from.clone(),
                        to: edge.to.clone(),
                        missing: endpoint.clone(),
                    });
                }
            }
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn signals(&self) -> &[Signal] {
        &self.signals
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.node_index.get(id).map(|&i| &self.nodes[i])
    }

    pub fn signal(&self, id: &str) -> Option<&Signal> {
        self.signal_index.get(id).map(|&i| &self.signals[i])
    }

    pub fn contains_node(&self, id: &str) -> bool {
        self.node_index.contains_key(id)
    }

    /// All nodes with `criticality_level >= threshold`, in model order.
    pub fn criticality_front(&self, threshold: u8) -> Vec<&Node> {
        self.nodes
            .iter()
            .filter(|n| n.criticality_level() >= threshold)
            .collect()
    }

    /// Edges arriving at `id`, in model order.
    pub fn incoming_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.to == id)
    }

    /// Edges leaving `id`, in model order.
    pub fn outgoing_edges<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a Edge> {
        self.edges.iter().filter(move |e| e.from == id)
    }

    // ── Refinement mutators ─────────────────────────────────────────────

    /// Insert a node; a duplicate id is silently ignored.
    pub fn add_node(&mut self, node: Node) {
        if self.node_index.contains_key(&node.id) {
            return;
        }
        self.node_index.insert(node.id.clone(), self.nodes.len());
        self.nodes.push(node);
    }

    /// Remove a node and every edge incident to it.
    pub fn remove_node(&mut self, id: &str) {
        if self.node_index.remove(id).is_none() {
            return;
        }
        self.nodes.retain(|n| n.id != id);
        self.edges.retain(|e| e.from != id && e.to != id);
        self.node_index = self
            .nodes
            .iter()
            .enumerate()
            .map(|(i, n)| (n.id.clone(), i))
            .collect();
    }

    /// Insert an edge; a duplicate endpoint pair is silently ignored.
    pub fn add_edge(&mut self, edge: Edge) {
        if self
            .edges
            .iter()
            .any(|e| e.from == edge.from && e.to == edge.to)
        {
            return;
        }
        self.edges.push(edge);
    }

    pub fn remove_edge(&mut self, from: &str, to: &str) {
        self.edges.retain(|e| !(e.from == from && e.to == to));
    }
}

/// Equality over the logical content; index layout is derived state.
impl PartialEq for FaultModel {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.signals == other.signals
            && self.nodes == other.nodes
            && self.edges == other.edges
    }
}
