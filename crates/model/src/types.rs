use serde::{Deserialize, Serialize};

/// Margin below which a signal range is considered degenerate and robustness
/// values are left unnormalized.
pub const RANGE_EPSILON: f64 = 1e-9;

/// Telemetry channel kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SignalKind {
    Continuous,
    Discrete,
}

impl std::fmt::Display for SignalKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Continuous => write!(f, "Continuous"),
            Self::Discrete => write!(f, "Discrete"),
        }
    }
}

/// A named, typed telemetry channel.
///
/// The `[range_min, range_max]` interval is used only to normalize
/// robustness margins; it defaults to `[0, 1]`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Signal {
    pub id: String,
    pub source_name: String,
    #[serde(rename = "type")]
    pub kind: SignalKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub units: Option<String>,
    #[serde(default)]
    pub range_min: f64,
    #[serde(default = "default_range_max")]
    pub range_max: f64,
}

fn default_range_max() -> f64 {
    1.0
}

/// Comparison operator of a discrepancy predicate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PredicateOp {
    #[serde(rename = "<")]
    Lt,
    #[serde(rename = "<=")]
    Le,
    #[serde(rename = ">")]
    Gt,
    #[serde(rename = ">=")]
    Ge,
    #[serde(rename = "==")]
    Eq,
    #[serde(rename = "!=")]
    Ne,
}

impl std::fmt::Display for PredicateOp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Lt => "<",
            Self::Le => "<=",
            Self::Gt => ">",
            Self::Ge => ">=",
            Self::Eq => "==",
            Self::Ne => "!=",
        };
        write!(f, "{}", s)
    }
}

/// Activation condition of a discrepancy: `signal <op> threshold`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Predicate {
    pub signal_ref: String,
    #[serde(rename = "operator")]
    pub op: PredicateOp,
    pub threshold: f64,
}

impl Predicate {
    /// Signed, normalized satisfaction margin of this predicate at `value`.
    ///
    /// Positive means satisfied, negative means violated. Margins are
    /// divided by the signal range so that robustness is comparable across
    /// signals; a degenerate range (`<= RANGE_EPSILON`) leaves the margin
    /// unnormalized.
    pub fn robustness(&self, value: f64, range_min: f64, range_max: f64) -> f64 {
        let range = range_max - range_min;
        let normalize = |raw: f64| {
            if range <= RANGE_EPSILON {
                raw
            } else {
                raw / range
            }
        };
        match self.op {
            PredicateOp::Gt | PredicateOp::Ge => normalize(value - self.threshold),
            PredicateOp::Lt | PredicateOp::Le => normalize(self.threshold - value),
            PredicateOp::Eq => 1.0 - normalize((value - self.threshold).abs()),
            PredicateOp::Ne => normalize((value - self.threshold).abs()) - 1.0,
        }
    }

    /// True when the predicate holds at `value` (robustness above zero).
    pub fn holds(&self, value: f64, range_min: f64, range_max: f64) -> bool {
        self.robustness(value, range_min, range_max) > 0.0
    }
}

/// Gate semantics of a discrepancy node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateType {
    /// Activates as soon as its own predicate is satisfied.
    Or,
    /// Additionally requires every parent to be active and causally prior.
    And,
}

impl std::fmt::Display for GateType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Or => write!(f, "OR"),
            Self::And => write!(f, "AND"),
        }
    }
}

/// Variant payload of a graph vertex.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum NodeKind {
    /// Root-cause vertex. Not measured, only inferred or injected.
    FailureMode,
    /// Symptom vertex, activated when its predicate over a signal holds.
    Discrepancy {
        gate_type: GateType,
        criticality_level: u8,
        predicate: Predicate,
    },
}

/// A graph vertex: shared header plus variant payload.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub name: String,
    #[serde(flatten)]
    pub kind: NodeKind,
}

impl Node {
    pub fn failure_mode(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::FailureMode,
        }
    }

    pub fn discrepancy(
        id: impl Into<String>,
        name: impl Into<String>,
        gate_type: GateType,
        criticality_level: u8,
        predicate: Predicate,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            kind: NodeKind::Discrepancy {
                gate_type,
                criticality_level,
                predicate,
            },
        }
    }

    pub fn is_failure_mode(&self) -> bool {
        matches!(self.kind, NodeKind::FailureMode)
    }

    pub fn is_discrepancy(&self) -> bool {
        matches!(self.kind, NodeKind::Discrepancy { .. })
    }

    pub fn gate(&self) -> Option<GateType> {
        match &self.kind {
            NodeKind::Discrepancy { gate_type, .. } => Some(*gate_type),
            NodeKind::FailureMode => None,
        }
    }

    pub fn predicate(&self) -> Option<&Predicate> {
        match &self.kind {
            NodeKind::Discrepancy { predicate, .. } => Some(predicate),
            NodeKind::FailureMode => None,
        }
    }

    /// Criticality of the vertex; failure modes score zero.
    pub fn criticality_level(&self) -> u8 {
        match &self.kind {
            NodeKind::Discrepancy {
                criticality_level, ..
            } => *criticality_level,
            NodeKind::FailureMode => 0,
        }
    }
}

/// Directed causal edge with a closed propagation window in milliseconds.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub time_min_ms: u64,
    pub time_max_ms: u64,
}

impl Edge {
    pub fn new(from: impl Into<String>, to: impl Into<String>, time_min_ms: u64, time_max_ms: u64) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            time_min_ms,
            time_max_ms,
        }
    }

    /// True when an observed parent-to-child delay fits the window.
    pub fn admits_delay(&self, delta_ms: u64) -> bool {
        delta_ms >= self.time_min_ms && delta_ms <= self.time_max_ms
    }
}

/// Top-level fault model document as loaded from JSON.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ModelDocument {
    pub model_name: String,
    pub version: String,
    pub signals: Vec<Signal>,
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}
