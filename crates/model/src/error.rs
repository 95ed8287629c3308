/// Errors raised while loading or validating a fault model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("model parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("edge {from} -> {to} references unknown node {missing}")]
    UnknownEdgeNode {
        from: String,
        to: String,
        missing: String,
    },
    #[error("edge {from} -> {to} is a self-loop")]
    SelfLoop { from: String, to: String },
    #[error("edge {from} -> {to} has inverted window [{time_min_ms}, {time_max_ms}]")]
    InvertedWindow {
        from: String,
        to: String,
        time_min_ms: u64,
        time_max_ms: u64,
    },
    #[error("node {node} predicate references unknown signal {signal_ref}")]
    UnknownSignalRef { node: String, signal_ref: String },
    #[error("node {node} criticality level {level} outside [0, 10]")]
    CriticalityOutOfRange { node: String, level: u8 },
    #[error("duplicate node id {0}")]
    DuplicateNode(String),
    #[error("duplicate signal id {0}")]
    DuplicateSignal(String),
}
