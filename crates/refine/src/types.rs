use serde::{Deserialize, Serialize};
use tfpg_ingest::DataSample;

/// One labeled training trace: a sample stream plus the ground truth of
/// whether the target node should end up active.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LabeledTrace {
    pub samples: Vec<DataSample>,
    pub expected_activation: bool,
}

impl LabeledTrace {
    pub fn new(samples: Vec<DataSample>, expected_activation: bool) -> Self {
        Self {
            samples,
            expected_activation,
        }
    }
}

/// Policy knobs of the refinement optimizer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RefineConfig {
    /// Propagation window assigned to tentatively inserted edges.
    pub default_time_min_ms: u64,
    pub default_time_max_ms: u64,
}

impl Default for RefineConfig {
    fn default() -> Self {
        Self {
            default_time_min_ms: 0,
            default_time_max_ms: 1000,
        }
    }
}
