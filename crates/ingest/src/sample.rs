use serde::{Deserialize, Serialize};

/// One timestamped measurement or fault injection from a test stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DataSample {
    pub timestamp_ms: u64,
    pub parameter_id: String,
    pub value: f64,
    pub is_failure_mode: bool,
}

impl DataSample {
    pub fn reading(timestamp_ms: u64, parameter_id: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp_ms,
            parameter_id: parameter_id.into(),
            value,
            is_failure_mode: false,
        }
    }

    /// A ground-truth fault injection targeting a failure mode by id or name.
    pub fn injection(timestamp_ms: u64, parameter_id: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp_ms,
            parameter_id: parameter_id.into(),
            value,
            is_failure_mode: true,
        }
    }
}

/// A scalar as it appears on the wire; booleans coerce to `0.0`/`1.0`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Bool(bool),
    Number(f64),
}

impl ScalarValue {
    pub fn as_f64(self) -> f64 {
        match self {
            Self::Bool(true) => 1.0,
            Self::Bool(false) => 0.0,
            Self::Number(v) => v,
        }
    }
}

/// One entry of a scenario's `data_stream`: either an inline comment block
/// (documentation, skipped) or a sample.
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum StreamEvent {
    Comment { comment: serde_json::Value },
    Sample {
        timestamp_ms: u64,
        parameter_id: String,
        value: ScalarValue,
        #[serde(default)]
        is_failure_mode: bool,
    },
}

/// Scenario document as loaded from JSON.
#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioDocument {
    pub scenario_id: String,
    pub data_stream: Vec<StreamEvent>,
}

impl ScenarioDocument {
    pub fn from_json(text: &str) -> Result<Self, crate::IngestError> {
        Ok(serde_json::from_str(text)?)
    }

    /// The stream as samples, comments dropped, wire scalars coerced.
    pub fn samples(&self) -> Vec<DataSample> {
        self.data_stream
            .iter()
            .filter_map(|event| match event {
                StreamEvent::Comment { .. } => None,
                StreamEvent::Sample {
                    timestamp_ms,
                    parameter_id,
                    value,
                    is_failure_mode,
                } => Some(DataSample {
                    timestamp_ms: *timestamp_ms,
                    parameter_id: parameter_id.clone(),
                    value: value.as_f64(),
                    is_failure_mode: *is_failure_mode,
                }),
            })
            .collect()
    }
}
