use std::collections::HashMap;

use tfpg_model::FaultModel;

use crate::error::IngestError;
use crate::sample::DataSample;

/// Append-only sample buffer with a stable name-to-id interner.
///
/// Known signal source names are registered from the model at construction
/// so their ids are stable across runs; names first seen in the stream
/// (typically fault-injection targets) get fresh ids on arrival.
#[derive(Clone, Debug, Default)]
pub struct SignalIngestor {
    name_to_id: HashMap<String, u32>,
    id_to_name: Vec<String>,
    samples: Vec<DataSample>,
}

impl SignalIngestor {
    pub fn new() -> Self {
        Self::default()
    }

    /// An ingestor pre-populated with the model's signal source names, in
    /// model order.
    pub fn for_model(model: &FaultModel) -> Self {
        let mut ingestor = Self::new();
        for signal in model.signals() {
            ingestor.intern(&signal.source_name);
        }
        ingestor
    }

    /// Id for `name`, assigning a fresh one on first sight.
    pub fn intern(&mut self, name: &str) -> u32 {
        if let Some(&id) = self.name_to_id.get(name) {
            return id;
        }
        let id = self.id_to_name.len() as u32;
        self.name_to_id.insert(name.to_owned(), id);
        self.id_to_name.push(name.to_owned());
        id
    }

    pub fn internal_id(&self, name: &str) -> Option<u32> {
        self.name_to_id.get(name).copied()
    }

    /// Reverse lookup; an unassigned id is a hard error.
    pub fn parameter_name(&self, id: u32) -> Result<&str, IngestError> {
        self.id_to_name
            .get(id as usize)
            .map(String::as_str)
            .ok_or(IngestError::UnknownInternalId(id))
    }

    /// Append a sample, interning its parameter name.
    pub fn ingest(&mut self, sample: DataSample) {
        self.intern(&sample.parameter_id);
        self.samples.push(sample);
    }

    pub fn samples(&self) -> &[DataSample] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.samples.last().map(|s| s.timestamp_ms)
    }

    pub fn known_parameters(&self) -> usize {
        self.id_to_name.len()
    }
}
