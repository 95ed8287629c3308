use serde::Serialize;

use tfpg_ingest::{DataSample, SignalIngestor};
use tfpg_model::FaultModel;

use crate::activation::ActivationEngine;
use crate::error::ReasonError;
use crate::graph::PropagationGraph;
use crate::prognosis::{forecast, Prognosis};
use crate::state::{snapshot, NodeState, NodeStateRecord};
use crate::status::{symptom_status, SymptomStatus};
use crate::tracker::{rank_hypotheses, unexplained_symptoms, Diagnosis};

/// Everything the reasoner concluded after one sample.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct StepReport {
    pub timestamp_ms: u64,
    pub diagnoses: Vec<Diagnosis>,
    pub prognosis: Prognosis,
}

/// Sequential per-sample reasoning facade.
///
/// Each step records the sample, reconciles node states up to the sample's
/// time, ranks root-cause hypotheses, and forecasts time-to-criticality.
/// The instance holds no hidden state beyond the node-state table and the
/// sample buffer, and is cheap to construct.
pub struct Reasoner<'m> {
    engine: ActivationEngine<'m>,
    ingestor: SignalIngestor,
    criticality_threshold: u8,
}

impl<'m> Reasoner<'m> {
    pub fn new(model: &'m FaultModel, criticality_threshold: u8) -> Result<Self, ReasonError> {
        Ok(Self {
            engine: ActivationEngine::new(model)?,
            ingestor: SignalIngestor::for_model(model),
            criticality_threshold,
        })
    }

    pub fn graph(&self) -> &PropagationGraph<'m> {
        self.engine.graph()
    }

    pub fn states(&self) -> &[NodeState] {
        self.engine.states()
    }

    pub fn node_state(&self, id: &str) -> Option<&NodeState> {
        self.engine.state(id)
    }

    pub fn ingestor(&self) -> &SignalIngestor {
        &self.ingestor
    }

    pub fn criticality_threshold(&self) -> u8 {
        self.criticality_threshold
    }

    /// Process one sample and report the resulting view.
    pub fn step(&mut self, sample: DataSample) -> Result<StepReport, ReasonError> {
        let timestamp_ms = sample.timestamp_ms;
        self.engine.apply(&sample)?;
        self.ingestor.ingest(sample);

        let diagnoses = rank_hypotheses(self.engine.graph(), self.engine.states());
        let prognosis = forecast(
            self.engine.graph(),
            self.engine.states(),
            self.criticality_threshold,
            timestamp_ms,
        );
        Ok(StepReport {
            timestamp_ms,
            diagnoses,
            prognosis,
        })
    }

    /// Process a whole stream, returning one report per sample.
    pub fn run(
        &mut self,
        samples: impl IntoIterator<Item = DataSample>,
    ) -> Result<Vec<StepReport>, ReasonError> {
        samples.into_iter().map(|s| self.step(s)).collect()
    }

    /// State table snapshot, sorted by node id.
    pub fn snapshot(&self) -> Vec<NodeStateRecord> {
        snapshot(self.engine.graph(), self.engine.states())
    }

    /// Status of a discrepancy at the time of the last processed sample.
    pub fn symptom_status(&self, id: &str) -> Option<SymptomStatus> {
        let idx = self.engine.graph().index_of(id)?;
        let now = self.engine.last_timestamp_ms().unwrap_or(0);
        symptom_status(self.engine.graph(), self.engine.states(), idx, now)
    }

    /// Active discrepancies not explained by any of the given diagnoses.
    pub fn unexplained_symptoms(&self, diagnoses: &[Diagnosis]) -> Vec<String> {
        unexplained_symptoms(self.engine.graph(), self.engine.states(), diagnoses)
    }
}
