use tfpg_model::{FaultModel, GateType, NodeKind};
use tracing::{debug, info};

use tfpg_ingest::DataSample;

use crate::error::ReasonError;
use crate::graph::PropagationGraph;
use crate::state::NodeState;

/// Drives discrepancy nodes through the one-shot inactive-to-active
/// transition as samples arrive.
///
/// Symptom detection is strictly measurement-driven: a discrepancy
/// activates only when its own predicate holds (and, for AND gates, every
/// parent is already active and causally prior). The graph is never used to
/// synthesize activations.
pub struct ActivationEngine<'m> {
    graph: PropagationGraph<'m>,
    states: Vec<NodeState>,
    last_timestamp_ms: Option<u64>,
}

impl<'m> ActivationEngine<'m> {
    pub fn new(model: &'m FaultModel) -> Result<Self, ReasonError> {
        let graph = PropagationGraph::new(model)?;
        let states = vec![NodeState::default(); graph.len()];
        Ok(Self {
            graph,
            states,
            last_timestamp_ms: None,
        })
    }

    pub fn graph(&self) -> &PropagationGraph<'m> {
        &self.graph
    }

    pub fn states(&self) -> &[NodeState] {
        &self.states
    }

    pub fn state(&self, id: &str) -> Option<&NodeState> {
        self.graph.index_of(id).map(|idx| &self.states[idx])
    }

    pub fn last_timestamp_ms(&self) -> Option<u64> {
        self.last_timestamp_ms
    }

    /// Reconcile node states with one sample.
    ///
    /// Samples must arrive in non-decreasing timestamp order; a regression
    /// aborts the run.
    pub fn apply(&mut self, sample: &DataSample) -> Result<(), ReasonError> {
        if let Some(previous_ms) = self.last_timestamp_ms {
            if sample.timestamp_ms < previous_ms {
                return Err(ReasonError::OutOfOrder {
                    previous_ms,
                    timestamp_ms: sample.timestamp_ms,
                });
            }
        }
        self.last_timestamp_ms = Some(sample.timestamp_ms);

        match self.failure_mode_target(&sample.parameter_id) {
            Some(target) => self.apply_injection(target, sample),
            // A flagged injection with an unresolvable target has nothing
            // to activate; it must not reach the predicate path.
            None if sample.is_failure_mode => {}
            None => self.apply_reading(sample),
        }
        Ok(())
    }

    /// A sample addresses a failure mode directly when its parameter
    /// matches a failure-mode id or display name.
    fn failure_mode_target(&self, parameter_id: &str) -> Option<usize> {
        self.graph
            .index_of(parameter_id)
            .or_else(|| self.graph.index_of_name(parameter_id))
            .filter(|&idx| self.graph.node(idx).is_failure_mode())
    }

    fn apply_injection(&mut self, idx: usize, sample: &DataSample) {
        let state = &mut self.states[idx];
        // Nonzero means "on"; zero-valued injections are recorded upstream
        // but do not activate anything.
        if state.is_active || sample.value == 0.0 {
            return;
        }
        state.is_active = true;
        state.activation_time_ms = sample.timestamp_ms;
        state.trigger_value = sample.value;
        info!(
            node = %self.graph.id(idx),
            t_ms = sample.timestamp_ms,
            "fault injected"
        );
    }

    fn apply_reading(&mut self, sample: &DataSample) {
        for listener in self.graph.listeners(&sample.parameter_id) {
            let idx = listener.node;
            let node = self.graph.node(idx);
            let (gate, predicate) = match &node.kind {
                NodeKind::Discrepancy {
                    gate_type,
                    predicate,
                    ..
                } => (*gate_type, predicate),
                NodeKind::FailureMode => continue,
            };
            if self.states[idx].is_active {
                continue;
            }

            let rho = predicate.robustness(sample.value, listener.range_min, listener.range_max);
            // Inactive nodes keep tracking the current evidence.
            self.states[idx].robustness = rho;
            if rho <= 0.0 {
                continue;
            }

            if gate == GateType::And && !self.parents_causally_prior(idx, sample.timestamp_ms) {
                debug!(
                    node = %node.id,
                    t_ms = sample.timestamp_ms,
                    "predicate holds but AND gate is blocked"
                );
                continue;
            }

            let state = &mut self.states[idx];
            state.is_active = true;
            state.activation_time_ms = sample.timestamp_ms;
            state.robustness = rho;
            state.trigger_value = sample.value;
            info!(
                node = %node.id,
                name = %node.name,
                t_ms = sample.timestamp_ms,
                value = sample.value,
                "symptom activated"
            );
        }
    }

    /// AND-gate condition: every parent active no later than `t`.
    fn parents_causally_prior(&self, idx: usize, t: u64) -> bool {
        self.graph.incoming(idx).iter().all(|edge| {
            let parent = &self.states[edge.node];
            parent.is_active && parent.activation_time_ms <= t
        })
    }
}
