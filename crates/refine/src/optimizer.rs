use std::collections::BTreeSet;

use tfpg_model::{Edge, FaultModel, Node};
use tfpg_reason::ActivationEngine;
use tracing::{debug, info};

use crate::error::RefineError;
use crate::types::{LabeledTrace, RefineConfig};

/// Offline model-refinement driver.
///
/// Mutates the fault model to reduce the diagnosis error of a target node
/// over a labeled dataset. Every tentative mutation that does not strictly
/// improve the error is reverted, leaving the model identical to its
/// pre-trial state.
pub struct RefinementOptimizer<'a> {
    model: &'a mut FaultModel,
    config: RefineConfig,
}

impl<'a> RefinementOptimizer<'a> {
    pub fn new(model: &'a mut FaultModel) -> Self {
        Self {
            model,
            config: RefineConfig::default(),
        }
    }

    pub fn with_config(model: &'a mut FaultModel, config: RefineConfig) -> Self {
        Self { model, config }
    }

    /// Diagnosis error of `target`: misclassified traces over total traces.
    ///
    /// Each trace is replayed through a fresh activation engine; a trace is
    /// misclassified when the target's final activation disagrees with the
    /// label. A target absent from the model reads as inactive.
    pub fn diagnosis_error(
        &self,
        target: &str,
        dataset: &[LabeledTrace],
    ) -> Result<f64, RefineError> {
        if dataset.is_empty() {
            return Ok(0.0);
        }
        let mut misclassified = 0usize;
        for trace in dataset {
            let mut engine = ActivationEngine::new(self.model)?;
            for sample in &trace.samples {
                engine.apply(sample)?;
            }
            let is_active = engine.state(target).map_or(false, |s| s.is_active);
            if is_active != trace.expected_activation {
                misclassified += 1;
            }
        }
        Ok(misclassified as f64 / dataset.len() as f64)
    }

    /// Ancestors of `node` (reverse BFS over the edge set).
    pub fn minimal_cut_set(&self, node: &str) -> BTreeSet<String> {
        let mut cut_set = BTreeSet::new();
        let mut visited = BTreeSet::from([node.to_owned()]);
        let mut queue = std::collections::VecDeque::from([node.to_owned()]);

        while let Some(current) = queue.pop_front() {
            for edge in self.model.incoming_edges(&current) {
                cut_set.insert(edge.from.clone());
                if visited.insert(edge.from.clone()) {
                    queue.push_back(edge.from.clone());
                }
            }
        }
        cut_set
    }

    /// Recursively mutate the graph to reduce the diagnosis error of
    /// `target`, drawing new symptom nodes from `pool`.
    pub fn refine(
        &mut self,
        target: &str,
        pool: &[Node],
        dataset: &[LabeledTrace],
    ) -> Result<(), RefineError> {
        let mut descended = BTreeSet::new();
        self.refine_inner(target, pool, dataset, &mut descended)
    }

    fn refine_inner(
        &mut self,
        target: &str,
        pool: &[Node],
        dataset: &[LabeledTrace],
        descended: &mut BTreeSet<String>,
    ) -> Result<(), RefineError> {
        let current_de = self.diagnosis_error(target, dataset)?;
        if current_de == 0.0 {
            return Ok(());
        }
        debug!(node = %target, de = current_de, "refining");
        descended.insert(target.to_owned());

        // 1. Successor descent: refine downstream nodes first.
        let successors: Vec<String> = self
            .model
            .outgoing_edges(target)
            .map(|e| e.to.clone())
            .collect();
        for successor in successors {
            if descended.contains(&successor) {
                continue;
            }
            if self.diagnosis_error(&successor, dataset)? <= current_de {
                debug!(from = %target, to = %successor, "descending to successor");
                return self.refine_inner(&successor, pool, dataset, descended);
            }
        }

        // 2. Internal edge addition: a missing causal link into the target.
        let cut_set = self.minimal_cut_set(target);
        let candidates: Vec<String> = self
            .model
            .nodes()
            .iter()
            .filter(|n| n.is_discrepancy() && n.id != target && !cut_set.contains(&n.id))
            .map(|n| n.id.clone())
            .collect();
        for candidate in candidates {
            self.model.add_edge(self.tentative_edge(&candidate, target));
            let new_de = self.diagnosis_error(target, dataset)?;
            if new_de < current_de {
                info!(from = %candidate, to = %target, de = new_de, "kept internal edge");
                descended.clear();
                return self.refine_inner(target, pool, dataset, descended);
            }
            self.model.remove_edge(&candidate, target);
        }

        // 3. External expansion: pull a new symptom in from the pool.
        for fresh in pool {
            if self.model.contains_node(&fresh.id) {
                continue;
            }
            self.model.add_node(fresh.clone());

            // Case A: target feeds the new node.
            self.model.add_edge(self.tentative_edge(target, &fresh.id));
            if self.diagnosis_error(&fresh.id, dataset)? < current_de {
                info!(node = %fresh.id, "expanded downstream of {}", target);
                descended.clear();
                return self.refine_inner(&fresh.id, pool, dataset, descended);
            }
            self.model.remove_edge(target, &fresh.id);

            // Case B: a predecessor of the target feeds the new node.
            let predecessors: Vec<String> = self
                .model
                .incoming_edges(target)
                .map(|e| e.from.clone())
                .collect();
            let mut improved = false;
            for predecessor in predecessors {
                self.model
                    .add_edge(self.tentative_edge(&predecessor, &fresh.id));
                if self.diagnosis_error(target, dataset)? < current_de {
                    info!(from = %predecessor, to = %fresh.id, "expanded beside {}", target);
                    improved = true;
                    break;
                }
                self.model.remove_edge(&predecessor, &fresh.id);
            }
            if improved {
                descended.clear();
                return self.refine_inner(target, pool, dataset, descended);
            }
            self.model.remove_node(&fresh.id);
        }

        Ok(())
    }

    fn tentative_edge(&self, from: &str, to: &str) -> Edge {
        Edge::new(
            from,
            to,
            self.config.default_time_min_ms,
            self.config.default_time_max_ms,
        )
    }
}
