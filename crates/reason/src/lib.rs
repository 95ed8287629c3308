#![deny(unsafe_code)]
//! # tfpg-reason
//!
//! The reasoning core of the TFPG diagnostic engine:
//!
//! - the activation engine drives symptom nodes through the one-shot
//!   inactive-to-active transition, honoring OR/AND gate semantics and
//!   recording robustness;
//! - the hypothesis tracker walks the graph backward under temporal-window
//!   constraints to enumerate candidate failure modes, then forward to
//!   score and rank them;
//! - the prognosis search forecasts the earliest admissible activation of
//!   a node on the criticality front.
//!
//! All three are deterministic: a fixed model and sample stream produce
//! bit-identical output, with every externally visible collection sorted
//! by stable node ids.

pub mod activation;
pub mod error;
pub mod graph;
pub mod prognosis;
pub mod reasoner;
pub mod state;
pub mod status;
pub mod tracker;

pub use activation::ActivationEngine;
pub use error::ReasonError;
pub use graph::{EdgeRef, Listener, PropagationGraph};
pub use prognosis::{forecast, Prognosis};
pub use reasoner::{Reasoner, StepReport};
pub use state::{snapshot, NodeState, NodeStateRecord};
pub use status::{symptom_status, MissingCause, SymptomStatus};
pub use tracker::{rank_hypotheses, unexplained_symptoms, Diagnosis, DiagnosisTier};
