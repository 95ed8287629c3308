#![deny(unsafe_code)]
//! # tfpg-model
//!
//! Static fault-model layer of the TFPG reasoner: signals, failure-mode and
//! discrepancy nodes, and causal edges carrying closed propagation windows.
//!
//! The model is loaded once from JSON, integrity-checked, and read-only for
//! the duration of a reasoning run. Only the offline refinement optimizer
//! calls the mutators, and every tentative mutation it rejects is reverted.

pub mod error;
pub mod model;
pub mod types;

pub use error::ModelError;
pub use model::FaultModel;
pub use types::{
    Edge, GateType, ModelDocument, Node, NodeKind, Predicate, PredicateOp, Signal, SignalKind,
    RANGE_EPSILON,
};
