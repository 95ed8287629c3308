#![deny(unsafe_code)]
//! # tfpg-ingest
//!
//! Input layer of the TFPG reasoner: the scenario wire format, the
//! append-only sample buffer, and the bidirectional map between external
//! parameter names and stable internal integer ids.

pub mod error;
pub mod ingestor;
pub mod sample;

pub use error::IngestError;
pub use ingestor::SignalIngestor;
pub use sample::{DataSample, ScalarValue, ScenarioDocument, StreamEvent};
