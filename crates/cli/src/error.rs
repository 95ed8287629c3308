use std::path::PathBuf;

use tfpg_ingest::IngestError;
use tfpg_model::ModelError;
use tfpg_reason::ReasonError;

/// Top-level errors of the reasoner binary. Every variant maps to exit
/// code 1.
#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("could not open {path}: {source}")]
    FileOpen {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("could not write {path}: {source}")]
    LogWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Scenario(#[from] IngestError),
    #[error(transparent)]
    Reason(#[from] ReasonError),
}
