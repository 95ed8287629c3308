use tfpg_reason::ReasonError;

/// Errors raised by the refinement optimizer.
#[derive(Debug, thiserror::Error)]
pub enum RefineError {
    #[error("trace replay failed: {0}")]
    Replay(#[from] ReasonError),
}
