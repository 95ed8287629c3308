/// Errors raised by the sample-stream layer.
#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("scenario parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("internal id {0} is not assigned to any parameter")]
    UnknownInternalId(u32),
}
