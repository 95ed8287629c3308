/// Errors raised by the reasoning engine.
#[derive(Debug, thiserror::Error)]
pub enum ReasonError {
    #[error("sample timestamp {timestamp_ms}ms regresses behind {previous_ms}ms")]
    OutOfOrder { previous_ms: u64, timestamp_ms: u64 },
    #[error("corrupt model state: {0}")]
    CorruptModel(String),
}
