use thiserror::Error;

/// Result alias for engine construction and score loading.
pub type Result<T> = std::result::Result<T, EngineError>;

/// Fatal, construction-time failures. Runtime data problems (malformed
/// notes, missing audio) are clamped and logged instead; the engine never
/// enters a degraded running state.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("invalid configuration: {0}")]
    Config(String),
    #[error("invalid score: {0}")]
    Score(String),
}
