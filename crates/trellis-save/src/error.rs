use thiserror::Error;

/// Errors surfaced by persistence dispatch
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SaveError {
    /// The collaborator could not be reached
    #[error("Sink unavailable: {0}")]
    SinkUnavailable(String),

    /// The collaborator rejected the payload
    #[error("Save rejected: {0}")]
    Rejected(String),
}
