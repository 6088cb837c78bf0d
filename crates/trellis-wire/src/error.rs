use thiserror::Error;

/// All possible errors the wire codec can produce
#[derive(Error, Debug)]
pub enum WireError {
    /// A step record points at a group order no group record carries
    #[error("Step references unknown group index: {0}")]
    UnknownGroupIndex(u32),

    /// An input record carries a type outside the supported set
    #[error("Unknown input type: {0}")]
    UnknownInputType(String),

    /// Errors that occur during JSON processing
    #[error("JSON processing error: {0}")]
    JsonError(#[from] serde_json::Error),
}
