use thiserror::Error;

/// Core error type for the Trellis builder engine
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// Operation referenced a group that is not in the store
    #[error("Unknown group: {0}")]
    UnknownGroup(String),

    /// Validation error
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::SerializationError(err.to_string())
    }
}

impl From<String> for CoreError {
    fn from(err: String) -> Self {
        CoreError::Other(err)
    }
}

impl From<&str> for CoreError {
    fn from(err: &str) -> Self {
        CoreError::Other(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let errors = vec![
            (
                CoreError::UnknownGroup("group-1".to_string()),
                "Unknown group: group-1",
            ),
            (
                CoreError::ValidationError("dangling id".to_string()),
                "Validation error: dangling id",
            ),
            (
                CoreError::SerializationError("bad json".to_string()),
                "Serialization error: bad json",
            ),
            (CoreError::Other("other".to_string()), "other"),
        ];

        for (error, expected) in errors {
            assert_eq!(error.to_string(), expected);
        }
    }

    #[test]
    fn test_from_serde_json_error() {
        let json_error = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let error: CoreError = json_error.into();

        match error {
            CoreError::SerializationError(msg) => assert!(msg.contains("expected value")),
            _ => panic!("Expected SerializationError variant"),
        }
    }

    #[test]
    fn test_from_string() {
        let error: CoreError = "boom".to_string().into();
        assert_eq!(error, CoreError::Other("boom".to_string()));
    }
}
