use serde::{Deserialize, Serialize};

/// Lifecycle status a workflow is persisted under
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WorkflowStatus {
    /// Editable, not yet visible to runners
    Draft,
    /// Live and runnable
    Published,
    /// Retired; kept for history
    Archived,
}

/// Workflow-level fields persisted alongside the structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WorkflowMeta {
    /// Workflow name
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Whether the workflow is a reusable template
    #[serde(default)]
    pub is_template: bool,

    /// Status requested for (or last accepted by) persistence
    #[serde(default)]
    pub status: Option<WorkflowStatus>,
}

impl WorkflowMeta {
    /// Create metadata with just a name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&WorkflowStatus::Published).unwrap(),
            "\"published\""
        );
        let status: WorkflowStatus = serde_json::from_str("\"archived\"").unwrap();
        assert_eq!(status, WorkflowStatus::Archived);
    }

    #[test]
    fn test_meta_defaults() {
        let meta: WorkflowMeta = serde_json::from_str(r#"{"name": "Onboarding"}"#).unwrap();
        assert_eq!(meta.name, "Onboarding");
        assert!(meta.description.is_empty());
        assert!(!meta.is_template);
        assert!(meta.status.is_none());
    }
}
