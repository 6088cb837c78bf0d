use crate::domain::state::{GroupId, StepId};
use serde::{Deserialize, Serialize};

/// An ordered container of steps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    /// Unique identifier
    pub id: GroupId,

    /// Display name; empty labels receive `"Section {n}"` at insertion
    #[serde(default)]
    pub label: String,

    /// Canonical order of owned steps
    #[serde(default)]
    pub step_ids: Vec<StepId>,
}

impl Group {
    /// Create an empty group
    pub fn new(id: GroupId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            step_ids: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_group_new_is_empty() {
        let group = Group::new(GroupId("group-1".to_string()), "Intake");
        assert_eq!(group.label, "Intake");
        assert!(group.step_ids.is_empty());
    }

    #[test]
    fn test_group_serde_defaults() {
        let group: Group = serde_json::from_str(r#"{"id": "group-1"}"#).unwrap();
        assert!(group.label.is_empty());
        assert!(group.step_ids.is_empty());
    }
}
