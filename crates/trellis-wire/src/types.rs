use serde::{Deserialize, Serialize};
use trellis_core::WorkflowStatus;

/// Flat, order-indexed persistence payload for one workflow
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkflowPayload {
    /// Workflow name
    pub name: String,

    /// Free-text description
    #[serde(default)]
    pub description: String,

    /// Whether the workflow is a reusable template
    #[serde(default)]
    pub is_template: bool,

    /// Requested lifecycle status
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<WorkflowStatus>,

    /// One record per group, carrying its position in the canonical order
    #[serde(default)]
    pub groups: Vec<GroupRecord>,

    /// One record per step, regroupable via `group_index`
    #[serde(default)]
    pub steps: Vec<StepRecord>,
}

/// A group flattened to its display name and position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupRecord {
    /// Display name
    pub name: String,

    /// Zero-based position in the group order
    pub order: u32,
}

/// A step flattened against its owning group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StepRecord {
    /// Display name
    pub title: String,

    /// Free-text body
    #[serde(default)]
    pub instructions: String,

    /// Zero-based position within the owning group; resets per group,
    /// it is not a global sequence number
    pub order: u32,

    /// Position of the owning group in the group order
    pub group_index: u32,

    /// Flattened input fields
    #[serde(default)]
    pub inputs: Vec<InputRecord>,
}

/// An input field flattened for persistence
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputRecord {
    /// Display label
    pub label: String,

    /// Control type identifier (`text`, `date`, `select`, `number`,
    /// `checkbox`, `textarea`)
    pub input_type: String,

    /// Whether the field must be filled in; absent means `false`
    #[serde(default)]
    pub required: bool,

    /// Select choices; omitted entirely when there are none
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<OptionValues>,
}

/// Structured wrapper for select choices
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionValues {
    /// The selectable values, in display order
    pub values: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_options_are_not_serialized() {
        let record = InputRecord {
            label: "Notes".to_string(),
            input_type: "textarea".to_string(),
            required: false,
            options: None,
        };
        let value = serde_json::to_value(&record).unwrap();
        assert!(value.get("options").is_none());
    }

    #[test]
    fn test_required_defaults_to_false() {
        let record: InputRecord =
            serde_json::from_str(r#"{"label": "Due", "input_type": "date"}"#).unwrap();
        assert!(!record.required);
    }

    #[test]
    fn test_status_is_optional_on_the_wire() {
        let payload: WorkflowPayload = serde_json::from_str(
            r#"{"name": "Onboarding", "description": "", "is_template": false}"#,
        )
        .unwrap();
        assert!(payload.status.is_none());
        assert!(payload.groups.is_empty());

        let value = serde_json::to_value(&payload).unwrap();
        assert!(value.get("status").is_none());
    }
}
