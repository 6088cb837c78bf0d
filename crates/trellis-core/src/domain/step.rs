use crate::domain::state::{GroupId, StepId};
use serde::{Deserialize, Serialize};

/// Kind of form control an input field renders as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// Single-line text entry
    Text,
    /// Date picker
    Date,
    /// Choice among a fixed set of options
    Select,
    /// Numeric entry
    Number,
    /// Boolean toggle
    Checkbox,
    /// Multi-line text entry
    Textarea,
}

impl InputKind {
    /// Wire identifier for this kind
    pub fn as_str(&self) -> &'static str {
        match self {
            InputKind::Text => "text",
            InputKind::Date => "date",
            InputKind::Select => "select",
            InputKind::Number => "number",
            InputKind::Checkbox => "checkbox",
            InputKind::Textarea => "textarea",
        }
    }

    /// Parse a wire identifier back into a kind
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "text" => Some(InputKind::Text),
            "date" => Some(InputKind::Date),
            "select" => Some(InputKind::Select),
            "number" => Some(InputKind::Number),
            "checkbox" => Some(InputKind::Checkbox),
            "textarea" => Some(InputKind::Textarea),
            _ => None,
        }
    }
}

/// A typed form control attached to a step
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputField {
    /// Unique id within the owning step
    pub id: String,

    /// Display label
    pub label: String,

    /// Control type
    #[serde(rename = "type")]
    pub kind: InputKind,

    /// Optional text rendered before the value
    #[serde(default)]
    pub prefix: Option<String>,

    /// Optional text rendered after the value
    #[serde(default)]
    pub suffix: Option<String>,

    /// Choices for select controls (insertion order significant)
    #[serde(default)]
    pub options: Vec<String>,

    /// Optional pre-filled value
    #[serde(default, rename = "default")]
    pub default_value: Option<String>,

    /// Whether the field must be filled in
    #[serde(default)]
    pub required: bool,
}

impl InputField {
    /// Create a field of the given kind with everything else empty
    pub fn new(id: impl Into<String>, label: impl Into<String>, kind: InputKind) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind,
            prefix: None,
            suffix: None,
            options: Vec::new(),
            default_value: None,
            required: false,
        }
    }
}

/// A single instruction card within a group
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier
    pub id: StepId,

    /// Short display name (may be empty)
    #[serde(default)]
    pub label: String,

    /// Owning group; a step has exactly one owner at all times
    pub group_id: GroupId,

    /// Free-text body
    #[serde(default)]
    pub instructions: String,

    /// Ordered form controls
    #[serde(default)]
    pub input_fields: Vec<InputField>,
}

impl Step {
    /// Create an empty step owned by `group_id`
    pub fn new(id: StepId, group_id: GroupId) -> Self {
        Self {
            id,
            label: String::new(),
            group_id,
            instructions: String::new(),
            input_fields: Vec::new(),
        }
    }

    /// Builder-style label setter
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }
}
