//! # Trellis Wire
//!
//! Codec between the hierarchical builder state held by `trellis-core`
//! and the flat, order-indexed payload the persistence collaborator
//! accepts. Groups are persisted with their position in the canonical
//! order; steps carry both their position within their own group and the
//! owning group's position, so the flat list regroups losslessly.
//!
//! ## Example
//!
//! ```
//! use trellis_core::{Group, GroupId, Step, StepId, WorkflowMeta, WorkflowState};
//! use trellis_wire::{build_payload, hydrate};
//!
//! let group_id = GroupId("g1".to_string());
//! let state = WorkflowState::new()
//!     .add_group(Group::new(group_id.clone(), "Intake"))
//!     .add_step(Step::new(StepId("s1".to_string()), group_id).with_label("Collect"))
//!     .unwrap();
//!
//! let payload = build_payload(&WorkflowMeta::named("Onboarding"), &state);
//! assert_eq!(payload.groups[0].order, 0);
//! assert_eq!(payload.steps[0].title, "Collect");
//!
//! let (_, rebuilt) = hydrate(&payload).unwrap();
//! assert!(rebuilt.validate().is_ok());
//! ```

mod decode;
mod encode;
mod error;
mod types;

pub use decode::hydrate;
pub use encode::build_payload;
pub use error::WireError;
pub use types::{GroupRecord, InputRecord, OptionValues, StepRecord, WorkflowPayload};

/// Parse a payload from its JSON representation.
pub fn parse_payload(json: &str) -> Result<WorkflowPayload, WireError> {
    Ok(serde_json::from_str(json)?)
}

/// Render a payload to the JSON the persistence collaborator receives.
pub fn payload_to_json(payload: &WorkflowPayload) -> Result<String, WireError> {
    Ok(serde_json::to_string(payload)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_core::{Group, GroupId, InputField, InputKind, Step, StepId};
    use trellis_core::{WorkflowMeta, WorkflowState};

    #[test]
    fn test_json_round_trip_through_text() {
        let group_id = GroupId("g1".to_string());
        let state = WorkflowState::new().add_group(Group::new(group_id.clone(), "Intake"));
        let mut step = Step::new(StepId("s1".to_string()), group_id).with_label("Collect");
        step.input_fields
            .push(InputField::new("f1", "Due", InputKind::Date));
        let state = state.add_step(step).unwrap();

        let payload = build_payload(&WorkflowMeta::named("Onboarding"), &state);
        let json = payload_to_json(&payload).unwrap();
        let parsed = parse_payload(&json).unwrap();
        assert_eq!(parsed, payload);
    }

    #[test]
    fn test_parse_rejects_malformed_json() {
        assert!(matches!(
            parse_payload("{not json"),
            Err(WireError::JsonError(_))
        ));
    }
}
