//! Rebuilding hierarchical builder state from a flat payload.

use crate::error::WireError;
use crate::types::{GroupRecord, InputRecord, StepRecord, WorkflowPayload};
use std::collections::HashMap;
use trellis_core::{
    Group, GroupId, InputField, InputKind, Step, StepId, WorkflowMeta, WorkflowState,
};
use uuid::Uuid;

/// Rebuild the hierarchical state a payload was flattened from.
///
/// Groups are ordered by their `order` field; steps are regrouped by
/// `group_index` and ordered by their per-group `order`. Ids are not part
/// of the wire shape, so fresh ones are generated - the result is
/// payload-equivalent to the source state rather than id-identical.
///
/// Errors if a step's `group_index` matches no group record's `order`, or
/// an input carries an unsupported type.
pub fn hydrate(payload: &WorkflowPayload) -> Result<(WorkflowMeta, WorkflowState), WireError> {
    let mut state = WorkflowState::new();
    let mut group_by_order: HashMap<u32, GroupId> = HashMap::new();

    let mut group_records: Vec<&GroupRecord> = payload.groups.iter().collect();
    group_records.sort_by_key(|record| record.order);
    for record in group_records {
        let id = GroupId::generate();
        group_by_order.insert(record.order, id.clone());
        state.group_order.push(id.clone());
        state.groups_by_id.insert(
            id.clone(),
            Group {
                id,
                label: record.name.clone(),
                step_ids: Vec::new(),
            },
        );
    }

    let mut step_records: Vec<&StepRecord> = payload.steps.iter().collect();
    step_records.sort_by_key(|record| (record.group_index, record.order));
    for record in step_records {
        let group_id = group_by_order
            .get(&record.group_index)
            .ok_or(WireError::UnknownGroupIndex(record.group_index))?;
        let step = Step {
            id: StepId::generate(),
            label: record.title.clone(),
            group_id: group_id.clone(),
            instructions: record.instructions.clone(),
            input_fields: record
                .inputs
                .iter()
                .map(input_field)
                .collect::<Result<_, _>>()?,
        };
        if let Some(group) = state.groups_by_id.get_mut(group_id) {
            group.step_ids.push(step.id.clone());
        }
        state.steps_by_id.insert(step.id.clone(), step);
    }

    let meta = WorkflowMeta {
        name: payload.name.clone(),
        description: payload.description.clone(),
        is_template: payload.is_template,
        status: payload.status,
    };
    Ok((meta, state))
}

fn input_field(record: &InputRecord) -> Result<InputField, WireError> {
    let kind = InputKind::parse(&record.input_type)
        .ok_or_else(|| WireError::UnknownInputType(record.input_type.clone()))?;
    Ok(InputField {
        id: Uuid::new_v4().to_string(),
        label: record.label.clone(),
        kind,
        prefix: None,
        suffix: None,
        options: record
            .options
            .as_ref()
            .map(|options| options.values.clone())
            .unwrap_or_default(),
        default_value: None,
        required: record.required,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::build_payload;
    use crate::types::OptionValues;
    use pretty_assertions::assert_eq;

    fn payload() -> WorkflowPayload {
        WorkflowPayload {
            name: "Onboarding".to_string(),
            description: "Employee onboarding".to_string(),
            is_template: false,
            status: None,
            groups: vec![
                GroupRecord {
                    name: "Review".to_string(),
                    order: 1,
                },
                GroupRecord {
                    name: "Intake".to_string(),
                    order: 0,
                },
            ],
            steps: vec![
                StepRecord {
                    title: "Approve".to_string(),
                    instructions: String::new(),
                    order: 0,
                    group_index: 1,
                    inputs: vec![InputRecord {
                        label: "Country".to_string(),
                        input_type: "select".to_string(),
                        required: true,
                        options: Some(OptionValues {
                            values: vec!["NL".to_string(), "BE".to_string()],
                        }),
                    }],
                },
                StepRecord {
                    title: "Verify".to_string(),
                    instructions: "check everything".to_string(),
                    order: 1,
                    group_index: 0,
                    inputs: Vec::new(),
                },
                StepRecord {
                    title: "Collect".to_string(),
                    instructions: String::new(),
                    order: 0,
                    group_index: 0,
                    inputs: Vec::new(),
                },
            ],
        }
    }

    #[test]
    fn test_hydrate_orders_by_the_order_fields() {
        let (meta, state) = hydrate(&payload()).unwrap();
        state.validate().unwrap();
        assert_eq!(meta.name, "Onboarding");

        let group_labels: Vec<&str> = state
            .group_order
            .iter()
            .map(|id| state.groups_by_id[id].label.as_str())
            .collect();
        assert_eq!(group_labels, vec!["Intake", "Review"]);

        let intake = &state.groups_by_id[&state.group_order[0]];
        let step_labels: Vec<&str> = intake
            .step_ids
            .iter()
            .map(|id| state.steps_by_id[id].label.as_str())
            .collect();
        assert_eq!(step_labels, vec!["Collect", "Verify"]);
    }

    #[test]
    fn test_hydrate_rebinds_ownership() {
        let (_, state) = hydrate(&payload()).unwrap();
        for group in state.groups_by_id.values() {
            for step_id in &group.step_ids {
                assert_eq!(state.steps_by_id[step_id].group_id, group.id);
            }
        }
    }

    #[test]
    fn test_hydrate_rejects_dangling_group_index() {
        let mut bad = payload();
        bad.steps[0].group_index = 7;
        match hydrate(&bad) {
            Err(WireError::UnknownGroupIndex(7)) => {}
            other => panic!("expected UnknownGroupIndex, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_hydrate_rejects_unknown_input_type() {
        let mut bad = payload();
        bad.steps[0].inputs[0].input_type = "slider".to_string();
        assert!(matches!(
            hydrate(&bad),
            Err(WireError::UnknownInputType(t)) if t == "slider"
        ));
    }

    #[test]
    fn test_round_trip_is_payload_equivalent() {
        let source = payload();
        let (meta, state) = hydrate(&source).unwrap();
        let mut re_encoded = build_payload(&meta, &state);

        // the source lists records out of order; the re-encoding emits them
        // canonically, so compare against the canonical form of the source
        let mut canonical = source;
        canonical.groups.sort_by_key(|g| g.order);
        canonical
            .steps
            .sort_by_key(|s| (s.group_index, s.order));
        re_encoded
            .steps
            .sort_by_key(|s| (s.group_index, s.order));

        assert_eq!(re_encoded, canonical);
    }
}
