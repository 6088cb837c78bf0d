//! Flattening hierarchical builder state into the wire payload.

use crate::types::{GroupRecord, InputRecord, OptionValues, StepRecord, WorkflowPayload};
use trellis_core::{InputField, WorkflowMeta, WorkflowState};

/// Flatten `state` into the order-indexed wire payload.
///
/// Groups are emitted following `group_order`, each stamped with its
/// zero-based position. Steps are emitted group-by-group in that same
/// order; each step's `order` is its zero-based position within its own
/// group (the count restarts for every group), and `group_index` ties it
/// back to the owning group record.
pub fn build_payload(meta: &WorkflowMeta, state: &WorkflowState) -> WorkflowPayload {
    let mut groups = Vec::with_capacity(state.group_order.len());
    let mut steps = Vec::new();

    for (group_index, group_id) in state.group_order.iter().enumerate() {
        let Some(group) = state.groups_by_id.get(group_id) else {
            continue;
        };
        groups.push(GroupRecord {
            name: group.label.clone(),
            order: group_index as u32,
        });
        for (step_order, step_id) in group.step_ids.iter().enumerate() {
            let Some(step) = state.steps_by_id.get(step_id) else {
                continue;
            };
            steps.push(StepRecord {
                title: step.label.clone(),
                instructions: step.instructions.clone(),
                order: step_order as u32,
                group_index: group_index as u32,
                inputs: step.input_fields.iter().map(input_record).collect(),
            });
        }
    }

    WorkflowPayload {
        name: meta.name.clone(),
        description: meta.description.clone(),
        is_template: meta.is_template,
        status: meta.status,
        groups,
        steps,
    }
}

fn input_record(field: &InputField) -> InputRecord {
    InputRecord {
        label: field.label.clone(),
        input_type: field.kind.as_str().to_string(),
        required: field.required,
        options: if field.options.is_empty() {
            None
        } else {
            Some(OptionValues {
                values: field.options.clone(),
            })
        },
    }
}
