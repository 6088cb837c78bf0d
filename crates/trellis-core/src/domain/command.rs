use crate::domain::group::Group;
use crate::domain::state::{GroupId, StepId, WorkflowState};
use crate::domain::step::{InputField, Step};
use crate::CoreError;
use serde::{Deserialize, Serialize};

/// A single discrete edit to the builder state.
///
/// Commands are the only mutation seam: adapters translate user intents
/// into commands, [`WorkflowState::apply`] folds them one at a time, and
/// observers (the autosave trigger, UI refresh) hook the post-apply edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Insert a new group at the end of the group order
    AddGroup(Group),

    /// Insert a new step at the end of its owning group
    AddStep(Step),

    /// Move a step within or across groups
    MoveStep {
        /// Step being moved
        step_id: StepId,
        /// Destination group
        to_group: GroupId,
        /// Insertion position; absent or out of range means append
        index: Option<usize>,
    },

    /// Move a group to a new position in the group order
    ReorderGroups {
        /// Current position of the group
        old_index: usize,
        /// Position to reinsert it at
        new_index: usize,
    },

    /// Remove a group and every step it owns
    DeleteGroup(GroupId),

    /// Append an id-disjoint copy of a group
    DuplicateGroup(GroupId),

    /// Replace a group's label
    RenameGroup {
        /// Group to rename
        group_id: GroupId,
        /// New label
        label: String,
    },

    /// Replace a step's label
    RenameStep {
        /// Step to rename
        step_id: StepId,
        /// New label
        label: String,
    },

    /// Replace a step's instruction body
    UpdateStepInstructions {
        /// Step to update
        step_id: StepId,
        /// New body
        instructions: String,
    },

    /// Replace a step's input fields wholesale
    UpdateStepInputFields {
        /// Step to update
        step_id: StepId,
        /// New field list
        input_fields: Vec<InputField>,
    },

    /// Remove a step from the store and its owning group
    DeleteStep(StepId),

    /// Append a copy of a step to its own group
    DuplicateStep(StepId),
}

impl WorkflowState {
    /// Apply a command, returning the next state.
    ///
    /// Commands are processed strictly one at a time; the input state is
    /// untouched whatever the outcome.
    pub fn apply(&self, command: &Command) -> Result<WorkflowState, CoreError> {
        let next = match command {
            Command::AddGroup(group) => self.add_group(group.clone()),
            Command::AddStep(step) => self.add_step(step.clone())?,
            Command::MoveStep {
                step_id,
                to_group,
                index,
            } => self.move_step(step_id, to_group, *index),
            Command::ReorderGroups {
                old_index,
                new_index,
            } => self.reorder_groups(*old_index, *new_index),
            Command::DeleteGroup(group_id) => self.delete_group(group_id),
            Command::DuplicateGroup(group_id) => self.duplicate_group(group_id),
            Command::RenameGroup { group_id, label } => self.rename_group(group_id, label),
            Command::RenameStep { step_id, label } => self.rename_step(step_id, label),
            Command::UpdateStepInstructions {
                step_id,
                instructions,
            } => self.update_step_instructions(step_id, instructions),
            Command::UpdateStepInputFields {
                step_id,
                input_fields,
            } => self.update_step_input_fields(step_id, input_fields.clone()),
            Command::DeleteStep(step_id) => self.delete_step(step_id),
            Command::DuplicateStep(step_id) => self.duplicate_step(step_id),
        };
        Ok(next)
    }
}
