//! Drop-intent resolution for drag gestures.
//!
//! The engine never sees pointer events or coordinates. An external
//! adapter reports which entity was picked up and what it ended over;
//! resolution turns that into at most one store command. Gestures are
//! strictly serialized: a session handles one gesture at a time and always
//! lands back in [`DragPhase::Idle`] on drop, whatever the outcome.

use crate::domain::command::Command;
use crate::domain::state::{GroupId, StepId, WorkflowState};
use tracing::debug;

/// The entity being dragged
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEntity {
    /// A whole group card
    Group(GroupId),
    /// A single step card
    Step(StepId),
}

/// What the pointer was over when the gesture ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropTarget {
    /// A group container, not any particular step inside it
    Group(GroupId),
    /// A step card
    Step(StepId),
}

/// Resolve a completed gesture into at most one store command.
///
/// Returns `None` when the gesture has no effect: the drop landed outside
/// any target, the source equals the target, the ids no longer resolve in
/// `state`, or the source/target kinds don't combine (a group dropped onto
/// a step card).
pub fn resolve_drop(
    state: &WorkflowState,
    source: &DragEntity,
    target: Option<&DropTarget>,
) -> Option<Command> {
    let target = target?;
    match (source, target) {
        (DragEntity::Group(source_id), DropTarget::Group(target_id)) => {
            if source_id == target_id {
                return None;
            }
            let old_index = state.group_position(source_id)?;
            // Reinserting at the target's pre-removal position lands the
            // source just after where the target was when dragging down,
            // and just before it when dragging up.
            let new_index = state.group_position(target_id)?;
            Some(Command::ReorderGroups {
                old_index,
                new_index,
            })
        }
        (DragEntity::Group(source_id), DropTarget::Step(_)) => {
            debug!(group_id = %source_id.0, "group dropped onto a step card, ignoring");
            None
        }
        (DragEntity::Step(source_id), DropTarget::Step(target_id)) => {
            if source_id == target_id {
                return None;
            }
            state.steps_by_id.get(source_id)?;
            let (to_group, index) = state.step_position(target_id)?;
            Some(Command::MoveStep {
                step_id: source_id.clone(),
                to_group,
                index: Some(index),
            })
        }
        (DragEntity::Step(source_id), DropTarget::Group(group_id)) => {
            state.steps_by_id.get(source_id)?;
            state.groups_by_id.get(group_id)?;
            Some(Command::MoveStep {
                step_id: source_id.clone(),
                to_group: group_id.clone(),
                index: None,
            })
        }
    }
}

/// Phase of the in-flight gesture
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragPhase {
    /// No gesture in flight
    #[default]
    Idle,
    /// An entity has been picked up
    Dragging(DragEntity),
    /// An entity is held over a candidate insertion slot
    Previewing {
        /// The held entity
        entity: DragEntity,
        /// Candidate insertion index
        index: usize,
    },
}

/// Tracks one drag gesture from pick-up to drop.
#[derive(Debug, Default)]
pub struct DragSession {
    phase: DragPhase,
}

impl DragSession {
    /// Create an idle session
    pub fn new() -> Self {
        Self::default()
    }

    /// The current phase
    pub fn phase(&self) -> &DragPhase {
        &self.phase
    }

    /// Begin dragging an entity. A gesture already in flight is replaced.
    pub fn begin(&mut self, entity: DragEntity) {
        self.phase = DragPhase::Dragging(entity);
    }

    /// Record the insertion slot currently hovered. Ignored when idle.
    pub fn preview(&mut self, index: usize) {
        let entity = match std::mem::take(&mut self.phase) {
            DragPhase::Idle => return,
            DragPhase::Dragging(entity) | DragPhase::Previewing { entity, .. } => entity,
        };
        self.phase = DragPhase::Previewing { entity, index };
    }

    /// Finish the gesture, resolving it against `state`.
    ///
    /// The session returns to idle unconditionally; the gesture can never
    /// leave it stuck, even when nothing was being dragged or the drop
    /// resolves to nothing.
    pub fn drop_on(
        &mut self,
        state: &WorkflowState,
        target: Option<&DropTarget>,
    ) -> Option<Command> {
        let entity = match std::mem::take(&mut self.phase) {
            DragPhase::Idle => return None,
            DragPhase::Dragging(entity) | DragPhase::Previewing { entity, .. } => entity,
        };
        resolve_drop(state, &entity, target)
    }

    /// Abandon the gesture without resolving anything.
    pub fn cancel(&mut self) {
        self.phase = DragPhase::Idle;
    }
}
