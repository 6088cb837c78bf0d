//! Save-aware editing session.
//!
//! Ties the three layers together: commands are applied to the store,
//! drag gestures resolve through a [`DragSession`], and every mutation is
//! reported to the [`SaveScheduler`] so autosave keeps trailing the edits.

use crate::error::SaveError;
use crate::scheduler::SaveScheduler;
use trellis_core::{
    Command, CoreError, DragEntity, DragSession, DropTarget, WorkflowMeta, WorkflowState,
    WorkflowStatus,
};

/// One user's editing session over one workflow.
///
/// Intents arrive one at a time and are applied to completion before the
/// next is accepted; the session owns the state, so there are no
/// concurrent writers by construction.
pub struct EditorSession {
    meta: WorkflowMeta,
    state: WorkflowState,
    drag: DragSession,
    scheduler: SaveScheduler,
}

impl EditorSession {
    /// Start a session over existing state
    pub fn new(meta: WorkflowMeta, state: WorkflowState, scheduler: SaveScheduler) -> Self {
        Self {
            meta,
            state,
            drag: DragSession::new(),
            scheduler,
        }
    }

    /// The current builder state
    pub fn state(&self) -> &WorkflowState {
        &self.state
    }

    /// The workflow-level metadata
    pub fn meta(&self) -> &WorkflowMeta {
        &self.meta
    }

    /// The scheduler driving persistence for this session
    pub fn scheduler(&self) -> &SaveScheduler {
        &self.scheduler
    }

    /// Apply one command and schedule an autosave for the result.
    ///
    /// Commands that resolve to a no-op (unknown ids) leave the state
    /// unchanged and do not restart the autosave window.
    pub async fn apply(&mut self, command: &Command) -> Result<(), CoreError> {
        let next = self.state.apply(command)?;
        if next != self.state {
            self.state = next;
            self.scheduler.note_mutation(&self.meta, &self.state).await;
        }
        Ok(())
    }

    /// Begin dragging an entity
    pub fn begin_drag(&mut self, entity: DragEntity) {
        self.drag.begin(entity);
    }

    /// Record the insertion slot currently hovered
    pub fn preview_drag(&mut self, index: usize) {
        self.drag.preview(index);
    }

    /// Finish the in-flight gesture.
    ///
    /// Returns `true` when the drop resolved to a mutation. A drop over
    /// nothing, over the source itself, or with no gesture in flight
    /// resolves to `false` and changes nothing.
    pub async fn drop_drag(&mut self, target: Option<&DropTarget>) -> Result<bool, CoreError> {
        match self.drag.drop_on(&self.state, target) {
            Some(command) => {
                self.apply(&command).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Abandon the in-flight gesture
    pub fn cancel_drag(&mut self) {
        self.drag.cancel();
    }

    /// Save the full current payload immediately
    pub async fn save(&self) -> Result<WorkflowStatus, SaveError> {
        self.scheduler.save(&self.meta, &self.state).await
    }
}
