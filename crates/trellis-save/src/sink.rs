use crate::error::SaveError;
use async_trait::async_trait;
use trellis_core::{WorkflowId, WorkflowStatus};
use trellis_wire::WorkflowPayload;

/// Persistence collaborator the scheduler dispatches to.
///
/// Implementations own transport, auth, and encoding. The scheduler
/// guarantees every call carries a payload snapshot taken when the
/// dispatch was scheduled, never a live view of the builder state.
#[async_trait]
pub trait PersistenceSink: Send + Sync {
    /// Accept a debounced autosave for the given workflow.
    async fn autosave(
        &self,
        workflow_id: &WorkflowId,
        payload: &WorkflowPayload,
    ) -> Result<(), SaveError>;

    /// Accept an explicit save of the full payload, returning the status
    /// the workflow was persisted under.
    async fn save(
        &self,
        workflow_id: &WorkflowId,
        payload: &WorkflowPayload,
    ) -> Result<WorkflowStatus, SaveError>;
}
