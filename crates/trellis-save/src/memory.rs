//! In-memory persistence sink for tests and local runs.

use crate::error::SaveError;
use crate::sink::PersistenceSink;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;
use tokio::sync::RwLock;
use trellis_core::{WorkflowId, WorkflowStatus};
use trellis_wire::WorkflowPayload;

/// What the sink records about one accepted dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDispatch {
    /// Workflow the payload belongs to
    pub workflow_id: WorkflowId,
    /// The payload as received
    pub payload: WorkflowPayload,
    /// Whether it arrived via the autosave path
    pub autosave: bool,
}

/// In-memory implementation of [`PersistenceSink`].
///
/// Keeps the latest autosaved payload per workflow plus a log of every
/// accepted dispatch in arrival order. Latency and one-shot failure
/// injection exist so tests can exercise the scheduler's race handling.
pub struct InMemorySink {
    autosaves: RwLock<HashMap<WorkflowId, WorkflowPayload>>,
    dispatches: RwLock<Vec<RecordedDispatch>>,
    latency: RwLock<Duration>,
    fail_next: RwLock<bool>,
    accept_as: WorkflowStatus,
}

impl InMemorySink {
    /// Create a sink that accepts everything as a draft
    pub fn new() -> Self {
        Self::accepting_as(WorkflowStatus::Draft)
    }

    /// Create a sink that accepts manual saves under the given status
    pub fn accepting_as(status: WorkflowStatus) -> Self {
        Self {
            autosaves: RwLock::new(HashMap::new()),
            dispatches: RwLock::new(Vec::new()),
            latency: RwLock::new(Duration::ZERO),
            fail_next: RwLock::new(false),
            accept_as: status,
        }
    }

    /// Delay every subsequent dispatch by `latency`
    pub async fn set_latency(&self, latency: Duration) {
        *self.latency.write().await = latency;
    }

    /// Fail the next dispatch with a sink-unavailable error
    pub async fn fail_next(&self) {
        *self.fail_next.write().await = true;
    }

    /// Every accepted dispatch, in arrival order
    pub async fn dispatches(&self) -> Vec<RecordedDispatch> {
        self.dispatches.read().await.clone()
    }

    /// The latest autosaved payload for a workflow, if any
    pub async fn last_autosave(&self, workflow_id: &WorkflowId) -> Option<WorkflowPayload> {
        self.autosaves.read().await.get(workflow_id).cloned()
    }

    async fn simulate_transport(&self) -> Result<(), SaveError> {
        let latency = *self.latency.read().await;
        if !latency.is_zero() {
            tokio::time::sleep(latency).await;
        }
        let mut fail_next = self.fail_next.write().await;
        if *fail_next {
            *fail_next = false;
            return Err(SaveError::SinkUnavailable("injected failure".to_string()));
        }
        Ok(())
    }
}

impl Default for InMemorySink {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl PersistenceSink for InMemorySink {
    async fn autosave(
        &self,
        workflow_id: &WorkflowId,
        payload: &WorkflowPayload,
    ) -> Result<(), SaveError> {
        self.simulate_transport().await?;
        self.autosaves
            .write()
            .await
            .insert(workflow_id.clone(), payload.clone());
        self.dispatches.write().await.push(RecordedDispatch {
            workflow_id: workflow_id.clone(),
            payload: payload.clone(),
            autosave: true,
        });
        Ok(())
    }

    async fn save(
        &self,
        workflow_id: &WorkflowId,
        payload: &WorkflowPayload,
    ) -> Result<WorkflowStatus, SaveError> {
        self.simulate_transport().await?;
        self.dispatches.write().await.push(RecordedDispatch {
            workflow_id: workflow_id.clone(),
            payload: payload.clone(),
            autosave: false,
        });
        Ok(self.accept_as)
    }
}
