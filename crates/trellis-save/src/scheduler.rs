//! Debounced autosave and manual save scheduling.

use crate::error::SaveError;
use crate::sink::PersistenceSink;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};
use trellis_core::{WorkflowId, WorkflowMeta, WorkflowState, WorkflowStatus};
use trellis_wire::{build_payload, WorkflowPayload};

/// Observable persistence state of one workflow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SaveStatus {
    /// Nothing in flight
    Idle,
    /// A debounced autosave is being dispatched
    Autosaving,
    /// A manual save is being dispatched
    Saving,
    /// The latest dispatch completed successfully
    Saved,
    /// The latest dispatch failed
    Error,
}

/// Scheduler tuning
#[derive(Debug, Clone)]
pub struct SaveSchedulerConfig {
    /// Quiescent window an autosave waits for before dispatching
    pub debounce: Duration,
}

impl Default for SaveSchedulerConfig {
    fn default() -> Self {
        Self {
            debounce: Duration::from_millis(1000),
        }
    }
}

/// One payload snapshot with its monotonic version stamp
#[derive(Debug, Clone)]
struct Snapshot {
    version: u64,
    payload: WorkflowPayload,
}

#[derive(Debug, Default)]
struct SchedulerInner {
    /// Monotonic stamp; bumped for every snapshot taken
    version: u64,
    /// Latest snapshot waiting out its debounce window
    pending: Option<Snapshot>,
    /// Highest version whose completion has been applied
    applied_version: u64,
    /// Status last accepted by the sink
    accepted_status: Option<WorkflowStatus>,
    /// When the last successful dispatch completed
    last_saved_at: Option<DateTime<Utc>>,
}

/// Debounce and manual-save discipline in front of a [`PersistenceSink`].
///
/// Mutation observers call [`SaveScheduler::note_mutation`] after every
/// applied command; the scheduler snapshots the payload immediately and
/// dispatches it once the debounce window passes with no further
/// mutations. [`SaveScheduler::save`] dispatches immediately, superseding
/// any pending autosave.
///
/// Completions are applied in version order: a slow in-flight autosave
/// that finishes after a newer save cannot overwrite the newer result's
/// bookkeeping. Edits are never rolled back on failure - a failed
/// dispatch only surfaces as [`SaveStatus::Error`].
///
/// Autosave dispatch runs on a spawned task, so the scheduler must live
/// inside a Tokio runtime.
#[derive(Clone)]
pub struct SaveScheduler {
    workflow_id: WorkflowId,
    config: SaveSchedulerConfig,
    sink: Arc<dyn PersistenceSink>,
    inner: Arc<Mutex<SchedulerInner>>,
    status_tx: Arc<watch::Sender<SaveStatus>>,
}

impl SaveScheduler {
    /// Create a scheduler for one workflow
    pub fn new(
        workflow_id: WorkflowId,
        sink: Arc<dyn PersistenceSink>,
        config: SaveSchedulerConfig,
    ) -> Self {
        let (status_tx, _) = watch::channel(SaveStatus::Idle);
        Self {
            workflow_id,
            config,
            sink,
            inner: Arc::new(Mutex::new(SchedulerInner::default())),
            status_tx: Arc::new(status_tx),
        }
    }

    /// Subscribe to status transitions
    pub fn subscribe(&self) -> watch::Receiver<SaveStatus> {
        self.status_tx.subscribe()
    }

    /// The status as of now
    pub fn status(&self) -> SaveStatus {
        *self.status_tx.subscribe().borrow()
    }

    /// Status last accepted by the sink, if any manual save has completed
    pub async fn accepted_status(&self) -> Option<WorkflowStatus> {
        self.inner.lock().await.accepted_status
    }

    /// When the last successful dispatch completed
    pub async fn last_saved_at(&self) -> Option<DateTime<Utc>> {
        self.inner.lock().await.last_saved_at
    }

    /// Record a state mutation and start (or extend) the debounce window.
    ///
    /// The payload snapshot is taken here - the eventual dispatch never
    /// reads live state. Returns as soon as the snapshot is stored; the
    /// dispatch itself happens on a background task once the window
    /// passes with no further mutations, so callers keep editing freely
    /// while a request is in flight.
    pub async fn note_mutation(&self, meta: &WorkflowMeta, state: &WorkflowState) {
        let payload = build_payload(meta, state);
        let version = {
            let mut inner = self.inner.lock().await;
            inner.version += 1;
            inner.pending = Some(Snapshot {
                version: inner.version,
                payload,
            });
            inner.version
        };

        let scheduler = self.clone();
        tokio::spawn(async move {
            tokio::time::sleep(scheduler.config.debounce).await;
            scheduler.flush_pending(version).await;
        });
    }

    /// Save the full current payload immediately, bypassing the debounce.
    ///
    /// Any pending autosave is superseded. Callers are expected to await
    /// this before navigating away; the returned status is also recorded
    /// as the accepted status.
    pub async fn save(
        &self,
        meta: &WorkflowMeta,
        state: &WorkflowState,
    ) -> Result<WorkflowStatus, SaveError> {
        let payload = build_payload(meta, state);
        let version = {
            let mut inner = self.inner.lock().await;
            inner.version += 1;
            inner.pending = None;
            inner.version
        };

        self.status_tx.send_replace(SaveStatus::Saving);
        debug!(workflow_id = %self.workflow_id.0, version, "dispatching manual save");
        let result = self.sink.save(&self.workflow_id, &payload).await;

        let mut inner = self.inner.lock().await;
        if version >= inner.applied_version {
            inner.applied_version = version;
            match &result {
                Ok(status) => {
                    inner.accepted_status = Some(*status);
                    inner.last_saved_at = Some(Utc::now());
                    self.status_tx.send_replace(SaveStatus::Saved);
                }
                Err(err) => {
                    warn!(workflow_id = %self.workflow_id.0, error = %err, "manual save failed");
                    self.status_tx.send_replace(SaveStatus::Error);
                }
            }
        }
        result
    }

    /// Dispatch the pending snapshot if `version` is still the newest.
    async fn flush_pending(&self, version: u64) {
        let snapshot = {
            let mut inner = self.inner.lock().await;
            if inner.version != version {
                // superseded by a newer mutation or a manual save
                return;
            }
            match inner.pending.take() {
                Some(snapshot) => snapshot,
                None => return,
            }
        };

        self.status_tx.send_replace(SaveStatus::Autosaving);
        debug!(
            workflow_id = %self.workflow_id.0,
            version = snapshot.version,
            "dispatching autosave"
        );
        let result = self
            .sink
            .autosave(&self.workflow_id, &snapshot.payload)
            .await;

        let mut inner = self.inner.lock().await;
        if snapshot.version < inner.applied_version {
            // a newer dispatch already completed; keep its bookkeeping
            debug!(
                workflow_id = %self.workflow_id.0,
                version = snapshot.version,
                "stale autosave completion ignored"
            );
            return;
        }
        inner.applied_version = snapshot.version;
        match result {
            Ok(()) => {
                inner.last_saved_at = Some(Utc::now());
                self.status_tx.send_replace(SaveStatus::Saved);
            }
            Err(err) => {
                warn!(workflow_id = %self.workflow_id.0, error = %err, "autosave failed");
                self.status_tx.send_replace(SaveStatus::Error);
            }
        }
    }
}
