//! # Save Coordinator
//!
//! Background task that writes documents through a [`PersistenceGateway`]
//! without ever blocking the session.
//!
//! ## Save Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Save Coordinator Flow                            │
//! │                                                                         │
//! │  session mutation                                                       │
//! │       │  take_pending_save()                                            │
//! │       ▼                                                                 │
//! │  SaveHandle::request_save ──► watch channel (holds only the latest)     │
//! │                                      │                                  │
//! │                                      ▼                                  │
//! │  SaveCoordinator::run                                                   │
//! │     1. Wait:    rx.changed()                                            │
//! │     2. Settle:  restart the debounce window while newer snapshots       │
//! │                 keep arriving                                           │
//! │     3. Save:    gateway.save(latest), one at a time, in order           │
//! │     4. Record:  SaveStatus (revision, error)                            │
//! │                                                                         │
//! │  A snapshot superseded before it is written is never written. A failed  │
//! │  save is logged and not retried; the next mutation carries a newer      │
//! │  document anyway.                                                       │
//! │                                                                         │
//! │  shutdown() flushes an unwritten snapshot, then stops the task.         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot, watch, RwLock};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use drawer_core::{DrawerSession, UserDocument};

use crate::error::{SyncError, SyncResult};
use crate::gateway::PersistenceGateway;

/// One document to persist, with the identity it belongs to.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    pub user_id: Option<String>,
    pub document: UserDocument,
}

/// Observable progress of the background saver.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveStatus {
    /// Snapshots handed to the saver.
    pub requested: u64,
    /// Gateway writes that succeeded.
    pub completed: u64,
    pub failed: u64,
    pub last_saved_revision: Option<u64>,
    pub last_saved_at: Option<DateTime<Utc>>,
    /// Cleared by the next successful save.
    pub last_error: Option<String>,
}

impl SaveStatus {
    /// Snapshots that were replaced by a newer one before being written.
    pub fn coalesced(&self) -> u64 {
        self.requested.saturating_sub(self.completed + self.failed)
    }
}

// =============================================================================
// Save Handle
// =============================================================================

/// Cheap to clone; every clone feeds the same coordinator.
#[derive(Clone)]
pub struct SaveHandle {
    tx: Arc<watch::Sender<Option<SaveRequest>>>,
    status: Arc<RwLock<SaveStatus>>,
    shutdown_tx: mpsc::Sender<oneshot::Sender<()>>,
}

impl SaveHandle {
    /// Queues `document`, replacing any snapshot not yet written. Returns
    /// immediately.
    pub async fn request_save(
        &self,
        user_id: Option<String>,
        document: UserDocument,
    ) -> SyncResult<()> {
        if self.tx.is_closed() {
            return Err(SyncError::ShuttingDown);
        }
        let revision = document.revision;
        self.tx.send_replace(Some(SaveRequest { user_id, document }));
        self.status.write().await.requested += 1;

        debug!(revision, "Save requested");
        Ok(())
    }

    /// Queues the session's document if it changed since the last hand-off.
    ///
    /// Returns whether a save was queued.
    pub async fn save_session(&self, session: &mut DrawerSession) -> SyncResult<bool> {
        let user_id = session.user_id().map(str::to_string);
        match session.take_pending_save() {
            Some(document) => {
                self.request_save(user_id, document).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    pub async fn status(&self) -> SaveStatus {
        self.status.read().await.clone()
    }

    /// Writes any unwritten snapshot, then stops the coordinator.
    pub async fn shutdown(&self) -> SyncResult<()> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.shutdown_tx
            .send(reply_tx)
            .await
            .map_err(|_| SyncError::ChannelError("Saver already stopped".into()))?;
        reply_rx
            .await
            .map_err(|_| SyncError::ChannelError("Saver stopped before flushing".into()))
    }
}

// =============================================================================
// Save Coordinator
// =============================================================================

pub struct SaveCoordinator {
    gateway: Arc<dyn PersistenceGateway>,
    debounce: Duration,
    rx: watch::Receiver<Option<SaveRequest>>,
    status: Arc<RwLock<SaveStatus>>,
    shutdown_rx: mpsc::Receiver<oneshot::Sender<()>>,
}

impl SaveCoordinator {
    /// Creates a coordinator and its handle. Call [`run`](Self::run) on a
    /// task, or use [`spawn`](Self::spawn).
    pub fn new(gateway: Arc<dyn PersistenceGateway>, debounce: Duration) -> (Self, SaveHandle) {
        let (tx, rx) = watch::channel(None);
        let (shutdown_tx, shutdown_rx) = mpsc::channel(1);
        let status = Arc::new(RwLock::new(SaveStatus::default()));

        let coordinator = SaveCoordinator {
            gateway,
            debounce,
            rx,
            status: status.clone(),
            shutdown_rx,
        };
        let handle = SaveHandle {
            tx: Arc::new(tx),
            status,
            shutdown_tx,
        };

        (coordinator, handle)
    }

    pub fn spawn(
        gateway: Arc<dyn PersistenceGateway>,
        debounce: Duration,
    ) -> (SaveHandle, JoinHandle<()>) {
        let (coordinator, handle) = Self::new(gateway, debounce);
        (handle, tokio::spawn(coordinator.run()))
    }

    pub async fn run(mut self) {
        info!(debounce_ms = self.debounce.as_millis() as u64, "Save coordinator starting");

        loop {
            tokio::select! {
                changed = self.rx.changed() => {
                    if changed.is_err() {
                        debug!("All save handles dropped");
                        break;
                    }
                    self.settle().await;
                    self.write_latest().await;
                }

                reply = self.shutdown_rx.recv() => {
                    if self.rx.has_changed().unwrap_or(false) {
                        self.write_latest().await;
                    }
                    if let Some(reply) = reply {
                        let _ = reply.send(());
                    }
                    break;
                }
            }
        }

        info!("Save coordinator stopped");
    }

    /// Waits until no newer snapshot arrived for one debounce window.
    async fn settle(&mut self) {
        if self.debounce.is_zero() {
            return;
        }
        loop {
            match tokio::time::timeout(self.debounce, self.rx.changed()).await {
                Ok(Ok(())) => continue,
                Ok(Err(_)) | Err(_) => return,
            }
        }
    }

    async fn write_latest(&mut self) {
        let Some(request) = self.rx.borrow_and_update().clone() else {
            return;
        };
        let revision = request.document.revision;

        match self
            .gateway
            .save(request.user_id.as_deref(), &request.document)
            .await
        {
            Ok(()) => {
                let mut status = self.status.write().await;
                status.completed += 1;
                status.last_saved_revision = Some(revision);
                status.last_saved_at = Some(Utc::now());
                status.last_error = None;
                debug!(revision, "Document saved");
            }
            Err(e) => {
                warn!(revision, error = %e, "Save failed; continuing from memory");
                let mut status = self.status.write().await;
                status.failed += 1;
                status.last_error = Some(e.to_string());
            }
        }
    }
}
