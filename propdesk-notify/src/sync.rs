//! Read-state mutations
//!
//! Every mutation updates the local list first, then calls the backend. On
//! success it broadcasts `NotificationsChanged`; on failure the local change
//! is rolled back and the error returned. The next poll reconciles anything
//! else.

use crate::api::{ApiError, NotificationApi};
use crate::error::Result;
use crate::store::NotificationStore;
use propdesk_common::events::{EventBus, PropdeskEvent};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

/// Optimistic read-state synchronizer
#[derive(Clone)]
pub struct ReadStateSync {
    api: Arc<dyn NotificationApi>,
    store: Arc<RwLock<NotificationStore>>,
    bus: Arc<EventBus>,
}

impl ReadStateSync {
    pub fn new(
        api: Arc<dyn NotificationApi>,
        store: Arc<RwLock<NotificationStore>>,
        bus: Arc<EventBus>,
    ) -> Self {
        Self { api, store, bus }
    }

    fn broadcast(&self) {
        self.bus.emit_lossy(PropdeskEvent::NotificationsChanged);
    }

    /// Mark one notification read.
    ///
    /// Already-read records are a no-op. Ids missing from the local list
    /// (older than the fetch limit) go straight to the backend.
    pub async fn mark_read(&self, id: &str) -> Result<()> {
        self.set_read(id, true).await
    }

    /// Mark one notification unread again.
    pub async fn mark_unread(&self, id: &str) -> Result<()> {
        self.set_read(id, false).await
    }

    async fn set_read(&self, id: &str, is_read: bool) -> Result<()> {
        let previous = self.store.write().await.set_read(id, is_read);

        if previous == Some(is_read) {
            debug!(notification_id = %id, is_read, "Read state unchanged, skipping backend call");
            return Ok(());
        }

        let result = if is_read {
            self.api.mark_read(id).await
        } else {
            self.api.mark_unread(id).await
        };

        match result {
            Ok(()) => {
                debug!(notification_id = %id, is_read, "Read state persisted");
                self.broadcast();
                Ok(())
            }
            Err(e) => {
                warn!(notification_id = %id, is_read, "Failed to persist read state: {}", e);
                if let Some(previous) = previous {
                    self.store.write().await.set_read(id, previous);
                }
                Err(e.into())
            }
        }
    }

    /// Mark every notification read.
    ///
    /// A list with nothing unread is a no-op: no backend call, no broadcast.
    pub async fn mark_all_read(&self) -> Result<()> {
        let changed = self.store.write().await.mark_all_read();

        if changed.is_empty() {
            debug!("Nothing unread, skipping mark-all-read");
            return Ok(());
        }

        match self.api.mark_all_read().await {
            Ok(()) => {
                info!(count = changed.len(), "Marked all notifications read");
                self.broadcast();
                Ok(())
            }
            Err(e) => {
                warn!(count = changed.len(), "Failed to mark all read: {}", e);
                self.store.write().await.mark_unread_ids(&changed);
                Err(e.into())
            }
        }
    }

    /// Delete one notification.
    ///
    /// A 404 from the backend counts as success: the record is gone either way.
    pub async fn delete(&self, id: &str) -> Result<()> {
        let removed = self.store.write().await.remove(id);

        match self.api.delete(id).await {
            Ok(()) | Err(ApiError::NotFound(_)) => {
                debug!(notification_id = %id, "Notification deleted");
                self.broadcast();
                Ok(())
            }
            Err(e) => {
                warn!(notification_id = %id, "Failed to delete notification: {}", e);
                if let Some((index, notification)) = removed {
                    self.store.write().await.restore(index, notification);
                }
                Err(e.into())
            }
        }
    }
}
