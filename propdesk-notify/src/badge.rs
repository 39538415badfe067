//! Unread badge
//!
//! A separate component that keeps its own unread count. It never reads the
//! center's store; it re-fetches from the backend whenever the event bus
//! says notifications changed.

use crate::api::NotificationApi;
use crate::model;
use propdesk_common::events::{EventBus, PropdeskEvent};
use std::sync::Arc;
use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

/// Running badge task and its published count
pub struct UnreadBadge {
    count: watch::Receiver<usize>,
    task: JoinHandle<()>,
}

impl UnreadBadge {
    /// Spawn the badge. It refreshes once immediately, then on every
    /// `NotificationsChanged`, until `cancel` fires or the bus closes.
    pub fn spawn(
        api: Arc<dyn NotificationApi>,
        bus: &EventBus,
        fetch_limit: usize,
        cancel: CancellationToken,
    ) -> Self {
        // Subscribe before the first refresh so no broadcast is missed
        let events = bus.subscribe();
        let (tx, count) = watch::channel(0);

        let task = tokio::spawn(run_badge(api, events, tx, fetch_limit, cancel));

        Self { count, task }
    }

    /// Last published unread count
    pub fn count(&self) -> usize {
        *self.count.borrow()
    }

    /// Receiver that observes every refresh
    pub fn watch(&self) -> watch::Receiver<usize> {
        self.count.clone()
    }

    /// Wait for the badge task to exit (after cancellation)
    pub async fn join(self) {
        if let Err(e) = self.task.await {
            debug!("Badge task ended abnormally: {}", e);
        }
    }
}

async fn run_badge(
    api: Arc<dyn NotificationApi>,
    mut events: broadcast::Receiver<PropdeskEvent>,
    tx: watch::Sender<usize>,
    fetch_limit: usize,
    cancel: CancellationToken,
) {
    debug!("Unread badge started");
    refresh(api.as_ref(), &tx, fetch_limit).await;

    loop {
        let received = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            received = events.recv() => received,
        };

        match received {
            Ok(PropdeskEvent::NotificationsChanged) => {
                refresh(api.as_ref(), &tx, fetch_limit).await;
            }
            Err(broadcast::error::RecvError::Lagged(skipped)) => {
                warn!(skipped, "Unread badge lagged behind event bus, refreshing");
                refresh(api.as_ref(), &tx, fetch_limit).await;
            }
            Err(broadcast::error::RecvError::Closed) => {
                debug!("Event bus closed, unread badge stopping");
                break;
            }
        }
    }

    debug!("Unread badge stopped");
}

async fn refresh(api: &dyn NotificationApi, tx: &watch::Sender<usize>, fetch_limit: usize) {
    match api.my_notifications(fetch_limit).await {
        Ok(list) => {
            let unread = model::unread_count(&list);
            debug!(unread, "Unread badge refreshed");
            // send_replace notifies watchers even when the value is unchanged
            tx.send_replace(unread);
        }
        Err(e) => warn!("Unread badge refresh failed: {}", e),
    }
}
