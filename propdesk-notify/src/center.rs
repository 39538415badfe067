//! Notification center: owner of one session's notification state
//!
//! Wires the poller, snapshot, store, announcer, synchronizer and navigation
//! together. Front-ends hold an `Arc<NotificationCenter>` and call into it
//! for clicks and mutations; unrelated components only see the event bus.

use crate::announce::{Announcer, DEFAULT_STAGGER};
use crate::api::{ApiError, NotificationApi};
use crate::error::{Error, Result};
use crate::model::{Notification, UserRole};
use crate::navigation::{self, Navigator, Route};
use crate::poller::{self, PollerHandle, DEFAULT_POLL_INTERVAL};
use crate::snapshot::{CycleOutcome, Snapshot};
use crate::sound::AlertSound;
use crate::store::NotificationStore;
use crate::sync::ReadStateSync;
use crate::toast::{DismissReason, ToastBoard, ToastPresenter, DEFAULT_TOAST_DURATION};
use propdesk_common::events::{EventBus, PropdeskEvent};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{Mutex, RwLock};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Default number of notifications requested per poll
pub const DEFAULT_FETCH_LIMIT: usize = 50;

/// Timing and sizing knobs for a center
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CenterSettings {
    pub poll_interval: Duration,
    pub fetch_limit: usize,
    pub stagger: Duration,
    pub toast_duration: Duration,
}

impl Default for CenterSettings {
    fn default() -> Self {
        Self {
            poll_interval: DEFAULT_POLL_INTERVAL,
            fetch_limit: DEFAULT_FETCH_LIMIT,
            stagger: DEFAULT_STAGGER,
            toast_duration: DEFAULT_TOAST_DURATION,
        }
    }
}

/// What one poll cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleReport {
    /// Stopped before applying anything
    Cancelled,
    /// Fetch failed; last good list kept
    FetchFailed(ApiError),
    /// Fetch applied (or discarded as stale) by the snapshot
    Completed(CycleOutcome),
}

/// Front-end collaborators injected into a center
pub struct CenterHooks {
    pub presenter: Arc<dyn ToastPresenter>,
    pub sound: Arc<dyn AlertSound>,
    pub navigator: Arc<dyn Navigator>,
}

pub struct NotificationCenter {
    api: Arc<dyn NotificationApi>,
    bus: Arc<EventBus>,
    store: Arc<RwLock<NotificationStore>>,
    snapshot: Mutex<Snapshot>,
    sync: ReadStateSync,
    announcer: Announcer,
    navigator: Arc<dyn Navigator>,
    role: UserRole,
    settings: CenterSettings,
    panel_open: AtomicBool,
    cycle_seq: AtomicU64,
}

impl NotificationCenter {
    pub fn new(
        api: Arc<dyn NotificationApi>,
        bus: Arc<EventBus>,
        hooks: CenterHooks,
        role: UserRole,
        settings: CenterSettings,
    ) -> Arc<Self> {
        let store = Arc::new(RwLock::new(NotificationStore::new()));
        let sync = ReadStateSync::new(Arc::clone(&api), Arc::clone(&store), Arc::clone(&bus));
        let board = Arc::new(ToastBoard::new(hooks.presenter, settings.toast_duration));
        let announcer = Announcer::new(board, hooks.sound, settings.stagger);

        Arc::new(Self {
            api,
            bus,
            store,
            snapshot: Mutex::new(Snapshot::new()),
            sync,
            announcer,
            navigator: hooks.navigator,
            role,
            settings,
            panel_open: AtomicBool::new(false),
            cycle_seq: AtomicU64::new(0),
        })
    }

    /// Start polling. Stop the returned handle when the owner goes away.
    pub fn start(self: &Arc<Self>) -> PollerHandle {
        poller::spawn(Arc::clone(self), self.settings.poll_interval)
    }

    /// Allocate the next cycle sequence number (starts at 1)
    pub fn next_cycle_seq(&self) -> u64 {
        self.cycle_seq.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// One fetch-and-diff cycle.
    ///
    /// Never fails: fetch errors are logged and reported, and the previous
    /// list stays in place.
    pub async fn run_cycle(&self, seq: u64, cancel: &CancellationToken) -> CycleReport {
        let fetched = tokio::select! {
            biased;
            _ = cancel.cancelled() => return CycleReport::Cancelled,
            result = self.api.my_notifications(self.settings.fetch_limit) => result,
        };

        let fetched = match fetched {
            Ok(list) => list,
            Err(e) => {
                warn!(seq, "Failed to fetch notifications: {}", e);
                return CycleReport::FetchFailed(e);
            }
        };

        let outcome = {
            let mut snapshot = self.snapshot.lock().await;
            if cancel.is_cancelled() {
                return CycleReport::Cancelled;
            }
            let outcome = snapshot.apply(seq, fetched.clone());
            if !matches!(outcome, CycleOutcome::Stale { .. }) {
                self.store.write().await.replace(fetched);
            }
            outcome
        };

        match &outcome {
            CycleOutcome::ColdStart => {
                let count = self.store.read().await.len();
                info!(seq, count, "Seeded notification snapshot");
            }
            CycleOutcome::Applied(new_unseen) => {
                if !new_unseen.is_empty() {
                    info!(seq, count = new_unseen.len(), "New notifications arrived");
                    self.announcer.announce(new_unseen.clone(), cancel.clone());
                }
            }
            CycleOutcome::Stale { last_applied, .. } => {
                debug!(seq, last_applied, "Discarding stale poll result");
                return CycleReport::Completed(outcome);
            }
        }

        self.bus.emit_lossy(PropdeskEvent::NotificationsChanged);
        CycleReport::Completed(outcome)
    }

    /// Toast body clicked: mark read, dismiss, navigate.
    ///
    /// Returns the route navigated to. A toast that is no longer visible is
    /// ignored.
    pub async fn click_toast(&self, notification_id: &str) -> Option<Route> {
        let toast = self
            .announcer
            .board()
            .dismiss(notification_id, DismissReason::Clicked)?;

        if toast.notification.is_unread() {
            if let Err(e) = self.sync.mark_read(notification_id).await {
                debug!(notification_id, "Toast click left notification unread: {}", e);
            }
        }

        self.navigate_for(&toast.notification)
    }

    /// Toast close control clicked: dismiss only.
    pub fn close_toast(&self, notification_id: &str) -> bool {
        self.announcer
            .board()
            .dismiss(notification_id, DismissReason::Closed)
            .is_some()
    }

    /// Panel list item clicked: mark read, close the panel, navigate.
    pub async fn click_item(&self, notification_id: &str) -> Result<Option<Route>> {
        let notification = self
            .store
            .read()
            .await
            .get(notification_id)
            .cloned()
            .ok_or_else(|| Error::UnknownNotification(notification_id.to_string()))?;

        if notification.is_unread() {
            if let Err(e) = self.sync.mark_read(notification_id).await {
                debug!(notification_id, "Item click left notification unread: {}", e);
            }
        }

        self.close_panel();
        Ok(self.navigate_for(&notification))
    }

    fn navigate_for(&self, notification: &Notification) -> Option<Route> {
        let route = navigation::resolve(notification.category, self.role);
        match route {
            Some(route) => {
                debug!(notification_id = %notification.id, %route, "Navigating");
                self.navigator.navigate(route);
            }
            None => debug!(
                notification_id = %notification.id,
                category = %notification.category,
                role = %self.role,
                "No navigation target"
            ),
        }
        route
    }

    pub fn open_panel(&self) {
        self.panel_open.store(true, Ordering::SeqCst);
    }

    pub fn close_panel(&self) {
        self.panel_open.store(false, Ordering::SeqCst);
    }

    /// Returns the new state
    pub fn toggle_panel(&self) -> bool {
        !self.panel_open.fetch_xor(true, Ordering::SeqCst)
    }

    pub fn is_panel_open(&self) -> bool {
        self.panel_open.load(Ordering::SeqCst)
    }

    pub async fn mark_read(&self, notification_id: &str) -> Result<()> {
        self.sync.mark_read(notification_id).await
    }

    pub async fn mark_unread(&self, notification_id: &str) -> Result<()> {
        self.sync.mark_unread(notification_id).await
    }

    pub async fn mark_all_read(&self) -> Result<()> {
        self.sync.mark_all_read().await
    }

    pub async fn delete(&self, notification_id: &str) -> Result<()> {
        self.sync.delete(notification_id).await
    }

    /// Current list, as the panel would render it
    pub async fn notifications(&self) -> Vec<Notification> {
        self.store.read().await.notifications().to_vec()
    }

    pub async fn unread_count(&self) -> usize {
        self.store.read().await.unread_count()
    }

    /// "All read" indicator: non-empty list with nothing unread
    pub async fn all_read(&self) -> bool {
        self.store.read().await.all_read()
    }

    /// Snapshot baseline used for the next diff
    pub async fn snapshot(&self) -> Vec<Notification> {
        self.snapshot.lock().await.notifications().to_vec()
    }

    /// Ids of visible toasts, oldest first
    pub fn visible_toasts(&self) -> Vec<String> {
        self.announcer.board().visible()
    }

    pub fn role(&self) -> UserRole {
        self.role
    }

    pub fn settings(&self) -> &CenterSettings {
        &self.settings
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.bus
    }
}
