//! Toast alerts for newly arrived notifications
//!
//! The board tracks which toasts are visible and expires them; rendering is
//! delegated to a [`ToastPresenter`].

use crate::model::{Notification, NotificationCategory};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default time a toast stays up
pub const DEFAULT_TOAST_DURATION: Duration = Duration::from_secs(5);

/// Colour family of a toast
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTone {
    Meeting,
    Lead,
    Inquiry,
    Default,
}

/// Visual treatment derived from the notification category
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToastStyle {
    pub tone: ToastTone,
    /// Accent colour, `#rrggbb`
    pub accent: &'static str,
    pub icon: &'static str,
}

impl ToastStyle {
    pub fn for_category(category: NotificationCategory) -> Self {
        let tone = if category.is_meeting() {
            ToastTone::Meeting
        } else if category.is_lead() {
            ToastTone::Lead
        } else if category.is_inquiry() {
            ToastTone::Inquiry
        } else {
            ToastTone::Default
        };

        let accent = match tone {
            ToastTone::Meeting => "#2563eb",
            ToastTone::Lead => "#16a34a",
            ToastTone::Inquiry => "#ea580c",
            ToastTone::Default => "#6b7280",
        };

        let icon = match category {
            NotificationCategory::MeetingScheduled => "📅",
            NotificationCategory::MeetingReminder => "⏰",
            NotificationCategory::LeadAssigned => "👤",
            NotificationCategory::LeadCreated => "✨",
            NotificationCategory::InquiryCreated => "❓",
            NotificationCategory::ContactRequest => "📞",
            NotificationCategory::GenericMessage => "💬",
            NotificationCategory::Other => "🔔",
        };

        Self { tone, accent, icon }
    }
}

/// One visible toast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub notification: Notification,
    pub style: ToastStyle,
}

impl Toast {
    pub fn new(notification: Notification) -> Self {
        let style = ToastStyle::for_category(notification.category);
        Self {
            notification,
            style,
        }
    }

    pub fn id(&self) -> &str {
        &self.notification.id
    }
}

/// Why a toast left the screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    /// Body clicked; the center marks read and navigates
    Clicked,
    /// Close control clicked; no side effects
    Closed,
    /// Display duration elapsed
    Expired,
}

/// Renders toasts
pub trait ToastPresenter: Send + Sync {
    fn show(&self, toast: &Toast);

    fn dismiss(&self, notification_id: &str, reason: DismissReason);
}

struct ActiveToast {
    toast: Toast,
    generation: u64,
}

#[derive(Default)]
struct BoardState {
    active: HashMap<String, ActiveToast>,
    next_generation: u64,
}

/// Visible toasts, keyed by notification id
///
/// Toasts are independent: each has its own expiry timer, and showing one
/// never waits on another.
pub struct ToastBoard {
    presenter: Arc<dyn ToastPresenter>,
    duration: Duration,
    state: Arc<Mutex<BoardState>>,
}

impl ToastBoard {
    pub fn new(presenter: Arc<dyn ToastPresenter>, duration: Duration) -> Self {
        Self {
            presenter,
            duration,
            state: Arc::new(Mutex::new(BoardState::default())),
        }
    }

    /// Show a toast and schedule its expiry.
    ///
    /// If `cancel` fires first (owner disposed) the toast is cleared without
    /// an expiry callback.
    /// A toast already visible for the same notification is replaced and its
    /// old timer becomes a no-op.
    pub fn show(&self, toast: Toast, cancel: CancellationToken) {
        let id = toast.id().to_string();
        let generation = {
            let mut state = lock(&self.state);
            state.next_generation += 1;
            let generation = state.next_generation;
            state.active.insert(
                id.clone(),
                ActiveToast {
                    toast: toast.clone(),
                    generation,
                },
            );
            generation
        };

        self.presenter.show(&toast);

        let state = Arc::clone(&self.state);
        let presenter = Arc::clone(&self.presenter);
        let duration = self.duration;
        tokio::spawn(async move {
            tokio::select! {
                _ = cancel.cancelled() => {
                    // Owner gone: drop the entry without a presenter callback
                    if remove_generation(&state, &id, generation) {
                        debug!(notification_id = %id, "Toast cleared on cancellation");
                    }
                }
                _ = tokio::time::sleep(duration) => {
                    if remove_generation(&state, &id, generation) {
                        debug!(notification_id = %id, "Toast expired");
                        presenter.dismiss(&id, DismissReason::Expired);
                    }
                }
            }
        });
    }

    /// Remove a visible toast.
    ///
    /// Returns the toast if it was visible.
    pub fn dismiss(&self, notification_id: &str, reason: DismissReason) -> Option<Toast> {
        let removed = lock(&self.state).active.remove(notification_id)?;
        self.presenter.dismiss(notification_id, reason);
        Some(removed.toast)
    }

    pub fn is_visible(&self, notification_id: &str) -> bool {
        lock(&self.state).active.contains_key(notification_id)
    }

    /// Ids of visible toasts, oldest first
    pub fn visible(&self) -> Vec<String> {
        let state = lock(&self.state);
        let mut entries: Vec<_> = state
            .active
            .iter()
            .map(|(id, a)| (a.generation, id.clone()))
            .collect();
        entries.sort();
        entries.into_iter().map(|(_, id)| id).collect()
    }

    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Remove `id` only if it is still the toast shown as `generation`
fn remove_generation(state: &Mutex<BoardState>, id: &str, generation: u64) -> bool {
    let mut state = lock(state);
    match state.active.get(id) {
        Some(active) if active.generation == generation => {
            state.active.remove(id);
            true
        }
        _ => false,
    }
}

fn lock(state: &Mutex<BoardState>) -> std::sync::MutexGuard<'_, BoardState> {
    // Poisoning only happens if a presenter panicked mid-update; the map is
    // still consistent
    state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        events: Mutex<Vec<String>>,
    }

    impl ToastPresenter for Recorder {
        fn show(&self, toast: &Toast) {
            self.events.lock().unwrap().push(format!("show:{}", toast.id()));
        }

        fn dismiss(&self, notification_id: &str, reason: DismissReason) {
            self.events
                .lock()
                .unwrap()
                .push(format!("dismiss:{}:{:?}", notification_id, reason));
        }
    }

    fn toast(id: &str, category: NotificationCategory) -> Toast {
        Toast::new(Notification {
            id: id.to_string(),
            category,
            title: "t".to_string(),
            message: "m".to_string(),
            is_read: false,
            created_at: None,
        })
    }

    #[test]
    fn test_style_by_category() {
        assert_eq!(
            ToastStyle::for_category(NotificationCategory::MeetingReminder).tone,
            ToastTone::Meeting
        );
        assert_eq!(
            ToastStyle::for_category(NotificationCategory::LeadAssigned).tone,
            ToastTone::Lead
        );
        assert_eq!(
            ToastStyle::for_category(NotificationCategory::ContactRequest).tone,
            ToastTone::Inquiry
        );
        assert_eq!(
            ToastStyle::for_category(NotificationCategory::GenericMessage).tone,
            ToastTone::Default
        );

        let accents: std::collections::HashSet<_> = [
            NotificationCategory::MeetingScheduled,
            NotificationCategory::LeadCreated,
            NotificationCategory::InquiryCreated,
            NotificationCategory::Other,
        ]
        .into_iter()
        .map(|c| ToastStyle::for_category(c).accent)
        .collect();
        assert_eq!(accents.len(), 4, "each colour family is distinct");
    }

    #[tokio::test(start_paused = true)]
    async fn test_toast_expires_after_duration() {
        let recorder = Arc::new(Recorder::default());
        let board = ToastBoard::new(recorder.clone(), DEFAULT_TOAST_DURATION);

        board.show(toast("a", NotificationCategory::LeadCreated), CancellationToken::new());
        assert!(board.is_visible("a"));

        tokio::time::sleep(Duration::from_millis(4_999)).await;
        assert!(board.is_visible("a"));

        tokio::time::sleep(Duration::from_millis(2)).await;
        assert!(!board.is_visible("a"));
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["show:a".to_string(), "dismiss:a:Expired".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_manual_dismiss_prevents_expiry_callback() {
        let recorder = Arc::new(Recorder::default());
        let board = ToastBoard::new(recorder.clone(), DEFAULT_TOAST_DURATION);

        board.show(toast("a", NotificationCategory::Other), CancellationToken::new());
        assert!(board.dismiss("a", DismissReason::Closed).is_some());
        assert!(board.dismiss("a", DismissReason::Closed).is_none());

        tokio::time::sleep(Duration::from_secs(6)).await;
        assert_eq!(
            *recorder.events.lock().unwrap(),
            vec!["show:a".to_string(), "dismiss:a:Closed".to_string()]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_replaced_toast_gets_fresh_timer() {
        let recorder = Arc::new(Recorder::default());
        let board = ToastBoard::new(recorder.clone(), DEFAULT_TOAST_DURATION);

        board.show(toast("a", NotificationCategory::Other), CancellationToken::new());
        tokio::time::sleep(Duration::from_secs(3)).await;
        board.show(toast("a", NotificationCategory::Other), CancellationToken::new());

        // First timer fires at 5s but belongs to the replaced toast
        tokio::time::sleep(Duration::from_millis(2_500)).await;
        assert!(board.is_visible("a"));

        tokio::time::sleep(Duration::from_secs(3)).await;
        assert!(!board.is_visible("a"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_multiple_toasts_are_independent() {
        let recorder = Arc::new(Recorder::default());
        let board = ToastBoard::new(recorder.clone(), DEFAULT_TOAST_DURATION);

        board.show(toast("a", NotificationCategory::Other), CancellationToken::new());
        tokio::time::sleep(Duration::from_secs(1)).await;
        board.show(toast("b", NotificationCategory::Other), CancellationToken::new());
        assert_eq!(board.visible(), vec!["a".to_string(), "b".to_string()]);

        tokio::time::sleep(Duration::from_millis(4_500)).await;
        assert_eq!(board.visible(), vec!["b".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_expiry_timer() {
        let recorder = Arc::new(Recorder::default());
        let board = ToastBoard::new(recorder.clone(), DEFAULT_TOAST_DURATION);
        let cancel = CancellationToken::new();

        board.show(toast("a", NotificationCategory::Other), cancel.clone());
        cancel.cancel();
        tokio::time::sleep(Duration::from_secs(10)).await;

        assert_eq!(*recorder.events.lock().unwrap(), vec!["show:a".to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_clears_visible_toasts() {
        let recorder = Arc::new(Recorder::default());
        let board = ToastBoard::new(recorder.clone(), DEFAULT_TOAST_DURATION);
        let cancel = CancellationToken::new();

        board.show(toast("a", NotificationCategory::Other), cancel.clone());
        board.show(toast("b", NotificationCategory::Other), CancellationToken::new());
        cancel.cancel();
        tokio::time::sleep(Duration::from_millis(1)).await;

        assert!(!board.is_visible("a"));
        assert_eq!(board.visible(), vec!["b".to_string()]);
    }
}
