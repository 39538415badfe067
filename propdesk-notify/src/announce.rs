//! Staggered announcement of new notifications
//!
//! Item `i` of a cycle's new unseen set is announced `stagger * i` after the
//! cycle applied, so a burst of arrivals reads as a sequence.

use crate::model::Notification;
use crate::sound::AlertSound;
use crate::toast::{Toast, ToastBoard};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// Default spacing between announcements in one cycle
pub const DEFAULT_STAGGER: Duration = Duration::from_millis(500);

/// Delay for the announcement at `index`
pub fn stagger_delay(stagger: Duration, index: usize) -> Duration {
    stagger.saturating_mul(index.min(u32::MAX as usize) as u32)
}

/// Schedules toast + sound for each new notification
pub struct Announcer {
    board: Arc<ToastBoard>,
    sound: Arc<dyn AlertSound>,
    stagger: Duration,
}

impl Announcer {
    pub fn new(board: Arc<ToastBoard>, sound: Arc<dyn AlertSound>, stagger: Duration) -> Self {
        Self {
            board,
            sound,
            stagger,
        }
    }

    pub fn board(&self) -> &Arc<ToastBoard> {
        &self.board
    }

    /// Schedule announcements for `items` in order.
    ///
    /// Each announcement is its own task; cancelling `cancel` drops any that
    /// have not fired yet.
    pub fn announce(
        &self,
        items: Vec<Notification>,
        cancel: CancellationToken,
    ) -> Vec<JoinHandle<()>> {
        items
            .into_iter()
            .enumerate()
            .map(|(index, notification)| {
                let delay = stagger_delay(self.stagger, index);
                let board = Arc::clone(&self.board);
                let sound = Arc::clone(&self.sound);
                let cancel = cancel.clone();

                tokio::spawn(async move {
                    tokio::select! {
                        _ = cancel.cancelled() => return,
                        _ = tokio::time::sleep(delay) => {}
                    }

                    debug!(
                        notification_id = %notification.id,
                        category = %notification.category,
                        delay_ms = delay.as_millis() as u64,
                        "Announcing notification"
                    );
                    board.show(Toast::new(notification), cancel);
                    sound.emit();
                })
            })
            .collect()
    }
}
