//! Repeating fetch-and-diff timer
//!
//! Ticks immediately, then every interval, until stopped. Each tick runs its
//! cycle as a separate task so a slow fetch never holds up the next tick;
//! the snapshot's sequence check keeps late results from being applied.

use crate::center::NotificationCenter;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Default time between polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Running poller
///
/// Dropping the handle also cancels polling; [`PollerHandle::stop`] does it
/// explicitly and waits for the timer task to finish.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// Cancel the timer and every in-flight cycle.
    ///
    /// Consumes the handle, so polling can only be stopped once.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                debug!("Poller task ended abnormally: {}", e);
            }
        }
        info!("Notification poller stopped");
    }

    pub fn is_stopped(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Token cancelled when polling stops; for work tied to the same lifetime
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Start polling `center` every `interval`.
///
/// # Panics
///
/// Panics if `interval` is zero (as `tokio::time::interval` does).
pub fn spawn(center: Arc<NotificationCenter>, interval: Duration) -> PollerHandle {
    let cancel = CancellationToken::new();
    let token = cancel.clone();

    info!(interval_secs = interval.as_secs_f64(), "Starting notification poller");

    let task = tokio::spawn(async move {
        let mut timer = tokio::time::interval(interval);
        timer.set_missed_tick_behavior(MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                biased;
                _ = token.cancelled() => break,
                _ = timer.tick() => {
                    let seq = center.next_cycle_seq();
                    let center = Arc::clone(&center);
                    let cycle_token = token.child_token();
                    tokio::spawn(async move {
                        center.run_cycle(seq, &cycle_token).await;
                    });
                }
            }
        }
    });

    PollerHandle {
        cancel,
        task: Some(task),
    }
}
