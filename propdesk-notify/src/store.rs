//! In-memory notification list for the current session

use crate::model::{unread_count, Notification};

/// Ordered notification list owned by one notification center
///
/// Holds the list as last rendered: the latest applied fetch plus any
/// optimistic local mutations made since.
#[derive(Debug, Clone, Default)]
pub struct NotificationStore {
    notifications: Vec<Notification>,
}

impl NotificationStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole list with a fresh fetch result
    pub fn replace(&mut self, notifications: Vec<Notification>) {
        self.notifications = notifications;
    }

    pub fn notifications(&self) -> &[Notification] {
        &self.notifications
    }

    pub fn get(&self, id: &str) -> Option<&Notification> {
        self.notifications.iter().find(|n| n.id == id)
    }

    pub fn len(&self) -> usize {
        self.notifications.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifications.is_empty()
    }

    pub fn unread_count(&self) -> usize {
        unread_count(&self.notifications)
    }

    /// "All read" indicator: true exactly when the list is non-empty and
    /// contains no unread record.
    pub fn all_read(&self) -> bool {
        !self.notifications.is_empty() && self.unread_count() == 0
    }

    /// Set one record's read flag.
    ///
    /// Returns the previous value, or `None` if the id is unknown.
    pub fn set_read(&mut self, id: &str, is_read: bool) -> Option<bool> {
        let record = self.notifications.iter_mut().find(|n| n.id == id)?;
        let previous = record.is_read;
        record.is_read = is_read;
        Some(previous)
    }

    /// Mark every record read.
    ///
    /// Returns the ids that were unread before the call.
    pub fn mark_all_read(&mut self) -> Vec<String> {
        self.notifications
            .iter_mut()
            .filter(|n| !n.is_read)
            .map(|n| {
                n.is_read = true;
                n.id.clone()
            })
            .collect()
    }

    /// Restore the unread flag on the given ids (rollback of [`Self::mark_all_read`])
    pub fn mark_unread_ids(&mut self, ids: &[String]) {
        for record in self.notifications.iter_mut() {
            if ids.contains(&record.id) {
                record.is_read = false;
            }
        }
    }

    /// Remove one record, returning it with its former position
    pub fn remove(&mut self, id: &str) -> Option<(usize, Notification)> {
        let index = self.notifications.iter().position(|n| n.id == id)?;
        Some((index, self.notifications.remove(index)))
    }

    /// Put a removed record back (rollback of [`Self::remove`])
    ///
    /// The index is clamped, since a poll may have shortened the list in the
    /// meantime. Nothing is inserted if a record with the same id is present.
    pub fn restore(&mut self, index: usize, notification: Notification) {
        if self.get(&notification.id).is_some() {
            return;
        }
        let index = index.min(self.notifications.len());
        self.notifications.insert(index, notification);
    }
}
