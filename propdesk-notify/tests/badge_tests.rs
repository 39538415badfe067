//! Unread badge tests

mod helpers;

use helpers::{notification, unread, FakeApi, Harness};
use propdesk_common::events::{EventBus, PropdeskEvent};
use propdesk_notify::badge::UnreadBadge;
use propdesk_notify::{NotificationCategory, UserRole};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

fn read(id: &str) -> propdesk_notify::Notification {
    notification(id, NotificationCategory::LeadCreated, true)
}

async fn next_count(rx: &mut tokio::sync::watch::Receiver<usize>) -> usize {
    tokio::time::timeout(Duration::from_secs(5), rx.changed())
        .await
        .expect("badge did not refresh")
        .expect("badge task gone");
    *rx.borrow_and_update()
}

#[tokio::test]
async fn test_badge_refreshes_on_start() {
    let api = FakeApi::new(vec![unread("a"), read("b"), unread("c")]);
    let bus = EventBus::new(16);
    let cancel = CancellationToken::new();

    let badge = UnreadBadge::spawn(api.clone(), &bus, 50, cancel.clone());
    let mut rx = badge.watch();

    assert_eq!(next_count(&mut rx).await, 2);
    assert_eq!(badge.count(), 2);

    cancel.cancel();
    badge.join().await;
}

#[tokio::test]
async fn test_badge_refreshes_on_broadcast() {
    let api = FakeApi::new(vec![unread("a")]);
    let bus = EventBus::new(16);
    let cancel = CancellationToken::new();

    let badge = UnreadBadge::spawn(api.clone(), &bus, 50, cancel.clone());
    let mut rx = badge.watch();
    assert_eq!(next_count(&mut rx).await, 1);

    api.set_server(vec![unread("a"), unread("b"), unread("c")]);
    bus.emit_lossy(PropdeskEvent::NotificationsChanged);

    assert_eq!(next_count(&mut rx).await, 3);
    assert_eq!(api.fetch_calls(), 2);

    cancel.cancel();
    badge.join().await;
}

#[tokio::test]
async fn test_badge_follows_center_mutations() {
    let h = Harness::new(vec![unread("a"), unread("b")], UserRole::Sales);
    h.seed().await;
    let cancel = CancellationToken::new();

    let badge = UnreadBadge::spawn(h.api.clone(), &h.bus, 50, cancel.clone());
    let mut rx = badge.watch();
    assert_eq!(next_count(&mut rx).await, 2);

    h.center.mark_read("a").await.unwrap();
    assert_eq!(next_count(&mut rx).await, 1);

    h.center.mark_all_read().await.unwrap();
    assert_eq!(next_count(&mut rx).await, 0);

    cancel.cancel();
    badge.join().await;
}

#[tokio::test]
async fn test_badge_recovers_from_lag() {
    let api = FakeApi::new(vec![unread("a")]);
    let bus = EventBus::new(1);
    let cancel = CancellationToken::new();

    let badge = UnreadBadge::spawn(api.clone(), &bus, 50, cancel.clone());
    let mut rx = badge.watch();

    // Overflow the one-slot channel before the badge gets to read it
    for _ in 0..4 {
        bus.emit_lossy(PropdeskEvent::NotificationsChanged);
    }
    api.set_server(vec![unread("a"), unread("b")]);

    tokio::time::timeout(Duration::from_secs(5), async {
        while *rx.borrow_and_update() != 2 {
            rx.changed().await.unwrap();
        }
    })
    .await
    .expect("badge never caught up");

    cancel.cancel();
    badge.join().await;
}

#[tokio::test]
async fn test_badge_stops_on_cancel() {
    let api = FakeApi::new(vec![unread("a")]);
    let bus = Arc::new(EventBus::new(16));
    let cancel = CancellationToken::new();

    let badge = UnreadBadge::spawn(api.clone(), &bus, 50, cancel.clone());
    let mut rx = badge.watch();
    next_count(&mut rx).await;

    cancel.cancel();
    tokio::time::timeout(Duration::from_secs(5), badge.join())
        .await
        .expect("badge did not stop");

    let calls = api.fetch_calls();
    bus.emit_lossy(PropdeskEvent::NotificationsChanged);
    tokio::task::yield_now().await;
    assert_eq!(api.fetch_calls(), calls);
}
