//! Test helpers for propdesk-notify integration tests
//!
//! Provides:
//! - FakeApi: scripted in-memory backend with call recording
//! - RecordingPresenter / RecordingNavigator / CountingSound: front-end doubles
//! - Harness: a center wired to all of the above

#![allow(dead_code)]

use async_trait::async_trait;
use propdesk_common::events::EventBus;
use propdesk_notify::api::{ApiError, NotificationApi};
use propdesk_notify::navigation::{Navigator, Route};
use propdesk_notify::sound::AlertSound;
use propdesk_notify::toast::{DismissReason, Toast, ToastPresenter};
use propdesk_notify::{
    CenterHooks, CenterSettings, Notification, NotificationCategory, NotificationCenter, UserRole,
};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub fn notification(id: &str, category: NotificationCategory, is_read: bool) -> Notification {
    Notification {
        id: id.to_string(),
        category,
        title: format!("Title {}", id),
        message: format!("Message {}", id),
        is_read,
        created_at: Some("2024-05-01T12:00:00Z".to_string()),
    }
}

pub fn unread(id: &str) -> Notification {
    notification(id, NotificationCategory::LeadCreated, false)
}

/// One scripted response for `my_notifications`
pub enum FetchStep {
    Fail(ApiError),
    /// Respond with `list` after `delay`
    Delayed(Duration, Vec<Notification>),
}

/// In-memory backend
///
/// Fetches return the current server list unless a scripted step is queued.
/// Successful mutations update the server list.
#[derive(Default)]
pub struct FakeApi {
    server: Mutex<Vec<Notification>>,
    script: Mutex<VecDeque<FetchStep>>,
    mutation_error: Mutex<Option<ApiError>>,
    fetch_calls: AtomicUsize,
    mutations: Mutex<Vec<String>>,
}

impl FakeApi {
    pub fn new(server: Vec<Notification>) -> Arc<Self> {
        let api = Self::default();
        *api.server.lock().unwrap() = server;
        Arc::new(api)
    }

    pub fn set_server(&self, list: Vec<Notification>) {
        *self.server.lock().unwrap() = list;
    }

    pub fn server(&self) -> Vec<Notification> {
        self.server.lock().unwrap().clone()
    }

    pub fn push_step(&self, step: FetchStep) {
        self.script.lock().unwrap().push_back(step);
    }

    /// Make every mutation fail with `error` until cleared
    pub fn fail_mutations(&self, error: Option<ApiError>) {
        *self.mutation_error.lock().unwrap() = error;
    }

    pub fn fetch_calls(&self) -> usize {
        self.fetch_calls.load(Ordering::SeqCst)
    }

    /// Mutation log, e.g. `["read:a", "read-all", "delete:b"]`
    pub fn mutations(&self) -> Vec<String> {
        self.mutations.lock().unwrap().clone()
    }

    fn mutate(
        &self,
        label: String,
        apply: impl FnOnce(&mut Vec<Notification>),
    ) -> Result<(), ApiError> {
        self.mutations.lock().unwrap().push(label);
        if let Some(error) = self.mutation_error.lock().unwrap().clone() {
            return Err(error);
        }
        let mut server = self.server.lock().unwrap();
        apply(&mut *server);
        Ok(())
    }

    fn set_server_read(&self, id: &str, is_read: bool) {
        if let Some(n) = self.server.lock().unwrap().iter_mut().find(|n| n.id == id) {
            n.is_read = is_read;
        }
    }
}

#[async_trait]
impl NotificationApi for FakeApi {
    async fn my_notifications(&self, limit: usize) -> Result<Vec<Notification>, ApiError> {
        self.fetch_calls.fetch_add(1, Ordering::SeqCst);
        let step = self.script.lock().unwrap().pop_front();
        match step {
            Some(FetchStep::Fail(error)) => Err(error),
            Some(FetchStep::Delayed(delay, list)) => {
                tokio::time::sleep(delay).await;
                Ok(list)
            }
            None => Ok(self.server().into_iter().take(limit).collect()),
        }
    }

    async fn mark_read(&self, id: &str) -> Result<(), ApiError> {
        self.mutate(format!("read:{}", id), |_| {})?;
        self.set_server_read(id, true);
        Ok(())
    }

    async fn mark_unread(&self, id: &str) -> Result<(), ApiError> {
        self.mutate(format!("unread:{}", id), |_| {})?;
        self.set_server_read(id, false);
        Ok(())
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.mutate("read-all".to_string(), |list| {
            list.iter_mut().for_each(|n| n.is_read = true)
        })
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        let id = id.to_string();
        self.mutate(format!("delete:{}", id), move |list| list.retain(|n| n.id != id))
    }
}

/// Records shown toasts with the (paused) clock time they appeared
#[derive(Default)]
pub struct RecordingPresenter {
    shown: Mutex<Vec<(String, Instant)>>,
    dismissed: Mutex<Vec<(String, DismissReason)>>,
}

impl RecordingPresenter {
    pub fn shown_ids(&self) -> Vec<String> {
        self.shown.lock().unwrap().iter().map(|(id, _)| id.clone()).collect()
    }

    pub fn shown(&self) -> Vec<(String, Instant)> {
        self.shown.lock().unwrap().clone()
    }

    pub fn dismissed(&self) -> Vec<(String, DismissReason)> {
        self.dismissed.lock().unwrap().clone()
    }
}

impl ToastPresenter for RecordingPresenter {
    fn show(&self, toast: &Toast) {
        self.shown
            .lock()
            .unwrap()
            .push((toast.id().to_string(), Instant::now()));
    }

    fn dismiss(&self, notification_id: &str, reason: DismissReason) {
        self.dismissed
            .lock()
            .unwrap()
            .push((notification_id.to_string(), reason));
    }
}

#[derive(Default)]
pub struct RecordingNavigator {
    routes: Mutex<Vec<Route>>,
}

impl RecordingNavigator {
    pub fn routes(&self) -> Vec<Route> {
        self.routes.lock().unwrap().clone()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, route: Route) {
        self.routes.lock().unwrap().push(route);
    }
}

#[derive(Default)]
pub struct CountingSound {
    count: AtomicUsize,
}

impl CountingSound {
    pub fn count(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}

impl AlertSound for CountingSound {
    fn emit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }
}

/// A center wired to fakes
pub struct Harness {
    pub api: Arc<FakeApi>,
    pub bus: Arc<EventBus>,
    pub presenter: Arc<RecordingPresenter>,
    pub navigator: Arc<RecordingNavigator>,
    pub sound: Arc<CountingSound>,
    pub center: Arc<NotificationCenter>,
}

impl Harness {
    pub fn new(server: Vec<Notification>, role: UserRole) -> Self {
        Self::with_settings(server, role, CenterSettings::default())
    }

    pub fn with_settings(server: Vec<Notification>, role: UserRole, settings: CenterSettings) -> Self {
        let api = FakeApi::new(server);
        let bus = Arc::new(EventBus::new(64));
        let presenter = Arc::new(RecordingPresenter::default());
        let navigator = Arc::new(RecordingNavigator::default());
        let sound = Arc::new(CountingSound::default());

        let center = NotificationCenter::new(
            api.clone(),
            Arc::clone(&bus),
            CenterHooks {
                presenter: presenter.clone(),
                sound: sound.clone(),
                navigator: navigator.clone(),
            },
            role,
            settings,
        );

        Self {
            api,
            bus,
            presenter,
            navigator,
            sound,
            center,
        }
    }

    /// Load the current server list into the center without announcing
    pub async fn seed(&self) {
        let seq = self.center.next_cycle_seq();
        self.center
            .run_cycle(seq, &tokio_util::sync::CancellationToken::new())
            .await;
    }
}

/// Let spawned tasks run without moving the paused clock meaningfully
pub async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}
