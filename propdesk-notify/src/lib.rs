//! propdesk-notify: in-app notification delivery for the Propdesk CRM
//!
//! Polls the backend for the current user's notifications, announces newly
//! arrived unread ones as staggered toasts with an audible cue, keeps read
//! state in sync with the backend, and routes clicks to the right screen.
//!
//! The library is front-end agnostic: toasts, navigation and sound are
//! injected through [`toast::ToastPresenter`], [`navigation::Navigator`] and
//! [`sound::AlertSound`]. The `propdesk-notify` binary wires terminal
//! implementations of each.

pub mod announce;
pub mod api;
pub mod badge;
pub mod center;
pub mod config;
pub mod error;
pub mod model;
pub mod navigation;
pub mod poller;
pub mod snapshot;
pub mod sound;
pub mod store;
pub mod sync;
pub mod terminal;
pub mod toast;

pub use crate::center::{CenterHooks, CenterSettings, CycleReport, NotificationCenter};
pub use crate::error::{Error, Result};
pub use crate::model::{Notification, NotificationCategory, UserRole};
