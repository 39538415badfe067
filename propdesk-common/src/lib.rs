//! # Propdesk Common Library
//!
//! Shared code for Propdesk back-office clients:
//! - Event types and the event bus (`PropdeskEvent`, `EventBus`)
//! - Configuration file resolution and loading
//! - Relative time formatting for notification lists
//! - Common error type

pub mod config;
pub mod error;
pub mod events;
pub mod relative_time;

pub use error::{Error, Result};
pub use events::{EventBus, PropdeskEvent};
