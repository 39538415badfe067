//! Error types for propdesk-notify
//!
//! Defines module-specific error types using thiserror for clear error propagation.

use crate::api::ApiError;
use thiserror::Error;

/// Main error type for propdesk-notify
#[derive(Error, Debug)]
pub enum Error {
    /// Backend call failed
    #[error("Backend error: {0}")]
    Api(#[from] ApiError),

    /// Configuration loading errors
    #[error("Configuration error: {0}")]
    Config(#[from] propdesk_common::Error),

    /// Notification id not present in the local list
    #[error("Unknown notification: {0}")]
    UnknownNotification(String),

    /// Audio output unavailable or failed
    #[error("Audio error: {0}")]
    Audio(String),
}

/// Convenience Result type using propdesk-notify Error
pub type Result<T> = std::result::Result<T, Error>;
