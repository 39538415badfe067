//! Backend notification endpoints
//!
//! The core only talks to the backend through [`NotificationApi`], so tests
//! and alternative transports can stand in for the HTTP client.

mod http;

pub use http::HttpNotificationApi;

use crate::model::Notification;
use async_trait::async_trait;
use thiserror::Error;

/// Backend client errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("Notification not found: {0}")]
    NotFound(String),

    #[error("API error {0}: {1}")]
    Status(u16, String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

/// Notification endpoints consumed by the delivery core
#[async_trait]
pub trait NotificationApi: Send + Sync {
    /// Current user's notifications, newest first, at most `limit`
    async fn my_notifications(&self, limit: usize) -> Result<Vec<Notification>, ApiError>;

    async fn mark_read(&self, id: &str) -> Result<(), ApiError>;

    async fn mark_unread(&self, id: &str) -> Result<(), ApiError>;

    async fn mark_all_read(&self) -> Result<(), ApiError>;

    async fn delete(&self, id: &str) -> Result<(), ApiError>;
}
