//! HTTP implementation of [`NotificationApi`]

use super::{ApiError, NotificationApi};
use crate::model::Notification;
use async_trait::async_trait;
use reqwest::{Method, RequestBuilder, Response, StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("propdesk-notify/", env!("CARGO_PKG_VERSION"));

/// List endpoint payloads seen in the wild
///
/// Records stay as raw JSON here so one malformed record cannot fail the
/// whole list.
#[derive(Deserialize)]
#[serde(untagged)]
enum ListEnvelope {
    Bare(Vec<Value>),
    Data { data: DataEnvelope },
    Named { notifications: Vec<Value> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum DataEnvelope {
    List(Vec<Value>),
    Named { notifications: Vec<Value> },
}

impl ListEnvelope {
    fn into_records(self) -> Vec<Value> {
        match self {
            ListEnvelope::Bare(list) => list,
            ListEnvelope::Data { data: DataEnvelope::List(list) } => list,
            ListEnvelope::Data { data: DataEnvelope::Named { notifications } } => notifications,
            ListEnvelope::Named { notifications } => notifications,
        }
    }

    /// Decode each record, skipping the ones that are not notifications
    fn into_notifications(self) -> Vec<Notification> {
        self.into_records()
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(notification) => Some(notification),
                Err(e) => {
                    warn!(index, "Skipping malformed notification record: {}", e);
                    None
                }
            })
            .collect()
    }
}

/// REST client for the notification endpoints
///
/// `base_url` is the API root, e.g. `http://localhost:5000/api`; paths are
/// appended as `/notifications/...`.
#[derive(Debug, Clone)]
pub struct HttpNotificationApi {
    http_client: reqwest::Client,
    base_url: Url,
    auth_token: Option<String>,
}

impl HttpNotificationApi {
    pub fn new(
        base_url: impl Into<String>,
        auth_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let http_client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ApiError::InvalidUrl(format!("{}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(raw));
        }

        Ok(Self {
            http_client,
            base_url,
            auth_token,
        })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `{base}/notifications/{segments...}`, each segment percent-encoded
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ApiError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .push("notifications")
            .extend(segments);
        Ok(url)
    }

    fn request(&self, method: Method, segments: &[&str]) -> Result<RequestBuilder, ApiError> {
        let url = self.endpoint(segments)?;
        let builder = self.http_client.request(method, url);
        Ok(match &self.auth_token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn send(&self, builder: RequestBuilder, id: Option<&str>) -> Result<Response, ApiError> {
        let response = builder
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            return Err(ApiError::NotFound(id.unwrap_or("").to_string()));
        }

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(ApiError::Status(status.as_u16(), error_text));
        }

        Ok(response)
    }

    async fn put(&self, segments: &[&str], id: Option<&str>) -> Result<(), ApiError> {
        self.send(self.request(Method::PUT, segments)?, id).await?;
        Ok(())
    }
}

#[async_trait]
impl NotificationApi for HttpNotificationApi {
    async fn my_notifications(&self, limit: usize) -> Result<Vec<Notification>, ApiError> {
        debug!(limit, "Fetching notifications");

        let builder = self
            .request(Method::GET, &["my-notifications"])?
            .query(&[("limit", limit)]);
        let response = self.send(builder, None).await?;

        let envelope: ListEnvelope = response
            .json()
            .await
            .map_err(|e| ApiError::Parse(e.to_string()))?;

        Ok(envelope.into_notifications())
    }

    async fn mark_read(&self, id: &str) -> Result<(), ApiError> {
        self.put(&[id, "read"], Some(id)).await
    }

    async fn mark_unread(&self, id: &str) -> Result<(), ApiError> {
        self.put(&[id, "unread"], Some(id)).await
    }

    async fn mark_all_read(&self) -> Result<(), ApiError> {
        self.put(&["mark-all-read"], None).await
    }

    async fn delete(&self, id: &str) -> Result<(), ApiError> {
        self.send(self.request(Method::DELETE, &[id])?, Some(id))
            .await?;
        Ok(())
    }
}
