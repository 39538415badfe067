//! Notification records and the user role
//!
//! Records are produced by the backend and never created client-side. The
//! only locally mutated field is `is_read`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Notification category
///
/// Determines toast colour, icon and navigation target. Unknown backend
/// values deserialize to [`NotificationCategory::Other`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum NotificationCategory {
    MeetingScheduled,
    MeetingReminder,
    LeadAssigned,
    LeadCreated,
    InquiryCreated,
    ContactRequest,
    GenericMessage,
    #[default]
    Other,
}

impl NotificationCategory {
    /// Canonical wire spelling (snake_case)
    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::MeetingScheduled => "meeting_scheduled",
            NotificationCategory::MeetingReminder => "meeting_reminder",
            NotificationCategory::LeadAssigned => "lead_assigned",
            NotificationCategory::LeadCreated => "lead_created",
            NotificationCategory::InquiryCreated => "inquiry_created",
            NotificationCategory::ContactRequest => "contact_request",
            NotificationCategory::GenericMessage => "generic_message",
            NotificationCategory::Other => "other",
        }
    }

    /// Lenient parse: accepts snake_case, kebab-case and upper case.
    pub fn parse(raw: &str) -> Self {
        let normalized = raw.trim().to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "meeting_scheduled" => NotificationCategory::MeetingScheduled,
            "meeting_reminder" => NotificationCategory::MeetingReminder,
            "lead_assigned" => NotificationCategory::LeadAssigned,
            "lead_created" => NotificationCategory::LeadCreated,
            "inquiry_created" => NotificationCategory::InquiryCreated,
            "contact_request" => NotificationCategory::ContactRequest,
            "generic_message" | "message" => NotificationCategory::GenericMessage,
            _ => NotificationCategory::Other,
        }
    }

    pub fn is_meeting(&self) -> bool {
        matches!(
            self,
            NotificationCategory::MeetingScheduled | NotificationCategory::MeetingReminder
        )
    }

    pub fn is_lead(&self) -> bool {
        matches!(
            self,
            NotificationCategory::LeadAssigned | NotificationCategory::LeadCreated
        )
    }

    pub fn is_inquiry(&self) -> bool {
        matches!(
            self,
            NotificationCategory::InquiryCreated | NotificationCategory::ContactRequest
        )
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for NotificationCategory {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for NotificationCategory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw
            .as_deref()
            .map(NotificationCategory::parse)
            .unwrap_or(NotificationCategory::Other))
    }
}

/// A notification as returned by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "RawNotification")]
pub struct Notification {
    /// Opaque id, stable across fetches
    pub id: String,

    #[serde(rename = "type")]
    pub category: NotificationCategory,

    pub title: String,

    pub message: String,

    pub is_read: bool,

    /// Raw timestamp; malformed values only affect relative-time display
    pub created_at: Option<String>,
}

/// Wire shape: document stores send `_id`, some also add a virtual `id`
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawNotification {
    #[serde(default)]
    id: Option<String>,
    #[serde(default, rename = "_id")]
    object_id: Option<String>,
    #[serde(rename = "type", default)]
    category: NotificationCategory,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    is_read: Option<bool>,
    #[serde(default)]
    created_at: Option<String>,
}

impl TryFrom<RawNotification> for Notification {
    type Error = String;

    fn try_from(raw: RawNotification) -> Result<Self, Self::Error> {
        let id = raw
            .id
            .or(raw.object_id)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| "notification without id".to_string())?;

        Ok(Notification {
            id,
            category: raw.category,
            title: raw.title.unwrap_or_default(),
            message: raw.message.unwrap_or_default(),
            is_read: raw.is_read.unwrap_or(false),
            created_at: raw.created_at,
        })
    }
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        !self.is_read
    }

    /// Relative-time label for list and toast display
    pub fn age_label(&self, now: chrono::DateTime<chrono::Utc>) -> String {
        propdesk_common::relative_time::format_relative_time(self.created_at.as_deref(), now)
    }
}

/// Role of the signed-in user, supplied from outside the subsystem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum UserRole {
    Administrator,
    Executive,
    Sales,
    #[default]
    Other,
}

impl UserRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Administrator => "administrator",
            UserRole::Executive => "executive",
            UserRole::Sales => "sales",
            UserRole::Other => "other",
        }
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UserRole {
    type Err = std::convert::Infallible;

    /// Never fails; unknown roles are [`UserRole::Other`].
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim().to_ascii_lowercase().as_str() {
            "admin" | "administrator" => UserRole::Administrator,
            "executive" | "exec" => UserRole::Executive,
            "sales" => UserRole::Sales,
            _ => UserRole::Other,
        })
    }
}

impl<'de> Deserialize<'de> for UserRole {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(raw.parse().unwrap_or_default())
    }
}

/// Number of unread records in a list
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| n.is_unread()).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_spellings() {
        assert_eq!(
            NotificationCategory::parse("meeting_scheduled"),
            NotificationCategory::MeetingScheduled
        );
        assert_eq!(
            NotificationCategory::parse("meeting-reminder"),
            NotificationCategory::MeetingReminder
        );
        assert_eq!(
            NotificationCategory::parse("LEAD_ASSIGNED"),
            NotificationCategory::LeadAssigned
        );
        assert_eq!(
            NotificationCategory::parse("message"),
            NotificationCategory::GenericMessage
        );
        assert_eq!(
            NotificationCategory::parse("payment_received"),
            NotificationCategory::Other
        );
    }

    #[test]
    fn test_category_groups() {
        assert!(NotificationCategory::MeetingReminder.is_meeting());
        assert!(NotificationCategory::LeadCreated.is_lead());
        assert!(NotificationCategory::ContactRequest.is_inquiry());
        assert!(!NotificationCategory::GenericMessage.is_meeting());
        assert!(!NotificationCategory::Other.is_lead());
    }

    #[test]
    fn test_deserialize_backend_record() {
        let json = r#"{
            "_id": "65f0c1",
            "type": "lead_created",
            "title": "New lead",
            "message": "Jane Doe asked about 12 Elm St",
            "isRead": false,
            "createdAt": "2025-03-10T11:00:00.000Z",
            "recipient": "ignored"
        }"#;

        let n: Notification = serde_json::from_str(json).unwrap();
        assert_eq!(n.id, "65f0c1");
        assert_eq!(n.category, NotificationCategory::LeadCreated);
        assert_eq!(n.title, "New lead");
        assert!(n.is_unread());
        assert_eq!(n.created_at.as_deref(), Some("2025-03-10T11:00:00.000Z"));
    }

    #[test]
    fn test_deserialize_sparse_record() {
        let n: Notification = serde_json::from_str(r#"{"id": "x", "type": null}"#).unwrap();
        assert_eq!(n.category, NotificationCategory::Other);
        assert!(!n.is_read);
        assert!(n.title.is_empty());
        assert!(n.created_at.is_none());
    }

    #[test]
    fn test_deserialize_record_with_both_ids() {
        let n: Notification =
            serde_json::from_str(r#"{"_id": "obj", "id": "virt", "type": "lead_created"}"#).unwrap();
        assert_eq!(n.id, "virt");
    }

    #[test]
    fn test_deserialize_rejects_missing_id() {
        let result: Result<Notification, _> = serde_json::from_str(r#"{"title": "x"}"#);
        assert!(result.is_err());
    }

    #[test]
    fn test_serialize_uses_wire_names() {
        let n = Notification {
            id: "a".into(),
            category: NotificationCategory::MeetingScheduled,
            title: "t".into(),
            message: "m".into(),
            is_read: true,
            created_at: None,
        };
        let value = serde_json::to_value(&n).unwrap();
        assert_eq!(value["type"], "meeting_scheduled");
        assert_eq!(value["isRead"], true);
    }

    #[test]
    fn test_role_parsing() {
        assert_eq!("Admin".parse::<UserRole>().unwrap(), UserRole::Administrator);
        assert_eq!("administrator".parse::<UserRole>().unwrap(), UserRole::Administrator);
        assert_eq!("EXECUTIVE".parse::<UserRole>().unwrap(), UserRole::Executive);
        assert_eq!("sales".parse::<UserRole>().unwrap(), UserRole::Sales);
        assert_eq!("agent".parse::<UserRole>().unwrap(), UserRole::Other);
    }

    #[test]
    fn test_unread_count() {
        let make = |id: &str, read: bool| Notification {
            id: id.into(),
            category: NotificationCategory::Other,
            title: String::new(),
            message: String::new(),
            is_read: read,
            created_at: None,
        };
        assert_eq!(unread_count(&[make("a", false), make("b", true), make("c", false)]), 2);
        assert_eq!(unread_count(&[]), 0);
    }
}
