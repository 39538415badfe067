//! Notification click targets
//!
//! Maps a notification category and the signed-in user's role to the screen
//! the click should open. Shared by toast clicks and panel item clicks.

use crate::model::{NotificationCategory, UserRole};
use std::fmt;

/// Back-office screens a notification can open
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Lead intake list
    LeadIntake,
    /// Administrator meeting calendar
    AdminMeetings,
    /// Sales / executive meeting calendar
    SalesMeetings,
    /// The user's own meetings
    MyMeetings,
}

impl Route {
    pub fn path(&self) -> &'static str {
        match self {
            Route::LeadIntake => "/leads",
            Route::AdminMeetings => "/admin/meetings",
            Route::SalesMeetings => "/sales/meetings",
            Route::MyMeetings => "/my-meetings",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Resolve where a click on a notification of `category` should go.
///
/// `None` means no navigation: the caller only closes the panel.
pub fn resolve(category: NotificationCategory, role: UserRole) -> Option<Route> {
    if category.is_lead() {
        return Some(Route::LeadIntake);
    }

    if category.is_meeting() {
        return Some(match role {
            UserRole::Administrator => Route::AdminMeetings,
            UserRole::Executive | UserRole::Sales => Route::SalesMeetings,
            UserRole::Other => Route::MyMeetings,
        });
    }

    if category.is_inquiry() {
        return match role {
            UserRole::Administrator | UserRole::Executive | UserRole::Sales => {
                Some(Route::LeadIntake)
            }
            UserRole::Other => None,
        };
    }

    None
}

/// Receives navigation requests from the notification center
pub trait Navigator: Send + Sync {
    fn navigate(&self, route: Route);
}
