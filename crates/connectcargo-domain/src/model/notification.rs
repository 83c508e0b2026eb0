//! Inbox notifications

use std::str::FromStr;

use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    Quote,
    Completion,
    Payment,
    Status,
    Message,
    System,
}

impl NotificationKind {
    pub fn icon(&self) -> &'static str {
        match self {
            NotificationKind::Quote => "fa-file-invoice-dollar",
            NotificationKind::Completion => "fa-flag-checkered",
            NotificationKind::Payment => "fa-credit-card",
            NotificationKind::Status => "fa-check-circle",
            NotificationKind::Message => "fa-comment",
            NotificationKind::System => "fa-bell",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    Shipments,
    Quotes,
    Payments,
    System,
}

impl NotificationCategory {
    pub const ALL: [NotificationCategory; 4] = [
        NotificationCategory::Shipments,
        NotificationCategory::Quotes,
        NotificationCategory::Payments,
        NotificationCategory::System,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            NotificationCategory::Shipments => "shipments",
            NotificationCategory::Quotes => "quotes",
            NotificationCategory::Payments => "payments",
            NotificationCategory::System => "system",
        }
    }
}

impl FromStr for NotificationCategory {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NotificationCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s.trim())
            .ok_or_else(|| Error::InvalidEnumValue {
                kind: "notification category",
                value: s.to_string(),
            })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: u32,
    pub kind: NotificationKind,
    pub category: NotificationCategory,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    #[serde(default)]
    pub important: bool,
    /// Display timestamp, e.g. "Hace 5 minutos"
    pub time: String,
    /// Arrival order, larger is newer
    pub seq: u64,
}

impl Notification {
    /// Unread important items get the priority dot
    pub fn shows_priority_dot(&self) -> bool {
        self.important && !self.read
    }
}
