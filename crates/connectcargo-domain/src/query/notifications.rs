//! Notification inbox tabs and sort keys

use std::cmp::Ordering;
use std::str::FromStr;

use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

use super::{Criteria, SortKey};
use crate::model::{Notification, NotificationCategory};

/// Inbox tab
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationView {
    #[default]
    All,
    Unread,
    Important,
    Category(NotificationCategory),
}

impl FromStr for NotificationView {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "" | "all" => Ok(NotificationView::All),
            "unread" => Ok(NotificationView::Unread),
            "important" => Ok(NotificationView::Important),
            other => other.parse().map(NotificationView::Category),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NotificationCriteria {
    pub view: NotificationView,
}

impl Criteria<Notification> for NotificationCriteria {
    fn matches(&self, n: &Notification) -> bool {
        match self.view {
            NotificationView::All => true,
            NotificationView::Unread => !n.read,
            NotificationView::Important => n.important,
            NotificationView::Category(category) => n.category == category,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationSort {
    #[default]
    Newest,
    Oldest,
    /// Important first, newest first within each group
    Important,
}

impl FromStr for NotificationSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "newest" => Ok(NotificationSort::Newest),
            "oldest" => Ok(NotificationSort::Oldest),
            "important" => Ok(NotificationSort::Important),
            _ => Err(Error::InvalidSortKey(s.to_string())),
        }
    }
}

impl SortKey<Notification> for NotificationSort {
    fn compare(&self, a: &Notification, b: &Notification) -> Ordering {
        match self {
            NotificationSort::Newest => b.seq.cmp(&a.seq),
            NotificationSort::Oldest => a.seq.cmp(&b.seq),
            NotificationSort::Important => b
                .important
                .cmp(&a.important)
                .then_with(|| b.seq.cmp(&a.seq)),
        }
    }
}
