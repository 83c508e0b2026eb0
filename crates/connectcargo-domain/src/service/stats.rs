//! Counters shown next to lists and in the sidebar

use std::collections::BTreeMap;

use serde::Serialize;

use crate::model::{Load, Notification, NotificationCategory};
use crate::query::NEARBY_KM;

/// Header counters of the carrier load board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LoadStats {
    pub total: usize,
    pub nearby: usize,
}

/// Counters over the loads currently listed (after filtering)
pub fn load_stats(loads: &[Load]) -> LoadStats {
    LoadStats {
        total: loads.len(),
        nearby: loads.iter().filter(|l| l.distance_km <= NEARBY_KM).count(),
    }
}

/// Per-tab counts of the notification inbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationCounts {
    pub all: usize,
    pub unread: usize,
    pub important: usize,
    pub by_category: BTreeMap<&'static str, usize>,
}

pub fn notification_counts(notifications: &[Notification]) -> NotificationCounts {
    let mut by_category: BTreeMap<&'static str, usize> = NotificationCategory::ALL
        .iter()
        .map(|c| (c.as_str(), 0))
        .collect();
    for n in notifications {
        *by_category.entry(n.category.as_str()).or_default() += 1;
    }

    NotificationCounts {
        all: notifications.len(),
        unread: notifications.iter().filter(|n| !n.read).count(),
        important: notifications.iter().filter(|n| n.important).count(),
        by_category,
    }
}

/// Badge label; hidden at zero and capped at `99+`
pub fn badge_text(count: usize) -> Option<String> {
    match count {
        0 => None,
        1..=99 => Some(count.to_string()),
        _ => Some("99+".to_string()),
    }
}
