//! Domain services

pub mod stats;

pub use stats::{badge_text, load_stats, notification_counts, LoadStats, NotificationCounts};
