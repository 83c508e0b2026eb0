//! Repository trait definitions for data persistence

use chrono::{DateTime, Duration, Utc};
use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

use crate::model::DriverSummary;
use crate::query::LoadCriteria;

/// Hours after creation at which a rating reminder is due
pub const REMINDER_DELAY_HOURS: i64 = 24;

/// A pending "rate this driver" reminder for a completed load
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RatingReminder {
    pub load_id: u32,
    pub reference: String,
    pub remind_at: DateTime<Utc>,
}

impl RatingReminder {
    pub fn new(load_id: u32, reference: impl Into<String>, created_at: DateTime<Utc>) -> Self {
        Self {
            load_id,
            reference: reference.into(),
            remind_at: created_at + Duration::hours(REMINDER_DELAY_HOURS),
        }
    }

    pub fn is_due(&self, now: DateTime<Utc>) -> bool {
        now >= self.remind_at
    }
}

/// A named set of load board filters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterPreset {
    pub id: u32,
    pub name: String,
    pub criteria: LoadCriteria,
    /// Applied when the board opens with no filters of its own
    #[serde(default)]
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

/// Repository for the carrier's saved filter presets
pub trait FilterPresetRepository {
    /// Save a preset under its name, replacing any preset with the same name
    /// (case-insensitive). A default preset takes the flag from all others.
    fn save(&self, preset: &FilterPreset) -> Result<(), Error>;

    /// Find all presets in creation order
    fn find_all(&self) -> Result<Vec<FilterPreset>, Error>;

    fn find_by_name(&self, name: &str) -> Result<Option<FilterPreset>, Error> {
        Ok(self
            .find_all()?
            .into_iter()
            .find(|p| p.name.eq_ignore_ascii_case(name.trim())))
    }

    fn find_default(&self) -> Result<Option<FilterPreset>, Error> {
        Ok(self.find_all()?.into_iter().find(|p| p.is_default))
    }

    /// Remove by name; returns false when no such preset
    fn remove(&self, name: &str) -> Result<bool, Error>;

    /// Next free preset id
    fn next_id(&self) -> Result<u32, Error> {
        Ok(self.find_all()?.iter().map(|p| p.id).max().unwrap_or(0) + 1)
    }
}

/// Repository for the company's favorite drivers
pub trait FavoriteDriverRepository {
    /// Add a driver; returns false when a driver with the same name is already saved
    fn add(&self, driver: &DriverSummary) -> Result<bool, Error>;

    /// Remove by name; returns false when not saved
    fn remove(&self, name: &str) -> Result<bool, Error>;

    /// Find all favorites in insertion order
    fn find_all(&self) -> Result<Vec<DriverSummary>, Error>;
}

/// Repository for rating reminders
pub trait RatingReminderRepository {
    /// Save a reminder, replacing any earlier one for the same load
    fn save(&self, reminder: &RatingReminder) -> Result<(), Error>;

    /// Find all reminders
    fn find_all(&self) -> Result<Vec<RatingReminder>, Error>;

    /// Find reminders due at `now`
    fn find_due(&self, now: DateTime<Utc>) -> Result<Vec<RatingReminder>, Error> {
        Ok(self
            .find_all()?
            .into_iter()
            .filter(|r| r.is_due(now))
            .collect())
    }

    /// Drop the reminder for a load once it has been rated
    fn remove(&self, load_id: u32) -> Result<bool, Error>;
}
