//! Completed loads criteria

use std::str::FromStr;

use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

use super::{active, contains_ci, Criteria};
use crate::model::{CompletedLoad, CompletionDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeWindow {
    Today,
    /// Today or yesterday
    Week,
}

impl FromStr for TimeWindow {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "today" => Ok(TimeWindow::Today),
            "week" => Ok(TimeWindow::Week),
            other => Err(Error::InvalidEnumValue {
                kind: "time window",
                value: other.to_string(),
            }),
        }
    }
}

impl TimeWindow {
    fn contains(&self, day: &CompletionDay) -> bool {
        match self {
            TimeWindow::Today => matches!(day, CompletionDay::Today),
            TimeWindow::Week => matches!(day, CompletionDay::Today | CompletionDay::Yesterday),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletedCriteria {
    /// Matches reference, driver name, origin or destination
    pub search: Option<String>,
    pub time: Option<TimeWindow>,
    /// Unrated loads never pass a rating constraint
    pub min_rating: Option<f64>,
    pub driver: Option<String>,
    /// Only loads still waiting for a rating
    pub unrated_only: bool,
}

impl Criteria<CompletedLoad> for CompletedCriteria {
    fn matches(&self, load: &CompletedLoad) -> bool {
        if let Some(term) = active(&self.search) {
            let hit = contains_ci(&load.reference, term)
                || contains_ci(&load.driver.name, term)
                || contains_ci(&load.route.origin, term)
                || contains_ci(&load.route.destination, term);
            if !hit {
                return false;
            }
        }
        if let Some(window) = self.time {
            if !window.contains(&load.completed) {
                return false;
            }
        }
        if let Some(min) = self.min_rating {
            match &load.user_rating {
                Some(rating) if rating.value >= min => {}
                _ => return false,
            }
        }
        if let Some(driver) = active(&self.driver) {
            if !contains_ci(&load.driver.name, driver) {
                return false;
            }
        }
        !(self.unrated_only && load.user_rating.is_some())
    }
}
