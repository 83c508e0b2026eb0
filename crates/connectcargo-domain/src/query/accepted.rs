//! Accepted trips list and the carrier's trip history

use std::str::FromStr;

use chrono::{Days, Months, NaiveDate};
use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

use super::{active, contains_ci, Criteria};
use crate::model::{AcceptedStatus, AcceptedTrip};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AcceptedCriteria {
    pub status: Option<AcceptedStatus>,
}

impl Criteria<AcceptedTrip> for AcceptedCriteria {
    fn matches(&self, trip: &AcceptedTrip) -> bool {
        self.status.map_or(true, |status| trip.status == status)
    }
}

/// How far back the trip history reaches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Week,
    #[default]
    Month,
    Quarter,
    Year,
    All,
}

impl Period {
    /// Earliest completion day inside the period, `None` for no limit
    pub fn since(&self, today: NaiveDate) -> Option<NaiveDate> {
        match self {
            Period::Week => today.checked_sub_days(Days::new(7)),
            Period::Month => today.checked_sub_months(Months::new(1)),
            Period::Quarter => today.checked_sub_months(Months::new(3)),
            Period::Year => today.checked_sub_months(Months::new(12)),
            Period::All => None,
        }
    }
}

impl FromStr for Period {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "week" => Ok(Period::Week),
            "month" => Ok(Period::Month),
            "quarter" => Ok(Period::Quarter),
            "year" => Ok(Period::Year),
            "all" => Ok(Period::All),
            other => Err(Error::InvalidEnumValue {
                kind: "period",
                value: other.to_string(),
            }),
        }
    }
}

/// Completed trips filter. Trips not yet completed never match.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripHistoryCriteria {
    /// Matches trip label, origin, destination or client
    pub search: Option<String>,
    pub period: Period,
    /// Unrated trips never pass a rating constraint
    pub min_rating: Option<u8>,
    /// Reference day for the period
    pub today: NaiveDate,
}

impl TripHistoryCriteria {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            search: None,
            period: Period::default(),
            min_rating: None,
            today,
        }
    }
}

impl Criteria<AcceptedTrip> for TripHistoryCriteria {
    fn matches(&self, trip: &AcceptedTrip) -> bool {
        let Some(completed_on) = trip.completed_on else {
            return false;
        };
        if trip.status != AcceptedStatus::Completed {
            return false;
        }
        if self.period.since(self.today).is_some_and(|since| completed_on < since) {
            return false;
        }
        if let Some(min) = self.min_rating {
            if trip.rating.map_or(true, |rating| rating < min) {
                return false;
            }
        }
        match active(&self.search) {
            None => true,
            Some(term) => {
                contains_ci(&trip.label(), term)
                    || contains_ci(&trip.origin, term)
                    || contains_ci(&trip.destination, term)
                    || contains_ci(&trip.client, term)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CargoType;
    use crate::query::{run_query, InputOrder};

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn done(id: u32, client: &str, completed_on: NaiveDate, rating: Option<u8>) -> AcceptedTrip {
        AcceptedTrip {
            id,
            origin: "Bogotá".to_string(),
            destination: "Ibagué".to_string(),
            cargo_type: CargoType::General,
            price: 900_000,
            client: client.to_string(),
            status: AcceptedStatus::Completed,
            issues: Vec::new(),
            completed_on: Some(completed_on),
            rating,
        }
    }

    fn history() -> Vec<AcceptedTrip> {
        vec![
            done(1, "Alimentos del Valle", day(2024, 12, 12), Some(5)),
            done(2, "Textiles Medellín", day(2024, 11, 20), Some(4)),
            done(3, "Alimentos del Valle", day(2024, 8, 2), Some(3)),
            done(4, "Ferretería Central", day(2023, 10, 1), None),
        ]
    }

    fn ids(criteria: &TripHistoryCriteria) -> Vec<u32> {
        run_query(&history(), criteria, &InputOrder)
            .iter()
            .map(|t| t.id)
            .collect()
    }

    #[test]
    fn test_period_windows() {
        let mut criteria = TripHistoryCriteria::new(day(2024, 12, 15));
        assert_eq!(ids(&criteria), vec![1, 2]);
        criteria.period = Period::Week;
        assert_eq!(ids(&criteria), vec![1]);
        criteria.period = Period::Year;
        assert_eq!(ids(&criteria), vec![1, 2, 3]);
        criteria.period = Period::All;
        assert_eq!(ids(&criteria), vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_month_boundary_is_inclusive() {
        let criteria = TripHistoryCriteria::new(day(2024, 12, 20));
        assert_eq!(ids(&criteria), vec![1, 2]);
    }

    #[test]
    fn test_min_rating_skips_unrated() {
        let criteria = TripHistoryCriteria {
            period: Period::All,
            min_rating: Some(4),
            ..TripHistoryCriteria::new(day(2024, 12, 15))
        };
        assert_eq!(ids(&criteria), vec![1, 2]);
    }

    #[test]
    fn test_search_by_client() {
        let criteria = TripHistoryCriteria {
            period: Period::All,
            search: Some("alimentos".to_string()),
            ..TripHistoryCriteria::new(day(2024, 12, 15))
        };
        assert_eq!(ids(&criteria), vec![1, 3]);
    }

    #[test]
    fn test_unfinished_trips_are_not_history() {
        let mut trips = history();
        trips[0].status = AcceptedStatus::Active;
        trips[0].completed_on = None;
        let criteria = TripHistoryCriteria {
            period: Period::All,
            ..TripHistoryCriteria::new(day(2024, 12, 15))
        };
        assert_eq!(run_query(&trips, &criteria, &InputOrder).len(), 3);
        assert!(AcceptedCriteria { status: Some(AcceptedStatus::Active) }.matches(&trips[0]));
    }
}
