//! Carrier "pending trips" criteria and sort keys
//!
//! Every constraint is an exact match; `None` stands for the "all" option.

use std::cmp::Ordering;
use std::str::FromStr;

use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

use super::{active, Criteria, SortKey};
use crate::model::{CargoType, PendingStatus, PendingTrip};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PendingCriteria {
    pub status: Option<PendingStatus>,
    pub date: Option<String>,
    pub cargo_type: Option<CargoType>,
    pub price_band: Option<String>,
}

impl Criteria<PendingTrip> for PendingCriteria {
    fn matches(&self, trip: &PendingTrip) -> bool {
        let status_match = self.status.map_or(true, |s| trip.status == s);
        let date_match = active(&self.date).map_or(true, |d| trip.date == d);
        let type_match = self.cargo_type.map_or(true, |t| trip.cargo_type == t);
        let price_match = active(&self.price_band).map_or(true, |p| trip.price_band == p);
        status_match && date_match && type_match && price_match
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingSort {
    #[default]
    Newest,
    Oldest,
    PriceHigh,
    PriceLow,
}

impl FromStr for PendingSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('-', "_").as_str() {
            "newest" => Ok(PendingSort::Newest),
            "oldest" => Ok(PendingSort::Oldest),
            "price_high" => Ok(PendingSort::PriceHigh),
            "price_low" => Ok(PendingSort::PriceLow),
            _ => Err(Error::InvalidSortKey(s.to_string())),
        }
    }
}

impl SortKey<PendingTrip> for PendingSort {
    fn compare(&self, a: &PendingTrip, b: &PendingTrip) -> Ordering {
        match self {
            PendingSort::Newest => b.id.cmp(&a.id),
            PendingSort::Oldest => a.id.cmp(&b.id),
            PendingSort::PriceHigh => b.price.cmp(&a.price),
            PendingSort::PriceLow => a.price.cmp(&b.price),
        }
    }
}
