//! Find-drivers criteria and sort keys

use std::cmp::Ordering;
use std::str::FromStr;

use connectcargo_types::Error;
use serde::{Deserialize, Serialize};

use super::{active, cmp_f64, contains_ci, Criteria, SortKey};
use crate::model::Driver;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverCriteria {
    /// Matches name, vehicles or specialties
    pub search: Option<String>,
    pub location: Option<String>,
    pub vehicle_type: Option<String>,
    pub specialty: Option<String>,
    pub min_rating: Option<f64>,
    pub verified_only: bool,
    pub available_now: bool,
}

impl Default for DriverCriteria {
    /// The search page opens with "verified only" ticked
    fn default() -> Self {
        Self {
            search: None,
            location: None,
            vehicle_type: None,
            specialty: None,
            min_rating: None,
            verified_only: true,
            available_now: false,
        }
    }
}

impl DriverCriteria {
    /// No constraint at all, including verification
    pub fn any() -> Self {
        Self {
            verified_only: false,
            ..Self::default()
        }
    }
}

fn any_contains(values: &[String], needle: &str) -> bool {
    values.iter().any(|v| contains_ci(v, needle))
}

impl Criteria<Driver> for DriverCriteria {
    fn matches(&self, driver: &Driver) -> bool {
        if let Some(term) = active(&self.search) {
            let hit = contains_ci(&driver.name, term)
                || any_contains(&driver.vehicles, term)
                || any_contains(&driver.specialties, term);
            if !hit {
                return false;
            }
        }
        if let Some(location) = active(&self.location) {
            if !contains_ci(&driver.location, location) {
                return false;
            }
        }
        if let Some(vehicle) = active(&self.vehicle_type) {
            if !any_contains(&driver.vehicles, vehicle) {
                return false;
            }
        }
        if let Some(specialty) = active(&self.specialty) {
            if !any_contains(&driver.specialties, specialty) {
                return false;
            }
        }
        if self.min_rating.is_some_and(|min| driver.rating < min) {
            return false;
        }
        if self.verified_only && !driver.verified {
            return false;
        }
        !(self.available_now && !driver.available)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverSort {
    #[default]
    Rating,
    Experience,
    Completed,
    /// No price data on drivers; keeps input order
    Price,
    /// No join date on drivers; keeps input order
    Recent,
}

impl FromStr for DriverSort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "rating" => Ok(DriverSort::Rating),
            "experience" => Ok(DriverSort::Experience),
            "completed" => Ok(DriverSort::Completed),
            "price" => Ok(DriverSort::Price),
            "recent" => Ok(DriverSort::Recent),
            _ => Err(Error::InvalidSortKey(s.to_string())),
        }
    }
}

impl SortKey<Driver> for DriverSort {
    fn compare(&self, a: &Driver, b: &Driver) -> Ordering {
        match self {
            DriverSort::Rating => cmp_f64(b.rating, a.rating),
            DriverSort::Experience => b.experience_years.cmp(&a.experience_years),
            DriverSort::Completed => b.completed_trips.cmp(&a.completed_trips),
            DriverSort::Price | DriverSort::Recent => Ordering::Equal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::run_query;

    fn driver(id: u32, name: &str, rating: f64, verified: bool, available: bool) -> Driver {
        Driver {
            id,
            name: name.to_string(),
            rating,
            review_count: 10,
            location: if id == 1 { "Bogotá D.C." } else { "Cali" }.to_string(),
            vehicles: vec![format!("Camión {}T", id * 5)],
            specialties: vec!["Refrigerada".to_string()],
            experience_years: id * 2,
            completed_trips: 100 + id,
            success_rate: 98,
            response_time: "10 min".to_string(),
            available,
            verified,
            featured: false,
        }
    }

    fn drivers() -> Vec<Driver> {
        vec![
            driver(1, "Carlos Rodríguez", 4.8, true, true),
            driver(2, "María González", 5.0, true, false),
            driver(3, "Javier López", 4.9, false, true),
        ]
    }

    fn ids(drivers: &[Driver]) -> Vec<u32> {
        drivers.iter().map(|d| d.id).collect()
    }

    #[test]
    fn test_default_hides_unverified_and_sorts_by_rating() {
        let out = run_query(&drivers(), &DriverCriteria::default(), &DriverSort::Rating);
        assert_eq!(ids(&out), vec![2, 1]);
    }

    #[test]
    fn test_search_matches_vehicles_and_specialties() {
        let criteria = DriverCriteria {
            search: Some("camión 10".to_string()),
            ..DriverCriteria::any()
        };
        assert_eq!(ids(&run_query(&drivers(), &criteria, &DriverSort::Rating)), vec![2]);

        let criteria = DriverCriteria {
            search: Some("REFRIG".to_string()),
            ..DriverCriteria::any()
        };
        assert_eq!(run_query(&drivers(), &criteria, &DriverSort::Rating).len(), 3);
    }

    #[test]
    fn test_rating_and_availability_constraints() {
        let criteria = DriverCriteria {
            min_rating: Some(4.85),
            available_now: true,
            ..DriverCriteria::any()
        };
        assert_eq!(ids(&run_query(&drivers(), &criteria, &DriverSort::Rating)), vec![3]);
    }

    #[test]
    fn test_location_is_case_insensitive() {
        let criteria = DriverCriteria {
            location: Some("BOGOTÁ".to_string()),
            ..DriverCriteria::any()
        };
        assert_eq!(ids(&run_query(&drivers(), &criteria, &DriverSort::Rating)), vec![1]);
    }

    #[test]
    fn test_price_sort_keeps_input_order() {
        let out = run_query(&drivers(), &DriverCriteria::any(), &DriverSort::Price);
        assert_eq!(ids(&out), vec![1, 2, 3]);
        let out = run_query(&drivers(), &DriverCriteria::any(), &DriverSort::Experience);
        assert_eq!(ids(&out), vec![3, 2, 1]);
    }
}
