//! Drivers (carriers) listed in the company's search

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Driver {
    pub id: u32,
    pub name: String,
    /// 0.0 - 5.0
    pub rating: f64,
    pub review_count: u32,
    pub location: String,
    #[serde(default)]
    pub vehicles: Vec<String>,
    #[serde(default)]
    pub specialties: Vec<String>,
    pub experience_years: u32,
    pub completed_trips: u32,
    /// Percentage of successful deliveries
    pub success_rate: u8,
    pub response_time: String,
    pub available: bool,
    pub verified: bool,
    #[serde(default)]
    pub featured: bool,
}

impl Driver {
    pub fn summary(&self) -> DriverSummary {
        DriverSummary {
            name: self.name.clone(),
            rating: self.rating,
            trips: self.completed_trips,
        }
    }

    /// Star breakdown (full, half, empty) for a five star display
    pub fn stars(&self) -> (u8, bool, u8) {
        let full = self.rating.clamp(0.0, 5.0).floor() as u8;
        let half = self.rating % 1.0 >= 0.5;
        let empty = 5 - full - u8::from(half);
        (full, half, empty)
    }
}

/// Driver data embedded in trips and completed loads
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriverSummary {
    pub name: String,
    pub rating: f64,
    pub trips: u32,
}
