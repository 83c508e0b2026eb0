//! The full record set a session works over

use serde::{Deserialize, Serialize};

use super::{AcceptedTrip, CompletedLoad, Driver, Load, Notification, PendingTrip, PublishedLoad};

/// Records backing every board page, loaded once per session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Board {
    #[serde(default)]
    pub loads: Vec<Load>,
    #[serde(default)]
    pub drivers: Vec<Driver>,
    #[serde(default)]
    pub published: Vec<PublishedLoad>,
    #[serde(default)]
    pub completed: Vec<CompletedLoad>,
    #[serde(default)]
    pub pending_trips: Vec<PendingTrip>,
    #[serde(default)]
    pub accepted_trips: Vec<AcceptedTrip>,
    #[serde(default)]
    pub notifications: Vec<Notification>,
}

impl Board {
    pub fn find_load(&self, id: u32) -> Option<&Load> {
        self.loads.iter().find(|l| l.id == id)
    }

    pub fn find_driver(&self, id: u32) -> Option<&Driver> {
        self.drivers.iter().find(|d| d.id == id)
    }

    pub fn find_published_mut(&mut self, reference: &str) -> Option<&mut PublishedLoad> {
        self.published
            .iter_mut()
            .find(|p| p.reference.eq_ignore_ascii_case(reference))
    }

    pub fn find_completed_mut(&mut self, reference: &str) -> Option<&mut CompletedLoad> {
        self.completed
            .iter_mut()
            .find(|c| c.reference.eq_ignore_ascii_case(reference))
    }

    /// Next free load id
    pub fn next_load_id(&self) -> u32 {
        self.loads.iter().map(|l| l.id).max().unwrap_or(0) + 1
    }

    /// Next free carrier trip id. Scheduled trips keep their id, so both
    /// lists count.
    pub fn next_trip_id(&self) -> u32 {
        let pending = self.pending_trips.iter().map(|t| t.id);
        let accepted = self.accepted_trips.iter().map(|t| t.id);
        pending.chain(accepted).max().unwrap_or(0) + 1
    }

    /// Next free published load id
    pub fn next_published_id(&self) -> u32 {
        self.published.iter().map(|p| p.id).max().unwrap_or(0) + 1
    }
}
