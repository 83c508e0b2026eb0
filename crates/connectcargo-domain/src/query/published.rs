//! Company "published loads" criteria

use serde::{Deserialize, Serialize};

use super::{active, contains_ci, Criteria};
use crate::model::{PublishedLoad, TripStatus};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PublishedCriteria {
    /// Matches reference, origin/destination city or cargo type
    pub search: Option<String>,
    pub status: Option<TripStatus>,
    /// Hide completed and cancelled loads
    pub active_only: bool,
}

impl Criteria<PublishedLoad> for PublishedCriteria {
    fn matches(&self, load: &PublishedLoad) -> bool {
        if let Some(term) = active(&self.search) {
            let hit = contains_ci(&load.reference, term)
                || contains_ci(&load.origin.place.city, term)
                || contains_ci(&load.destination.place.city, term)
                || contains_ci(&load.cargo.cargo_type, term);
            if !hit {
                return false;
            }
        }
        if self.status.is_some_and(|status| load.status != status) {
            return false;
        }
        !(self.active_only && !load.status.is_active())
    }
}
