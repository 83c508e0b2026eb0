//! Carrier load board

use connectcargo_domain::model::{Load, PendingTrip};
use connectcargo_domain::query::{Criteria, LoadCriteria, LoadSort, Page};
use connectcargo_domain::service::{load_stats, LoadStats};
use connectcargo_types::{Error, Result};

use super::BoardSession;

impl BoardSession {
    pub async fn loads(&self, criteria: &LoadCriteria, sort: LoadSort, page: usize) -> Page<Load> {
        let board = self.board.read().await;
        self.page_of(&board.loads, criteria, &sort, page)
    }

    /// Header counters over every listed load
    pub async fn load_stats(&self, criteria: &LoadCriteria) -> LoadStats {
        let board = self.board.read().await;
        let listed: Vec<Load> = board
            .loads
            .iter()
            .filter(|l| criteria.matches(l))
            .cloned()
            .collect();
        load_stats(&listed)
    }

    /// Search box input. Returns `None` when a newer keystroke superseded this
    /// one before the quiet window ran out.
    pub async fn search_loads(
        &self,
        text: &str,
        criteria: &LoadCriteria,
        sort: LoadSort,
    ) -> Option<Page<Load>> {
        let text = self.search.submit(text.to_string()).await?;
        let criteria = LoadCriteria {
            search: Some(text),
            ..criteria.clone()
        };
        Some(self.loads(&criteria, sort, 1).await)
    }

    /// Accept a board load. On success the load leaves the board and becomes
    /// a confirmed trip of the carrier.
    pub async fn accept_load(&self, id: u32) -> Result<PendingTrip> {
        let load = {
            let board = self.board.read().await;
            board
                .find_load(id)
                .cloned()
                .ok_or_else(|| Error::NotFound(format!("load {}", id)))?
        };

        if let Err(e) = self.call(format!("accept-load:{}", id), "accept-load").await {
            self.report_failure(&e, "aceptar la carga");
            return Err(e);
        }

        let mut board = self.board.write().await;
        // another session path may have removed it while we waited
        let position = board
            .loads
            .iter()
            .position(|l| l.id == id)
            .ok_or_else(|| Error::NotFound(format!("load {}", id)))?;
        board.loads.remove(position);
        let trip = PendingTrip::from_accepted(&load, board.next_trip_id());
        board.pending_trips.push(trip.clone());
        drop(board);

        tracing::info!(load = id, trip = trip.id, "load accepted");
        self.toasts.success(format!(
            "¡Carga aceptada! Te has asignado a la carga {} → {}",
            load.origin.city, load.destination.city
        ));
        Ok(trip)
    }
}
