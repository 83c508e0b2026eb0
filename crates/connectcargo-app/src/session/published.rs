//! Company published loads

use connectcargo_domain::model::{PublishedLoad, TripEvent};
use connectcargo_domain::query::{InputOrder, Page, PublishedCriteria};
use connectcargo_types::{Error, Result};

use super::BoardSession;

impl BoardSession {
    pub async fn published(&self, criteria: &PublishedCriteria, page: usize) -> Page<PublishedLoad> {
        let board = self.board.read().await;
        self.page_of(&board.published, criteria, &InputOrder, page)
    }

    /// Move a published load through its lifecycle. `Assign` needs the name
    /// of a driver on the board.
    pub async fn advance(
        &self,
        reference: &str,
        event: TripEvent,
        driver: Option<&str>,
    ) -> Result<PublishedLoad> {
        let updated = match self.apply_event(reference, event, driver).await {
            Ok(updated) => updated,
            Err(e) => {
                self.report_failure(&e, "actualizar la carga");
                return Err(e);
            }
        };
        self.toasts.success(format!(
            "Carga {}: {}",
            updated.reference,
            updated.status.label()
        ));
        Ok(updated)
    }

    async fn apply_event(
        &self,
        reference: &str,
        event: TripEvent,
        driver: Option<&str>,
    ) -> Result<PublishedLoad> {
        let driver = match (event, driver) {
            (TripEvent::Assign, Some(name)) => Some(self.driver_named(name).await?),
            (TripEvent::Assign, None) => {
                return Err(Error::NotFound(format!("driver for {}", reference)))
            }
            _ => None,
        };

        let mut board = self.board.write().await;
        let load = board
            .find_published_mut(reference)
            .ok_or_else(|| Error::NotFound(format!("published load {}", reference)))?;
        let from = load.status;
        load.apply(event, driver)?;
        let updated = load.clone();
        drop(board);

        tracing::info!(
            reference = %updated.reference,
            from = %from,
            to = %updated.status,
            "published load advanced"
        );
        Ok(updated)
    }
}
