//! Carrier pending trips: confirm, negotiate, reject

use connectcargo_domain::model::PendingTrip;
use connectcargo_domain::query::{Page, PendingCriteria, PendingSort};
use connectcargo_types::{Error, Result};

use super::BoardSession;

fn missing(id: u32) -> Error {
    Error::NotFound(format!("trip #{}", id))
}

impl BoardSession {
    pub async fn pending_trips(
        &self,
        criteria: &PendingCriteria,
        sort: PendingSort,
        page: usize,
    ) -> Page<PendingTrip> {
        let board = self.board.read().await;
        self.page_of(&board.pending_trips, criteria, &sort, page)
    }

    async fn trip(&self, id: u32) -> Result<PendingTrip> {
        self.board
            .read()
            .await
            .pending_trips
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| missing(id))
    }

    /// Check `change` against the current trip, run the backend call, then
    /// apply it for real
    async fn update_trip<F>(&self, id: u32, key: String, action: &str, change: F) -> Result<PendingTrip>
    where
        F: Fn(&mut PendingTrip) -> Result<()>,
    {
        change(&mut self.trip(id).await?)?;

        if let Err(e) = self.call(key, "update-trip").await {
            self.report_failure(&e, action);
            return Err(e);
        }

        let mut board = self.board.write().await;
        let trip = board
            .pending_trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| missing(id))?;
        change(trip)?;
        Ok(trip.clone())
    }

    async fn remove_trip(&self, id: u32) -> Result<PendingTrip> {
        let mut board = self.board.write().await;
        let position = board
            .pending_trips
            .iter()
            .position(|t| t.id == id)
            .ok_or_else(|| missing(id))?;
        Ok(board.pending_trips.remove(position))
    }

    pub async fn confirm_trip(&self, id: u32) -> Result<PendingTrip> {
        let trip = self
            .update_trip(id, format!("trip:{}", id), "aceptar el viaje", PendingTrip::confirm)
            .await?;
        tracing::info!(trip = id, "trip confirmed");
        self.toasts
            .success(format!("¡Viaje #{} aceptado exitosamente!", id));
        Ok(trip)
    }

    pub async fn negotiate_trip(&self, id: u32, counter_offer: u64) -> Result<PendingTrip> {
        let result = self
            .update_trip(id, format!("trip:{}", id), "enviar la contraoferta", |t| {
                t.negotiate(counter_offer)
            })
            .await;
        let trip = match result {
            Err(e @ Error::InvalidAmount(_)) => {
                self.toasts
                    .error("Por favor ingresa un monto para tu contraoferta");
                return Err(e);
            }
            other => other?,
        };
        tracing::info!(trip = id, counter_offer, "counter offer sent");
        self.toasts.success("¡Contraoferta enviada exitosamente!");
        Ok(trip)
    }

    pub async fn accept_counter_offer(&self, id: u32) -> Result<PendingTrip> {
        let trip = self
            .update_trip(
                id,
                format!("trip:{}", id),
                "aceptar la contraoferta",
                PendingTrip::accept_counter,
            )
            .await?;
        tracing::info!(trip = id, price = trip.price, "counter offer accepted");
        self.toasts
            .success(format!("¡Contrato confirmado para #{}!", id));
        Ok(trip)
    }

    /// Turn down an offered trip; it leaves the list
    pub async fn reject_trip(&self, id: u32) -> Result<PendingTrip> {
        self.trip(id).await?.check_reject()?;
        if let Err(e) = self.call(format!("trip:{}", id), "reject-trip").await {
            self.report_failure(&e, "rechazar el viaje");
            return Err(e);
        }

        let trip = self.remove_trip(id).await?;
        tracing::info!(trip = id, "trip rejected");
        self.toasts.success(format!("Viaje #{} rechazado", id));
        Ok(trip)
    }

    /// Walk away from a negotiation. Local only, no backend call.
    pub async fn cancel_negotiation(&self, id: u32) -> Result<PendingTrip> {
        self.trip(id).await?.check_cancel_negotiation()?;
        let trip = self.remove_trip(id).await?;
        self.toasts
            .info(format!("Negociación cancelada para #{}", id));
        Ok(trip)
    }
}
