//! Carrier accepted trips: schedule, drive, report issues, look back

use chrono::{DateTime, NaiveDate, Utc};
use connectcargo_domain::model::{
    AcceptedStatus, AcceptedTrip, DriveEvent, EstimatedDelay, IssueKind, PendingStatus, TripIssue,
};
use connectcargo_domain::query::{AcceptedCriteria, InputOrder, Page, TripHistoryCriteria};
use connectcargo_types::{Error, Result};

use super::BoardSession;

fn missing(id: u32) -> Error {
    Error::NotFound(format!("accepted trip #{}", id))
}

impl BoardSession {
    pub async fn accepted_trips(&self, criteria: &AcceptedCriteria, page: usize) -> Page<AcceptedTrip> {
        let board = self.board.read().await;
        self.page_of(&board.accepted_trips, criteria, &InputOrder, page)
    }

    /// Completed trips, most recent completion first
    pub async fn trip_history(&self, criteria: &TripHistoryCriteria, page: usize) -> Page<AcceptedTrip> {
        let board = self.board.read().await;
        let mut trips: Vec<AcceptedTrip> = board
            .accepted_trips
            .iter()
            .filter(|t| t.status == AcceptedStatus::Completed)
            .cloned()
            .collect();
        trips.sort_by(|a, b| b.completed_on.cmp(&a.completed_on));
        self.page_of(&trips, criteria, &InputOrder, page)
    }

    async fn accepted(&self, id: u32) -> Result<AcceptedTrip> {
        self.board
            .read()
            .await
            .accepted_trips
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| missing(id))
    }

    /// Move a confirmed pending trip onto the accepted list
    pub async fn schedule_trip(&self, id: u32) -> Result<AcceptedTrip> {
        let pending = self
            .board
            .read()
            .await
            .pending_trips
            .iter()
            .find(|t| t.id == id)
            .cloned()
            .ok_or_else(|| Error::NotFound(format!("trip #{}", id)))?;
        AcceptedTrip::from_pending(&pending)?;

        if let Err(e) = self.call(format!("trip:{}", id), "schedule-trip").await {
            self.report_failure(&e, "programar el viaje");
            return Err(e);
        }

        let mut board = self.board.write().await;
        let position = board
            .pending_trips
            .iter()
            .position(|t| t.id == id && t.status == PendingStatus::Confirmed)
            .ok_or_else(|| Error::NotFound(format!("trip #{}", id)))?;
        let scheduled = AcceptedTrip::from_pending(&board.pending_trips.remove(position))?;
        board.accepted_trips.push(scheduled.clone());
        drop(board);

        tracing::info!(trip = id, "trip scheduled");
        self.toasts.success(format!("Viaje #{} programado", id));
        Ok(scheduled)
    }

    /// Check the move on a copy, run the backend call, then apply it
    async fn drive(&self, id: u32, event: DriveEvent, today: NaiveDate, action: &str) -> Result<AcceptedTrip> {
        match self.apply_drive(id, event, today).await {
            Ok(trip) => {
                tracing::info!(trip = id, status = %trip.status, "accepted trip moved");
                Ok(trip)
            }
            Err(e) => {
                self.report_failure(&e, action);
                Err(e)
            }
        }
    }

    async fn apply_drive(&self, id: u32, event: DriveEvent, today: NaiveDate) -> Result<AcceptedTrip> {
        self.accepted(id).await?.apply(event, today)?;
        self.call(format!("accepted-trip:{}", id), "update-trip").await?;

        let mut board = self.board.write().await;
        let trip = board
            .accepted_trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| missing(id))?;
        trip.apply(event, today)?;
        Ok(trip.clone())
    }

    pub async fn start_trip(&self, id: u32, today: NaiveDate) -> Result<AcceptedTrip> {
        let trip = self.drive(id, DriveEvent::Start, today, "iniciar el viaje").await?;
        self.toasts.success(format!("¡Viaje {} iniciado!", trip.label()));
        Ok(trip)
    }

    pub async fn pause_trip(&self, id: u32, today: NaiveDate) -> Result<AcceptedTrip> {
        let trip = self.drive(id, DriveEvent::Pause, today, "pausar el viaje").await?;
        self.toasts
            .warning(format!("Viaje {} pausado temporalmente", trip.label()));
        self.toasts
            .info("Viaje pausado. El cliente ha sido notificado.");
        Ok(trip)
    }

    pub async fn resume_trip(&self, id: u32, today: NaiveDate) -> Result<AcceptedTrip> {
        let trip = self.drive(id, DriveEvent::Resume, today, "reanudar el viaje").await?;
        self.toasts.success(format!("¡Viaje {} reanudado!", trip.label()));
        Ok(trip)
    }

    pub async fn complete_trip(&self, id: u32, today: NaiveDate) -> Result<AcceptedTrip> {
        let trip = self
            .drive(id, DriveEvent::Complete, today, "completar el viaje")
            .await?;
        self.toasts
            .success(format!("¡Viaje {} completado exitosamente!", trip.label()));
        Ok(trip)
    }

    /// Tell support something is holding the trip up
    pub async fn report_issue(
        &self,
        id: u32,
        kind: Option<IssueKind>,
        description: &str,
        delay: EstimatedDelay,
        at: DateTime<Utc>,
    ) -> Result<TripIssue> {
        match self.record_issue(id, kind, description, delay, at).await {
            Ok(issue) => {
                tracing::info!(trip = id, kind = ?issue.kind, "issue reported");
                self.toasts
                    .success("Problema reportado. El soporte se contactará contigo pronto.");
                Ok(issue)
            }
            Err(e @ Error::MissingField(_)) => {
                self.toasts.error("Por favor completa todos los campos");
                Err(e)
            }
            Err(e) => {
                self.report_failure(&e, "reportar el problema");
                Err(e)
            }
        }
    }

    async fn record_issue(
        &self,
        id: u32,
        kind: Option<IssueKind>,
        description: &str,
        delay: EstimatedDelay,
        at: DateTime<Utc>,
    ) -> Result<TripIssue> {
        self.accepted(id).await?.check_issue(kind, description)?;
        self.call(format!("issue:{}", id), "report-issue").await?;

        let mut board = self.board.write().await;
        let trip = board
            .accepted_trips
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| missing(id))?;
        trip.report_issue(kind, description, delay, at).cloned()
    }
}
