//! Accepted trips: a confirmed trip on the road, from pickup to delivery

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use connectcargo_types::{Error, Result};
use serde::{Deserialize, Serialize};

use super::load::CargoType;
use super::trip::{PendingStatus, PendingTrip};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AcceptedStatus {
    /// Waiting for pickup
    Ready,
    Active,
    Paused,
    Completed,
}

/// What the carrier does with a trip underway
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveEvent {
    Start,
    Pause,
    Resume,
    Complete,
}

impl DriveEvent {
    fn verb(&self) -> &'static str {
        match self {
            DriveEvent::Start => "start",
            DriveEvent::Pause => "pause",
            DriveEvent::Resume => "resume",
            DriveEvent::Complete => "complete",
        }
    }
}

impl AcceptedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AcceptedStatus::Ready => "ready",
            AcceptedStatus::Active => "active",
            AcceptedStatus::Paused => "paused",
            AcceptedStatus::Completed => "completed",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            AcceptedStatus::Ready => "Listo para iniciar",
            AcceptedStatus::Active => "En curso",
            AcceptedStatus::Paused => "Pausado",
            AcceptedStatus::Completed => "Completado",
        }
    }

    /// Ready -> Active <-> Paused -> Completed. A paused trip must be resumed
    /// before it can be completed.
    pub fn transition(self, event: DriveEvent) -> Result<Self> {
        use AcceptedStatus::*;
        let next = match (self, event) {
            (Ready, DriveEvent::Start) => Active,
            (Active, DriveEvent::Pause) => Paused,
            (Paused, DriveEvent::Resume) => Active,
            (Active, DriveEvent::Complete) => Completed,
            (from, event) => {
                return Err(Error::InvalidTransition {
                    from: from.as_str().to_string(),
                    event: event.verb().to_string(),
                })
            }
        };
        Ok(next)
    }

    /// On the road, paused or not
    pub fn is_underway(&self) -> bool {
        matches!(self, AcceptedStatus::Active | AcceptedStatus::Paused)
    }
}

impl std::fmt::Display for AcceptedStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AcceptedStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "ready" => Ok(AcceptedStatus::Ready),
            "active" => Ok(AcceptedStatus::Active),
            "paused" => Ok(AcceptedStatus::Paused),
            "completed" => Ok(AcceptedStatus::Completed),
            other => Err(Error::InvalidEnumValue {
                kind: "accepted trip status",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IssueKind {
    Mechanical,
    Traffic,
    Weather,
    Client,
    Other,
}

impl IssueKind {
    pub fn label(&self) -> &'static str {
        match self {
            IssueKind::Mechanical => "Problema mecánico",
            IssueKind::Traffic => "Tráfico",
            IssueKind::Weather => "Clima",
            IssueKind::Client => "Problema con el cliente",
            IssueKind::Other => "Otro",
        }
    }
}

impl FromStr for IssueKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "mechanical" => Ok(IssueKind::Mechanical),
            "traffic" => Ok(IssueKind::Traffic),
            "weather" => Ok(IssueKind::Weather),
            "client" => Ok(IssueKind::Client),
            "other" => Ok(IssueKind::Other),
            other => Err(Error::InvalidEnumValue {
                kind: "issue type",
                value: other.to_string(),
            }),
        }
    }
}

/// Delay the carrier expects from an issue
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EstimatedDelay {
    HalfHour,
    OneHour,
    TwoHours,
    ThreeHoursPlus,
    #[default]
    Unknown,
}

impl EstimatedDelay {
    pub fn label(&self) -> &'static str {
        match self {
            EstimatedDelay::HalfHour => "30 minutos",
            EstimatedDelay::OneHour => "1 hora",
            EstimatedDelay::TwoHours => "2 horas",
            EstimatedDelay::ThreeHoursPlus => "3+ horas",
            EstimatedDelay::Unknown => "No determinado",
        }
    }
}

impl FromStr for EstimatedDelay {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "30min" => Ok(EstimatedDelay::HalfHour),
            "1h" => Ok(EstimatedDelay::OneHour),
            "2h" => Ok(EstimatedDelay::TwoHours),
            "3h" => Ok(EstimatedDelay::ThreeHoursPlus),
            "" | "unknown" => Ok(EstimatedDelay::Unknown),
            other => Err(Error::InvalidEnumValue {
                kind: "estimated delay",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TripIssue {
    pub kind: IssueKind,
    pub description: String,
    pub delay: EstimatedDelay,
    pub reported_at: DateTime<Utc>,
}

/// A carrier's confirmed trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AcceptedTrip {
    pub id: u32,
    pub origin: String,
    pub destination: String,
    pub cargo_type: CargoType,
    pub price: u64,
    /// Shipper name; empty when unknown
    #[serde(default)]
    pub client: String,
    pub status: AcceptedStatus,
    #[serde(default)]
    pub issues: Vec<TripIssue>,
    #[serde(default)]
    pub completed_on: Option<NaiveDate>,
    /// Stars the client gave the carrier
    #[serde(default)]
    pub rating: Option<u8>,
}

impl AcceptedTrip {
    /// Schedule a confirmed pending trip. It keeps its id.
    pub fn from_pending(trip: &PendingTrip) -> Result<Self> {
        if trip.status != PendingStatus::Confirmed {
            return Err(Error::InvalidTransition {
                from: trip.status.as_str().to_string(),
                event: "schedule".to_string(),
            });
        }
        Ok(Self {
            id: trip.id,
            origin: trip.origin.clone(),
            destination: trip.destination.clone(),
            cargo_type: trip.cargo_type,
            price: trip.price,
            client: trip.client.clone(),
            status: AcceptedStatus::Ready,
            issues: Vec::new(),
            completed_on: None,
            rating: None,
        })
    }

    pub fn label(&self) -> String {
        format!("#{}", self.id)
    }

    /// Move the trip along; completing stamps `today`
    pub fn apply(&mut self, event: DriveEvent, today: NaiveDate) -> Result<()> {
        self.status = self.status.transition(event)?;
        if self.status == AcceptedStatus::Completed {
            self.completed_on = Some(today);
        }
        Ok(())
    }

    /// Check an issue report without recording it
    pub fn check_issue(&self, kind: Option<IssueKind>, description: &str) -> Result<IssueKind> {
        let kind = kind.ok_or(Error::MissingField("issue type"))?;
        if description.trim().is_empty() {
            return Err(Error::MissingField("description"));
        }
        if !self.status.is_underway() {
            return Err(Error::InvalidTransition {
                from: self.status.as_str().to_string(),
                event: "report an issue on".to_string(),
            });
        }
        Ok(kind)
    }

    pub fn report_issue(
        &mut self,
        kind: Option<IssueKind>,
        description: &str,
        delay: EstimatedDelay,
        reported_at: DateTime<Utc>,
    ) -> Result<&TripIssue> {
        let kind = self.check_issue(kind, description)?;
        self.issues.push(TripIssue {
            kind,
            description: description.trim().to_string(),
            delay,
            reported_at,
        });
        Ok(&self.issues[self.issues.len() - 1])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn confirmed() -> PendingTrip {
        PendingTrip {
            id: 3,
            origin: "Barranquilla".to_string(),
            destination: "Santa Marta".to_string(),
            status: PendingStatus::Confirmed,
            date: "week".to_string(),
            cargo_type: CargoType::Fragile,
            price_band: "low".to_string(),
            price: 380_000,
            counter_offer: None,
            client: "Cerámicas del Caribe".to_string(),
        }
    }

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 12, d).unwrap()
    }

    #[test]
    fn test_only_confirmed_trips_are_scheduled() {
        let trip = AcceptedTrip::from_pending(&confirmed()).unwrap();
        assert_eq!(trip.status, AcceptedStatus::Ready);
        assert_eq!(trip.client, "Cerámicas del Caribe");

        let mut pending = confirmed();
        pending.status = PendingStatus::Negotiation;
        let err = AcceptedTrip::from_pending(&pending).unwrap_err();
        assert_eq!(err.to_string(), "Cannot schedule a trip that is negotiation");
    }

    #[test]
    fn test_pause_and_resume_then_complete() {
        let mut trip = AcceptedTrip::from_pending(&confirmed()).unwrap();
        trip.apply(DriveEvent::Start, day(14)).unwrap();
        trip.apply(DriveEvent::Pause, day(14)).unwrap();
        assert!(trip.apply(DriveEvent::Complete, day(14)).is_err());
        trip.apply(DriveEvent::Resume, day(15)).unwrap();
        trip.apply(DriveEvent::Complete, day(15)).unwrap();

        assert_eq!(trip.status, AcceptedStatus::Completed);
        assert_eq!(trip.completed_on, Some(day(15)));
    }

    #[test]
    fn test_illegal_moves() {
        assert!(AcceptedStatus::Ready.transition(DriveEvent::Pause).is_err());
        assert!(AcceptedStatus::Active.transition(DriveEvent::Resume).is_err());
        assert!(AcceptedStatus::Completed.transition(DriveEvent::Start).is_err());
    }

    #[test]
    fn test_issue_report_needs_both_fields() {
        let at = Utc.with_ymd_and_hms(2024, 12, 14, 15, 0, 0).unwrap();
        let mut trip = AcceptedTrip::from_pending(&confirmed()).unwrap();
        trip.apply(DriveEvent::Start, day(14)).unwrap();

        assert!(matches!(
            trip.report_issue(None, "Llanta pinchada", EstimatedDelay::OneHour, at),
            Err(Error::MissingField("issue type"))
        ));
        assert!(matches!(
            trip.report_issue(Some(IssueKind::Mechanical), "  ", EstimatedDelay::OneHour, at),
            Err(Error::MissingField("description"))
        ));

        let issue = trip
            .report_issue(Some(IssueKind::Mechanical), " Llanta pinchada ", EstimatedDelay::OneHour, at)
            .unwrap();
        assert_eq!(issue.description, "Llanta pinchada");
        assert_eq!(trip.issues.len(), 1);
    }

    #[test]
    fn test_no_issues_before_start() {
        let at = Utc.with_ymd_and_hms(2024, 12, 14, 15, 0, 0).unwrap();
        let mut trip = AcceptedTrip::from_pending(&confirmed()).unwrap();
        assert!(matches!(
            trip.report_issue(Some(IssueKind::Traffic), "Trancón", EstimatedDelay::Unknown, at),
            Err(Error::InvalidTransition { .. })
        ));
    }

    #[test]
    fn test_delay_codes() {
        assert_eq!("30min".parse::<EstimatedDelay>().unwrap(), EstimatedDelay::HalfHour);
        assert_eq!("3h".parse::<EstimatedDelay>().unwrap().label(), "3+ horas");
        assert_eq!("".parse::<EstimatedDelay>().unwrap(), EstimatedDelay::Unknown);
        assert!("4h".parse::<EstimatedDelay>().is_err());
    }
}
