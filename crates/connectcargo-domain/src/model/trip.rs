//! Trips: published loads on the company side, pending and completed trips

use std::str::FromStr;

use connectcargo_types::{Error, Result};
use serde::{Deserialize, Serialize};

use super::driver::DriverSummary;
use super::load::{CargoType, Load, Place};

/// Lifecycle of a published load
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Pending,
    Quotes,
    Assigned,
    InProgress,
    Completed,
    Cancelled,
}

/// Events that move a trip through its lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TripEvent {
    ReceiveQuote,
    Assign,
    Start,
    Complete,
    Cancel,
}

impl TripEvent {
    fn verb(&self) -> &'static str {
        match self {
            TripEvent::ReceiveQuote => "quote",
            TripEvent::Assign => "assign",
            TripEvent::Start => "start",
            TripEvent::Complete => "complete",
            TripEvent::Cancel => "cancel",
        }
    }
}

impl TripStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TripStatus::Pending => "pending",
            TripStatus::Quotes => "quotes",
            TripStatus::Assigned => "assigned",
            TripStatus::InProgress => "in_progress",
            TripStatus::Completed => "completed",
            TripStatus::Cancelled => "cancelled",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Pending => "Pendiente",
            TripStatus::Quotes => "Con cotizaciones",
            TripStatus::Assigned => "Asignado",
            TripStatus::InProgress => "En tránsito",
            TripStatus::Completed => "Completado",
            TripStatus::Cancelled => "Cancelado",
        }
    }

    /// Whether the trip still needs attention
    pub fn is_active(&self) -> bool {
        !matches!(self, TripStatus::Completed | TripStatus::Cancelled)
    }

    /// Apply an event, returning the next status
    pub fn transition(self, event: TripEvent) -> Result<TripStatus> {
        use TripEvent::*;
        use TripStatus::*;

        let next = match (self, event) {
            (Pending | Quotes, ReceiveQuote) => Some(Quotes),
            (Pending | Quotes, Assign) => Some(Assigned),
            (Assigned, Start) => Some(InProgress),
            (InProgress, Complete) => Some(Completed),
            (Pending | Quotes | Assigned, Cancel) => Some(Cancelled),
            _ => None,
        };

        next.ok_or_else(|| Error::InvalidTransition {
            from: self.as_str().to_string(),
            event: event.verb().to_string(),
        })
    }
}

impl FromStr for TripStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pending" => Ok(TripStatus::Pending),
            "quotes" => Ok(TripStatus::Quotes),
            "assigned" => Ok(TripStatus::Assigned),
            "in_progress" => Ok(TripStatus::InProgress),
            "completed" => Ok(TripStatus::Completed),
            "cancelled" => Ok(TripStatus::Cancelled),
            other => Err(Error::InvalidEnumValue {
                kind: "trip status",
                value: other.to_string(),
            }),
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    High,
    Normal,
}

/// Place with a scheduled date label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stop {
    #[serde(flatten)]
    pub place: Place,
    pub date: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CargoSummary {
    pub cargo_type: String,
    pub weight: String,
    pub vehicle: String,
}

/// A load published by a company
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublishedLoad {
    pub id: u32,
    pub reference: String,
    pub status: TripStatus,
    pub priority: Priority,
    pub origin: Stop,
    pub destination: Stop,
    pub cargo: CargoSummary,
    /// COP
    pub budget: u64,
    pub published: String,
    #[serde(default)]
    pub quotes: u32,
    #[serde(default)]
    pub best_quote: Option<u64>,
    #[serde(default)]
    pub driver: Option<DriverSummary>,
}

impl PublishedLoad {
    /// Move the load through its lifecycle, keeping assignment data consistent
    pub fn apply(&mut self, event: TripEvent, driver: Option<DriverSummary>) -> Result<()> {
        let next = self.status.transition(event)?;
        match event {
            TripEvent::ReceiveQuote => self.quotes += 1,
            TripEvent::Assign => {
                self.driver = Some(driver.ok_or_else(|| {
                    Error::NotFound(format!("driver for {}", self.reference))
                })?)
            }
            TripEvent::Cancel => self.driver = None,
            _ => {}
        }
        self.status = next;
        Ok(())
    }
}

/// Day a trip was completed, as shown on the list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CompletionDay {
    Today,
    Yesterday,
    Earlier(String),
}

impl CompletionDay {
    pub fn label(&self) -> &str {
        match self {
            CompletionDay::Today => "Hoy",
            CompletionDay::Yesterday => "Ayer",
            CompletionDay::Earlier(label) => label,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserRating {
    /// 1.0 - 5.0
    pub value: f64,
    #[serde(default)]
    pub review: String,
    #[serde(default)]
    pub tags: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedRoute {
    pub origin: String,
    pub destination: String,
    pub distance_km: u32,
    /// COP
    pub price: u64,
}

/// A delivered load awaiting (or holding) the company's rating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletedLoad {
    pub id: u32,
    pub reference: String,
    pub completed: CompletionDay,
    pub duration: String,
    pub driver: DriverSummary,
    pub route: CompletedRoute,
    #[serde(default)]
    pub user_rating: Option<UserRating>,
    #[serde(default)]
    pub delay: Option<String>,
    #[serde(default)]
    pub documents: Vec<String>,
}

/// Carrier-side state of an offered trip
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PendingStatus {
    Pending,
    Confirmed,
    Negotiation,
}

impl PendingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PendingStatus::Pending => "pending",
            PendingStatus::Confirmed => "confirmed",
            PendingStatus::Negotiation => "negotiation",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PendingStatus::Pending => "Pendiente",
            PendingStatus::Confirmed => "Confirmado",
            PendingStatus::Negotiation => "En Negociación",
        }
    }
}

impl std::fmt::Display for PendingStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PendingStatus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "pending" => Ok(PendingStatus::Pending),
            "confirmed" => Ok(PendingStatus::Confirmed),
            "negotiation" => Ok(PendingStatus::Negotiation),
            other => Err(Error::InvalidEnumValue {
                kind: "pending trip status",
                value: other.to_string(),
            }),
        }
    }
}

/// Trip offered to a carrier, waiting for confirmation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingTrip {
    pub id: u32,
    pub origin: String,
    pub destination: String,
    pub status: PendingStatus,
    /// Date band: today, tomorrow, week
    pub date: String,
    pub cargo_type: CargoType,
    /// Price band: low, medium, high
    pub price_band: String,
    pub price: u64,
    #[serde(default)]
    pub counter_offer: Option<u64>,
    /// Shipper name; empty when unknown
    #[serde(default)]
    pub client: String,
}

/// Price band used by the pending trips filter
pub fn price_band(price: u64) -> &'static str {
    match price {
        0..=499_999 => "low",
        500_000..=999_999 => "medium",
        _ => "high",
    }
}

impl PendingTrip {
    /// Trip created when a carrier accepts a board load
    pub fn from_accepted(load: &Load, id: u32) -> Self {
        Self {
            id,
            origin: load.origin.city.clone(),
            destination: load.destination.city.clone(),
            status: PendingStatus::Confirmed,
            date: "today".to_string(),
            cargo_type: load.cargo_type,
            price_band: price_band(load.price).to_string(),
            price: load.price,
            counter_offer: None,
            client: String::new(),
        }
    }

    fn require(&self, allowed: &[PendingStatus], event: &str) -> Result<()> {
        if allowed.contains(&self.status) {
            Ok(())
        } else {
            Err(Error::InvalidTransition {
                from: self.status.as_str().to_string(),
                event: event.to_string(),
            })
        }
    }

    /// Accept the offer as it stands
    pub fn confirm(&mut self) -> Result<()> {
        self.require(&[PendingStatus::Pending], "confirm")?;
        self.status = PendingStatus::Confirmed;
        Ok(())
    }

    /// Send or modify a counter offer
    pub fn negotiate(&mut self, counter_offer: u64) -> Result<()> {
        if counter_offer == 0 {
            return Err(Error::InvalidAmount("counter offer"));
        }
        self.require(&[PendingStatus::Pending, PendingStatus::Negotiation], "negotiate")?;
        self.status = PendingStatus::Negotiation;
        self.counter_offer = Some(counter_offer);
        Ok(())
    }

    /// Close the negotiation at the counter offer
    pub fn accept_counter(&mut self) -> Result<()> {
        self.require(&[PendingStatus::Negotiation], "accept the counter offer of")?;
        if let Some(counter) = self.counter_offer {
            self.price = counter;
            self.price_band = price_band(counter).to_string();
        }
        self.status = PendingStatus::Confirmed;
        Ok(())
    }

    /// Whether the trip can still be turned down
    pub fn check_reject(&self) -> Result<()> {
        self.require(&[PendingStatus::Pending], "reject")
    }

    pub fn check_cancel_negotiation(&self) -> Result<()> {
        self.require(&[PendingStatus::Negotiation], "cancel the negotiation of")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_happy_path_lifecycle() {
        let status = TripStatus::Pending
            .transition(TripEvent::ReceiveQuote)
            .and_then(|s| s.transition(TripEvent::Assign))
            .and_then(|s| s.transition(TripEvent::Start))
            .and_then(|s| s.transition(TripEvent::Complete))
            .unwrap();
        assert_eq!(status, TripStatus::Completed);
        assert!(!status.is_active());
    }

    #[test]
    fn test_cannot_cancel_in_progress() {
        let err = TripStatus::InProgress.transition(TripEvent::Cancel).unwrap_err();
        assert!(matches!(err, Error::InvalidTransition { .. }));
        assert_eq!(err.to_string(), "Cannot cancel a trip that is in_progress");
    }

    #[test]
    fn test_cannot_start_unassigned() {
        assert!(TripStatus::Quotes.transition(TripEvent::Start).is_err());
        assert!(TripStatus::Completed.transition(TripEvent::ReceiveQuote).is_err());
    }

    #[test]
    fn test_price_bands() {
        assert_eq!(price_band(450_000), "low");
        assert_eq!(price_band(850_000), "medium");
        assert_eq!(price_band(1_200_000), "high");
    }

    #[test]
    fn test_negotiation_then_confirm() {
        let mut trip = PendingTrip {
            id: 1,
            origin: "Cali".to_string(),
            destination: "Pereira".to_string(),
            status: PendingStatus::Pending,
            date: "tomorrow".to_string(),
            cargo_type: CargoType::Refrigerated,
            price_band: "medium".to_string(),
            price: 620_000,
            counter_offer: None,
            client: String::new(),
        };
        trip.negotiate(680_000).unwrap();
        assert_eq!(trip.status, PendingStatus::Negotiation);
        assert_eq!(trip.counter_offer, Some(680_000));
        assert!(trip.confirm().is_err());
        assert!(trip.check_reject().is_err());

        trip.accept_counter().unwrap();
        assert_eq!(trip.status, PendingStatus::Confirmed);
        assert_eq!(trip.price, 680_000);
        assert!(trip.negotiate(700_000).is_err());
    }

    #[test]
    fn test_zero_counter_offer_rejected() {
        let mut trip = PendingTrip::from_accepted(
            &Load {
                id: 9,
                origin: Place::new("Cali", ""),
                destination: Place::new("Pereira", ""),
                weight_kg: 800,
                volume_m3: 8.0,
                cargo_type: CargoType::General,
                pickup_time: String::new(),
                delivery_time: String::new(),
                price: 620_000,
                price_type: crate::model::PriceType::Fixed,
                distance_km: 8,
                urgency: crate::model::Urgency::Low,
                matches_route: false,
                is_new: true,
                is_express: false,
            },
            1,
        );
        trip.status = PendingStatus::Pending;
        assert!(matches!(trip.negotiate(0), Err(Error::InvalidAmount(_))));
        assert_eq!(trip.status, PendingStatus::Pending);
        assert_eq!(trip.price_band, "medium");
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in [TripStatus::Pending, TripStatus::InProgress, TripStatus::Cancelled] {
            assert_eq!(status.as_str().parse::<TripStatus>().unwrap(), status);
        }
    }
}
