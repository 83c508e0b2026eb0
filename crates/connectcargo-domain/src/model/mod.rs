//! Domain model types

pub mod accepted;
pub mod board;
pub mod driver;
pub mod load;
pub mod notification;
pub mod trip;

pub use accepted::{AcceptedStatus, AcceptedTrip, DriveEvent, EstimatedDelay, IssueKind, TripIssue};
pub use board::Board;
pub use driver::{Driver, DriverSummary};
pub use load::{CargoType, Load, Place, PriceType, Urgency};
pub use notification::{Notification, NotificationCategory, NotificationKind};
pub use trip::{
    price_band, CargoSummary, CompletedLoad, CompletedRoute, CompletionDay, PendingStatus,
    PendingTrip, Priority, PublishedLoad, Stop, TripEvent, TripStatus, UserRating,
};
