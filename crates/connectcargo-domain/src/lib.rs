//! ConnectCargo domain layer
//!
//! Record types, the board query engine, the publish wizard, the toast queue
//! and the persistence traits implemented by the infra crate.

pub mod model;
pub mod notifier;
pub mod query;
pub mod repository;
pub mod service;
pub mod wizard;
