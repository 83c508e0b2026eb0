//! Error types for connectcargo

use thiserror::Error;

/// Configuration-related errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration directory not found")]
    NotFound,

    #[error("Invalid configuration value for {key}: {reason}")]
    InvalidValue { key: &'static str, reason: String },
}

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Row {row}: {reason}")]
    InvalidRecord { row: usize, reason: String },

    #[error("Excel export error: {0}")]
    Excel(String),

    #[error("Invalid value for filter '{field}': {value:?}")]
    InvalidFilterValue { field: &'static str, value: String },

    #[error("Unknown sort key: {0}")]
    InvalidSortKey(String),

    #[error("Unknown {kind}: {value}")]
    InvalidEnumValue { kind: &'static str, value: String },

    #[error("{0} not found")]
    NotFound(String),

    #[error("Step {step} has invalid fields: {}", fields.join(", "))]
    StepInvalid { step: usize, fields: Vec<String> },

    #[error("Step {0} does not exist")]
    NoSuchStep(usize),

    #[error("Rating must be between 1 and 5, got {0}")]
    InvalidRating(u8),

    #[error("Amount for {0} must be greater than zero")]
    InvalidAmount(&'static str),

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("No active filters to save")]
    NoActiveFilters,

    #[error("Terms and conditions must be accepted")]
    ConsentRequired,

    #[error("Cannot {event} a trip that is {from}")]
    InvalidTransition { from: String, event: String },

    #[error("Action already in progress: {0}")]
    AlreadyPending(String),

    #[error("Action cancelled: {0}")]
    Cancelled(String),

    #[error("Backend error: {0}")]
    Backend(String),
}

pub type Result<T> = std::result::Result<T, Error>;
