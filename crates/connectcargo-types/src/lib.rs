//! Core types for the ConnectCargo board engine

mod error;

pub use error::*;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Output format for results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Message severity shared by toasts and CLI status lines
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Success,
    Error,
    Warning,
    Info,
}

impl Severity {
    /// Fixed display color (hex)
    pub fn color(&self) -> &'static str {
        match self {
            Severity::Success => "#10B981",
            Severity::Error => "#EF4444",
            Severity::Warning => "#F59E0B",
            Severity::Info => "#3B82F6",
        }
    }

    /// Icon name
    pub fn icon(&self) -> &'static str {
        match self {
            Severity::Success => "check",
            Severity::Error => "exclamation-triangle",
            Severity::Warning => "exclamation-circle",
            Severity::Info => "info-circle",
        }
    }

    /// Queue priority, higher is shown first
    pub fn priority(&self) -> u8 {
        match self {
            Severity::Error => 3,
            Severity::Warning => 2,
            Severity::Success => 1,
            Severity::Info => 0,
        }
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Success => write!(f, "success"),
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_priority_order() {
        assert!(Severity::Error.priority() > Severity::Warning.priority());
        assert!(Severity::Warning.priority() > Severity::Success.priority());
        assert!(Severity::Success.priority() > Severity::Info.priority());
    }

    #[test]
    fn test_step_invalid_message_lists_fields() {
        let err = Error::StepInvalid {
            step: 2,
            fields: vec!["cargoType".to_string(), "totalWeight".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Step 2 has invalid fields: cargoType, totalWeight"
        );
    }
}
