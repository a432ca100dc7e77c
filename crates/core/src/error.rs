//! Error and warning types for plume computations

use std::fmt;

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, PlumeError>;

/// Errors that stop a computation before any grid evaluation
#[derive(Debug, Clone, PartialEq)]
pub enum PlumeError {
    /// A caller-supplied value is outside its physical or geometric domain
    InvalidInput {
        parameter: &'static str,
        value: f64,
        reason: &'static str,
    },
    /// A configuration value cannot produce a usable grid or extraction
    InvalidConfig {
        parameter: &'static str,
        reason: String,
    },
}

impl PlumeError {
    pub(crate) fn invalid_input(parameter: &'static str, value: f64, reason: &'static str) -> Self {
        PlumeError::InvalidInput {
            parameter,
            value,
            reason,
        }
    }

    pub(crate) fn invalid_config(parameter: &'static str, reason: impl Into<String>) -> Self {
        PlumeError::InvalidConfig {
            parameter,
            reason: reason.into(),
        }
    }

    /// Name of the offending parameter
    pub fn parameter(&self) -> &'static str {
        match self {
            PlumeError::InvalidInput { parameter, .. } | PlumeError::InvalidConfig { parameter, .. } => {
                parameter
            }
        }
    }
}

impl fmt::Display for PlumeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlumeError::InvalidInput {
                parameter,
                value,
                reason,
            } => write!(f, "Invalid input {parameter} = {value}: {reason}"),
            PlumeError::InvalidConfig { parameter, reason } => {
                write!(f, "Invalid configuration {parameter}: {reason}")
            }
        }
    }
}

impl std::error::Error for PlumeError {}

/// Non-fatal conditions reported alongside a result
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PlumeWarning {
    /// Field maximum is zero or non-finite; the point set is empty
    DegenerateField { peak: f64 },
    /// Origin is close enough to a pole that the longitude conversion loses precision
    ProjectionLimit { latitude: f64 },
}

impl fmt::Display for PlumeWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlumeWarning::DegenerateField { peak } => {
                write!(f, "Degenerate field (peak concentration {peak:e}), no heat points")
            }
            PlumeWarning::ProjectionLimit { latitude } => write!(
                f,
                "Origin latitude {latitude:.3}° is near a pole; longitude offsets are imprecise"
            ),
        }
    }
}
