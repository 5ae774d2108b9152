// src/error.rs
use std::fmt;
use std::io;

/// Error types for the price-sim library
#[derive(Debug, Clone)]
pub enum SimError {
    /// A simulation parameter violates its constraint
    InvalidConfiguration { field: String, reason: String },

    /// Ensemble parameters are unusable (zero paths, bad quantiles)
    InvalidEnsemble { field: String, reason: String },

    /// Writing exported data failed
    Output { reason: String },

    /// The operating system could not seed an unseeded generator
    Entropy { reason: String },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::InvalidConfiguration { field, reason } => {
                write!(f, "Invalid configuration for '{}': {}", field, reason)
            }
            SimError::InvalidEnsemble { field, reason } => {
                write!(f, "Invalid ensemble setting '{}': {}", field, reason)
            }
            SimError::Output { reason } => write!(f, "Output error: {}", reason),
            SimError::Entropy { reason } => write!(f, "Entropy source failed: {}", reason),
        }
    }
}

impl std::error::Error for SimError {}

impl From<io::Error> for SimError {
    fn from(err: io::Error) -> Self {
        SimError::Output {
            reason: err.to_string(),
        }
    }
}

impl From<rand::Error> for SimError {
    fn from(err: rand::Error) -> Self {
        SimError::Entropy {
            reason: err.to_string(),
        }
    }
}

/// Result type alias for price-sim operations
pub type SimResult<T> = Result<T, SimError>;

/// Validation utilities
pub mod validation {
    use super::{SimError, SimResult};

    /// Upper bound on simulated days, keeps a single path allocation bounded
    pub const MAX_DAYS: usize = 10_000_000;

    fn invalid(field: &str, reason: String) -> SimError {
        SimError::InvalidConfiguration {
            field: field.to_string(),
            reason,
        }
    }

    /// Validate that a value is finite and not NaN
    pub fn validate_finite(name: &str, value: f64) -> SimResult<()> {
        if !value.is_finite() {
            Err(invalid(
                name,
                format!("must be finite (not NaN or infinite), got {}", value),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is positive
    pub fn validate_positive(name: &str, value: f64) -> SimResult<()> {
        validate_finite(name, value)?;
        if value <= 0.0 {
            Err(invalid(name, format!("must be positive (> 0), got {}", value)))
        } else {
            Ok(())
        }
    }

    /// Validate that a parameter is non-negative
    pub fn validate_non_negative(name: &str, value: f64) -> SimResult<()> {
        validate_finite(name, value)?;
        if value < 0.0 {
            Err(invalid(
                name,
                format!("must be non-negative (≥ 0), got {}", value),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate the number of simulated days
    pub fn validate_days(days: usize) -> SimResult<()> {
        if days == 0 {
            Err(invalid("days", "must be at least 1".to_string()))
        } else if days > MAX_DAYS {
            Err(invalid(
                "days",
                format!("exceeds maximum allowed ({})", MAX_DAYS),
            ))
        } else {
            Ok(())
        }
    }

    /// Validate that the event day lies in `[0, days - 1]`
    pub fn validate_event_day(event_day: usize, days: usize) -> SimResult<()> {
        if event_day >= days {
            Err(invalid(
                "event_day",
                format!("must be in range [0, {}], got {}", days.saturating_sub(1), event_day),
            ))
        } else {
            Ok(())
        }
    }

    /// Event day and impact must be given together
    pub fn validate_event_pair(
        event_day: Option<usize>,
        event_impact: Option<f64>,
    ) -> SimResult<()> {
        match (event_day, event_impact) {
            (Some(_), None) => Err(invalid(
                "event_impact",
                "required when event_day is set".to_string(),
            )),
            (None, Some(_)) => Err(invalid(
                "event_day",
                "required when event_impact is set".to_string(),
            )),
            _ => Ok(()),
        }
    }
}
