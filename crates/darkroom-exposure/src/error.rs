//! Error types for the exposure models.

use darkroom_core::{DarkroomError, ScaleKind};
use thiserror::Error;

/// Contract violations raised by the exposure models.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ExposureError {
    /// A scale-membership or parse failure from the core tables.
    #[error(transparent)]
    Core(#[from] DarkroomError),

    /// A quantity that must be strictly positive and finite was not.
    #[error("{name} must be positive, got {value}")]
    NonPositive { name: &'static str, value: f64 },

    /// Development temperature outside the supported range.
    #[error("temperature {value}°C is outside {min}-{max}°C")]
    TemperatureOutOfRange { value: f64, min: f64, max: f64 },

    /// Attempt to set the member of the exposure pair that the mode derives.
    #[error("{0} is derived in the current priority mode")]
    DerivedMember(ScaleKind),

    /// Malformed dilution input.
    #[error("invalid dilution: {0}")]
    InvalidDilution(String),

    /// Non-finite EV handed to the resolver.
    #[error("exposure value must be finite, got {0}")]
    NonFiniteEv(f64),
}

/// Result type alias for exposure operations.
pub type ExposureResult<T> = std::result::Result<T, ExposureError>;

/// Reject zero, negative and non-finite values.
pub(crate) fn require_positive(name: &'static str, value: f64) -> ExposureResult<f64> {
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(ExposureError::NonPositive { name, value })
    }
}
