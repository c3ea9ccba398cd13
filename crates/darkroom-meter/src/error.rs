//! Error types for the meter.

use darkroom_core::DarkroomError;
use darkroom_exposure::ExposureError;
use thiserror::Error;

/// Errors raised by a metering session.
#[derive(Debug, Error)]
pub enum MeterError {
    /// The frame source can no longer deliver frames. Ends the session.
    #[error("Frame source unavailable: {0}")]
    SourceUnavailable(String),

    /// A single frame could not be analysed. The session continues.
    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Calibration offset {0} must be within ±5 EV in 0.5 steps")]
    CalibrationOutOfRange(f64),

    #[error("Invalid meter configuration: {0}")]
    Config(String),

    #[error("Meter task failed: {0}")]
    Task(String),

    #[error(transparent)]
    Core(#[from] DarkroomError),

    #[error(transparent)]
    Exposure(#[from] ExposureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MeterError {
    /// Whether the error ends the session rather than just the current tick.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::SourceUnavailable(_) | Self::Task(_))
    }
}

/// Result type alias for meter operations.
pub type MeterResult<T> = std::result::Result<T, MeterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fatality() {
        assert!(MeterError::SourceUnavailable("denied".into()).is_fatal());
        assert!(!MeterError::InvalidFrame("short".into()).is_fatal());
        assert!(!MeterError::Core(DarkroomError::InvalidFrame("x".into())).is_fatal());
    }
}
