//! Error types for Darkroom.

use crate::scale::ScaleKind;
use thiserror::Error;

/// Main error type for core operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DarkroomError {
    #[error("{value} is not a standard {kind} value")]
    NotInScale { kind: ScaleKind, value: f64 },

    #[error("Invalid frame: {0}")]
    InvalidFrame(String),

    #[error("Parse error: {0}")]
    Parse(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, DarkroomError>;
