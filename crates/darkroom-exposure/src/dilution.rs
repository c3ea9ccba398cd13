//! Split a working-solution volume into concentrate and water.

use crate::error::{ExposureError, ExposureResult};
use serde::{Deserialize, Serialize};

/// Total volume and ratio (parts water per one part concentrate).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DilutionRequest {
    pub total_volume: f64,
    pub ratio: f64,
}

/// Resulting volumes, in the unit of the request.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dilution {
    pub concentrate: f64,
    pub water: f64,
}

impl DilutionRequest {
    pub fn new(total_volume: f64, ratio: f64) -> Self {
        Self {
            total_volume,
            ratio,
        }
    }

    /// `unit = total / (1 + ratio)`; concentrate is one unit, water `ratio` units.
    pub fn compute(&self) -> ExposureResult<Dilution> {
        if !self.total_volume.is_finite() || self.total_volume < 0.0 {
            return Err(ExposureError::InvalidDilution(format!(
                "total volume must be non-negative, got {}",
                self.total_volume
            )));
        }
        if !self.ratio.is_finite() || self.ratio < 0.0 {
            return Err(ExposureError::InvalidDilution(format!(
                "ratio must be non-negative, got {}",
                self.ratio
            )));
        }
        let unit = self.total_volume / (1.0 + self.ratio);
        Ok(Dilution {
            concentrate: unit,
            water: unit * self.ratio,
        })
    }
}

/// Parse `1+25`, `1:25` or bare `25` into parts water per part concentrate.
pub fn parse_ratio(text: &str) -> ExposureResult<f64> {
    let invalid = || ExposureError::InvalidDilution(format!("unrecognised ratio '{}'", text));
    let parse = |s: &str| s.trim().parse::<f64>().map_err(|_| invalid());

    let trimmed = text.trim();
    let ratio = match trimmed.split_once(['+', ':']) {
        Some((concentrate, water)) => {
            let concentrate = parse(concentrate)?;
            if concentrate <= 0.0 {
                return Err(invalid());
            }
            parse(water)? / concentrate
        }
        None => parse(trimmed)?,
    };

    if ratio.is_finite() && ratio >= 0.0 {
        Ok(ratio)
    } else {
        Err(invalid())
    }
}
