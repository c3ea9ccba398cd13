//! Meter session configuration.
//!
//! Loaded from JSON; every field is optional and falls back to its default.

use crate::error::{MeterError, MeterResult};
use darkroom_core::metering::{DOWNSAMPLE_FACTOR, SPOT_RADIUS_FRACTION};
use darkroom_core::parse_shutter;
use darkroom_exposure::{ExposureSettings, PriorityMode};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// Largest accepted native-to-working divisor.
pub const MAX_DOWNSAMPLE: u32 = 64;

/// Tunables for a metering session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeterConfig {
    /// Target tick rate in Hz.
    pub tick_hz: f64,
    /// Native-to-working resolution divisor.
    pub downsample: u32,
    /// Spot radius as a fraction of the shorter working dimension.
    pub spot_radius_fraction: f32,
    /// Start with the zone overlay enabled.
    pub zone_overlay: bool,
    pub iso: f64,
    pub priority: PriorityMode,
    pub aperture: f64,
    /// Shutter speed as written on the dial, e.g. `"1/125"` or `"2\""`.
    pub shutter: String,
}

impl Default for MeterConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60.0,
            downsample: DOWNSAMPLE_FACTOR,
            spot_radius_fraction: SPOT_RADIUS_FRACTION,
            zone_overlay: false,
            iso: 400.0,
            priority: PriorityMode::ApertureFixed,
            aperture: 2.8,
            shutter: "1/125".to_string(),
        }
    }
}

impl MeterConfig {
    /// Parse from JSON bytes and validate.
    pub fn from_json(data: &[u8]) -> MeterResult<Self> {
        let config: Self = serde_json::from_slice(data)
            .map_err(|e| MeterError::Config(format!("Invalid JSON: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a JSON config file.
    pub fn load_from_file(path: &Path) -> MeterResult<Self> {
        let data = std::fs::read(path)?;
        Self::from_json(&data)
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> MeterResult<Vec<u8>> {
        serde_json::to_vec_pretty(self)
            .map_err(|e| MeterError::Config(format!("Failed to serialize config: {}", e)))
    }

    /// Reject values the session cannot run with.
    pub fn validate(&self) -> MeterResult<()> {
        if !self.tick_hz.is_finite() || self.tick_hz <= 0.0 {
            return Err(MeterError::Config(format!(
                "tick_hz must be positive, got {}",
                self.tick_hz
            )));
        }
        if !(1..=MAX_DOWNSAMPLE).contains(&self.downsample) {
            return Err(MeterError::Config(format!(
                "downsample must be in 1..={}, got {}",
                MAX_DOWNSAMPLE, self.downsample
            )));
        }
        if !(self.spot_radius_fraction > 0.0 && self.spot_radius_fraction <= 0.5) {
            return Err(MeterError::Config(format!(
                "spot_radius_fraction must be in (0, 0.5], got {}",
                self.spot_radius_fraction
            )));
        }
        self.initial_settings()?;
        Ok(())
    }

    /// Exposure settings described by this config.
    pub fn initial_settings(&self) -> MeterResult<ExposureSettings> {
        let shutter = parse_shutter(&self.shutter)?;
        Ok(ExposureSettings::new(
            self.iso,
            self.priority,
            self.aperture,
            shutter,
        )?)
    }

    /// Wall-clock period between ticks.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.tick_hz)
    }
}
