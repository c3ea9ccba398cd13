//! Temperature-compensated development timing.
//!
//! Developer activity rises with temperature; each degree above the
//! reference shortens the step by a factor of 0.91. Stop, fix and wash
//! are timed independently of temperature.

use crate::error::{ExposureError, ExposureResult};
use serde::{Deserialize, Serialize};

/// Per-degree multiplier applied to developer steps.
pub const FACTOR_PER_DEGREE: f64 = 0.91;

/// Developer steps are never compensated below this many seconds.
pub const MIN_DEVELOPER_SECONDS: u32 = 30;

/// Supported process temperature range, °C (inclusive).
pub const MIN_TEMPERATURE: f64 = 10.0;
pub const MAX_TEMPERATURE: f64 = 50.0;

/// Conventional reference temperature for published times.
pub const STANDARD_TEMPERATURE: f64 = 20.0;

fn require_temperature(value: f64) -> ExposureResult<f64> {
    if (MIN_TEMPERATURE..=MAX_TEMPERATURE).contains(&value) {
        Ok(value)
    } else {
        Err(ExposureError::TemperatureOutOfRange {
            value,
            min: MIN_TEMPERATURE,
            max: MAX_TEMPERATURE,
        })
    }
}

/// Scale a developer duration for the actual bath temperature.
///
/// `max(30, round(base × 0.91^(actual − reference)))`
pub fn compensate(base_seconds: u32, reference_temp: f64, actual_temp: f64) -> ExposureResult<u32> {
    let actual = require_temperature(actual_temp)?;
    let reference = require_temperature(reference_temp)?;
    let factor = FACTOR_PER_DEGREE.powf(actual - reference);
    let adjusted = (base_seconds as f64 * factor).round() as u32;
    Ok(adjusted.max(MIN_DEVELOPER_SECONDS))
}

/// Whether a step's timing depends on temperature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StepCategory {
    Developer,
    Other,
}

/// One step of a development process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DevelopmentStep {
    pub name: String,
    pub category: StepCategory,
    /// Duration at `reference_temp`, seconds.
    pub base_seconds: u32,
    /// °C
    pub reference_temp: f64,
}

impl DevelopmentStep {
    pub fn new(
        name: impl Into<String>,
        category: StepCategory,
        base_seconds: u32,
        reference_temp: f64,
    ) -> Self {
        Self {
            name: name.into(),
            category,
            base_seconds,
            reference_temp,
        }
    }

    /// Duration at `actual_temp`. Only developer steps are scaled.
    pub fn adjusted_seconds(&self, actual_temp: f64) -> ExposureResult<u32> {
        match self.category {
            StepCategory::Developer => {
                compensate(self.base_seconds, self.reference_temp, actual_temp)
            }
            StepCategory::Other => {
                require_temperature(actual_temp)?;
                Ok(self.base_seconds)
            }
        }
    }
}

/// An ordered sequence of process steps.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProcessTimetable {
    pub steps: Vec<DevelopmentStep>,
}

impl ProcessTimetable {
    pub fn new(steps: Vec<DevelopmentStep>) -> Self {
        Self { steps }
    }

    /// Develop, stop, fix, wash at 20 °C with the given developer time.
    pub fn black_and_white(developer_seconds: u32) -> Self {
        let t = STANDARD_TEMPERATURE;
        Self::new(vec![
            DevelopmentStep::new("Develop", StepCategory::Developer, developer_seconds, t),
            DevelopmentStep::new("Stop", StepCategory::Other, 60, t),
            DevelopmentStep::new("Fix", StepCategory::Other, 300, t),
            DevelopmentStep::new("Wash", StepCategory::Other, 600, t),
        ])
    }

    /// Every step's name and adjusted duration, in order.
    pub fn compensated(&self, actual_temp: f64) -> ExposureResult<Vec<(String, u32)>> {
        self.steps
            .iter()
            .map(|step| Ok((step.name.clone(), step.adjusted_seconds(actual_temp)?)))
            .collect()
    }

    /// Total process time at `actual_temp`, seconds.
    pub fn total_seconds(&self, actual_temp: f64) -> ExposureResult<u32> {
        Ok(self
            .compensated(actual_temp)?
            .iter()
            .map(|(_, secs)| secs)
            .sum())
    }
}

/// Format seconds as `M:SS`.
pub fn format_duration(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}
