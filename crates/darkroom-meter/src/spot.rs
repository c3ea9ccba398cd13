//! Spot meter: mean luma inside a centred disc, mapped to a smoothed EV.
//!
//! The model is deliberately simple: mid-grey (luma 128) reads as EV 12,
//! and every 30 luma units is one stop. It is an approximation, not a
//! calibrated instrument; the user corrects it with a calibration offset.

use crate::error::{MeterError, MeterResult};
use darkroom_core::metering::{
    BASELINE_EV, CALIBRATION_MAX, CALIBRATION_MIN, CALIBRATION_STEP, LUMA_PER_STOP, NEUTRAL_LUMA,
    SMOOTHING_RETAIN, SPOT_RADIUS_FRACTION,
};
use darkroom_core::{FrameBuffer, SpotRegion};
use serde::{Deserialize, Serialize};

/// Mean luma of the pixels inside `region`.
///
/// Falls back to neutral grey when the region covers no pixels.
pub fn average_luma(buffer: &FrameBuffer, region: &SpotRegion) -> f64 {
    let mut sum = 0.0f64;
    let mut count = 0u64;
    for y in 0..buffer.height() {
        for (x, px) in buffer.row(y).iter().enumerate() {
            if region.contains(x as u32, y) {
                sum += px.luma() as f64;
                count += 1;
            }
        }
    }
    if count == 0 {
        NEUTRAL_LUMA
    } else {
        sum / count as f64
    }
}

/// Instantaneous EV for a mean luma: `12 + (luma − 128) / 30 + offset`.
#[inline]
pub fn ev_from_luma(avg_luma: f64, calibration_offset: f64) -> f64 {
    BASELINE_EV + (avg_luma - NEUTRAL_LUMA) / LUMA_PER_STOP + calibration_offset
}

/// Check a calibration offset: within ±5 and a multiple of 0.5.
pub fn validate_calibration(offset: f64) -> MeterResult<f64> {
    let steps = offset / CALIBRATION_STEP;
    if offset.is_finite()
        && (CALIBRATION_MIN..=CALIBRATION_MAX).contains(&offset)
        && steps.fract() == 0.0
    {
        Ok(offset)
    } else {
        Err(MeterError::CalibrationOutOfRange(offset))
    }
}

/// Raw and smoothed EV, plus the calibration offset baked into `raw`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EvEstimate {
    /// This cycle's unsmoothed value.
    pub raw: f64,
    /// Exponential moving average across cycles. Always finite.
    pub smoothed: f64,
    pub calibration_offset: f64,
}

impl Default for EvEstimate {
    fn default() -> Self {
        Self {
            raw: BASELINE_EV,
            smoothed: BASELINE_EV,
            calibration_offset: 0.0,
        }
    }
}

impl EvEstimate {
    /// Fold a new raw reading in: `smoothed' = smoothed × 0.9 + raw × 0.1`.
    ///
    /// A non-finite reading is dropped so `smoothed` stays finite.
    pub fn update(&mut self, raw: f64) {
        if !raw.is_finite() {
            return;
        }
        self.raw = raw;
        self.smoothed = self.smoothed * SMOOTHING_RETAIN + raw * (1.0 - SMOOTHING_RETAIN);
    }
}

/// Stateful spot meter owning the session's EV estimate.
#[derive(Debug, Clone)]
pub struct SpotMeter {
    estimate: EvEstimate,
    radius_fraction: f32,
    locked: bool,
}

impl Default for SpotMeter {
    fn default() -> Self {
        Self::new(SPOT_RADIUS_FRACTION)
    }
}

impl SpotMeter {
    pub fn new(radius_fraction: f32) -> Self {
        Self {
            estimate: EvEstimate::default(),
            radius_fraction,
            locked: false,
        }
    }

    #[inline]
    pub fn estimate(&self) -> EvEstimate {
        self.estimate
    }

    #[inline]
    pub fn is_locked(&self) -> bool {
        self.locked
    }

    /// AE lock. While locked, [`sample`](Self::sample) leaves the estimate untouched.
    pub fn set_locked(&mut self, locked: bool) {
        self.locked = locked;
    }

    /// Set the offset applied to subsequent raw readings.
    pub fn set_calibration(&mut self, offset: f64) -> MeterResult<()> {
        self.estimate.calibration_offset = validate_calibration(offset)?;
        Ok(())
    }

    /// The spot for a working buffer of the given size.
    pub fn region_for(&self, width: u32, height: u32) -> SpotRegion {
        SpotRegion::centered(width, height, self.radius_fraction)
    }

    /// Measure `buffer` and fold the reading into the estimate.
    ///
    /// When locked the pixel pass is skipped and the previous estimate is
    /// returned unchanged.
    pub fn sample(&mut self, buffer: &FrameBuffer) -> EvEstimate {
        if self.locked {
            return self.estimate;
        }
        let region = self.region_for(buffer.width(), buffer.height());
        let avg = average_luma(buffer, &region);
        let raw = ev_from_luma(avg, self.estimate.calibration_offset);
        self.estimate.update(raw);
        self.estimate
    }
}
