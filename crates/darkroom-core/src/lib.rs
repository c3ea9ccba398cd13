//! Darkroom Core - Foundation types for exposure metering
//!
//! This crate provides the fundamental types used throughout Darkroom:
//! - Standard aperture, shutter and ISO scales with nearest-match lookup
//! - RGB frame buffers delivered by a live video source
//! - Luma and swatch colours
//! - Geometric primitives for the metering spot

pub mod color;
pub mod error;
pub mod frame;
pub mod geometry;
pub mod scale;

pub use color::{luma, Rgb8};
pub use error::{DarkroomError, Result};
pub use frame::{Frame, FrameBuffer};
pub use geometry::{SpotRegion, Vec2};
pub use scale::{
    format_aperture, format_shutter, parse_shutter, Scale, ScaleKind, APERTURES, ISOS, SHUTTERS,
};

/// Photometric constants of the metering model.
pub mod metering {
    /// EV assumed for a mid-grey target under typical indoor/overcast light.
    pub const BASELINE_EV: f64 = 12.0;

    /// Luma treated as mid-grey, and the fallback when the spot holds no pixels.
    pub const NEUTRAL_LUMA: f64 = 128.0;

    /// Luma units per stop of EV.
    pub const LUMA_PER_STOP: f64 = 30.0;

    /// Weight kept from the previous smoothed EV on every tick.
    pub const SMOOTHING_RETAIN: f64 = 0.9;

    /// Spot radius as a fraction of the shorter frame dimension.
    pub const SPOT_RADIUS_FRACTION: f32 = 0.15;

    /// Native-to-working resolution divisor applied by the sampler.
    pub const DOWNSAMPLE_FACTOR: u32 = 4;

    /// Calibration offset bounds and step, in stops.
    pub const CALIBRATION_MIN: f64 = -5.0;
    pub const CALIBRATION_MAX: f64 = 5.0;
    pub const CALIBRATION_STEP: f64 = 0.5;
}
