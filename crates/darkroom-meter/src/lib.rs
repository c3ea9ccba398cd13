//! Darkroom Meter - live photometric spot metering.
//!
//! Each tick pulls one frame from a [`FrameSource`], downsamples it,
//! measures mean luma inside a centred spot, smooths the resulting EV and
//! resolves it into an aperture/shutter pair. An optional zone overlay is
//! produced from the same working buffer.

pub mod config;
pub mod error;
pub mod live;
pub mod sampler;
pub mod session;
pub mod source;
pub mod spot;
pub mod zones;

pub use config::MeterConfig;
pub use error::{MeterError, MeterResult};
pub use live::{spawn_meter, MeterHandle, MeterSummary};
pub use sampler::{downsample, upscale};
pub use session::{MeterControls, MeterReading, MeterSession, MeterState, TickOutcome};
pub use source::{FramePoll, FrameSource, Scene, SyntheticSource};
pub use spot::{average_luma, ev_from_luma, validate_calibration, EvEstimate, SpotMeter};
pub use zones::{zone_overlay, Zone};
