//! Darkroom Exposure - the numeric models behind the exposure tools.
//!
//! Everything here is a pure function over value inputs: no shared state,
//! callable from any context without synchronization.

pub mod dilution;
pub mod error;
pub mod reciprocity;
pub mod resolver;
pub mod settings;
pub mod thermal;

pub use dilution::{parse_ratio, Dilution, DilutionRequest};
pub use error::{ExposureError, ExposureResult};
pub use reciprocity::ReciprocityModel;
pub use resolver::{exposure_value, resolve, resolve_pair, ExposurePair};
pub use settings::{ExposureSettings, PriorityMode};
pub use thermal::{format_duration, DevelopmentStep, ProcessTimetable, StepCategory};
