//! Resolve a metered EV into a standard aperture/shutter pair.
//!
//! Uses the reciprocal exposure equation rescaled to an ISO 100 reference:
//!
//! ```text
//! t = (N² × 100) / (ISO × 2^EV)
//! N = sqrt((t × ISO × 2^EV) / 100)
//! ```

use crate::error::{require_positive, ExposureError, ExposureResult};
use crate::settings::{ExposureSettings, PriorityMode};
use darkroom_core::{format_aperture, format_shutter, APERTURES, ISOS, SHUTTERS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Film speed the EV scale is referenced to.
const REFERENCE_ISO: f64 = 100.0;

/// A complete aperture/shutter pair, both members on their scales.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ExposurePair {
    pub aperture: f64,
    pub shutter: f64,
}

impl fmt::Display for ExposurePair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} @ {}",
            format_aperture(self.aperture),
            format_shutter(self.shutter)
        )
    }
}

/// Compute the derived member of the exposure pair.
///
/// `fixed` is the aperture in [`PriorityMode::ApertureFixed`] and the
/// shutter time in seconds in [`PriorityMode::ShutterFixed`]. `iso` and
/// `fixed` must be members of their scales. The result is always a member
/// of the derived scale, however extreme the EV.
pub fn resolve(ev: f64, iso: f64, mode: PriorityMode, fixed: f64) -> ExposureResult<f64> {
    if !ev.is_finite() {
        return Err(ExposureError::NonFiniteEv(ev));
    }
    let iso = ISOS.require(iso)?;
    let scene = iso * ev.exp2();

    match mode {
        PriorityMode::ApertureFixed => {
            let aperture = APERTURES.require(fixed)?;
            let t = (aperture * aperture * REFERENCE_ISO) / scene;
            Ok(SHUTTERS.nearest(t))
        }
        PriorityMode::ShutterFixed => {
            let t = SHUTTERS.require(fixed)?;
            let n = ((t * scene) / REFERENCE_ISO).sqrt();
            Ok(APERTURES.nearest(n))
        }
    }
}

/// Resolve the full pair for the current settings.
pub fn resolve_pair(ev: f64, settings: &ExposureSettings) -> ExposureResult<ExposurePair> {
    let derived = resolve(ev, settings.iso(), settings.priority(), settings.fixed_value())?;
    Ok(match settings.priority() {
        PriorityMode::ApertureFixed => ExposurePair {
            aperture: settings.aperture(),
            shutter: derived,
        },
        PriorityMode::ShutterFixed => ExposurePair {
            aperture: derived,
            shutter: settings.shutter(),
        },
    })
}

/// The EV a given pair meters for at `iso`: `log2(N²/t) − log2(ISO/100)`.
///
/// Inverse of [`resolve`] before snapping.
pub fn exposure_value(aperture: f64, shutter: f64, iso: f64) -> ExposureResult<f64> {
    let n = require_positive("aperture", aperture)?;
    let t = require_positive("shutter time", shutter)?;
    let iso = require_positive("ISO", iso)?;
    Ok((n * n / t).log2() - (iso / REFERENCE_ISO).log2())
}
