//! User-selected exposure settings.

use crate::error::{ExposureError, ExposureResult};
use darkroom_core::{ScaleKind, APERTURES, ISOS, SHUTTERS};
use serde::{Deserialize, Serialize};

/// Which member of the aperture/shutter pair the user controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PriorityMode {
    /// Aperture is fixed, shutter speed is derived.
    #[default]
    ApertureFixed,
    /// Shutter speed is fixed, aperture is derived.
    ShutterFixed,
}

impl PriorityMode {
    /// Scale the user picks from in this mode.
    pub fn fixed_kind(self) -> ScaleKind {
        match self {
            Self::ApertureFixed => ScaleKind::Aperture,
            Self::ShutterFixed => ScaleKind::Shutter,
        }
    }

    /// Scale the resolver snaps to in this mode.
    pub fn derived_kind(self) -> ScaleKind {
        match self {
            Self::ApertureFixed => ScaleKind::Shutter,
            Self::ShutterFixed => ScaleKind::Aperture,
        }
    }
}

/// ISO, priority mode and the fixed members of the exposure pair.
///
/// Every value held here is a member of its standard scale. Both fixed
/// values are remembered so switching modes restores the last choice, but
/// only the one matching `priority` is authoritative.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ExposureSettings {
    iso: f64,
    priority: PriorityMode,
    aperture: f64,
    shutter: f64,
}

impl Default for ExposureSettings {
    fn default() -> Self {
        Self {
            iso: 400.0,
            priority: PriorityMode::ApertureFixed,
            aperture: 2.8,
            shutter: 1.0 / 125.0,
        }
    }
}

impl ExposureSettings {
    /// Build settings, rejecting any value that is not on its scale.
    pub fn new(
        iso: f64,
        priority: PriorityMode,
        aperture: f64,
        shutter: f64,
    ) -> ExposureResult<Self> {
        Ok(Self {
            iso: ISOS.require(iso)?,
            priority,
            aperture: APERTURES.require(aperture)?,
            shutter: SHUTTERS.require(shutter)?,
        })
    }

    #[inline]
    pub fn iso(&self) -> f64 {
        self.iso
    }

    #[inline]
    pub fn priority(&self) -> PriorityMode {
        self.priority
    }

    #[inline]
    pub fn aperture(&self) -> f64 {
        self.aperture
    }

    #[inline]
    pub fn shutter(&self) -> f64 {
        self.shutter
    }

    /// The authoritative member for the current mode.
    pub fn fixed_value(&self) -> f64 {
        match self.priority {
            PriorityMode::ApertureFixed => self.aperture,
            PriorityMode::ShutterFixed => self.shutter,
        }
    }

    pub fn set_iso(&mut self, iso: f64) -> ExposureResult<()> {
        self.iso = ISOS.require(iso)?;
        Ok(())
    }

    pub fn set_priority(&mut self, priority: PriorityMode) {
        self.priority = priority;
    }

    /// Set the fixed aperture. Only legal in aperture-priority mode.
    pub fn set_aperture(&mut self, aperture: f64) -> ExposureResult<()> {
        if self.priority != PriorityMode::ApertureFixed {
            return Err(ExposureError::DerivedMember(ScaleKind::Aperture));
        }
        self.aperture = APERTURES.require(aperture)?;
        Ok(())
    }

    /// Set the fixed shutter speed. Only legal in shutter-priority mode.
    pub fn set_shutter(&mut self, shutter: f64) -> ExposureResult<()> {
        if self.priority != PriorityMode::ShutterFixed {
            return Err(ExposureError::DerivedMember(ScaleKind::Shutter));
        }
        self.shutter = SHUTTERS.require(shutter)?;
        Ok(())
    }
}
