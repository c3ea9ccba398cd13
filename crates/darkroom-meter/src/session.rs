//! Meter session: the tick-driven state machine.
//!
//! A [`MeterSession`] owns the EV estimate and runs one synchronous
//! [`tick`](MeterSession::tick) per display frame. User-facing controls
//! (AE lock, calibration offset, overlay toggle, exposure settings) live in
//! a shared [`MeterControls`] and are read once at the start of each tick,
//! so a write is observed by the next tick and never mid-tick.

use crate::config::MeterConfig;
use crate::error::MeterResult;
use crate::sampler::{downsample, upscale};
use crate::source::{FramePoll, FrameSource};
use crate::spot::{validate_calibration, EvEstimate, SpotMeter};
use crate::zones::zone_overlay;
use darkroom_core::metering::CALIBRATION_STEP;
use darkroom_core::FrameBuffer;
use darkroom_exposure::{resolve_pair, ExposurePair, ExposureResult, ExposureSettings};
use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, AtomicI32, Ordering};
use std::sync::Arc;
use tracing::{debug, info, trace};

/// Session state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MeterState {
    /// No frame analysed yet, or the source has gone away.
    Idle,
    /// Unlocked; every tick measures a fresh frame.
    Sampling,
    /// AE lock held; ticks keep the last estimate.
    Locked,
}

/// Controls shared between the session and the UI.
#[derive(Debug)]
pub struct MeterControls {
    locked: AtomicBool,
    zone_overlay: AtomicBool,
    /// Calibration offset in half-stop units.
    calibration_steps: AtomicI32,
    settings: Mutex<ExposureSettings>,
}

impl MeterControls {
    pub fn new(settings: ExposureSettings, zone_overlay: bool) -> Self {
        Self {
            locked: AtomicBool::new(false),
            zone_overlay: AtomicBool::new(zone_overlay),
            calibration_steps: AtomicI32::new(0),
            settings: Mutex::new(settings),
        }
    }

    pub fn is_locked(&self) -> bool {
        self.locked.load(Ordering::Acquire)
    }

    pub fn set_locked(&self, locked: bool) {
        self.locked.store(locked, Ordering::Release);
    }

    /// Flip the AE lock and return the new value.
    pub fn toggle_lock(&self) -> bool {
        !self.locked.fetch_xor(true, Ordering::AcqRel)
    }

    pub fn zone_overlay(&self) -> bool {
        self.zone_overlay.load(Ordering::Acquire)
    }

    pub fn set_zone_overlay(&self, enabled: bool) {
        self.zone_overlay.store(enabled, Ordering::Release);
    }

    /// Calibration offset in stops.
    pub fn calibration(&self) -> f64 {
        self.calibration_steps.load(Ordering::Acquire) as f64 * CALIBRATION_STEP
    }

    /// Set the calibration offset; must be within ±5 in 0.5 steps.
    pub fn set_calibration(&self, offset: f64) -> MeterResult<()> {
        let offset = validate_calibration(offset)?;
        let steps = (offset / CALIBRATION_STEP).round() as i32;
        self.calibration_steps.store(steps, Ordering::Release);
        Ok(())
    }

    /// Copy of the current exposure settings.
    pub fn settings(&self) -> ExposureSettings {
        *self.settings.lock()
    }

    /// Apply a change to the exposure settings; nothing changes on error.
    pub fn update_settings<F>(&self, change: F) -> ExposureResult<()>
    where
        F: FnOnce(&mut ExposureSettings) -> ExposureResult<()>,
    {
        let mut guard = self.settings.lock();
        let mut draft = *guard;
        change(&mut draft)?;
        *guard = draft;
        Ok(())
    }
}

/// Everything pushed to the display layer after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MeterReading {
    pub ev: EvEstimate,
    pub state: MeterState,
    pub settings: ExposureSettings,
    /// Fixed member plus the derived member resolved from `ev.smoothed`.
    pub pair: ExposurePair,
    /// Zone overlay at working resolution, when enabled and a frame was sampled.
    pub overlay: Option<FrameBuffer>,
}

/// What a single tick produced.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    Reading(MeterReading),
    /// The source had no frame ready; nothing changed.
    Pending,
}

/// The last metered working buffer and the native size it came from.
#[derive(Debug)]
struct LastFrame {
    working: FrameBuffer,
    native_width: u32,
    native_height: u32,
}

impl LastFrame {
    /// Zone overlay at the native resolution of the frame.
    fn overlay(&self) -> FrameBuffer {
        upscale(
            &zone_overlay(&self.working),
            self.native_width,
            self.native_height,
        )
    }
}

/// An owned metering session.
#[derive(Debug)]
pub struct MeterSession {
    config: MeterConfig,
    controls: Arc<MeterControls>,
    meter: SpotMeter,
    state: MeterState,
    ticks: u64,
    last_frame: Option<LastFrame>,
}

impl MeterSession {
    /// Create a session from a validated config.
    pub fn new(config: MeterConfig) -> MeterResult<Self> {
        config.validate()?;
        let settings = config.initial_settings()?;
        let controls = Arc::new(MeterControls::new(settings, config.zone_overlay));
        let meter = SpotMeter::new(config.spot_radius_fraction);
        Ok(Self {
            config,
            controls,
            meter,
            state: MeterState::Idle,
            ticks: 0,
            last_frame: None,
        })
    }

    pub fn config(&self) -> &MeterConfig {
        &self.config
    }

    /// Shared controls handle for the UI.
    pub fn controls(&self) -> Arc<MeterControls> {
        Arc::clone(&self.controls)
    }

    pub fn state(&self) -> MeterState {
        self.state
    }

    pub fn estimate(&self) -> EvEstimate {
        self.meter.estimate()
    }

    /// Ticks run so far, including locked and pending ones.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Run one cycle.
    ///
    /// Locked: the source is not polled and the estimate is kept. The zone
    /// overlay, when enabled, is drawn from the last metered frame.
    /// Unlocked: one frame is pulled, downsampled, metered and optionally
    /// overlaid. Source errors are returned to the caller, which decides
    /// via [`MeterError::is_fatal`](crate::MeterError::is_fatal) whether
    /// the session continues.
    pub fn tick<S: FrameSource + ?Sized>(&mut self, source: &mut S) -> MeterResult<TickOutcome> {
        self.ticks += 1;
        let locked = self.controls.is_locked();
        let settings = self.controls.settings();

        if locked {
            self.transition(MeterState::Locked);
            self.meter.set_locked(true);
            let ev = self.meter.estimate();
            let overlay = self
                .last_frame
                .as_ref()
                .filter(|_| self.controls.zone_overlay())
                .map(LastFrame::overlay);
            return Ok(TickOutcome::Reading(self.reading(ev, settings, overlay)?));
        }
        self.meter.set_locked(false);

        let frame = match source.poll_frame() {
            Ok(FramePoll::Ready(frame)) => frame,
            Ok(FramePoll::Pending) => {
                trace!(tick = self.ticks, "frame not ready");
                return Ok(TickOutcome::Pending);
            }
            Err(e) => {
                if e.is_fatal() {
                    self.transition(MeterState::Idle);
                }
                return Err(e);
            }
        };

        self.meter.set_calibration(self.controls.calibration())?;
        let last = LastFrame {
            working: downsample(&frame.buffer, self.config.downsample),
            native_width: frame.width(),
            native_height: frame.height(),
        };
        drop(frame);

        let ev = self.meter.sample(&last.working);
        let overlay = self.controls.zone_overlay().then(|| last.overlay());
        self.last_frame = Some(last);
        self.transition(MeterState::Sampling);

        debug!(
            tick = self.ticks,
            raw = ev.raw,
            smoothed = ev.smoothed,
            "metered frame"
        );
        Ok(TickOutcome::Reading(self.reading(ev, settings, overlay)?))
    }

    fn reading(
        &self,
        ev: EvEstimate,
        settings: ExposureSettings,
        overlay: Option<FrameBuffer>,
    ) -> MeterResult<MeterReading> {
        let pair = resolve_pair(ev.smoothed, &settings)?;
        Ok(MeterReading {
            ev,
            state: self.state,
            settings,
            pair,
            overlay,
        })
    }

    fn transition(&mut self, next: MeterState) {
        if self.state != next {
            info!(from = ?self.state, to = ?next, "meter state changed");
            self.state = next;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MeterError;
    use crate::source::{Scene, SyntheticSource};
    use darkroom_core::Rgb8;
    use darkroom_exposure::PriorityMode;

    fn session() -> MeterSession {
        MeterSession::new(MeterConfig::default()).unwrap()
    }

    fn grey_source(v: u8) -> SyntheticSource {
        SyntheticSource::new(320, 240, Scene::Uniform(Rgb8::grey(v)))
    }

    fn reading(outcome: TickOutcome) -> MeterReading {
        match outcome {
            TickOutcome::Reading(r) => r,
            TickOutcome::Pending => panic!("expected a reading"),
        }
    }

    #[test]
    fn test_starts_idle() {
        let s = session();
        assert_eq!(s.state(), MeterState::Idle);
        assert_eq!(s.estimate().smoothed, 12.0);
    }

    #[test]
    fn test_tick_samples_and_resolves() {
        let mut s = session();
        let mut src = grey_source(128);
        let r = reading(s.tick(&mut src).unwrap());
        assert_eq!(r.state, MeterState::Sampling);
        assert!((r.ev.smoothed - 12.0).abs() < 1e-6);
        // ISO 400, f/2.8, EV 12 → 1/2000
        assert_eq!(r.pair.shutter, 1.0 / 2000.0);
        assert_eq!(r.pair.aperture, 2.8);
        assert!(r.overlay.is_none());
    }

    #[test]
    fn test_lock_skips_source_and_freezes_ev() {
        let mut s = session();
        let mut src = grey_source(200);
        s.tick(&mut src).unwrap();
        let frozen = s.estimate();

        s.controls().set_locked(true);
        for _ in 0..20 {
            let r = reading(s.tick(&mut src).unwrap());
            assert_eq!(r.state, MeterState::Locked);
            assert_eq!(r.ev, frozen);
        }
        assert_eq!(src.frames_delivered(), 1);

        s.controls().set_locked(false);
        let r = reading(s.tick(&mut src).unwrap());
        assert_eq!(r.state, MeterState::Sampling);
        assert_ne!(r.ev.smoothed, frozen.smoothed);
    }

    #[test]
    fn test_calibration_observed_next_tick() {
        let mut s = session();
        let mut src = grey_source(128);
        s.controls().set_calibration(-2.0).unwrap();
        let r = reading(s.tick(&mut src).unwrap());
        assert!((r.ev.raw - 10.0).abs() < 1e-6);
        assert_eq!(r.ev.calibration_offset, -2.0);
        assert!(s.controls().set_calibration(7.0).is_err());
        assert_eq!(s.controls().calibration(), -2.0);
    }

    #[test]
    fn test_overlay_toggle() {
        let mut s = session();
        let mut src = grey_source(128);
        s.controls().set_zone_overlay(true);
        let r = reading(s.tick(&mut src).unwrap());
        let overlay = r.overlay.expect("overlay enabled");
        assert_eq!((overlay.width(), overlay.height()), (320, 240));
        assert!(overlay.pixels().iter().all(|p| p.g > p.r));
    }

    #[test]
    fn test_pending_is_not_an_error() {
        let mut s = session();
        let mut src = grey_source(128).with_pending_every(1);
        assert_eq!(s.tick(&mut src).unwrap(), TickOutcome::Pending);
        assert_eq!(s.state(), MeterState::Idle);
        assert_eq!(s.estimate(), EvEstimate::default());
    }

    #[test]
    fn test_source_failure_returns_to_idle() {
        let mut s = session();
        let mut src = grey_source(128).with_fail_after(1);
        s.tick(&mut src).unwrap();
        let err = s.tick(&mut src).unwrap_err();
        assert!(matches!(err, MeterError::SourceUnavailable(_)));
        assert_eq!(s.state(), MeterState::Idle);
    }

    #[test]
    fn test_settings_change_applies_while_locked() {
        let mut s = session();
        let mut src = grey_source(128);
        s.tick(&mut src).unwrap();
        s.controls().set_locked(true);
        s.controls()
            .update_settings(|st| {
                st.set_priority(PriorityMode::ShutterFixed);
                st.set_shutter(1.0 / 125.0)
            })
            .unwrap();
        let r = reading(s.tick(&mut src).unwrap());
        assert_eq!(r.pair.shutter, 1.0 / 125.0);
        assert_eq!(r.settings.priority(), PriorityMode::ShutterFixed);
    }

    #[test]
    fn test_failed_settings_update_is_atomic() {
        let s = session();
        let before = s.controls().settings();
        let result = s.controls().update_settings(|st| {
            st.set_iso(800.0)?;
            st.set_aperture(3.0)
        });
        assert!(result.is_err());
        assert_eq!(s.controls().settings(), before);
    }

    #[test]
    fn test_toggle_lock_returns_new_state() {
        let s = session();
        assert!(s.controls().toggle_lock());
        assert!(s.controls().is_locked());
        assert!(!s.controls().toggle_lock());
    }

    #[test]
    fn test_overlay_survives_lock() {
        let mut s = session();
        let mut src = grey_source(128);
        s.tick(&mut src).unwrap();

        s.controls().set_locked(true);
        let r = reading(s.tick(&mut src).unwrap());
        assert!(r.overlay.is_none());

        s.controls().set_zone_overlay(true);
        for _ in 0..3 {
            let r = reading(s.tick(&mut src).unwrap());
            assert_eq!(r.state, MeterState::Locked);
            let overlay = r.overlay.expect("overlay while locked");
            assert_eq!((overlay.width(), overlay.height()), (320, 240));
            assert!(overlay.pixels().iter().all(|p| p.g > p.r));
        }
        assert_eq!(src.frames_delivered(), 1);
    }

    #[test]
    fn test_locked_before_any_frame_has_no_overlay() {
        let mut s = session();
        let mut src = grey_source(128);
        s.controls().set_zone_overlay(true);
        s.controls().set_locked(true);
        let r = reading(s.tick(&mut src).unwrap());
        assert!(r.overlay.is_none());
        assert_eq!(src.frames_delivered(), 0);
    }
}
