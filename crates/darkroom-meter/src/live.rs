//! Async driver for a metering session.
//!
//! Runs [`MeterSession::tick`] on a tokio interval, publishes each reading
//! on a `watch` channel and stops on request. Each tick is synchronous, so
//! a stop request lets the in-flight tick finish and schedules no new one.

use crate::error::{MeterError, MeterResult};
use crate::session::{MeterControls, MeterReading, MeterSession, TickOutcome};
use crate::source::FrameSource;
use darkroom_exposure::{ExposureResult, ExposureSettings};
use std::sync::Arc;
use tokio::sync::{oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{error, info, warn};

/// Counters reported when the loop ends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MeterSummary {
    pub ticks: u64,
    pub readings: u64,
    pub pending: u64,
    pub skipped: u64,
}

/// Handle to a running meter loop.
///
/// Dropping the handle without calling [`stop`](Self::stop) also ends the
/// loop at its next scheduling point.
pub struct MeterHandle {
    controls: Arc<MeterControls>,
    readings: watch::Receiver<Option<MeterReading>>,
    stop_tx: Option<oneshot::Sender<()>>,
    task: JoinHandle<MeterResult<MeterSummary>>,
}

impl MeterHandle {
    /// Lock, calibration, overlay and settings controls.
    pub fn controls(&self) -> &MeterControls {
        &self.controls
    }

    pub fn lock(&self) {
        self.controls.set_locked(true);
    }

    pub fn unlock(&self) {
        self.controls.set_locked(false);
    }

    /// Flip the AE lock and return the new value.
    pub fn toggle_lock(&self) -> bool {
        self.controls.toggle_lock()
    }

    pub fn set_calibration(&self, offset: f64) -> MeterResult<()> {
        self.controls.set_calibration(offset)
    }

    pub fn set_zone_overlay(&self, enabled: bool) {
        self.controls.set_zone_overlay(enabled);
    }

    /// Change ISO, priority or the fixed member; seen by the next tick.
    pub fn update_settings<F>(&self, change: F) -> ExposureResult<()>
    where
        F: FnOnce(&mut ExposureSettings) -> ExposureResult<()>,
    {
        self.controls.update_settings(change)
    }

    /// A receiver that always holds the most recent reading.
    pub fn readings(&self) -> watch::Receiver<Option<MeterReading>> {
        self.readings.clone()
    }

    /// The latest reading, if any tick has produced one.
    pub fn latest(&self) -> Option<MeterReading> {
        self.readings.borrow().clone()
    }

    /// True once the loop has ended on its own (e.g. the source went away).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Stop the loop, wait for the in-flight tick, and release the source.
    ///
    /// Returns the loop's result: its counters, or the fatal error that
    /// ended it early.
    pub async fn stop(mut self) -> MeterResult<MeterSummary> {
        if let Some(tx) = self.stop_tx.take() {
            // The loop may already have exited; that is not an error here.
            let _ = tx.send(());
        }
        self.task
            .await
            .map_err(|e| MeterError::Task(e.to_string()))?
    }
}

/// Start a session on the current tokio runtime.
pub fn spawn_meter<S>(session: MeterSession, source: S) -> MeterHandle
where
    S: FrameSource + 'static,
{
    let controls = session.controls();
    let (readings_tx, readings) = watch::channel(None);
    let (stop_tx, stop_rx) = oneshot::channel();
    let task = tokio::spawn(run(session, source, readings_tx, stop_rx));

    MeterHandle {
        controls,
        readings,
        stop_tx: Some(stop_tx),
        task,
    }
}

async fn run<S: FrameSource>(
    mut session: MeterSession,
    mut source: S,
    readings: watch::Sender<Option<MeterReading>>,
    mut stop_rx: oneshot::Receiver<()>,
) -> MeterResult<MeterSummary> {
    let mut interval = tokio::time::interval(session.config().tick_interval());
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut summary = MeterSummary::default();

    info!(tick_hz = session.config().tick_hz, "meter session started");

    let result = loop {
        tokio::select! {
            biased;
            _ = &mut stop_rx => {
                info!(ticks = summary.ticks, "meter session stopped");
                break Ok(summary);
            }
            _ = interval.tick() => {
                summary.ticks += 1;
                match session.tick(&mut source) {
                    Ok(TickOutcome::Reading(reading)) => {
                        summary.readings += 1;
                        readings.send_replace(Some(reading));
                    }
                    Ok(TickOutcome::Pending) => summary.pending += 1,
                    Err(e) if e.is_fatal() => {
                        error!(error = %e, "meter session ended");
                        break Err(e);
                    }
                    Err(e) => {
                        summary.skipped += 1;
                        warn!(error = %e, tick = summary.ticks, "tick skipped");
                    }
                }
            }
        }
    };

    source.release();
    result
}
