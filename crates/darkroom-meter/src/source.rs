//! Boundary to the live video source.
//!
//! Device acquisition and permissions live outside this crate; a source
//! only hands over frames that have already been captured.

use crate::error::{MeterError, MeterResult};
use darkroom_core::{Frame, FrameBuffer, Rgb8};
use std::time::Duration;

/// Result of asking a source for its next frame.
#[derive(Debug)]
pub enum FramePoll {
    /// A native-resolution frame, owned by the tick that polled it.
    Ready(Frame),
    /// No frame yet; try again next tick.
    Pending,
}

/// A live source of RGB frames.
///
/// Returning [`MeterError::SourceUnavailable`] ends the metering session.
pub trait FrameSource: Send {
    /// Fetch the next frame without blocking.
    fn poll_frame(&mut self) -> MeterResult<FramePoll>;

    /// Release the underlying device handle. Called once when the session stops.
    fn release(&mut self) {}
}

impl<S: FrameSource + ?Sized> FrameSource for Box<S> {
    fn poll_frame(&mut self) -> MeterResult<FramePoll> {
        (**self).poll_frame()
    }

    fn release(&mut self) {
        (**self).release()
    }
}

/// Scene content rendered by [`SyntheticSource`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Scene {
    /// Every pixel the same colour.
    Uniform(Rgb8),
    /// A centred disc of `spot` over `background`; `radius` is a fraction of the shorter side.
    Spot {
        background: Rgb8,
        spot: Rgb8,
        radius: f32,
    },
    /// Horizontal grey ramp, black to white.
    Ramp,
}

impl Scene {
    fn render(&self, width: u32, height: u32) -> FrameBuffer {
        match *self {
            Self::Uniform(color) => FrameBuffer::filled(width, height, color),
            Self::Spot {
                background,
                spot,
                radius,
            } => {
                let mut frame = FrameBuffer::filled(width, height, background);
                let region = darkroom_core::SpotRegion::centered(width, height, radius);
                for y in 0..height {
                    for x in 0..width {
                        if region.contains(x, y) {
                            frame.set(x, y, spot);
                        }
                    }
                }
                frame
            }
            Self::Ramp => FrameBuffer::test_ramp(width, height),
        }
    }
}

/// Frame source that renders a fixed scene, for demos and tests.
#[derive(Debug, Clone)]
pub struct SyntheticSource {
    width: u32,
    height: u32,
    scene: Scene,
    frame_period: Duration,
    polls: u64,
    frames: u64,
    pending_every: Option<u64>,
    fail_after: Option<u64>,
    released: bool,
}

impl SyntheticSource {
    /// A 30 fps source of the given native size.
    pub fn new(width: u32, height: u32, scene: Scene) -> Self {
        Self {
            width,
            height,
            scene,
            frame_period: Duration::from_secs_f64(1.0 / 30.0),
            polls: 0,
            frames: 0,
            pending_every: None,
            fail_after: None,
            released: false,
        }
    }

    /// Report [`FramePoll::Pending`] on every `n`th poll.
    pub fn with_pending_every(mut self, n: u64) -> Self {
        self.pending_every = Some(n.max(1));
        self
    }

    /// Become unavailable after delivering `n` frames.
    pub fn with_fail_after(mut self, n: u64) -> Self {
        self.fail_after = Some(n);
        self
    }

    pub fn set_scene(&mut self, scene: Scene) {
        self.scene = scene;
    }

    /// Frames delivered so far.
    pub fn frames_delivered(&self) -> u64 {
        self.frames
    }

    pub fn is_released(&self) -> bool {
        self.released
    }
}

impl FrameSource for SyntheticSource {
    fn poll_frame(&mut self) -> MeterResult<FramePoll> {
        if self.released {
            return Err(MeterError::SourceUnavailable("source released".into()));
        }
        if self.fail_after.is_some_and(|n| self.frames >= n) {
            return Err(MeterError::SourceUnavailable(format!(
                "stream ended after {} frames",
                self.frames
            )));
        }

        self.polls += 1;
        if self.pending_every.is_some_and(|n| self.polls % n == 0) {
            return Ok(FramePoll::Pending);
        }

        let timestamp = self.frame_period * self.frames as u32;
        self.frames += 1;
        Ok(FramePoll::Ready(Frame::new(
            self.scene.render(self.width, self.height),
            timestamp,
        )))
    }

    fn release(&mut self) {
        self.released = true;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ready(poll: FramePoll) -> Frame {
        match poll {
            FramePoll::Ready(frame) => frame,
            FramePoll::Pending => panic!("expected a frame"),
        }
    }

    #[test]
    fn test_uniform_scene() {
        let mut src = SyntheticSource::new(8, 4, Scene::Uniform(Rgb8::grey(50)));
        let frame = ready(src.poll_frame().unwrap());
        assert_eq!(frame.width(), 8);
        assert!(frame.buffer.pixels().iter().all(|&p| p == Rgb8::grey(50)));
    }

    #[test]
    fn test_spot_scene_center_and_corner() {
        let scene = Scene::Spot {
            background: Rgb8::BLACK,
            spot: Rgb8::WHITE,
            radius: 0.25,
        };
        let mut src = SyntheticSource::new(40, 40, scene);
        let frame = ready(src.poll_frame().unwrap());
        assert_eq!(frame.buffer.get(20, 20), Some(Rgb8::WHITE));
        assert_eq!(frame.buffer.get(0, 0), Some(Rgb8::BLACK));
    }

    #[test]
    fn test_timestamps_advance() {
        let mut src = SyntheticSource::new(2, 2, Scene::Ramp);
        let a = ready(src.poll_frame().unwrap());
        let b = ready(src.poll_frame().unwrap());
        assert!(b.timestamp > a.timestamp);
    }

    #[test]
    fn test_pending_every() {
        let mut src = SyntheticSource::new(2, 2, Scene::Ramp).with_pending_every(2);
        assert!(matches!(src.poll_frame().unwrap(), FramePoll::Ready(_)));
        assert!(matches!(src.poll_frame().unwrap(), FramePoll::Pending));
        assert!(matches!(src.poll_frame().unwrap(), FramePoll::Ready(_)));
        assert_eq!(src.frames_delivered(), 2);
    }

    #[test]
    fn test_fail_after() {
        let mut src = SyntheticSource::new(2, 2, Scene::Ramp).with_fail_after(1);
        assert!(src.poll_frame().is_ok());
        let err = src.poll_frame().unwrap_err();
        assert!(err.is_fatal());
    }

    #[test]
    fn test_release() {
        let mut src = SyntheticSource::new(2, 2, Scene::Ramp);
        src.release();
        assert!(src.is_released());
        assert!(src.poll_frame().is_err());
    }
}
