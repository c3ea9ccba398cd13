//! Frame buffer types for live video frames in CPU memory.
//!
//! Frames are tightly packed interleaved RGB8 with no row padding, which is
//! what camera preview pipelines hand over and what the meter samples.

use crate::color::Rgb8;
use crate::error::{DarkroomError, Result};
use std::time::Duration;

/// Bytes per interleaved RGB8 pixel.
pub const BYTES_PER_PIXEL: usize = 3;

/// An RGB8 image in CPU memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl FrameBuffer {
    /// Create a black frame buffer with the given dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0u8; width as usize * height as usize * BYTES_PER_PIXEL],
        }
    }

    /// Wrap raw interleaved RGB bytes, checking the length against the dimensions.
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize * BYTES_PER_PIXEL;
        if data.len() != expected {
            return Err(DarkroomError::InvalidFrame(format!(
                "{}x{} RGB8 needs {} bytes, got {}",
                width,
                height,
                expected,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// A frame where every pixel is `color`.
    pub fn filled(width: u32, height: u32, color: Rgb8) -> Self {
        let mut frame = Self::new(width, height);
        frame.pixels_mut().fill(color);
        frame
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when the frame has no pixels.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Pixels in row-major order.
    #[inline]
    pub fn pixels(&self) -> &[Rgb8] {
        bytemuck::cast_slice(&self.data)
    }

    #[inline]
    pub fn pixels_mut(&mut self) -> &mut [Rgb8] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// One row of pixels.
    #[inline]
    pub fn row(&self, y: u32) -> &[Rgb8] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.pixels()[start..start + w]
    }

    /// Pixel at `(x, y)`, or `None` when out of bounds.
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<Rgb8> {
        if x < self.width && y < self.height {
            Some(self.pixels()[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    #[inline]
    pub fn set(&mut self, x: u32, y: u32, color: Rgb8) {
        if x < self.width && y < self.height {
            let idx = (y * self.width + x) as usize;
            self.pixels_mut()[idx] = color;
        }
    }

    /// Memory usage in bytes.
    pub fn memory_size(&self) -> usize {
        self.data.len()
    }

    /// A horizontal grey ramp from black on the left to white on the right.
    pub fn test_ramp(width: u32, height: u32) -> Self {
        let mut frame = Self::new(width, height);
        let denom = width.saturating_sub(1).max(1);
        for y in 0..height {
            for x in 0..width {
                let v = (x * 255 / denom) as u8;
                frame.set(x, y, Rgb8::grey(v));
            }
        }
        frame
    }
}

/// A frame delivered by a live source, with its capture time.
#[derive(Debug, Clone)]
pub struct Frame {
    /// Pixel data at native resolution
    pub buffer: FrameBuffer,
    /// Capture time relative to the start of the source
    pub timestamp: Duration,
}

impl Frame {
    pub fn new(buffer: FrameBuffer, timestamp: Duration) -> Self {
        Self { buffer, timestamp }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.buffer.width()
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.buffer.height()
    }
}
