//! Pixel colour types and luma.

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};

/// One interleaved 8-bit RGB pixel.
///
/// `#[repr(C)]` with three `u8` fields has no padding, so a frame's byte
/// buffer can be viewed as `&[Rgb8]` without copying.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Pod, Zeroable,
)]
#[repr(C)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    /// Create a pixel from its components.
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// A neutral grey with every channel set to `v`.
    #[inline]
    pub const fn grey(v: u8) -> Self {
        Self { r: v, g: v, b: v }
    }

    /// Rec. 601 luma on the 0-255 scale.
    #[inline]
    pub fn luma(self) -> f32 {
        luma(self.r, self.g, self.b)
    }

    pub const BLACK: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);
    pub const RED: Self = Self::new(255, 0, 0);
    pub const BLUE: Self = Self::new(0, 0, 255);
    pub const YELLOW: Self = Self::new(255, 255, 0);
    pub const PURPLE: Self = Self::new(128, 0, 128);
}

/// Rec. 601 luma: `0.299R + 0.587G + 0.114B`, no gamma decoding.
#[inline]
pub fn luma(r: u8, g: u8, b: u8) -> f32 {
    0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_luma_extremes() {
        assert!(Rgb8::BLACK.luma().abs() < 0.001);
        assert!((Rgb8::WHITE.luma() - 255.0).abs() < 0.01);
    }

    #[test]
    fn test_luma_weights() {
        assert!((luma(100, 0, 0) - 29.9).abs() < 0.001);
        assert!((luma(0, 100, 0) - 58.7).abs() < 0.001);
        assert!((luma(0, 0, 100) - 11.4).abs() < 0.001);
    }

    #[test]
    fn test_grey_luma_is_identity() {
        for v in [0u8, 25, 128, 200, 255] {
            assert!((Rgb8::grey(v).luma() - v as f32).abs() < 0.01);
        }
    }

    #[test]
    fn test_cast_from_bytes() {
        let bytes = [1u8, 2, 3, 4, 5, 6];
        let pixels: &[Rgb8] = bytemuck::cast_slice(&bytes);
        assert_eq!(pixels.len(), 2);
        assert_eq!(pixels[1], Rgb8::new(4, 5, 6));
    }
}
