//! Zone-system overlay.
//!
//! Buckets each working pixel's luma into a handful of photographic zones
//! and paints a new buffer for display. The input is only read, so the
//! buffer that was metered is never aliased by the overlay.

use darkroom_core::{FrameBuffer, Rgb8};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

/// Zones highlighted by the overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Zone {
    /// Zone 0, deep shadow: luma [0, 25).
    DeepShadow,
    /// Zone III, shadow detail: luma [25, 60).
    ShadowDetail,
    /// Zone V, mid-grey: luma [118, 138].
    MidGrey,
    /// Zone VII, highlight detail: luma [190, 230).
    HighlightDetail,
    /// Zone X, blown highlight: luma [230, 255].
    Blown,
}

impl Zone {
    /// The highlighted zone for a luma value, or `None` between bands.
    pub fn classify(luma: f32) -> Option<Self> {
        if luma < 25.0 {
            Some(Self::DeepShadow)
        } else if luma < 60.0 {
            Some(Self::ShadowDetail)
        } else if (118.0..=138.0).contains(&luma) {
            Some(Self::MidGrey)
        } else if (190.0..230.0).contains(&luma) {
            Some(Self::HighlightDetail)
        } else if luma >= 230.0 {
            Some(Self::Blown)
        } else {
            None
        }
    }

    /// Roman-numeral label.
    pub fn label(self) -> &'static str {
        match self {
            Self::DeepShadow => "0",
            Self::ShadowDetail => "III",
            Self::MidGrey => "V",
            Self::HighlightDetail => "VII",
            Self::Blown => "X",
        }
    }

    /// Overlay colour for a pixel of this zone with the given luma.
    pub fn paint(self, luma: f32) -> Rgb8 {
        match self {
            Self::DeepShadow => Rgb8::BLUE,
            Self::ShadowDetail => Rgb8::PURPLE,
            // Green/blue tint whose luma stays within a few percent of the input.
            Self::MidGrey => Rgb8::new(
                (luma * 0.5) as u8,
                (luma * 1.2).min(255.0) as u8,
                (luma * 1.1).min(255.0) as u8,
            ),
            Self::HighlightDetail => Rgb8::YELLOW,
            Self::Blown => Rgb8::RED,
        }
    }
}

/// Recolour `buffer` into a new overlay buffer of the same size.
///
/// Pixels outside every band are copied unchanged.
pub fn zone_overlay(buffer: &FrameBuffer) -> FrameBuffer {
    let mut out = buffer.clone();
    let width = buffer.width() as usize;
    if width == 0 {
        return out;
    }
    out.pixels_mut()
        .par_chunks_mut(width)
        .for_each(|row| {
            for px in row.iter_mut() {
                let luma = px.luma();
                if let Some(zone) = Zone::classify(luma) {
                    *px = zone.paint(luma);
                }
            }
        });
    out
}
