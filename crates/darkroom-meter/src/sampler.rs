//! Frame sampler: reduce native frames to a bounded working resolution,
//! and map working-resolution buffers back up for display.

use darkroom_core::{FrameBuffer, Rgb8};
use rayon::prelude::*;

/// Box-downsample `frame` by `factor` in each dimension.
///
/// Each working pixel is the mean of the `factor × factor` block it covers;
/// trailing rows and columns that do not fill a whole block are dropped.
/// A non-empty frame smaller than one block still yields a 1×1 buffer. The
/// native frame is only borrowed and may be dropped as soon as this returns.
pub fn downsample(frame: &FrameBuffer, factor: u32) -> FrameBuffer {
    let factor = factor.max(1);
    if factor == 1 || frame.is_empty() {
        return frame.clone();
    }

    let out_w = (frame.width() / factor).max(1);
    let out_h = (frame.height() / factor).max(1);
    let block_w = factor.min(frame.width());
    let block_h = factor.min(frame.height());
    let mut out = FrameBuffer::new(out_w, out_h);

    for oy in 0..out_h {
        for ox in 0..out_w {
            let (mut r, mut g, mut b) = (0u64, 0u64, 0u64);
            for y in oy * factor..oy * factor + block_h {
                let row = frame.row(y);
                for px in &row[(ox * factor) as usize..(ox * factor + block_w) as usize] {
                    r += px.r as u64;
                    g += px.g as u64;
                    b += px.b as u64;
                }
            }
            let n = block_w as u64 * block_h as u64;
            out.set(
                ox,
                oy,
                Rgb8::new(
                    ((r + n / 2) / n) as u8,
                    ((g + n / 2) / n) as u8,
                    ((b + n / 2) / n) as u8,
                ),
            );
        }
    }
    out
}

/// Nearest-neighbour resize of `buffer` to `width × height`.
///
/// Used to bring a working-resolution overlay back to native size.
pub fn upscale(buffer: &FrameBuffer, width: u32, height: u32) -> FrameBuffer {
    if buffer.width() == width && buffer.height() == height {
        return buffer.clone();
    }
    let mut out = FrameBuffer::new(width, height);
    if buffer.is_empty() || out.is_empty() {
        return out;
    }

    let (src_w, src_h) = (buffer.width() as u64, buffer.height() as u64);
    let columns: Vec<usize> = (0..width as u64)
        .map(|x| (x * src_w / width as u64) as usize)
        .collect();
    out.pixels_mut()
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let src_row = buffer.row((y as u64 * src_h / height as u64) as u32);
            for (px, &sx) in row.iter_mut().zip(&columns) {
                *px = src_row[sx];
            }
        });
    out
}
