/// Mip chain generation
///
/// Levels are produced top-down from the base level with a 2x2 box filter.
/// Odd sides clamp the sample window at the last row/column; each level is at
/// least 1x1.

use glam::UVec2;
use super::pixel_buffer::PixelBuffer;
use crate::error::{Error, Result};

/// Length of the full chain down to 1x1: `floor(log2(max(w, h))) + 1`
pub fn max_mip_count(width: u32, height: u32) -> u32 {
    let side = width.max(height).max(1);
    u32::BITS - side.leading_zeros()
}

/// Extent of mip `level` for a `width` x `height` base
pub fn mip_extent(width: u32, height: u32, level: u32) -> UVec2 {
    let base = UVec2::new(width, height);
    let shift = level.min(31);
    (base >> UVec2::splat(shift)).max(UVec2::ONE)
}

/// Check that `mip_count` is in `1..=max_mip_count(width, height)`
pub fn validate_mip_count(width: u32, height: u32, mip_count: u32) -> Result<()> {
    let max = max_mip_count(width, height);
    if mip_count == 0 || mip_count > max {
        return Err(Error::InvalidDimensions(format!(
            "mip count {} outside 1..={} for {}x{}",
            mip_count, max, width, height
        )));
    }
    Ok(())
}

/// 2x2 box downsample of `src` to half size (rounded average)
pub fn downsample(src: &PixelBuffer) -> Result<PixelBuffer> {
    let (w, h) = src.dimensions();
    let next = UVec2::new(w / 2, h / 2).max(UVec2::ONE);
    let pixels = src.pixels();

    let mut data = Vec::with_capacity((next.x * next.y * 4) as usize);
    for y in 0..next.y {
        let y0 = (y * 2).min(h - 1);
        let y1 = (y * 2 + 1).min(h - 1);
        for x in 0..next.x {
            let x0 = (x * 2).min(w - 1);
            let x1 = (x * 2 + 1).min(w - 1);
            let taps = [
                pixels[(y0 * w + x0) as usize],
                pixels[(y0 * w + x1) as usize],
                pixels[(y1 * w + x0) as usize],
                pixels[(y1 * w + x1) as usize],
            ];
            for c in 0..4 {
                let sum: u32 = taps.iter().map(|t| t[c] as u32).sum();
                data.push(((sum + 2) / 4) as u8);
            }
        }
    }
    PixelBuffer::new(next.x, next.y, data)
}

/// Base level followed by `mip_count - 1` downsampled levels
///
/// # Errors
///
/// `InvalidDimensions` if `mip_count` is out of range for the base size.
pub fn generate_chain(base: &PixelBuffer, mip_count: u32) -> Result<Vec<PixelBuffer>> {
    validate_mip_count(base.width(), base.height(), mip_count)?;

    let mut chain = Vec::with_capacity(mip_count as usize);
    chain.push(base.clone());
    for _ in 1..mip_count {
        let next = match chain.last() {
            Some(prev) => downsample(prev)?,
            None => break,
        };
        chain.push(next);
    }
    Ok(chain)
}
