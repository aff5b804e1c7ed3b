//! Channel-selective compositing
//!
//! Combines the color or alpha channels of a replacement image with the
//! previous content of a texture, and extracts channel groups for export.
//! Every operation is per pixel: no blending, no gamma.

use crate::codec::PixelBuffer;
use crate::error::{Error, Result};

/// Which channels an import / replace / export touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum EditMode {
    /// All four channels
    #[default]
    Default,
    /// Color channels only (alpha kept from the previous content)
    ColorOnly,
    /// Alpha channel only (color kept from the previous content)
    AlphaOnly,
}

/// Combine `old` and `new` according to `mode`
///
/// - `Default`: `new` unchanged
/// - `ColorOnly`: RGB from `new`, alpha from `old`
/// - `AlphaOnly`: RGB from `old`, alpha from the *red* channel of `new`
///
/// `AlphaOnly` reads the replacement as a grayscale mask stored in red; green
/// and blue of `new` are ignored.
///
/// # Errors
///
/// `DimensionMismatch` if the two buffers differ in size.
pub fn composite(old: &PixelBuffer, new: &PixelBuffer, mode: EditMode) -> Result<PixelBuffer> {
    if old.dimensions() != new.dimensions() {
        return Err(Error::DimensionMismatch {
            expected: old.dimensions(),
            actual: new.dimensions(),
        });
    }

    let mut out = new.clone();
    match mode {
        EditMode::Default => {}
        EditMode::ColorOnly => {
            for (dst, src) in out.pixels_mut().iter_mut().zip(old.pixels()) {
                dst[3] = src[3];
            }
        }
        EditMode::AlphaOnly => {
            for (dst, src) in out.pixels_mut().iter_mut().zip(old.pixels()) {
                let alpha = dst[0];
                *dst = [src[0], src[1], src[2], alpha];
            }
        }
    }
    Ok(out)
}

/// Isolate the channel group selected by `mode` for export
///
/// - `Default`: unchanged
/// - `ColorOnly`: RGB kept, alpha forced to 255
/// - `AlphaOnly`: alpha written to R, G and B, alpha forced to 255
pub fn extract(pixels: &PixelBuffer, mode: EditMode) -> PixelBuffer {
    let mut out = pixels.clone();
    match mode {
        EditMode::Default => {}
        EditMode::ColorOnly => {
            for px in out.pixels_mut() {
                px[3] = 0xFF;
            }
        }
        EditMode::AlphaOnly => {
            for px in out.pixels_mut() {
                let a = px[3];
                *px = [a, a, a, 0xFF];
            }
        }
    }
    out
}

#[cfg(test)]
#[path = "compositor_tests.rs"]
mod tests;
