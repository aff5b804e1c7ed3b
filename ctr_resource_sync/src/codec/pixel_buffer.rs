/// Flat top-down RGBA8 image used between codec, compositor and previews

use image::RgbaImage;
use crate::error::{Error, Result};

/// Top-down RGBA8 pixel buffer
///
/// `data.len() == width * height * 4` always holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl PixelBuffer {
    /// Wrap RGBA8 bytes
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` if a side is zero or `data` has the wrong length.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(Error::InvalidDimensions(format!(
                "{}x{} image has no pixels", width, height
            )));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(Error::InvalidDimensions(format!(
                "{}x{} RGBA8 buffer needs {} bytes, got {}",
                width, height, expected, data.len()
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Buffer filled with one color
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Result<Self> {
        let count = width as usize * height as usize;
        let data = rgba.iter().copied().cycle().take(count * 4).collect();
        Self::new(width, height, data)
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// (width, height)
    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Raw RGBA8 bytes, row-major, top row first
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Consume into raw RGBA8 bytes
    pub fn into_bytes(self) -> Vec<u8> {
        self.data
    }

    /// Pixels as `[r, g, b, a]` quads
    pub fn pixels(&self) -> &[[u8; 4]] {
        bytemuck::cast_slice(&self.data)
    }

    /// Mutable pixels as `[r, g, b, a]` quads
    pub fn pixels_mut(&mut self) -> &mut [[u8; 4]] {
        bytemuck::cast_slice_mut(&mut self.data)
    }

    /// Pixel at (x, y), top-left origin
    pub fn pixel(&self, x: u32, y: u32) -> [u8; 4] {
        self.pixels()[(y * self.width + x) as usize]
    }

    /// Mirror rows vertically (top-down <-> bottom-up)
    pub fn flip_vertical(&mut self) {
        let row = self.width as usize * 4;
        let height = self.height as usize;
        for y in 0..height / 2 {
            let (top, bottom) = self.data.split_at_mut((height - 1 - y) * row);
            top[y * row..(y + 1) * row].swap_with_slice(&mut bottom[..row]);
        }
    }

    /// Copy into an `image` crate buffer
    pub fn to_image(&self) -> RgbaImage {
        // Length invariant guarantees from_raw succeeds
        RgbaImage::from_raw(self.width, self.height, self.data.clone())
            .unwrap_or_else(|| RgbaImage::new(self.width, self.height))
    }

    /// Take an `image` crate buffer
    pub fn from_image(image: RgbaImage) -> Result<Self> {
        let (width, height) = image.dimensions();
        Self::new(width, height, image.into_raw())
    }
}
