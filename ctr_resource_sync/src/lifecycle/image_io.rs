//! Image file I/O for imports and exports
//!
//! Files are read and written through the `image` crate. The editor's file
//! dialogs live outside this crate; only paths come in.

use std::path::Path;
use image::ColorType;
use crate::codec::{PixelBuffer, TextureFormat};
use crate::error::{Error, Result};
use crate::resource::CUBE_FACE_COUNT;

/// Decoded replacement content: one face, or six for a cubemap
///
/// Faces can only be set through `single` and `cube`, so there is always at
/// least one and all of them share the size reported by `dimensions`.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceImage {
    faces: Vec<PixelBuffer>,
    format_hint: Option<TextureFormat>,
}

impl SourceImage {
    /// Single-face image
    pub fn single(pixels: PixelBuffer) -> Self {
        Self {
            faces: vec![pixels],
            format_hint: None,
        }
    }

    /// Six-face cubemap image
    ///
    /// # Errors
    ///
    /// `InvalidDimensions` unless exactly six faces are given,
    /// `DimensionMismatch` if they differ in size.
    pub fn cube(faces: Vec<PixelBuffer>) -> Result<Self> {
        if faces.len() != CUBE_FACE_COUNT {
            return Err(Error::InvalidDimensions(format!(
                "cubemap needs {} faces, got {}", CUBE_FACE_COUNT, faces.len()
            )));
        }
        let (width, height) = faces[0].dimensions();
        if let Some(face) = faces.iter().find(|f| f.dimensions() != (width, height)) {
            return Err(Error::DimensionMismatch {
                expected: (width, height),
                actual: face.dimensions(),
            });
        }
        Ok(Self { faces, format_hint: None })
    }

    /// Suggest a storage format
    pub fn with_format_hint(mut self, format: TextureFormat) -> Self {
        self.format_hint = Some(format);
        self
    }

    /// Storage format suggested by the source file, if any
    pub fn format_hint(&self) -> Option<TextureFormat> {
        self.format_hint
    }

    /// Top-down RGBA8 faces, in face order
    pub fn faces(&self) -> &[PixelBuffer] {
        &self.faces
    }

    /// Number of faces (1 or 6)
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Size shared by every face
    pub fn dimensions(&self) -> (u32, u32) {
        self.faces.first().map_or((0, 0), PixelBuffer::dimensions)
    }
}

/// Storage format matching an image file's channel layout, when there is one
fn hint_for(color: ColorType) -> Option<TextureFormat> {
    match color {
        ColorType::L8 => Some(TextureFormat::L8),
        ColorType::La8 => Some(TextureFormat::La8),
        ColorType::Rgb8 => Some(TextureFormat::Rgb8),
        _ => None,
    }
}

/// Read an image file as a single-face source image
///
/// # Errors
///
/// `ImageIo` if the file cannot be opened or decoded.
pub fn load_image(path: impl AsRef<Path>) -> Result<SourceImage> {
    let path = path.as_ref();
    let image = image::open(path)?;
    let format_hint = hint_for(image.color());
    let pixels = PixelBuffer::from_image(image.to_rgba8())?;
    crate::ctr_debug!("ctr::ImageIo", "Loaded '{}' ({}x{})",
        path.display(), pixels.width(), pixels.height());
    let mut source = SourceImage::single(pixels);
    source.format_hint = format_hint;
    Ok(source)
}

/// Write a pixel buffer to an image file (format from the extension)
///
/// # Errors
///
/// `ImageIo` if encoding or writing fails.
pub fn save_image(path: impl AsRef<Path>, pixels: &PixelBuffer) -> Result<()> {
    let path = path.as_ref();
    pixels.to_image().save(path)?;
    crate::ctr_debug!("ctr::ImageIo", "Saved '{}' ({}x{})",
        path.display(), pixels.width(), pixels.height());
    Ok(())
}
