/// Thumbnail tier: name -> small RGBA preview shown by the editor UI.
///
/// Previews are decoded from the base level of face 0 and downscaled to fit a
/// square of `thumbnail_size` pixels. Lookup tables have no preview.

use image::RgbaImage;
use crate::codec;
use crate::error::Result;
use crate::resource::{Resource, ResourceKind};
use super::tier::NamedTier;

/// UI collaborator receiving preview updates
pub trait ThumbnailProvider: Send {
    /// Show `preview` for `name`, replacing any previous one
    fn set_thumbnail(&mut self, name: &str, preview: &RgbaImage);

    /// Stop showing a preview for `name`
    fn clear(&mut self, name: &str);
}

/// Scale `image` down to fit `max_side` (aspect ratio kept, never upscaled)
pub fn fit_preview(image: &RgbaImage, max_side: u32) -> RgbaImage {
    let (w, h) = image.dimensions();
    let max_side = max_side.max(1);
    if w <= max_side && h <= max_side {
        return image.clone();
    }
    let (tw, th) = if w >= h {
        (max_side, ((h as u64 * max_side as u64) / w as u64).max(1) as u32)
    } else {
        (((w as u64 * max_side as u64) / h as u64).max(1) as u32, max_side)
    };
    image::imageops::thumbnail(image, tw, th)
}

/// Name-keyed previews, optionally mirrored to a `ThumbnailProvider`
pub struct ThumbnailCache {
    thumbnail_size: u32,
    previews: NamedTier<RgbaImage>,
    provider: Option<Box<dyn ThumbnailProvider>>,
}

impl ThumbnailCache {
    /// Create an empty cache producing previews of at most `thumbnail_size`
    pub fn new(thumbnail_size: u32) -> Self {
        Self {
            thumbnail_size,
            previews: NamedTier::new(),
            provider: None,
        }
    }

    /// Forward every change to `provider`
    pub fn with_provider(mut self, provider: Box<dyn ThumbnailProvider>) -> Self {
        self.set_provider(provider);
        self
    }

    /// Install or swap the provider
    pub fn set_provider(&mut self, provider: Box<dyn ThumbnailProvider>) {
        self.provider = Some(provider);
    }

    /// Maximum preview side in pixels
    pub fn thumbnail_size(&self) -> u32 {
        self.thumbnail_size
    }

    /// Build the preview of `resource` (`None` for lookup tables)
    ///
    /// # Errors
    ///
    /// Decoding errors of the resource payload.
    pub fn prepare(&self, resource: &Resource) -> Result<Option<RgbaImage>> {
        if resource.kind == ResourceKind::Lut {
            return Ok(None);
        }
        let pixels = codec::decode(resource, 0)?;
        Ok(Some(fit_preview(&pixels.to_image(), self.thumbnail_size)))
    }

    /// Store `preview` under `name` (replaces or inserts)
    pub fn set(&mut self, name: &str, preview: RgbaImage) {
        if let Some(provider) = self.provider.as_mut() {
            provider.set_thumbnail(name, &preview);
        }
        self.previews.insert(name, preview);
    }

    /// Remove the preview under `name`
    ///
    /// Returns the removed preview; absent names are a no-op.
    pub fn clear(&mut self, name: &str) -> Option<RgbaImage> {
        let removed = self.previews.remove(name)?;
        if let Some(provider) = self.provider.as_mut() {
            provider.clear(name);
        }
        Some(removed)
    }

    /// Preview under `name`
    pub fn get(&self, name: &str) -> Option<&RgbaImage> {
        self.previews.get(name)
    }

    /// Whether `name` has a preview
    pub fn contains(&self, name: &str) -> bool {
        self.previews.contains(name)
    }

    /// Number of previews
    pub fn len(&self) -> usize {
        self.previews.len()
    }

    /// Whether no preview is stored
    pub fn is_empty(&self) -> bool {
        self.previews.is_empty()
    }

    /// Names with a preview (unordered)
    pub fn names(&self) -> Vec<&str> {
        self.previews.names()
    }
}

#[cfg(test)]
#[path = "thumbnail_cache_tests.rs"]
mod tests;
