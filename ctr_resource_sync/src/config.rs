//! Configuration descriptors
//!
//! Plain structs with sensible defaults, passed at construction time.

use crate::codec::TextureFormat;
use crate::error::{Error, Result};

/// Settings shared by a cache set and its lifecycle controller
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// Maximum side of a thumbnail preview in pixels (aspect ratio is kept)
    pub thumbnail_size: u32,
    /// Width and height of textures created by `add_blank`
    pub blank_size: u32,
    /// Format used for imports that neither request one nor carry a hint
    pub default_format: TextureFormat,
    /// Mip count used for imports that do not request one
    pub default_mip_count: u32,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            thumbnail_size: 128,
            blank_size: 8,
            default_format: TextureFormat::Rgba8,
            default_mip_count: 1,
        }
    }
}

/// Settings for batch imports
#[derive(Debug, Clone, Default)]
pub struct BatchConfig {
    /// Worker threads used for encoding (`None` = rayon default)
    pub threads: Option<usize>,
}

impl BatchConfig {
    /// Build the worker pool described by this config
    ///
    /// # Errors
    ///
    /// `threads == Some(0)` is rejected as `InitializationFailed`; pool creation
    /// failures are reported as `BackendError`.
    pub fn build_pool(&self) -> Result<rayon::ThreadPool> {
        if self.threads == Some(0) {
            return Err(Error::InitializationFailed(
                "batch 'threads' must be >= 1 when set".to_string(),
            ));
        }

        let mut builder = rayon::ThreadPoolBuilder::new();
        if let Some(n) = self.threads {
            builder = builder.num_threads(n);
        }
        builder
            .build()
            .map_err(|e| Error::BackendError(format!("failed to build batch thread pool: {}", e)))
    }
}
