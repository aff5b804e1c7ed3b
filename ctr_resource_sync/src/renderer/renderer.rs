/// Renderer collaborator - turns resources into renderer-visible bindings

use std::sync::Arc;
use crate::codec::TextureFormat;
use crate::error::Result;
use crate::resource::{Resource, ResourceKind};

// ============================================================================
// Binding info
// ============================================================================

/// Description of what a binding was created from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingInfo {
    /// Texture or lookup table
    pub kind: ResourceKind,
    /// Base width in pixels (entry count for LUTs)
    pub width: u32,
    /// Base height in pixels
    pub height: u32,
    /// Payload format
    pub format: TextureFormat,
    /// Mip levels uploaded
    pub mip_count: u32,
    /// 1 for 2D textures and LUTs, 6 for cubemaps
    pub face_count: u32,
}

impl BindingInfo {
    /// Describe `resource`
    pub fn from_resource(resource: &Resource) -> Self {
        Self {
            kind: resource.kind,
            width: resource.width,
            height: resource.height,
            format: resource.format,
            mip_count: resource.mip_count,
            face_count: resource.payload.face_count() as u32,
        }
    }
}

// ============================================================================
// Traits
// ============================================================================

/// Renderer-side object created for one resource (GPU texture, LUT sampler)
pub trait RenderBinding: Send + Sync {
    /// What the binding was created from
    fn info(&self) -> &BindingInfo;
}

/// Renderer interface consumed by the render-binding table
///
/// Creating a binding is the only fallible step; `bind` and `unbind` run
/// after all validation and must not fail.
pub trait Renderer: Send + Sync {
    /// Create a renderer object for `resource` (upload, sampler setup)
    ///
    /// Called before any cache tier is touched.
    fn create_binding(&mut self, resource: &Resource) -> Result<Arc<dyn RenderBinding>>;

    /// Make `binding` visible under `name`, replacing any previous binding
    fn bind(&mut self, kind: ResourceKind, name: &str, binding: Arc<dyn RenderBinding>);

    /// Drop the binding visible under `name` (no-op if absent)
    fn unbind(&mut self, kind: ResourceKind, name: &str);
}
