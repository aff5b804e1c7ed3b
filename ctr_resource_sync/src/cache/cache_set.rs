/// One open file's view of the three cache tiers for one resource kind.
///
/// - global index: shared by every open file, entries tagged with `owner`
/// - render table: bindings visible to this file's scene
/// - thumbnail cache: previews shown in this file's UI
///
/// Writes go through `prepare` (fallible, touches nothing) followed by
/// `insert_prepared` / `purge` / `rename` (infallible). Callers that do all
/// their validation before the first write therefore never leave a tier
/// partially updated.

use std::sync::{Arc, Mutex, MutexGuard};
use bitflags::bitflags;
use image::RgbaImage;
use crate::config::CacheConfig;
use crate::error::Result;
use crate::renderer::{RenderBinding, Renderer};
use crate::resource::{OwnerId, Resource, ResourceKind};
use super::global_index::{GlobalIndex, SharedGlobalIndex};
use super::render_table::RenderTable;
use super::thumbnail_cache::{ThumbnailCache, ThumbnailProvider};

bitflags! {
    /// Set of cache tiers
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct Tiers: u8 {
        /// Process-wide resource index
        const GLOBAL = 1 << 0;
        /// Render-binding table
        const RENDER = 1 << 1;
        /// Thumbnail cache
        const THUMBNAIL = 1 << 2;
    }
}

/// Everything derived from a resource, computed before any tier is touched
pub struct PreparedEntry {
    /// The record to publish
    pub resource: Resource,
    /// Renderer binding created for it
    pub binding: Arc<dyn RenderBinding>,
    /// Preview (`None` for lookup tables or undecodable loads)
    pub preview: Option<RgbaImage>,
}

/// The three tiers as seen by one owner
pub struct ResourceCacheSet {
    kind: ResourceKind,
    owner: OwnerId,
    global: SharedGlobalIndex,
    render: RenderTable,
    thumbnails: ThumbnailCache,
}

impl ResourceCacheSet {
    /// Create a cache set for `owner` over the shared `global` index
    pub fn new(
        kind: ResourceKind,
        owner: OwnerId,
        global: SharedGlobalIndex,
        renderer: Arc<Mutex<dyn Renderer>>,
        config: &CacheConfig,
    ) -> Self {
        Self {
            kind,
            owner,
            global,
            render: RenderTable::new(kind, renderer),
            thumbnails: ThumbnailCache::new(config.thumbnail_size),
        }
    }

    /// Forward thumbnail changes to a UI provider
    pub fn with_thumbnail_provider(mut self, provider: Box<dyn ThumbnailProvider>) -> Self {
        self.set_thumbnail_provider(provider);
        self
    }

    /// Install or swap the thumbnail UI provider
    pub fn set_thumbnail_provider(&mut self, provider: Box<dyn ThumbnailProvider>) {
        self.thumbnails.set_provider(provider);
    }

    /// Resource kind held by this set
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    /// Owner tag used for global-index contributions
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Shared global index
    pub fn global(&self) -> &SharedGlobalIndex {
        &self.global
    }

    /// Render-binding tier
    pub fn render(&self) -> &RenderTable {
        &self.render
    }

    /// Thumbnail tier
    pub fn thumbnails(&self) -> &ThumbnailCache {
        &self.thumbnails
    }

    // Index mutations are single map operations; a poisoned lock still holds
    // a coherent index.
    fn global_lock(&self) -> MutexGuard<'_, GlobalIndex> {
        match self.global.lock() {
            Ok(guard) => guard,
            Err(poisoned) => {
                crate::ctr_warn!("ctr::CacheSet", "Global index lock was poisoned, recovering");
                poisoned.into_inner()
            }
        }
    }

    // ===== LOOKUP =====

    /// Visible global record under `name` (possibly from another file)
    pub fn lookup(&self, name: &str) -> Option<Resource> {
        self.global_lock().lookup(name)
    }

    /// Tiers currently holding `name` for this owner
    pub fn tiers_holding(&self, name: &str) -> Tiers {
        let mut tiers = Tiers::empty();
        if self.global_lock().lookup_owned(self.owner, name).is_some() {
            tiers |= Tiers::GLOBAL;
        }
        if self.render.contains(name) {
            tiers |= Tiers::RENDER;
        }
        if self.thumbnails.contains(name) {
            tiers |= Tiers::THUMBNAIL;
        }
        tiers
    }

    /// Whether no local tier holds `name` without a global entry
    pub fn is_consistent(&self, name: &str) -> bool {
        let tiers = self.tiers_holding(name);
        let local = tiers.intersects(Tiers::RENDER | Tiers::THUMBNAIL);
        !local || tiers.contains(Tiers::GLOBAL)
    }

    // ===== PREPARE (fallible, no side effect on tiers) =====

    /// Create the binding and preview for `resource`
    ///
    /// # Errors
    ///
    /// Renderer failures and preview decoding errors.
    pub fn prepare(&self, resource: Resource) -> Result<PreparedEntry> {
        let binding = self.render.prepare(&resource)?;
        let preview = self.thumbnails.prepare(&resource)?;
        Ok(PreparedEntry { resource, binding, preview })
    }

    /// Like `prepare`, but a preview failure only drops the preview
    ///
    /// Used for records coming from a file, which may use formats this codec
    /// cannot decode.
    pub fn prepare_lenient(&self, resource: Resource) -> Result<PreparedEntry> {
        let binding = self.render.prepare(&resource)?;
        let preview = match self.thumbnails.prepare(&resource) {
            Ok(preview) => preview,
            Err(err) => {
                crate::ctr_warn!("ctr::CacheSet",
                    "No preview for '{}': {}", resource.name, err);
                None
            }
        };
        Ok(PreparedEntry { resource, binding, preview })
    }

    // ===== COMMIT (infallible) =====

    /// Publish a prepared entry: global upsert, render bind, thumbnail set
    pub fn insert_prepared(&mut self, prepared: PreparedEntry) {
        let name = prepared.resource.name.clone();
        self.global_lock().upsert(self.owner, &name, prepared.resource);
        self.render.bind(&name, prepared.binding);
        if let Some(preview) = prepared.preview {
            self.thumbnails.set(&name, preview);
        }
        crate::ctr_trace!("ctr::CacheSet", "Inserted '{}' into all tiers ({})", name, self.owner);
    }

    /// Publish a record loaded from a file without shadowing other files
    pub fn register_prepared(&mut self, prepared: PreparedEntry) {
        let name = prepared.resource.name.clone();
        let visible = self.global_lock().register(self.owner, &name, prepared.resource);
        if !visible {
            crate::ctr_debug!("ctr::CacheSet",
                "'{}' already provided by another file, keeping it visible", name);
        }
        self.render.bind(&name, prepared.binding);
        if let Some(preview) = prepared.preview {
            self.thumbnails.set(&name, preview);
        }
    }

    /// Remove `name` from every tier, returning the tiers that held it
    ///
    /// Only this owner's global contribution is removed.
    pub fn purge(&mut self, name: &str) -> Tiers {
        let mut tiers = Tiers::empty();
        if self.thumbnails.clear(name).is_some() {
            tiers |= Tiers::THUMBNAIL;
        }
        if self.render.unbind(name).is_some() {
            tiers |= Tiers::RENDER;
        }
        if self.global_lock().remove(self.owner, name) {
            tiers |= Tiers::GLOBAL;
        }
        if !tiers.is_empty() {
            crate::ctr_trace!("ctr::CacheSet", "Purged '{}' from {:?}", name, tiers);
        }
        tiers
    }

    /// Move every tier entry of `old` to `renamed.name`
    ///
    /// The render binding and preview objects are reused as they are; the
    /// record itself is re-inserted with its payload shared.
    pub fn rename(&mut self, old: &str, renamed: Resource) {
        let new = renamed.name.clone();
        let binding = self.render.get(old);
        let preview = self.thumbnails.get(old).cloned();

        self.purge(old);

        self.global_lock().upsert(self.owner, &new, renamed);
        if let Some(binding) = binding {
            self.render.bind(&new, binding);
        }
        if let Some(preview) = preview {
            self.thumbnails.set(&new, preview);
        }
        crate::ctr_trace!("ctr::CacheSet", "Renamed '{}' -> '{}' in all tiers", old, new);
    }

    /// Drop this owner's entries for `names` and every global contribution
    /// of the owner
    pub fn teardown<'a>(&mut self, names: impl IntoIterator<Item = &'a str>) {
        for name in names {
            self.thumbnails.clear(name);
            self.render.unbind(name);
        }
        let removed = self.global_lock().remove_owner(self.owner);
        crate::ctr_debug!("ctr::CacheSet",
            "Released {} global entries of {}", removed.len(), self.owner);
    }
}

#[cfg(test)]
#[path = "cache_set_tests.rs"]
mod tests;
