/// Render-binding tier: name -> renderer-side object, for one scene and kind.
///
/// Binding creation (`prepare`) may fail and happens before any tier is
/// touched. `bind` and `unbind` only run afterwards and never fail.

use std::sync::{Arc, Mutex, MutexGuard};
use crate::error::{Error, Result};
use crate::renderer::{RenderBinding, Renderer};
use crate::resource::{Resource, ResourceKind};
use super::tier::NamedTier;

/// Name-keyed renderer bindings of one resource kind
pub struct RenderTable {
    kind: ResourceKind,
    renderer: Arc<Mutex<dyn Renderer>>,
    bindings: NamedTier<Arc<dyn RenderBinding>>,
}

impl RenderTable {
    /// Create an empty table forwarding to `renderer`
    pub fn new(kind: ResourceKind, renderer: Arc<Mutex<dyn Renderer>>) -> Self {
        Self {
            kind,
            renderer,
            bindings: NamedTier::new(),
        }
    }

    /// Resource kind this table binds
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    // A panic inside a renderer call must not make the table unusable
    fn renderer(&self) -> MutexGuard<'_, dyn Renderer + 'static> {
        match self.renderer.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    /// Ask the renderer for a binding of `resource`
    ///
    /// # Errors
    ///
    /// Whatever the renderer reports, or `BackendError` if its lock is poisoned.
    pub fn prepare(&self, resource: &Resource) -> Result<Arc<dyn RenderBinding>> {
        let mut renderer = self.renderer.lock()
            .map_err(|_| Error::BackendError("Renderer lock poisoned".to_string()))?;
        renderer.create_binding(resource)
    }

    /// Make `binding` visible under `name` (replaces or inserts)
    pub fn bind(&mut self, name: &str, binding: Arc<dyn RenderBinding>) {
        self.renderer().bind(self.kind, name, Arc::clone(&binding));
        self.bindings.insert(name, binding);
    }

    /// Remove the binding under `name`
    ///
    /// Returns the removed binding; absent names are a no-op.
    pub fn unbind(&mut self, name: &str) -> Option<Arc<dyn RenderBinding>> {
        let removed = self.bindings.remove(name)?;
        self.renderer().unbind(self.kind, name);
        Some(removed)
    }

    /// Binding under `name`
    pub fn get(&self, name: &str) -> Option<Arc<dyn RenderBinding>> {
        self.bindings.get(name).cloned()
    }

    /// Whether `name` is bound
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains(name)
    }

    /// Number of bindings
    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    /// Whether nothing is bound
    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Bound names (unordered)
    pub fn names(&self) -> Vec<&str> {
        self.bindings.names()
    }
}
