/// In-memory renderer for unit tests: records bind calls and can be told to fail
///
/// Records every call so tests can check the order in which the cache tiers
/// talk to the renderer, and can be told to fail binding creation.

#[cfg(test)]
use std::sync::{Arc, Mutex};
#[cfg(test)]
use rustc_hash::FxHashMap;

#[cfg(test)]
use crate::renderer::{Renderer, RenderBinding, BindingInfo};
#[cfg(test)]
use crate::resource::{Resource, ResourceKind};
#[cfg(test)]
use crate::error::{Error, Result};

// ============================================================================
// Mock Binding
// ============================================================================

#[cfg(test)]
#[derive(Debug)]
pub struct MockBinding {
    pub info: BindingInfo,
    pub name: String,
}

#[cfg(test)]
impl MockBinding {
    pub fn new(info: BindingInfo, name: String) -> Self {
        Self { info, name }
    }
}

#[cfg(test)]
impl RenderBinding for MockBinding {
    fn info(&self) -> &BindingInfo {
        &self.info
    }
}

// ============================================================================
// RENDERER
// ============================================================================

#[cfg(test)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    Create(String),
    Bind(ResourceKind, String),
    Unbind(ResourceKind, String),
}

#[cfg(test)]
pub struct MockRenderer {
    pub calls: Arc<Mutex<Vec<MockCall>>>,
    pub bound: Arc<Mutex<FxHashMap<(ResourceKind, String), Arc<dyn RenderBinding>>>>,
    pub fail_create: Arc<Mutex<bool>>,
}

#[cfg(test)]
impl MockRenderer {
    pub fn new() -> Self {
        Self {
            calls: Arc::new(Mutex::new(Vec::new())),
            bound: Arc::new(Mutex::new(FxHashMap::default())),
            fail_create: Arc::new(Mutex::new(false)),
        }
    }

    /// Make every following `create_binding` fail (or succeed again)
    pub fn set_fail_create(&self, fail: bool) {
        *self.fail_create.lock().unwrap() = fail;
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    pub fn is_bound(&self, kind: ResourceKind, name: &str) -> bool {
        self.bound.lock().unwrap().contains_key(&(kind, name.to_string()))
    }

    pub fn bound_count(&self) -> usize {
        self.bound.lock().unwrap().len()
    }
}

#[cfg(test)]
impl Renderer for MockRenderer {
    fn create_binding(&mut self, resource: &Resource) -> Result<Arc<dyn RenderBinding>> {
        if *self.fail_create.lock().unwrap() {
            return Err(Error::BackendError(format!(
                "mock: binding creation for '{}' refused", resource.name
            )));
        }
        self.calls.lock().unwrap().push(MockCall::Create(resource.name.clone()));
        Ok(Arc::new(MockBinding::new(
            BindingInfo::from_resource(resource),
            resource.name.clone(),
        )))
    }

    fn bind(&mut self, kind: ResourceKind, name: &str, binding: Arc<dyn RenderBinding>) {
        self.calls.lock().unwrap().push(MockCall::Bind(kind, name.to_string()));
        self.bound.lock().unwrap().insert((kind, name.to_string()), binding);
    }

    fn unbind(&mut self, kind: ResourceKind, name: &str) {
        self.calls.lock().unwrap().push(MockCall::Unbind(kind, name.to_string()));
        self.bound.lock().unwrap().remove(&(kind, name.to_string()));
    }
}

#[cfg(test)]
impl Clone for MockRenderer {
    fn clone(&self) -> Self {
        Self {
            calls: Arc::clone(&self.calls),
            bound: Arc::clone(&self.bound),
            fail_create: Arc::clone(&self.fail_create),
        }
    }
}

#[cfg(test)]
#[path = "mock_renderer_tests.rs"]
mod tests;
