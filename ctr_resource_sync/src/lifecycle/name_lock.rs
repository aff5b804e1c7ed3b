//! Per-name locks for in-flight edits
//!
//! A batch import holds the names it will replace until its results are
//! committed. Any other operation touching one of those names fails with
//! `NameBusy` instead of waiting.

use std::sync::{Arc, Mutex, MutexGuard};
use rustc_hash::FxHashSet;
use crate::error::{Error, Result};

/// Set of names currently held by an in-flight operation
#[derive(Clone, Default)]
pub struct NameLocks {
    held: Arc<Mutex<FxHashSet<String>>>,
}

impl NameLocks {
    /// Create an empty lock set
    pub fn new() -> Self {
        Self::default()
    }

    // Insert/remove of a single name cannot leave the set half-updated.
    fn held(&self) -> MutexGuard<'_, FxHashSet<String>> {
        self.held.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Take the lock on `name`, released when the guard drops
    ///
    /// # Errors
    ///
    /// `NameBusy` if the name is already held.
    pub fn try_lock(&self, name: &str) -> Result<NameGuard> {
        if !self.held().insert(name.to_string()) {
            return Err(Error::NameBusy(name.to_string()));
        }
        Ok(NameGuard {
            locks: self.clone(),
            name: name.to_string(),
        })
    }

    /// Fail with `NameBusy` if `name` is held
    pub fn check(&self, name: &str) -> Result<()> {
        if self.is_locked(name) {
            return Err(Error::NameBusy(name.to_string()));
        }
        Ok(())
    }

    /// Whether `name` is held
    pub fn is_locked(&self, name: &str) -> bool {
        self.held().contains(name)
    }

    /// Number of names held
    pub fn len(&self) -> usize {
        self.held().len()
    }

    /// Whether no name is held
    pub fn is_empty(&self) -> bool {
        self.held().is_empty()
    }
}

/// Lock on one name
pub struct NameGuard {
    locks: NameLocks,
    name: String,
}

impl NameGuard {
    /// The locked name
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for NameGuard {
    fn drop(&mut self) {
        self.locks.held().remove(&self.name);
    }
}
